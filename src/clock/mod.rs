//! Process-wide simulation clock.
//!
//! The pause menu, the win flag and the scene loader are the only writers.
//! They send `SetTimeScale` requests; the last one applied in a frame wins.
//! `Time<Virtual>` follows the clock, so `FixedUpdate` physics freezes at 0.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockWriter {
    PauseMenu,
    WinFlag,
    SceneLoader,
}

#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct SetTimeScale {
    pub scale: f32,
    pub writer: ClockWriter,
}

impl SetTimeScale {
    pub fn freeze(writer: ClockWriter) -> Self {
        Self { scale: 0.0, writer }
    }

    pub fn resume(writer: ClockWriter) -> Self {
        Self { scale: 1.0, writer }
    }
}

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct SimulationClock {
    scale: f32,
    last_writer: Option<ClockWriter>,
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self {
            scale: 1.0,
            last_writer: None,
        }
    }
}

impl SimulationClock {
    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn last_writer(&self) -> Option<ClockWriter> {
        self.last_writer
    }

    pub fn is_running(&self) -> bool {
        self.scale > 0.0
    }

    fn apply(&mut self, request: &SetTimeScale) {
        self.scale = request.scale.max(0.0);
        self.last_writer = Some(request.writer);
    }
}

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClockSet;

pub struct ClockPlugin;

impl Plugin for ClockPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<SetTimeScale>()
            .init_resource::<SimulationClock>()
            .add_systems(Update, apply_time_scale.in_set(ClockSet));
    }
}

/// Run condition for gameplay that must stop while the game is frozen.
pub fn simulation_running(clock: Option<Res<SimulationClock>>) -> bool {
    clock.is_none_or(|clock| clock.is_running())
}

pub fn apply_time_scale(
    mut requests: MessageReader<SetTimeScale>,
    mut clock: ResMut<SimulationClock>,
    mut virtual_time: ResMut<Time<Virtual>>,
) {
    let Some(last) = requests.read().last() else {
        return;
    };

    clock.apply(last);
    info!("Time scale set to {} by {:?}", clock.scale(), clock.last_writer());

    if clock.is_running() {
        virtual_time.set_relative_speed(clock.scale);
        virtual_time.unpause();
    } else {
        virtual_time.pause();
    }
}
