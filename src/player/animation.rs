use bevy::prelude::*;

use crate::config::{ClipRow, SpriteSheet};
use crate::physics::Velocity;
use crate::player::Player;
use crate::player::movement::PlayerInput;
use crate::player::state::JumpState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlayerAnimation {
    #[default]
    Idle,
    Run,
    Jump,
    Fall,
}

impl PlayerAnimation {
    /// Pick the clip for the current motion.
    pub fn select(grounded: bool, axis: f32, vertical_velocity: f32) -> Self {
        match (grounded, axis == 0.0) {
            (true, true) => PlayerAnimation::Idle,
            (true, false) => PlayerAnimation::Run,
            (false, _) if vertical_velocity > 0.0 => PlayerAnimation::Jump,
            (false, _) => PlayerAnimation::Fall,
        }
    }

    pub fn clip_name(self) -> &'static str {
        match self {
            PlayerAnimation::Idle => "Player_Idle",
            PlayerAnimation::Run => "Player_Run",
            PlayerAnimation::Jump => "Player_Jump",
            PlayerAnimation::Fall => "Player_Fall",
        }
    }

    fn row(self, sheet: &SpriteSheet) -> ClipRow {
        match self {
            PlayerAnimation::Idle => sheet.idle,
            PlayerAnimation::Run => sheet.run,
            PlayerAnimation::Jump => sheet.jump,
            PlayerAnimation::Fall => sheet.fall,
        }
    }
}

#[derive(Component, Debug, Default)]
pub struct AnimationController {
    pub current: PlayerAnimation,
    pub facing_left: bool,
}

/// Atlas data for players drawn from a sprite sheet.
#[derive(Component, Debug, Clone)]
pub struct SheetAnimation {
    pub sheet: SpriteSheet,
    pub timer: Timer,
}

impl SheetAnimation {
    pub fn new(sheet: SpriteSheet) -> Self {
        let timer = Timer::from_seconds(sheet.frame_time, TimerMode::Repeating);
        Self { sheet, timer }
    }

    pub fn clip(&self, animation: PlayerAnimation) -> AnimationClip {
        let row = animation.row(&self.sheet);
        AnimationClip::new(row.row, row.frames, self.sheet.columns)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnimationClip {
    first: usize,
    last: usize,
}

impl AnimationClip {
    pub fn new(row: usize, frame_count: usize, atlas_columns: usize) -> Self {
        let first = row * atlas_columns;
        Self {
            first,
            last: first + frame_count.max(1) - 1,
        }
    }

    pub fn start(self) -> usize {
        self.first
    }

    pub fn contains(self, index: usize) -> bool {
        (self.first..=self.last).contains(&index)
    }

    // Loops back to the first frame
    pub fn next(self, index: usize) -> usize {
        if index >= self.last { self.first } else { index + 1 }
    }
}

/// Chooses the clip each frame. Sprites without a sheet only track the name.
pub fn select_animation(
    input: Res<PlayerInput>,
    mut players: Query<(&JumpState, &Velocity, &mut AnimationController, &mut Sprite), With<Player>>,
) {
    for (jumps, velocity, mut controller, mut sprite) in players.iter_mut() {
        let next = PlayerAnimation::select(jumps.is_grounded(), input.axis, velocity.y);
        if controller.current != next {
            trace!("Playing {}", next.clip_name());
            controller.current = next;
        }

        if input.axis != 0.0 {
            controller.facing_left = input.axis < 0.0;
        }
        sprite.flip_x = controller.facing_left;
    }
}

pub fn animate_sheet(
    time: Res<Time>,
    mut players: Query<(&AnimationController, &mut SheetAnimation, &mut Sprite)>,
) {
    for (controller, mut sheet, mut sprite) in players.iter_mut() {
        let clip = sheet.clip(controller.current);
        let Some(atlas) = sprite.texture_atlas.as_mut() else {
            continue;
        };

        if !clip.contains(atlas.index) {
            atlas.index = clip.start();
            sheet.timer.reset();
            continue;
        }

        sheet.timer.tick(time.delta());
        if sheet.timer.just_finished() {
            atlas.index = clip.next(atlas.index);
        }
    }
}
