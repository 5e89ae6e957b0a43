//! Damage flash and sound effects.
//!
//! The flash tints the player red and schedules the restore on a delayed
//! task queue polled against real time, so it completes while paused too.

pub mod audio;

use std::time::Duration;

use bevy::prelude::*;

use crate::config::GameConfig;
use crate::player::health::PlayerDamaged;
use crate::scene::process_scene_requests;

pub const FLASH_COLOR: Color = Color::srgb(1.0, 0.0, 0.0);
pub const DEFAULT_TINT: Color = Color::WHITE;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeferredAction {
    RestoreTint { entity: Entity, color: Color },
}

impl DeferredAction {
    fn target(&self) -> Entity {
        match self {
            DeferredAction::RestoreTint { entity, .. } => *entity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ScheduledTask {
    due: Duration,
    action: DeferredAction,
}

/// Actions waiting for a point in real time.
///
/// At most one pending action per target entity: scheduling again for the
/// same entity replaces the old one, so overlapping flashes restart.
#[derive(Resource, Debug, Default)]
pub struct DelayedTasks {
    pending: Vec<ScheduledTask>,
}

impl DelayedTasks {
    pub fn schedule(&mut self, now: Duration, delay: Duration, action: DeferredAction) {
        let task = ScheduledTask { due: now + delay, action };
        match self.pending.iter_mut().find(|t| t.action.target() == action.target()) {
            Some(existing) => *existing = task,
            None => self.pending.push(task),
        }
    }

    /// Removes and returns every action due at `now`, oldest deadline first.
    pub fn take_due(&mut self, now: Duration) -> Vec<DeferredAction> {
        let (mut due, pending): (Vec<_>, Vec<_>) = self.pending.drain(..).partition(|t| t.due <= now);
        self.pending = pending;
        due.sort_by_key(|t| t.due);
        due.into_iter().map(|t| t.action).collect()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

pub struct FeedbackPlugin;

impl Plugin for FeedbackPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DelayedTasks>()
            .add_message::<audio::PlaySfx>()
            .add_systems(
                Update,
                (
                    start_flash
                        .run_if(resource_exists::<GameConfig>)
                        .after(process_scene_requests),
                    run_delayed_tasks,
                )
                    .chain(),
            );
    }
}

pub fn start_flash(
    mut damaged: MessageReader<PlayerDamaged>,
    config: Res<GameConfig>,
    real_time: Res<Time<Real>>,
    mut sprites: Query<&mut Sprite>,
    mut tasks: ResMut<DelayedTasks>,
) {
    let delay = Duration::from_secs_f32(config.player.flash_seconds);
    for event in damaged.read() {
        let Ok(mut sprite) = sprites.get_mut(event.player) else {
            continue;
        };
        sprite.color = FLASH_COLOR;
        tasks.schedule(
            real_time.elapsed(),
            delay,
            DeferredAction::RestoreTint {
                entity: event.player,
                color: DEFAULT_TINT,
            },
        );
    }
}

pub fn run_delayed_tasks(
    real_time: Res<Time<Real>>,
    mut tasks: ResMut<DelayedTasks>,
    mut sprites: Query<&mut Sprite>,
) {
    for action in tasks.take_due(real_time.elapsed()) {
        match action {
            DeferredAction::RestoreTint { entity, color } => {
                // The entity may be gone after a reload.
                if let Ok(mut sprite) = sprites.get_mut(entity) {
                    sprite.color = color;
                }
            }
        }
    }
}
