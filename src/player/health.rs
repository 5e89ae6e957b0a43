use std::collections::HashSet;

use bevy::prelude::*;

use crate::config::GameConfig;
use crate::feedback::audio::{PlaySfx, Sfx};
use crate::physics::Velocity;
use crate::physics::contacts::{ContactKind, ContactStarted, ContactTag};
use crate::player::Player;
use crate::player::movement::MotionTuning;
use crate::player::state::{Health, HealthOutcome};
use crate::pickups::Consumed;
use crate::scene::SceneRequest;

/// Written after the player loses health; the flash feedback listens for it.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerDamaged {
    pub player: Entity,
    pub remaining: i32,
}

/// Solid hazards hurt on contact, knock the player upwards and may kill.
pub fn apply_hazard_damage(
    mut contacts: MessageReader<ContactStarted>,
    config: Res<GameConfig>,
    mut players: Query<(&mut Health, &mut Velocity, &MotionTuning), With<Player>>,
    mut damaged: MessageWriter<PlayerDamaged>,
    mut sfx: MessageWriter<PlaySfx>,
    mut scene: MessageWriter<SceneRequest>,
) {
    for contact in contacts.read() {
        if contact.tag != ContactTag::Damage || contact.kind != ContactKind::Collision {
            continue;
        }
        let Ok((mut health, mut velocity, tuning)) = players.get_mut(contact.body) else {
            continue;
        };

        sfx.write(PlaySfx::new(Sfx::Hurt));
        let outcome = health.damage(config.hazards.damage);
        velocity.y = tuning.jump_force;
        damaged.write(PlayerDamaged {
            player: contact.body,
            remaining: health.current(),
        });
        info!("Player hit by hazard, health {}/{}", health.current(), health.max());

        if outcome == HealthOutcome::Depleted {
            info!("Player died, reloading level");
            scene.write(SceneRequest::ReloadActive);
        }
    }
}

pub fn collect_strawberries(
    mut commands: Commands,
    mut contacts: MessageReader<ContactStarted>,
    config: Res<GameConfig>,
    mut players: Query<&mut Health, With<Player>>,
    pickups: Query<(), Without<Consumed>>,
) {
    let mut eaten = HashSet::new();
    for contact in contacts.read() {
        if contact.tag != ContactTag::Strawberry || contact.kind != ContactKind::Trigger {
            continue;
        }
        let Ok(mut health) = players.get_mut(contact.body) else {
            continue;
        };
        if pickups.get(contact.other).is_err() || !eaten.insert(contact.other) {
            continue;
        }

        health.heal(config.pickups.strawberry_heal);
        debug!("Strawberry eaten, health {}/{}", health.current(), health.max());
        commands.entity(contact.other).despawn();
    }
}
