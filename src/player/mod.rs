//! The player: input, motion, jump budget, health and animation.

pub mod animation;
pub mod health;
pub mod movement;
pub mod spawn;
pub mod state;

use bevy::prelude::*;

use crate::clock::simulation_running;
use crate::config::GameConfig;
use crate::physics::PhysicsSet;

/// Player marker component.
#[derive(Component, Debug, Default)]
pub struct Player;

/// Contact handlers that mutate the player, after contact detection.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlayerContactSet;

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<movement::PlayerInput>()
            .add_message::<health::PlayerDamaged>()
            .configure_sets(
                FixedUpdate,
                PlayerContactSet
                    .after(PhysicsSet::Contacts)
                    .run_if(simulation_running)
                    .run_if(resource_exists::<GameConfig>),
            )
            .add_systems(FixedUpdate, movement::sense_ground.in_set(PhysicsSet::Sense))
            .add_systems(
                FixedUpdate,
                (health::apply_hazard_damage, health::collect_strawberries).in_set(PlayerContactSet),
            )
            .add_systems(
                Update,
                (
                    movement::read_input,
                    movement::move_player.run_if(simulation_running),
                    animation::select_animation,
                    animation::animate_sheet,
                )
                    .chain(),
            );
    }
}
