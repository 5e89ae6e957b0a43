//! HUD and menus.

pub mod hud;
pub mod menus;

use bevy::prelude::*;

use crate::clock::ClockSet;
use crate::config::GameConfig;
use crate::scene::{in_level, process_scene_requests};

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<menus::MenuAction>()
            .init_resource::<menus::PauseState>()
            .add_systems(
                Update,
                (
                    hud::update_health_bar,
                    menus::press_menu_buttons,
                    menus::pause_on_escape.run_if(in_level),
                    menus::apply_menu_actions.run_if(resource_exists::<GameConfig>),
                )
                    .chain()
                    .before(process_scene_requests)
                    .before(ClockSet),
            );
    }
}
