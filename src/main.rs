mod clock;
mod config;
mod feedback;
mod logging;
mod physics;
mod pickups;
mod player;
mod scene;
mod ui;

use bevy::{
    log::LogPlugin,
    prelude::*,
    window::{Window, WindowPlugin, WindowResolution},
};

use crate::clock::ClockPlugin;
use crate::config::ConfigPlugin;
use crate::feedback::FeedbackPlugin;
use crate::feedback::audio::AudioFeedbackPlugin;
use crate::physics::PhysicsPlugin;
use crate::pickups::PickupsPlugin;
use crate::player::{Player, PlayerPlugin};
use crate::scene::ScenePlugin;
use crate::ui::UiPlugin;

// Fixed physics rate, independent of the frame rate
const PHYSICS_HZ: f64 = 64.0;

#[derive(Component)]
struct CameraFollow;

fn main() {
    logging::init_logging();

    // Window size
    let window_width = 1280;
    let window_height = 720;

    App::new()
        .insert_resource(ClearColor(Color::srgb(0.53, 0.75, 0.92)))
        .insert_resource(Time::<Fixed>::from_hz(PHYSICS_HZ))
        .add_plugins(
            DefaultPlugins
                .set(AssetPlugin {
                    file_path: "src/assets".into(),
                    ..default()
                })
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Strawberry Hop".into(),
                        resolution: WindowResolution::new(window_width, window_height),
                        resizable: false,
                        ..default()
                    }),
                    ..default()
                })
                .set(ImagePlugin::default_nearest())
                .disable::<LogPlugin>(),
        )
        .add_plugins((
            ConfigPlugin,
            ClockPlugin,
            PhysicsPlugin,
            PlayerPlugin,
            PickupsPlugin,
            FeedbackPlugin,
            AudioFeedbackPlugin,
            ScenePlugin,
            UiPlugin,
        ))
        .add_systems(Startup, setup_camera)
        .add_systems(Update, follow_player)
        .run();
}

fn setup_camera(mut commands: Commands) {
    commands.spawn((Camera2d, CameraFollow));
}

/// Eases the camera towards the player.
fn follow_player(
    player_query: Query<&Transform, With<Player>>,
    mut camera_query: Query<&mut Transform, (With<CameraFollow>, Without<Player>)>,
) {
    let Ok(player_transform) = player_query.single() else {
        return;
    };
    let Ok(mut camera_transform) = camera_query.single_mut() else {
        return;
    };

    let lerp_speed = 0.1;
    let target = player_transform.translation.truncate();
    camera_transform.translation.x += (target.x - camera_transform.translation.x) * lerp_speed;
    camera_transform.translation.y += (target.y - camera_transform.translation.y) * lerp_speed;

    camera_transform.translation.x = camera_transform.translation.x.round();
    camera_transform.translation.y = camera_transform.translation.y.round();
}
