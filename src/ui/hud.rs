use bevy::prelude::*;

use crate::player::Player;
use crate::player::state::Health;
use crate::scene::SceneEntity;

const BAR_WIDTH: f32 = 200.0;
const BAR_HEIGHT: f32 = 18.0;

/// Inner node of the health bar; its width is the health fraction.
#[derive(Component, Debug, Default)]
pub struct HealthFill;

#[derive(Component, Debug, Default)]
pub struct CoinCounter;

pub fn spawn_hud(commands: &mut Commands) {
    commands
        .spawn((
            SceneEntity,
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(16.0),
                top: Val::Px(16.0),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(8.0),
                ..default()
            },
        ))
        .with_children(|hud| {
            hud.spawn((
                Node {
                    width: Val::Px(BAR_WIDTH),
                    height: Val::Px(BAR_HEIGHT),
                    ..default()
                },
                BackgroundColor(Color::srgb(0.15, 0.15, 0.15)),
            ))
            .with_children(|bar| {
                bar.spawn((
                    HealthFill,
                    Node {
                        width: Val::Percent(100.0),
                        height: Val::Percent(100.0),
                        ..default()
                    },
                    BackgroundColor(Color::srgb(0.85, 0.15, 0.2)),
                ));
            });
            hud.spawn((
                CoinCounter,
                Text::new("0"),
                TextFont {
                    font_size: 24.0,
                    ..default()
                },
                TextColor(Color::srgb(1.0, 0.84, 0.0)),
            ));
        });
}

/// Keeps the fill width in step with the player's health. No-op without a HUD.
pub fn update_health_bar(
    players: Query<&Health, (With<Player>, Changed<Health>)>,
    mut fills: Query<&mut Node, With<HealthFill>>,
) {
    let Some(health) = players.iter().next() else {
        return;
    };
    for mut node in fills.iter_mut() {
        node.width = Val::Percent(health.fraction() * 100.0);
    }
}
