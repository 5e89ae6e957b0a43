use bevy::prelude::*;

use crate::config::level::{LevelError, TILE_SIZE, Tile, cell_center};
use crate::config::{GameConfig, LevelDefinition};
use crate::physics::contacts::ContactTag;
use crate::physics::{Collider, CollisionLayers, Sensor, StaticBody};
use crate::player::spawn::{player_sprite, spawn_player};
use crate::scene::SceneEntity;
use crate::ui;

const TILE_Z_POSITION: f32 = 0.0;
const PICKUP_Z_POSITION: f32 = 10.0;

const GROUND_COLOR: Color = Color::srgb(0.45, 0.3, 0.2);
const SPIKES_COLOR: Color = Color::srgb(0.75, 0.75, 0.8);
const COIN_COLOR: Color = Color::srgb(1.0, 0.84, 0.0);
const STRAWBERRY_COLOR: Color = Color::srgb(0.9, 0.1, 0.3);
const FLAG_COLOR: Color = Color::srgb(0.2, 0.8, 0.3);

struct TileLook {
    color: Color,
    size: Vec2,
    /// Offset of the body from the cell centre.
    offset: Vec2,
    z: f32,
}

fn tile_look(tile: Tile) -> TileLook {
    let full = Vec2::splat(TILE_SIZE);
    match tile {
        Tile::Ground => TileLook { color: GROUND_COLOR, size: full, offset: Vec2::ZERO, z: TILE_Z_POSITION },
        Tile::Spikes => TileLook {
            color: SPIKES_COLOR,
            size: Vec2::new(TILE_SIZE, TILE_SIZE / 2.0),
            offset: Vec2::new(0.0, -TILE_SIZE / 4.0),
            z: TILE_Z_POSITION,
        },
        Tile::Coin => TileLook { color: COIN_COLOR, size: Vec2::splat(14.0), offset: Vec2::ZERO, z: PICKUP_Z_POSITION },
        Tile::Strawberry => TileLook {
            color: STRAWBERRY_COLOR,
            size: Vec2::splat(16.0),
            offset: Vec2::ZERO,
            z: PICKUP_Z_POSITION,
        },
        Tile::Flag => TileLook { color: FLAG_COLOR, size: Vec2::new(12.0, TILE_SIZE), offset: Vec2::ZERO, z: PICKUP_Z_POSITION },
    }
}

fn spawn_tile(commands: &mut Commands, cell: IVec2, tile: Tile) {
    let look = tile_look(tile);
    let position = cell_center(cell) + look.offset;
    let mut entity = commands.spawn((
        SceneEntity,
        StaticBody,
        Sprite::from_color(look.color, look.size),
        Transform::from_translation(position.extend(look.z)),
    ));

    match tile {
        Tile::Ground => {
            entity.insert(Collider::new(look.size, CollisionLayers::GROUND));
        }
        Tile::Spikes => {
            entity.insert((Collider::new(look.size, CollisionLayers::HAZARD), ContactTag::Damage));
        }
        Tile::Coin => {
            entity.insert((Sensor, Collider::new(look.size, CollisionLayers::PICKUP), ContactTag::Coin));
        }
        Tile::Strawberry => {
            entity.insert((Sensor, Collider::new(look.size, CollisionLayers::PICKUP), ContactTag::Strawberry));
        }
        Tile::Flag => {
            entity.insert((Sensor, Collider::new(look.size, CollisionLayers::PICKUP), ContactTag::Flag));
        }
    }
}

/// Spawns the tiles, the player and the level UI.
pub fn build_level(
    commands: &mut Commands,
    config: &GameConfig,
    level: &LevelDefinition,
    asset_server: Option<&AssetServer>,
    atlas_layouts: Option<&mut Assets<TextureAtlasLayout>>,
) -> Result<(), LevelError> {
    let layout = level.layout()?;

    for (cell, tile) in &layout.tiles {
        spawn_tile(commands, *cell, *tile);
    }

    let (sprite, sheet) = player_sprite(&config.player, asset_server, atlas_layouts);
    spawn_player(commands, &config.player, cell_center(layout.spawn), sprite, sheet);

    ui::hud::spawn_hud(commands);
    ui::menus::spawn_pause_menu(commands);
    ui::menus::spawn_win_screen(commands, level.next.is_some());

    info!(
        "Built level `{}`: {}x{} cells, {} coins",
        level.name,
        layout.width,
        layout.height,
        layout.count(Tile::Coin)
    );
    Ok(())
}

pub fn build_main_menu(commands: &mut Commands, config: &GameConfig) {
    ui::menus::spawn_main_menu(commands, &config.first_level);
}
