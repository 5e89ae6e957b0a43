use bevy::prelude::*;

use crate::config::{PlayerTuning, SpriteSheet};
use crate::physics::{Collider, CollisionLayers, DynamicBody, Gravity, Velocity};
use crate::player::Player;
use crate::player::animation::{AnimationController, SheetAnimation};
use crate::player::movement::{GroundCheck, MotionTuning};
use crate::player::state::{CoinPurse, Health, JumpState};
use crate::scene::SceneEntity;

pub const PLAYER_SIZE: Vec2 = Vec2::new(20.0, 28.0);
const PLAYER_Z_POSITION: f32 = 20.0;

fn create_player_atlas_layout(
    atlas_layouts: &mut Assets<TextureAtlasLayout>,
    sheet: &SpriteSheet,
) -> Handle<TextureAtlasLayout> {
    let rows = [sheet.idle, sheet.run, sheet.jump, sheet.fall]
        .iter()
        .map(|clip| clip.row)
        .max()
        .unwrap_or(0);

    atlas_layouts.add(TextureAtlasLayout::from_grid(
        UVec2::splat(sheet.tile_size),
        sheet.columns as u32,
        (rows + 1) as u32,
        None,
        None,
    ))
}

/// Sprite for the player: the configured sheet when there is one and the
/// asset server is available, a plain white quad otherwise. White is the
/// tint the damage flash restores.
pub fn player_sprite(
    tuning: &PlayerTuning,
    asset_server: Option<&AssetServer>,
    atlas_layouts: Option<&mut Assets<TextureAtlasLayout>>,
) -> (Sprite, Option<SheetAnimation>) {
    let (Some(sheet), Some(asset_server), Some(atlas_layouts)) =
        (&tuning.sprite_sheet, asset_server, atlas_layouts)
    else {
        return (Sprite::from_color(Color::WHITE, PLAYER_SIZE), None);
    };

    let texture = asset_server.load(&sheet.texture_path);
    let layout = create_player_atlas_layout(atlas_layouts, sheet);
    let mut sprite = Sprite::from_atlas_image(texture, TextureAtlas { layout, index: 0 });
    sprite.custom_size = Some(PLAYER_SIZE);
    (sprite, Some(SheetAnimation::new(sheet.clone())))
}

pub fn spawn_player(
    commands: &mut Commands,
    tuning: &PlayerTuning,
    position: Vec2,
    sprite: Sprite,
    sheet: Option<SheetAnimation>,
) -> Entity {
    let mut player = commands.spawn((
        Player,
        SceneEntity,
        Health::full(tuning.max_health),
        CoinPurse::default(),
        JumpState::new(tuning.extra_jumps),
        MotionTuning {
            move_speed: tuning.move_speed,
            jump_force: tuning.jump_force,
        },
        GroundCheck {
            offset: Vec2::new(0.0, -PLAYER_SIZE.y / 2.0),
            radius: tuning.ground_check_radius,
            mask: CollisionLayers::GROUND,
        },
        (
            DynamicBody,
            Velocity::default(),
            Gravity(tuning.gravity),
            Collider::new(PLAYER_SIZE, CollisionLayers::PLAYER),
        ),
        AnimationController::default(),
        sprite,
        Transform::from_translation(position.extend(PLAYER_Z_POSITION)),
    ));
    if let Some(sheet) = sheet {
        player.insert(sheet);
    }

    let entity = player.id();
    info!("Spawned player {entity} at {position}");
    entity
}
