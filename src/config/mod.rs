//! Game configuration loaded from `config/platformer.game.ron`.

pub mod level;

use bevy::prelude::*;
use bevy_common_assets::ron::RonAssetPlugin;
use serde::Deserialize;
use thiserror::Error;

use crate::scene::{SceneEntity, SceneRequest};
use level::{LevelError, LevelLayout};

pub const CONFIG_PATH: &str = "config/platformer.game.ron";

/// Tunables for the player controller, in pixels and seconds.
#[derive(Debug, Clone, Deserialize)]
pub struct PlayerTuning {
    pub move_speed: f32,
    pub jump_force: f32,
    pub gravity: f32,
    pub extra_jumps: u32,
    pub max_health: i32,
    pub ground_check_radius: f32,
    #[serde(default = "default_flash_seconds")]
    pub flash_seconds: f32,
    #[serde(default)]
    pub sprite_sheet: Option<SpriteSheet>,
}

fn default_flash_seconds() -> f32 {
    0.1
}

/// Optional texture atlas for the player. Without one the player is drawn
/// as a plain quad and only the clip name changes.
#[derive(Debug, Clone, Deserialize)]
pub struct SpriteSheet {
    pub texture_path: String,
    pub tile_size: u32,
    pub columns: usize,
    pub frame_time: f32,
    pub idle: ClipRow,
    pub run: ClipRow,
    pub jump: ClipRow,
    pub fall: ClipRow,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ClipRow {
    pub row: usize,
    pub frames: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HazardTuning {
    pub damage: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PickupTuning {
    pub strawberry_heal: i32,
    pub coin_volume: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SoundPaths {
    pub jump: String,
    pub hurt: String,
    pub coin: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LevelDefinition {
    pub name: String,
    #[serde(default)]
    pub next: Option<String>,
    pub rows: Vec<String>,
}

impl LevelDefinition {
    pub fn layout(&self) -> Result<LevelLayout, LevelError> {
        LevelLayout::parse(&self.rows)
    }
}

#[derive(Asset, Resource, TypePath, Debug, Clone, Deserialize)]
pub struct GameConfig {
    pub player: PlayerTuning,
    pub hazards: HazardTuning,
    pub pickups: PickupTuning,
    pub sounds: SoundPaths,
    pub first_level: String,
    pub levels: Vec<LevelDefinition>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no levels defined")]
    NoLevels,
    #[error("first level `{0}` is not defined")]
    UnknownFirstLevel(String),
    #[error("level `{level}` points at unknown next level `{next}`")]
    UnknownNextLevel { level: String, next: String },
    #[error("level `{name}` is defined more than once")]
    DuplicateLevel { name: String },
    #[error("level `{name}`: {source}")]
    Layout {
        name: String,
        #[source]
        source: LevelError,
    },
    #[error("max_health must be positive, got {0}")]
    InvalidMaxHealth(i32),
    #[error("{field} must be a finite, non-negative number of seconds, got {value}")]
    InvalidDuration { field: &'static str, value: f32 },
}

fn check_seconds(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidDuration { field, value })
    }
}

impl GameConfig {
    pub fn level(&self, name: &str) -> Option<&LevelDefinition> {
        self.levels.iter().find(|level| level.name == name)
    }

    /// Check cross references and level layouts before the first scene loads.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.levels.is_empty() {
            return Err(ConfigError::NoLevels);
        }
        if self.player.max_health <= 0 {
            return Err(ConfigError::InvalidMaxHealth(self.player.max_health));
        }
        if self.level(&self.first_level).is_none() {
            return Err(ConfigError::UnknownFirstLevel(self.first_level.clone()));
        }
        check_seconds("player.flash_seconds", self.player.flash_seconds)?;
        if let Some(sheet) = &self.player.sprite_sheet {
            check_seconds("player.sprite_sheet.frame_time", sheet.frame_time)?;
        }

        for (index, level) in self.levels.iter().enumerate() {
            if self.levels[..index].iter().any(|other| other.name == level.name) {
                return Err(ConfigError::DuplicateLevel { name: level.name.clone() });
            }
            if let Some(next) = &level.next {
                if self.level(next).is_none() {
                    return Err(ConfigError::UnknownNextLevel {
                        level: level.name.clone(),
                        next: next.clone(),
                    });
                }
            }
            level.layout().map_err(|source| ConfigError::Layout {
                name: level.name.clone(),
                source,
            })?;
        }
        Ok(())
    }
}

#[derive(Resource)]
pub struct GameConfigHandle {
    pub handle: Handle<GameConfig>,
}

pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(RonAssetPlugin::<GameConfig>::new(&["game.ron"]))
            .add_systems(Startup, load_config)
            .add_systems(Update, finish_loading.run_if(not(resource_exists::<GameConfig>)));
    }
}

fn load_config(mut commands: Commands, asset_server: Res<AssetServer>) {
    let handle: Handle<GameConfig> = asset_server.load(CONFIG_PATH);
    commands.insert_resource(GameConfigHandle { handle });

    // Replaced by the main menu once the config is in.
    commands.spawn((
        SceneEntity,
        Text::new("Loading..."),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(16.0),
            bottom: Val::Px(16.0),
            ..default()
        },
    ));
}

/// Waits for the config asset, validates it and opens the main menu.
/// An invalid config is reported once and the game stays on the loading screen.
fn finish_loading(
    mut commands: Commands,
    configs: Res<Assets<GameConfig>>,
    config_handle: Option<Res<GameConfigHandle>>,
    mut requests: MessageWriter<SceneRequest>,
    mut reported: Local<bool>,
) {
    let Some(config_handle) = config_handle else {
        return;
    };
    let Some(config) = configs.get(&config_handle.handle) else {
        return;
    };

    if let Err(err) = config.validate() {
        if !*reported {
            error!("Invalid game config {CONFIG_PATH}: {err}");
            *reported = true;
        }
        return;
    }

    info!(
        "Loaded game config: {} levels, first level `{}`",
        config.levels.len(),
        config.first_level
    );
    commands.insert_resource(config.clone());
    requests.write(SceneRequest::MainMenu);
}

#[cfg(test)]
pub(crate) fn shipped_config() -> GameConfig {
    ron::from_str(include_str!("../assets/config/platformer.game.ron"))
        .expect("shipped config parses")
}
