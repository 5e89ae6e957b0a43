//! Scene transitions.
//!
//! A scene is either the main menu or one level from the config. Loading a
//! scene despawns everything tagged `SceneEntity` and builds the new one
//! from scratch, which is also how death resets the level.

pub mod build;

use bevy::prelude::*;
use thiserror::Error;

use crate::clock::{ClockSet, ClockWriter, SetTimeScale};
use crate::config::GameConfig;
use crate::feedback::DelayedTasks;
use crate::physics::contacts::ActiveContacts;
use crate::ui::menus::PauseState;

/// Everything that belongs to the current scene and goes away with it.
#[derive(Component, Debug, Default)]
pub struct SceneEntity;

#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub enum SceneRequest {
    LoadLevel(String),
    ReloadActive,
    MainMenu,
}

#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub enum ActiveScene {
    #[default]
    Loading,
    MainMenu,
    Level(String),
}

impl ActiveScene {
    pub fn level_name(&self) -> Option<&str> {
        match self {
            ActiveScene::Level(name) => Some(name),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("no level named `{0}` in the game config")]
    UnknownLevel(String),
}

/// Run condition: a level (not a menu) is loaded.
pub fn in_level(active: Res<ActiveScene>) -> bool {
    active.level_name().is_some()
}

pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<SceneRequest>()
            .init_resource::<ActiveScene>()
            .add_systems(
                Update,
                process_scene_requests
                    .run_if(resource_exists::<GameConfig>)
                    .before(ClockSet),
            );
    }
}

/// Loads the scene named by the last request of the frame.
pub fn process_scene_requests(
    mut commands: Commands,
    mut requests: MessageReader<SceneRequest>,
    config: Res<GameConfig>,
    mut active: ResMut<ActiveScene>,
    scene_entities: Query<Entity, With<SceneEntity>>,
    mut contacts: ResMut<ActiveContacts>,
    mut tasks: ResMut<DelayedTasks>,
    mut pause: ResMut<PauseState>,
    mut clock: MessageWriter<SetTimeScale>,
    asset_server: Option<Res<AssetServer>>,
    mut atlas_layouts: Option<ResMut<Assets<TextureAtlasLayout>>>,
) -> Result {
    let Some(request) = requests.read().last() else {
        return Ok(());
    };

    let target = match request {
        SceneRequest::LoadLevel(name) => ActiveScene::Level(name.clone()),
        SceneRequest::MainMenu => ActiveScene::MainMenu,
        SceneRequest::ReloadActive => match &*active {
            ActiveScene::Loading => {
                warn!("Reload requested before any scene was loaded");
                return Ok(());
            }
            scene => scene.clone(),
        },
    };

    let level = match &target {
        ActiveScene::Level(name) => {
            Some(config.level(name).ok_or_else(|| SceneError::UnknownLevel(name.clone()))?)
        }
        _ => None,
    };

    for entity in scene_entities.iter() {
        commands.entity(entity).despawn();
    }
    contacts.clear();
    tasks.clear();
    *pause = PauseState::Running;

    match level {
        Some(level) => {
            clock.write(SetTimeScale::resume(ClockWriter::SceneLoader));
            build::build_level(
                &mut commands,
                &config,
                level,
                asset_server.as_deref(),
                atlas_layouts.as_deref_mut(),
            )?;
        }
        None => build::build_main_menu(&mut commands, &config),
    }

    info!("Loaded scene {target:?}");
    *active = target;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::level::Tile;
    use crate::config::shipped_config;
    use crate::physics::contacts::ContactTag;
    use crate::player::Player;
    use crate::ui::menus::{MainMenuScreen, PauseMenu, WinScreen};

    #[derive(Resource, Default)]
    struct ClockLog(Vec<SetTimeScale>);

    fn log_clock(mut reader: MessageReader<SetTimeScale>, mut log: ResMut<ClockLog>) {
        log.0.extend(reader.read().copied());
    }

    fn app() -> App {
        let mut app = App::new();
        app.insert_resource(shipped_config())
            .init_resource::<ActiveScene>()
            .init_resource::<ActiveContacts>()
            .init_resource::<DelayedTasks>()
            .init_resource::<PauseState>()
            .init_resource::<ClockLog>()
            .add_message::<SceneRequest>()
            .add_message::<SetTimeScale>()
            .add_systems(Update, (process_scene_requests, log_clock).chain());
        app
    }

    fn request(app: &mut App, request: SceneRequest) {
        app.world_mut().write_message(request);
        app.update();
    }

    fn count<C: Component>(app: &mut App) -> usize {
        app.world_mut().query_filtered::<(), With<C>>().iter(app.world()).count()
    }

    fn count_tag(app: &mut App, tag: ContactTag) -> usize {
        app.world_mut()
            .query::<&ContactTag>()
            .iter(app.world())
            .filter(|t| **t == tag)
            .count()
    }

    #[test]
    fn loading_a_level_builds_it_and_resumes_time() {
        let mut app = app();
        request(&mut app, SceneRequest::LoadLevel("Level1".into()));

        let config = shipped_config();
        let layout = config.level("Level1").unwrap().layout().unwrap();
        assert_eq!(count::<Player>(&mut app), 1);
        assert_eq!(count_tag(&mut app, ContactTag::Coin), layout.count(Tile::Coin));
        assert_eq!(count_tag(&mut app, ContactTag::Flag), 1);
        assert_eq!(count::<PauseMenu>(&mut app), 1);
        assert_eq!(count::<WinScreen>(&mut app), 1);
        assert_eq!(app.world().resource::<ActiveScene>(), &ActiveScene::Level("Level1".into()));
        assert_eq!(
            app.world().resource::<ClockLog>().0,
            vec![SetTimeScale::resume(ClockWriter::SceneLoader)]
        );
    }

    #[test]
    fn reload_replaces_the_player() {
        let mut app = app();
        request(&mut app, SceneRequest::LoadLevel("Level1".into()));
        let first = app
            .world_mut()
            .query_filtered::<Entity, With<Player>>()
            .single(app.world())
            .unwrap();
        *app.world_mut().resource_mut::<PauseState>() = PauseState::Paused;

        request(&mut app, SceneRequest::ReloadActive);

        let second = app
            .world_mut()
            .query_filtered::<Entity, With<Player>>()
            .single(app.world())
            .unwrap();
        assert_ne!(first, second);
        assert_eq!(*app.world().resource::<PauseState>(), PauseState::Running);
        assert_eq!(app.world().resource::<ClockLog>().0.len(), 2);
    }

    #[test]
    fn main_menu_clears_the_level_and_leaves_time_alone() {
        let mut app = app();
        request(&mut app, SceneRequest::LoadLevel("Level2".into()));
        request(&mut app, SceneRequest::MainMenu);

        assert_eq!(count::<Player>(&mut app), 0);
        assert_eq!(count::<MainMenuScreen>(&mut app), 1);
        assert_eq!(app.world().resource::<ActiveScene>(), &ActiveScene::MainMenu);
        assert_eq!(app.world().resource::<ClockLog>().0.len(), 1);
    }

    #[test]
    fn last_request_in_a_frame_wins() {
        let mut app = app();
        app.world_mut().write_message(SceneRequest::LoadLevel("Level1".into()));
        app.world_mut().write_message(SceneRequest::LoadLevel("Level2".into()));
        app.update();

        assert_eq!(app.world().resource::<ActiveScene>(), &ActiveScene::Level("Level2".into()));
        assert_eq!(count::<Player>(&mut app), 1);
    }

    #[test]
    fn reload_before_loading_is_ignored() {
        let mut app = app();
        request(&mut app, SceneRequest::ReloadActive);
        assert_eq!(app.world().resource::<ActiveScene>(), &ActiveScene::Loading);
    }

    #[test]
    #[should_panic]
    fn unknown_level_fails_fast() {
        let mut app = app();
        request(&mut app, SceneRequest::LoadLevel("Level99".into()));
    }
}
