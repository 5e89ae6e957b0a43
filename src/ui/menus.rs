//! Pause menu, win screen and main menu.

use bevy::prelude::*;

use crate::clock::{ClockWriter, SetTimeScale};
use crate::config::GameConfig;
use crate::scene::{ActiveScene, SceneEntity, SceneRequest};

const BUTTON_COLOR: Color = Color::srgb(0.2, 0.2, 0.25);
const BUTTON_HOVER_COLOR: Color = Color::srgb(0.3, 0.3, 0.38);
const OVERLAY_COLOR: Color = Color::srgba(0.0, 0.0, 0.0, 0.6);

#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PauseState {
    #[default]
    Running,
    Paused,
}

/// Container shown while paused.
#[derive(Component, Debug, Default)]
pub struct PauseMenu;

#[derive(Component, Debug, Default)]
pub struct WinScreen;

#[derive(Component, Debug, Default)]
pub struct MainMenuScreen;

#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Resume,
    MainMenu,
    NextLevel,
    Restart,
    Play,
}

#[derive(Component, Debug, Clone, Copy)]
pub struct MenuButton(pub MenuAction);

fn menu_button(label: &str, action: MenuAction) -> impl Bundle {
    (
        Button,
        MenuButton(action),
        Node {
            width: Val::Px(220.0),
            height: Val::Px(48.0),
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
            ..default()
        },
        BackgroundColor(BUTTON_COLOR),
        children![(
            Text::new(label.to_string()),
            TextFont {
                font_size: 24.0,
                ..default()
            },
            TextColor(Color::WHITE),
        )],
    )
}

fn title(text: &str) -> impl Bundle {
    (
        Text::new(text.to_string()),
        TextFont {
            font_size: 42.0,
            ..default()
        },
        TextColor(Color::WHITE),
    )
}

fn overlay(visibility: Visibility, background: Color) -> impl Bundle {
    (
        SceneEntity,
        Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            position_type: PositionType::Absolute,
            flex_direction: FlexDirection::Column,
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
            row_gap: Val::Px(12.0),
            ..default()
        },
        BackgroundColor(background),
        visibility,
    )
}

pub fn spawn_pause_menu(commands: &mut Commands) {
    commands
        .spawn((PauseMenu, overlay(Visibility::Hidden, OVERLAY_COLOR)))
        .with_children(|menu| {
            menu.spawn(title("Paused"));
            menu.spawn(menu_button("Resume", MenuAction::Resume));
            menu.spawn(menu_button("Main Menu", MenuAction::MainMenu));
        });
}

pub fn spawn_win_screen(commands: &mut Commands, has_next_level: bool) {
    let next_label = if has_next_level { "Next Level" } else { "Finish" };
    commands
        .spawn((WinScreen, overlay(Visibility::Hidden, OVERLAY_COLOR)))
        .with_children(|screen| {
            screen.spawn(title("Level Complete!"));
            screen.spawn(menu_button(next_label, MenuAction::NextLevel));
            screen.spawn(menu_button("Restart", MenuAction::Restart));
            screen.spawn(menu_button("Main Menu", MenuAction::MainMenu));
        });
}

pub fn spawn_main_menu(commands: &mut Commands, first_level: &str) {
    commands
        .spawn((MainMenuScreen, overlay(Visibility::Inherited, Color::srgb(0.1, 0.12, 0.2))))
        .with_children(|menu| {
            menu.spawn(title("Strawberry Hop"));
            menu.spawn(menu_button(&format!("Play {first_level}"), MenuAction::Play));
        });
}

pub fn press_menu_buttons(
    mut buttons: Query<(&Interaction, &MenuButton, &mut BackgroundColor), Changed<Interaction>>,
    mut actions: MessageWriter<MenuAction>,
) {
    for (interaction, button, mut background) in buttons.iter_mut() {
        match interaction {
            Interaction::Pressed => {
                actions.write(button.0);
            }
            Interaction::Hovered => background.0 = BUTTON_HOVER_COLOR,
            Interaction::None => background.0 = BUTTON_COLOR,
        }
    }
}

fn set_paused(
    paused: bool,
    pause: &mut PauseState,
    container: &mut Visibility,
    clock: &mut MessageWriter<SetTimeScale>,
) {
    if paused {
        *pause = PauseState::Paused;
        *container = Visibility::Visible;
        clock.write(SetTimeScale::freeze(ClockWriter::PauseMenu));
    } else {
        *pause = PauseState::Running;
        *container = Visibility::Hidden;
        clock.write(SetTimeScale::resume(ClockWriter::PauseMenu));
    }
    info!("Game {}", if paused { "paused" } else { "resumed" });
}

/// Escape shows the pause container and freezes the game.
pub fn pause_on_escape(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut pause: ResMut<PauseState>,
    mut containers: Query<&mut Visibility, With<PauseMenu>>,
    mut clock: MessageWriter<SetTimeScale>,
) -> Result {
    if !keyboard.just_pressed(KeyCode::Escape) || *pause == PauseState::Paused {
        return Ok(());
    }
    let mut container = containers.single_mut()?;
    set_paused(true, &mut pause, &mut container, &mut clock);
    Ok(())
}

/// Turns menu actions into pause changes and scene requests.
pub fn apply_menu_actions(
    mut actions: MessageReader<MenuAction>,
    config: Res<GameConfig>,
    active: Res<ActiveScene>,
    mut pause: ResMut<PauseState>,
    mut containers: Query<&mut Visibility, With<PauseMenu>>,
    mut clock: MessageWriter<SetTimeScale>,
    mut scene: MessageWriter<SceneRequest>,
) -> Result {
    for action in actions.read() {
        match action {
            MenuAction::Resume => {
                if *pause == PauseState::Running {
                    continue;
                }
                let mut container = containers.single_mut()?;
                set_paused(false, &mut pause, &mut container, &mut clock);
            }
            MenuAction::MainMenu => {
                scene.write(SceneRequest::MainMenu);
            }
            MenuAction::Restart => {
                scene.write(SceneRequest::ReloadActive);
            }
            MenuAction::Play => {
                scene.write(SceneRequest::LoadLevel(config.first_level.clone()));
            }
            MenuAction::NextLevel => {
                let next = active
                    .level_name()
                    .and_then(|name| config.level(name))
                    .and_then(|level| level.next.clone());
                scene.write(match next {
                    Some(name) => SceneRequest::LoadLevel(name),
                    None => SceneRequest::MainMenu,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{ClockPlugin, ClockSet, SimulationClock};
    use crate::config::shipped_config;

    #[derive(Resource, Default)]
    struct SceneLog(Vec<SceneRequest>);

    fn log_scene(mut reader: MessageReader<SceneRequest>, mut log: ResMut<SceneLog>) {
        log.0.extend(reader.read().cloned());
    }

    fn app(active: ActiveScene) -> App {
        let mut app = App::new();
        app.add_plugins(ClockPlugin)
            .init_resource::<Time<Virtual>>()
            .insert_resource(shipped_config())
            .insert_resource(active)
            .init_resource::<PauseState>()
            .init_resource::<ButtonInput<KeyCode>>()
            .init_resource::<SceneLog>()
            .add_message::<MenuAction>()
            .add_message::<SceneRequest>()
            .add_systems(
                Update,
                (pause_on_escape, apply_menu_actions, log_scene).chain().before(ClockSet),
            );
        app
    }

    fn press_escape(app: &mut App) {
        let mut keyboard = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
        keyboard.clear();
        keyboard.press(KeyCode::Escape);
    }

    #[test]
    fn escape_pauses_and_resume_restores() {
        let mut app = app(ActiveScene::Level("Level1".into()));
        let container = app.world_mut().spawn((PauseMenu, Visibility::Hidden)).id();

        press_escape(&mut app);
        app.update();

        assert_eq!(*app.world().resource::<PauseState>(), PauseState::Paused);
        assert_eq!(app.world().get::<Visibility>(container), Some(&Visibility::Visible));
        assert_eq!(app.world().resource::<SimulationClock>().scale(), 0.0);
        assert!(app.world().resource::<Time<Virtual>>().is_paused());

        app.world_mut().resource_mut::<ButtonInput<KeyCode>>().clear();
        app.world_mut().write_message(MenuAction::Resume);
        app.update();

        assert_eq!(*app.world().resource::<PauseState>(), PauseState::Running);
        assert_eq!(app.world().get::<Visibility>(container), Some(&Visibility::Hidden));
        assert_eq!(app.world().resource::<SimulationClock>().scale(), 1.0);
        assert!(!app.world().resource::<Time<Virtual>>().is_paused());
    }

    #[test]
    #[should_panic]
    fn escape_without_a_pause_container_fails_fast() {
        let mut app = app(ActiveScene::Level("Level1".into()));
        press_escape(&mut app);
        app.update();
    }

    #[test]
    fn next_level_follows_the_config() {
        let mut app = app(ActiveScene::Level("Level1".into()));
        app.world_mut().write_message(MenuAction::NextLevel);
        app.update();
        assert_eq!(
            app.world().resource::<SceneLog>().0,
            vec![SceneRequest::LoadLevel("Level2".into())]
        );
    }

    #[test]
    fn next_level_after_the_last_goes_to_the_main_menu() {
        let mut app = app(ActiveScene::Level("Level2".into()));
        app.world_mut().write_message(MenuAction::NextLevel);
        app.update();
        assert_eq!(app.world().resource::<SceneLog>().0, vec![SceneRequest::MainMenu]);
    }

    #[test]
    fn restart_main_menu_and_play_become_scene_requests() {
        let mut app = app(ActiveScene::Level("Level1".into()));
        app.world_mut().write_message(MenuAction::Restart);
        app.world_mut().write_message(MenuAction::MainMenu);
        app.world_mut().write_message(MenuAction::Play);
        app.update();
        assert_eq!(
            app.world().resource::<SceneLog>().0,
            vec![
                SceneRequest::ReloadActive,
                SceneRequest::MainMenu,
                SceneRequest::LoadLevel("Level1".into()),
            ]
        );
    }
}
