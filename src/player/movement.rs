use bevy::prelude::*;

use crate::feedback::audio::{PlaySfx, Sfx};
use crate::physics::{Collider, CollisionLayers, Sensor, StaticBody, Velocity, overlap_circle};
use crate::player::Player;
use crate::player::state::{JumpOutcome, JumpState, Stance};

/// Input sampled once per frame.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq)]
pub struct PlayerInput {
    /// Horizontal axis in `-1.0..=1.0`.
    pub axis: f32,
    /// Jump key went down this frame.
    pub jump: bool,
}

#[derive(Component, Debug, Clone, Copy)]
pub struct MotionTuning {
    pub move_speed: f32,
    pub jump_force: f32,
}

/// Circle probe at the player's feet. A player without one is never grounded.
#[derive(Component, Debug, Clone, Copy)]
pub struct GroundCheck {
    pub offset: Vec2,
    pub radius: f32,
    pub mask: CollisionLayers,
}

pub fn read_input(keyboard: Res<ButtonInput<KeyCode>>, mut input: ResMut<PlayerInput>) {
    let mut axis = 0.0;
    if keyboard.pressed(KeyCode::KeyA) || keyboard.pressed(KeyCode::ArrowLeft) {
        axis -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyD) || keyboard.pressed(KeyCode::ArrowRight) {
        axis += 1.0;
    }

    input.axis = axis;
    input.jump = keyboard.just_pressed(KeyCode::Space);
}

/// Horizontal velocity follows the axis every frame; a jump press sets the
/// vertical velocity when the jump state allows it.
pub fn move_player(
    input: Res<PlayerInput>,
    mut players: Query<(&MotionTuning, &mut Velocity, &mut JumpState), With<Player>>,
    mut sfx: MessageWriter<PlaySfx>,
) {
    for (tuning, mut velocity, mut jumps) in players.iter_mut() {
        velocity.x = input.axis * tuning.move_speed;

        if !input.jump {
            continue;
        }
        let outcome = jumps.request_jump();
        match outcome {
            JumpOutcome::FromGround => debug!("Jump from ground"),
            JumpOutcome::InAir { remaining } => debug!("Air jump, {remaining} left"),
            JumpOutcome::Rejected => debug!("Jump rejected, no extra jumps left"),
        }
        if outcome.launched() {
            velocity.y = tuning.jump_force;
            sfx.write(PlaySfx::new(Sfx::Jump));
        }
    }
}

pub fn sense_ground(
    mut players: Query<(&Transform, &mut JumpState, Option<&GroundCheck>), With<Player>>,
    solids: Query<(&Transform, &Collider), (With<StaticBody>, Without<Sensor>)>,
) {
    for (transform, mut jumps, ground_check) in players.iter_mut() {
        let grounded = ground_check.is_some_and(|check| {
            let probe = transform.translation.truncate() + check.offset;
            overlap_circle(probe, check.radius, check.mask, solids.iter())
        });

        if let Some(stance) = jumps.sense_ground(grounded) {
            match stance {
                Stance::Grounded => debug!("Landed"),
                Stance::Airborne => debug!("Left the ground"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Resource, Default)]
    struct JumpSounds(usize);

    fn count_sfx(mut reader: MessageReader<PlaySfx>, mut sounds: ResMut<JumpSounds>) {
        sounds.0 += reader.read().filter(|sfx| sfx.sound == Sfx::Jump).count();
    }

    fn app() -> App {
        let mut app = App::new();
        app.add_message::<PlaySfx>()
            .init_resource::<PlayerInput>()
            .init_resource::<JumpSounds>()
            .add_systems(Update, (sense_ground, move_player, count_sfx).chain());
        app
    }

    fn spawn_player(app: &mut App, y: f32, extra_jumps: u32, with_check: bool) -> Entity {
        let mut player = app.world_mut().spawn((
            Player,
            MotionTuning { move_speed: 100.0, jump_force: 300.0 },
            Velocity::default(),
            JumpState::new(extra_jumps),
            Transform::from_xyz(0.0, y, 0.0),
        ));
        if with_check {
            player.insert(GroundCheck {
                offset: Vec2::new(0.0, -10.0),
                radius: 4.0,
                mask: CollisionLayers::GROUND,
            });
        }
        player.id()
    }

    fn spawn_floor(app: &mut App) {
        app.world_mut().spawn((
            StaticBody,
            Collider::new(Vec2::new(64.0, 32.0), CollisionLayers::GROUND),
            Transform::from_xyz(0.0, -16.0, 0.0),
        ));
    }

    fn press(app: &mut App, axis: f32, jump: bool) {
        *app.world_mut().resource_mut::<PlayerInput>() = PlayerInput { axis, jump };
    }

    #[test]
    fn horizontal_velocity_follows_the_axis() {
        let mut app = app();
        let player = spawn_player(&mut app, 100.0, 0, true);
        press(&mut app, -1.0, false);
        app.update();
        assert_eq!(app.world().get::<Velocity>(player).unwrap().x, -100.0);
    }

    #[test]
    fn standing_player_is_grounded_and_can_jump() {
        let mut app = app();
        spawn_floor(&mut app);
        let player = spawn_player(&mut app, 10.0, 1, true);
        press(&mut app, 0.0, true);
        app.update();

        assert!(app.world().get::<JumpState>(player).unwrap().is_grounded());
        assert_eq!(app.world().get::<Velocity>(player).unwrap().y, 300.0);
        assert_eq!(app.world().resource::<JumpSounds>().0, 1);
    }

    #[test]
    fn missing_ground_check_means_never_grounded() {
        let mut app = app();
        spawn_floor(&mut app);
        let player = spawn_player(&mut app, 10.0, 0, false);
        press(&mut app, 0.0, true);
        app.update();

        assert!(!app.world().get::<JumpState>(player).unwrap().is_grounded());
        assert_eq!(app.world().get::<Velocity>(player).unwrap().y, 0.0);
        assert_eq!(app.world().resource::<JumpSounds>().0, 0);
    }

    #[test]
    fn airborne_player_gets_exactly_its_extra_jumps() {
        let mut app = app();
        let player = spawn_player(&mut app, 200.0, 2, true);

        for _ in 0..2 {
            app.world_mut().get_mut::<Velocity>(player).unwrap().y = -50.0;
            press(&mut app, 0.0, true);
            app.update();
            assert_eq!(app.world().get::<Velocity>(player).unwrap().y, 300.0);
        }

        app.world_mut().get_mut::<Velocity>(player).unwrap().y = -50.0;
        press(&mut app, 0.0, true);
        app.update();
        assert_eq!(app.world().get::<Velocity>(player).unwrap().y, -50.0);
        assert_eq!(app.world().resource::<JumpSounds>().0, 2);
    }

    #[test]
    fn landing_refills_extra_jumps() {
        let mut app = app();
        spawn_floor(&mut app);
        let player = spawn_player(&mut app, 200.0, 1, true);
        press(&mut app, 0.0, true);
        app.update();
        assert_eq!(app.world().get::<JumpState>(player).unwrap().extra_jumps(), 0);

        app.world_mut().get_mut::<Transform>(player).unwrap().translation.y = 10.0;
        press(&mut app, 0.0, false);
        app.update();
        assert_eq!(app.world().get::<JumpState>(player).unwrap().extra_jumps(), 1);
    }
}
