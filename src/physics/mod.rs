//! Minimal kinematic physics for the platformer.
//!
//! Dynamic bodies fall under gravity and are resolved axis by axis against
//! static solids. Sensors never block movement; they only produce contacts.

pub mod contacts;
pub mod shapes;

use bevy::prelude::*;
use bitflags::bitflags;

use crate::clock::simulation_running;
use shapes::{Aabb, push_out_x, push_out_y};

/// Penetration below this on the cross axis is ignored, so bodies sliding
/// along a row of tiles do not catch on the seams.
const SEAM_TOLERANCE: f32 = 0.01;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CollisionLayers: u32 {
        const GROUND = 1 << 0;
        const HAZARD = 1 << 1;
        const PICKUP = 1 << 2;
        const PLAYER = 1 << 3;
    }
}

#[derive(Component, Debug, Clone, Copy, Default, Deref, DerefMut, PartialEq)]
pub struct Velocity(pub Vec2);

/// Downward acceleration in px/s² applied to a dynamic body.
#[derive(Component, Debug, Clone, Copy)]
pub struct Gravity(pub f32);

#[derive(Component, Debug, Clone, Copy)]
pub struct Collider {
    pub half_extents: Vec2,
    pub layers: CollisionLayers,
}

impl Collider {
    pub fn new(size: Vec2, layers: CollisionLayers) -> Self {
        Self {
            half_extents: size / 2.0,
            layers,
        }
    }

    pub fn aabb(&self, translation: Vec3) -> Aabb {
        Aabb::from_center(translation.truncate(), self.half_extents)
    }
}

#[derive(Component, Debug, Default)]
pub struct DynamicBody;

#[derive(Component, Debug, Default)]
pub struct StaticBody;

/// Static collider that reports contacts but never blocks.
#[derive(Component, Debug, Default)]
pub struct Sensor;

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum PhysicsSet {
    Integrate,
    Sense,
    Contacts,
}

pub struct PhysicsPlugin;

impl Plugin for PhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<contacts::ContactStarted>()
            .init_resource::<contacts::ActiveContacts>()
            .configure_sets(
                FixedUpdate,
                (PhysicsSet::Integrate, PhysicsSet::Sense, PhysicsSet::Contacts)
                    .chain()
                    .run_if(simulation_running),
            )
            .add_systems(
                FixedUpdate,
                (
                    (apply_gravity, integrate_bodies).chain().in_set(PhysicsSet::Integrate),
                    contacts::detect_contacts.in_set(PhysicsSet::Contacts),
                ),
            );
    }
}

pub fn apply_gravity(time: Res<Time>, mut bodies: Query<(&mut Velocity, &Gravity), With<DynamicBody>>) {
    let dt = time.delta_secs();
    for (mut velocity, gravity) in bodies.iter_mut() {
        velocity.y -= gravity.0 * dt;
    }
}

/// Moves dynamic bodies and resolves them against static solids,
/// x first, then y. A blocked vertical move zeroes vertical velocity.
pub fn integrate_bodies(
    time: Res<Time>,
    mut bodies: Query<(&mut Transform, &mut Velocity, &Collider), With<DynamicBody>>,
    solids: Query<(&Transform, &Collider), (With<StaticBody>, Without<Sensor>, Without<DynamicBody>)>,
) {
    let dt = time.delta_secs();
    let solid_boxes: Vec<Aabb> = solids
        .iter()
        .map(|(transform, collider)| collider.aabb(transform.translation))
        .collect();

    for (mut transform, mut velocity, collider) in bodies.iter_mut() {
        let travel_x = velocity.x * dt;
        transform.translation.x += travel_x;
        if travel_x != 0.0 {
            for solid in &solid_boxes {
                let mover = collider.aabb(transform.translation);
                if mover.inset(Vec2::new(0.0, SEAM_TOLERANCE)).overlaps(solid) {
                    transform.translation.x += push_out_x(&mover, solid, travel_x);
                }
            }
        }

        let travel_y = velocity.y * dt;
        transform.translation.y += travel_y;
        if travel_y != 0.0 {
            let mut blocked = false;
            for solid in &solid_boxes {
                let mover = collider.aabb(transform.translation);
                if mover.inset(Vec2::new(SEAM_TOLERANCE, 0.0)).overlaps(solid) {
                    transform.translation.y += push_out_y(&mover, solid, travel_y);
                    blocked = true;
                }
            }
            if blocked {
                velocity.y = 0.0;
            }
        }
    }
}

/// True when a circle overlaps any static collider on one of `mask`'s layers.
pub fn overlap_circle<'a>(
    center: Vec2,
    radius: f32,
    mask: CollisionLayers,
    colliders: impl IntoIterator<Item = (&'a Transform, &'a Collider)>,
) -> bool {
    colliders.into_iter().any(|(transform, collider)| {
        collider.layers.intersects(mask)
            && collider.aabb(transform.translation).intersects_circle(center, radius)
    })
}
