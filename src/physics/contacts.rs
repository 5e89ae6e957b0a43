//! Contact dispatch.
//!
//! Every fixed step the dynamic bodies are tested against tagged static
//! colliders. A `ContactStarted` message is written the first step a pair
//! touches; the pair is remembered until it separates again.

use std::collections::HashSet;

use bevy::prelude::*;

use super::{Collider, DynamicBody, Sensor, StaticBody};

/// Resting contact counts as touching within this many pixels.
pub const CONTACT_SKIN: f32 = 0.5;

/// What the other side of a contact is, gameplay-wise.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactTag {
    Damage,
    Coin,
    Strawberry,
    Flag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactKind {
    /// Solid collider: the body was blocked by it.
    Collision,
    /// Sensor: the body passed into it.
    Trigger,
}

#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactStarted {
    pub body: Entity,
    pub other: Entity,
    pub tag: ContactTag,
    pub kind: ContactKind,
}

#[derive(Resource, Debug, Default)]
pub struct ActiveContacts {
    pairs: HashSet<(Entity, Entity)>,
}

impl ActiveContacts {
    pub fn clear(&mut self) {
        self.pairs.clear();
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }
}

pub fn detect_contacts(
    bodies: Query<(Entity, &Transform, &Collider), With<DynamicBody>>,
    tagged: Query<(Entity, &Transform, &Collider, &ContactTag, Has<Sensor>), (With<StaticBody>, Without<DynamicBody>)>,
    mut active: ResMut<ActiveContacts>,
    mut contacts: MessageWriter<ContactStarted>,
) {
    let mut touching = HashSet::new();

    for (body, body_transform, body_collider) in bodies.iter() {
        let body_box = body_collider.aabb(body_transform.translation).expanded(CONTACT_SKIN);
        for (other, transform, collider, tag, is_sensor) in tagged.iter() {
            if !body_box.overlaps(&collider.aabb(transform.translation)) {
                continue;
            }
            touching.insert((body, other));
            if active.pairs.contains(&(body, other)) {
                continue;
            }
            let kind = if is_sensor { ContactKind::Trigger } else { ContactKind::Collision };
            debug!("Contact started: {body} touched {tag:?} {other} ({kind:?})");
            contacts.write(ContactStarted { body, other, tag: *tag, kind });
        }
    }

    active.pairs = touching;
}
