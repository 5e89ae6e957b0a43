use bevy::math::Vec2;

/// Axis-aligned box in world pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_center(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    pub fn expanded(self, amount: f32) -> Self {
        Self {
            min: self.min - Vec2::splat(amount),
            max: self.max + Vec2::splat(amount),
        }
    }

    pub fn inset(self, amount: Vec2) -> Self {
        Self {
            min: self.min + amount,
            max: self.max - amount,
        }
    }

    /// Strict overlap: boxes that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    pub fn intersects_circle(&self, center: Vec2, radius: f32) -> bool {
        let closest = center.clamp(self.min, self.max);
        closest.distance_squared(center) <= radius * radius
    }
}

/// Distance to move `mover` along x so it no longer overlaps `solid`,
/// pushing against the direction of travel.
pub fn push_out_x(mover: &Aabb, solid: &Aabb, travel: f32) -> f32 {
    if travel > 0.0 {
        solid.min.x - mover.max.x
    } else {
        solid.max.x - mover.min.x
    }
}

pub fn push_out_y(mover: &Aabb, solid: &Aabb, travel: f32) -> f32 {
    if travel > 0.0 {
        solid.min.y - mover.max.y
    } else {
        solid.max.y - mover.min.y
    }
}
