//! Player state that the engine-facing systems mutate.

use bevy::prelude::*;

/// Integer health clamped to `[0, max]`.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Health {
    current: i32,
    max: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthOutcome {
    Alive,
    Depleted,
}

impl Health {
    pub fn full(max: i32) -> Self {
        let max = max.max(1);
        Self { current: max, max }
    }

    pub fn with_current(max: i32, current: i32) -> Self {
        let mut health = Self::full(max);
        health.current = current.clamp(0, health.max);
        health
    }

    pub fn current(&self) -> i32 {
        self.current
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn fraction(&self) -> f32 {
        self.current as f32 / self.max as f32
    }

    pub fn damage(&mut self, amount: i32) -> HealthOutcome {
        self.current = self.current.saturating_sub(amount.max(0)).max(0);
        if self.current == 0 {
            HealthOutcome::Depleted
        } else {
            HealthOutcome::Alive
        }
    }

    pub fn heal(&mut self, amount: i32) {
        self.current = self.current.saturating_add(amount.max(0)).min(self.max);
    }
}

#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoinPurse {
    pub coins: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stance {
    Grounded,
    #[default]
    Airborne,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpOutcome {
    FromGround,
    InAir { remaining: u32 },
    Rejected,
}

impl JumpOutcome {
    pub fn launched(self) -> bool {
        !matches!(self, JumpOutcome::Rejected)
    }
}

/// Grounded/airborne state plus the extra-jump budget.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct JumpState {
    stance: Stance,
    extra_jumps: u32,
    extra_jumps_max: u32,
}

impl JumpState {
    pub fn new(extra_jumps_max: u32) -> Self {
        Self {
            stance: Stance::Airborne,
            extra_jumps: extra_jumps_max,
            extra_jumps_max,
        }
    }

    pub fn is_grounded(&self) -> bool {
        self.stance == Stance::Grounded
    }

    pub fn extra_jumps(&self) -> u32 {
        self.extra_jumps
    }

    /// Feed the ground sensor reading. Being grounded refills the budget,
    /// whether the player just landed or was already standing.
    /// Returns the new stance when it changed.
    pub fn sense_ground(&mut self, grounded: bool) -> Option<Stance> {
        let next = if grounded { Stance::Grounded } else { Stance::Airborne };
        if grounded {
            self.extra_jumps = self.extra_jumps_max;
        }
        let previous = std::mem::replace(&mut self.stance, next);
        (previous != next).then_some(next)
    }

    pub fn request_jump(&mut self) -> JumpOutcome {
        match self.stance {
            Stance::Grounded => {
                self.extra_jumps = self.extra_jumps_max;
                JumpOutcome::FromGround
            }
            Stance::Airborne if self.extra_jumps > 0 => {
                self.extra_jumps -= 1;
                JumpOutcome::InAir { remaining: self.extra_jumps }
            }
            Stance::Airborne => JumpOutcome::Rejected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_stays_in_range_for_any_sequence() {
        let mut health = Health::full(100);
        let steps = [25, -20, 25, 25, -20, -20, -20, 25, 25, 25, 25, 25, -20, 25];
        for step in steps {
            if step > 0 {
                health.damage(step);
            } else {
                health.heal(-step);
            }
            assert!((0..=100).contains(&health.current()));
        }
    }

    #[test]
    fn one_hit_from_full_leaves_the_player_alive() {
        let mut health = Health::full(100);
        assert_eq!(health.damage(25), HealthOutcome::Alive);
        assert_eq!(health.current(), 75);
    }

    #[test]
    fn lethal_hit_clamps_at_zero() {
        let mut health = Health::with_current(100, 20);
        assert_eq!(health.damage(25), HealthOutcome::Depleted);
        assert_eq!(health.current(), 0);
    }

    #[test]
    fn healing_caps_at_max() {
        let mut health = Health::with_current(100, 90);
        health.heal(20);
        assert_eq!(health.current(), 100);
        assert_eq!(health.fraction(), 1.0);
    }

    #[test]
    fn landing_refills_the_budget() {
        let mut jumps = JumpState::new(2);
        jumps.request_jump();
        jumps.request_jump();
        assert_eq!(jumps.extra_jumps(), 0);

        assert_eq!(jumps.sense_ground(true), Some(Stance::Grounded));
        assert_eq!(jumps.extra_jumps(), 2);
        assert_eq!(jumps.sense_ground(true), None);
        assert_eq!(jumps.extra_jumps(), 2);
    }

    #[test]
    fn exactly_n_air_jumps_succeed() {
        for n in 0..4 {
            let mut jumps = JumpState::new(n);
            for expected_remaining in (0..n).rev() {
                assert_eq!(jumps.request_jump(), JumpOutcome::InAir { remaining: expected_remaining });
            }
            assert_eq!(jumps.request_jump(), JumpOutcome::Rejected);
        }
    }

    #[test]
    fn ground_jump_does_not_spend_the_budget() {
        let mut jumps = JumpState::new(1);
        jumps.sense_ground(true);
        assert_eq!(jumps.request_jump(), JumpOutcome::FromGround);
        assert_eq!(jumps.sense_ground(false), Some(Stance::Airborne));
        assert_eq!(jumps.request_jump(), JumpOutcome::InAir { remaining: 0 });
        assert_eq!(jumps.request_jump(), JumpOutcome::Rejected);
    }
}
