use std::time::Duration;

use outbreak_core::{
    Aabb, Health, MoveInput, Obstacle, PlayerSnapshot, WorldPoint, PLAYER_INVULNERABILITY,
    PLAYER_MAX_HEALTH, PLAYER_SIZE, PLAYER_SPEED, PLAYER_START_AMMO,
};
use outbreak_navigation::{try_walk, MoveOutcome};

#[derive(Clone, Debug)]
pub(crate) struct Player {
    bounds: Aabb,
    health: Health,
    ammo: u32,
    invulnerable_until: Duration,
}

impl Player {
    pub(crate) fn spawn(position: WorldPoint) -> Self {
        Self {
            bounds: Aabb::square(position, PLAYER_SIZE),
            health: PLAYER_MAX_HEALTH,
            ammo: PLAYER_START_AMMO,
            invulnerable_until: Duration::ZERO,
        }
    }

    pub(crate) fn position(&self) -> WorldPoint {
        self.bounds.center()
    }

    pub(crate) fn is_dead(&self) -> bool {
        self.health.is_depleted()
    }

    /// Applies held directions; diagonals are normalised so they are not faster.
    /// Harmful ground does not block the player, it only burns.
    pub(crate) fn steer(&mut self, input: MoveInput, obstacles: &[Obstacle]) -> Option<MoveOutcome> {
        let direction = input.direction()?;
        let outcome = try_walk(&self.bounds, direction * PLAYER_SPEED, obstacles);
        self.bounds = outcome.bounds;
        Some(outcome)
    }

    /// Spends one round, returning the rounds left, or `None` when empty.
    pub(crate) fn spend_ammo(&mut self) -> Option<u32> {
        self.ammo = self.ammo.checked_sub(1)?;
        Some(self.ammo)
    }

    /// Returns the remaining health, or `None` when the hit was ignored.
    pub(crate) fn take_damage(&mut self, amount: u32, now: Duration) -> Option<Health> {
        if self.is_dead() || now < self.invulnerable_until {
            return None;
        }
        self.health = self.health.saturating_sub(amount);
        self.invulnerable_until = now.saturating_add(PLAYER_INVULNERABILITY);
        Some(self.health)
    }

    pub(crate) fn snapshot(&self, now: Duration) -> PlayerSnapshot {
        PlayerSnapshot {
            bounds: self.bounds,
            health: self.health,
            ammo: self.ammo,
            invulnerable: now < self.invulnerable_until,
        }
    }
}
