use std::time::Duration;

use outbreak_core::{HazardId, HazardSnapshot, ProjectileId, ProjectileSnapshot, WorldPoint};

/// Distance a projectile travels per tick.
pub const PROJECTILE_SPEED: f32 = 15.0;
/// Distance after which a projectile is discarded.
pub const PROJECTILE_RANGE: f32 = 500.0;
/// Damage a projectile deals on impact.
pub const PROJECTILE_DAMAGE: u32 = 50;
/// Radius of a toxic hazard.
pub const HAZARD_RADIUS: f32 = 100.0;
/// Damage a toxic hazard deals per contact.
pub const HAZARD_DAMAGE: u32 = 5;
/// Time a toxic hazard lingers.
pub const HAZARD_LIFETIME: Duration = Duration::from_millis(5000);

#[derive(Clone, Debug)]
pub(crate) struct Projectile {
    id: ProjectileId,
    position: WorldPoint,
    direction: WorldPoint,
    travelled: f32,
}

impl Projectile {
    pub(crate) fn launch(id: ProjectileId, origin: WorldPoint, direction: WorldPoint) -> Self {
        Self {
            id,
            position: origin,
            direction,
            travelled: 0.0,
        }
    }

    pub(crate) fn id(&self) -> ProjectileId {
        self.id
    }

    /// Advances one tick and reports whether the projectile is now out of range.
    pub(crate) fn advance(&mut self) -> bool {
        self.position = self.position + self.direction * PROJECTILE_SPEED;
        self.travelled += PROJECTILE_SPEED;
        self.travelled > PROJECTILE_RANGE
    }

    pub(crate) fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: self.id,
            position: self.position,
            damage: PROJECTILE_DAMAGE,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Hazard {
    id: HazardId,
    center: WorldPoint,
    expires_at: Duration,
}

impl Hazard {
    pub(crate) fn create(id: HazardId, center: WorldPoint, now: Duration) -> Self {
        Self {
            id,
            center,
            expires_at: now.saturating_add(HAZARD_LIFETIME),
        }
    }

    pub(crate) fn id(&self) -> HazardId {
        self.id
    }

    pub(crate) fn is_expired(&self, now: Duration) -> bool {
        now >= self.expires_at
    }

    pub(crate) fn snapshot(&self) -> HazardSnapshot {
        HazardSnapshot {
            id: self.id,
            center: self.center,
            radius: HAZARD_RADIUS,
            damage: HAZARD_DAMAGE,
        }
    }
}
