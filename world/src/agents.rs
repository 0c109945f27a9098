use std::time::Duration;

use outbreak_core::{Aabb, AgentId, AgentKind, AgentSnapshot, Health, Obstacle, WorldPoint};
use outbreak_navigation::{try_move, MoveOutcome};

#[derive(Clone, Debug)]
pub(crate) struct Agent {
    id: AgentId,
    kind: AgentKind,
    bounds: Aabb,
    speed: f32,
    health: Health,
    facing: f32,
    spawned_at: Duration,
}

impl Agent {
    pub(crate) fn spawn(
        id: AgentId,
        kind: AgentKind,
        position: WorldPoint,
        speed_multiplier: f32,
        now: Duration,
    ) -> Self {
        Self {
            id,
            kind,
            bounds: Aabb::square(position, kind.size()),
            speed: kind.base_speed() * speed_multiplier,
            health: kind.profile().health,
            facing: 0.0,
            spawned_at: now,
        }
    }

    pub(crate) fn id(&self) -> AgentId {
        self.id
    }

    pub(crate) fn kind(&self) -> AgentKind {
        self.kind
    }

    pub(crate) fn position(&self) -> WorldPoint {
        self.bounds.center()
    }

    /// Moves towards `destination` if the box fits there. Facing is updated
    /// even when the move is refused.
    pub(crate) fn steer(
        &mut self,
        destination: WorldPoint,
        facing: f32,
        obstacles: &[Obstacle],
    ) -> MoveOutcome {
        if facing.is_finite() {
            self.facing = facing;
        }
        let outcome = try_move(&self.bounds, destination - self.position(), obstacles);
        self.bounds = outcome.bounds;
        outcome
    }

    /// Removes hit points and reports whether the agent was destroyed.
    pub(crate) fn take_damage(&mut self, amount: u32) -> bool {
        self.health = self.health.saturating_sub(amount);
        self.health.is_depleted()
    }

    pub(crate) fn health(&self) -> Health {
        self.health
    }

    pub(crate) fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            id: self.id,
            kind: self.kind,
            bounds: self.bounds,
            speed: self.speed,
            health: self.health,
            facing: self.facing,
            spawned_at: self.spawned_at,
        }
    }
}
