//! Per-agent chase state machine.

use std::time::Duration;

use outbreak_core::{Aabb, AgentSnapshot, Obstacle, WorldPoint};
use outbreak_navigation::{is_clear, try_move, Path, PathFinder, SpatialGrid};

/// Minimum simulated time between two searches started by the same agent.
pub const REPLAN_COOLDOWN: Duration = Duration::from_millis(500);

/// Static surroundings shared by every agent evaluated in a tick.
#[derive(Clone, Copy, Debug)]
pub struct Terrain<'a> {
    /// Obstacles blocking movement and sight.
    pub obstacles: &'a [Obstacle],
    /// Navigation grid; without one the agent never searches.
    pub grid: Option<&'a SpatialGrid>,
}

/// Mutable physical state of a pursuing agent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PursuitBody {
    /// Collision box; its center is the agent's position.
    pub bounds: Aabb,
    /// Distance covered per tick.
    pub speed: f32,
    /// Heading in radians.
    pub facing: f32,
}

impl PursuitBody {
    /// Current center of the body.
    #[must_use]
    pub const fn position(&self) -> WorldPoint {
        self.bounds.center()
    }
}

impl From<&AgentSnapshot> for PursuitBody {
    fn from(snapshot: &AgentSnapshot) -> Self {
        Self {
            bounds: snapshot.bounds,
            speed: snapshot.speed,
            facing: snapshot.facing,
        }
    }
}

/// Which movement rule the controller is currently applying.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PursuitMode {
    /// Heading straight for the target.
    DirectChase,
    /// Following waypoints because the target is out of sight.
    PathFollow,
    /// Following waypoints to completion because a direct move collided
    /// while the target was in sight.
    Detour,
}

/// What happened during a single controller update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PursuitOutcome {
    /// Whether the body changed position.
    pub moved: bool,
    /// Whether a path search was run.
    pub replanned: bool,
}

#[derive(Clone, Debug)]
struct Route {
    path: Path,
    committed: bool,
}

/// Decides every tick whether an agent chases its target directly or
/// follows a grid path around obstacles.
///
/// Searches are throttled to one per [`REPLAN_COOLDOWN`]. The cooldown window
/// also restarts on every successful direct move, so an agent that just lost
/// sight of its target keeps still briefly before searching.
#[derive(Clone, Debug)]
pub struct PursuitController {
    route: Option<Route>,
    last_replan: Duration,
}

impl PursuitController {
    /// Creates a controller whose cooldown window starts at `now`.
    #[must_use]
    pub const fn new(now: Duration) -> Self {
        Self {
            route: None,
            last_replan: now,
        }
    }

    /// Rule applied on the most recent update.
    #[must_use]
    pub fn mode(&self) -> PursuitMode {
        match &self.route {
            None => PursuitMode::DirectChase,
            Some(route) if route.committed => PursuitMode::Detour,
            Some(_) => PursuitMode::PathFollow,
        }
    }

    /// Path currently being followed, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.route.as_ref().map(|route| &route.path)
    }

    /// Simulated time of the latest search or successful direct move.
    #[must_use]
    pub const fn last_replan(&self) -> Duration {
        self.last_replan
    }

    /// Drops the current path, for instance after the arena changed.
    pub fn forget_path(&mut self) {
        self.route = None;
    }

    /// Advances the agent one tick towards `target`.
    pub fn update(
        &mut self,
        body: &mut PursuitBody,
        target: WorldPoint,
        terrain: Terrain<'_>,
        finder: &mut PathFinder,
        now: Duration,
    ) -> PursuitOutcome {
        let mut outcome = PursuitOutcome::default();

        if matches!(&self.route, Some(route) if route.committed && route.path.is_exhausted()) {
            self.route = None;
        }
        if matches!(&self.route, Some(route) if route.committed) {
            self.follow_path(body, target, terrain, finder, now, &mut outcome);
            return outcome;
        }

        let position = body.position();
        if is_clear(position, target, terrain.obstacles) {
            let offset = target - position;
            let Some(direction) = offset.normalized() else {
                return outcome;
            };
            body.facing = position.heading_to(target);

            let step = body.speed.min(offset.length());
            let attempt = try_move(&body.bounds, direction * step, terrain.obstacles);
            if attempt.moved {
                body.bounds = attempt.bounds;
                self.route = None;
                self.last_replan = now;
                outcome.moved = true;
            } else if self.cooldown_elapsed(now) {
                outcome.replanned = self.replan(position, target, terrain, finder, now, true);
            }
            return outcome;
        }

        let has_active_path = matches!(&self.route, Some(route) if !route.path.is_exhausted());
        if !has_active_path && self.cooldown_elapsed(now) {
            outcome.replanned = self.replan(position, target, terrain, finder, now, false);
        }
        if matches!(&self.route, Some(route) if !route.path.is_exhausted()) {
            self.follow_path(body, target, terrain, finder, now, &mut outcome);
        }

        outcome
    }

    fn follow_path(
        &mut self,
        body: &mut PursuitBody,
        target: WorldPoint,
        terrain: Terrain<'_>,
        finder: &mut PathFinder,
        now: Duration,
        outcome: &mut PursuitOutcome,
    ) {
        let Some(route) = self.route.as_mut() else {
            return;
        };
        let Some(waypoint) = route.path.next_waypoint() else {
            return;
        };
        let committed = route.committed;

        let position = body.position();
        let offset = waypoint - position;
        if offset.length() > 0.0 {
            body.facing = position.heading_to(waypoint);
        }

        // Waypoints closer than one step are reached exactly; the cursor only
        // moves on once the body really stands there.
        let arrives = offset.length() < body.speed;
        let delta = match offset.normalized() {
            Some(direction) if !arrives => direction * body.speed,
            _ => offset,
        };
        let attempt = try_move(&body.bounds, delta, terrain.obstacles);
        if attempt.moved {
            body.bounds = attempt.bounds;
            if arrives {
                route.path.advance();
            }
            outcome.moved = true;
        } else if self.cooldown_elapsed(now) {
            outcome.replanned = self.replan(position, target, terrain, finder, now, committed);
        }
    }

    fn cooldown_elapsed(&self, now: Duration) -> bool {
        now.saturating_sub(self.last_replan) > REPLAN_COOLDOWN
    }

    fn replan(
        &mut self,
        position: WorldPoint,
        target: WorldPoint,
        terrain: Terrain<'_>,
        finder: &mut PathFinder,
        now: Duration,
        committed: bool,
    ) -> bool {
        let Some(grid) = terrain.grid else {
            return false;
        };

        self.last_replan = now;
        let mut path = finder.find_path(grid, position, target);
        if path.is_empty() {
            self.route = None;
            return true;
        }

        // A blocked start cell's center lies inside an obstacle; head for the
        // next cell instead.
        let start_blocked = grid
            .node_at(position)
            .map_or(false, |node| !node.is_walkable());
        if start_blocked && path.len() > 1 {
            path.advance();
        }
        self.route = Some(Route { path, committed });
        true
    }
}
