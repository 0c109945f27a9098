#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Outbreak.

mod agents;
mod ordnance;
mod player;

use std::time::Duration;

use outbreak_core::{
    AgentId, AgentKind, Command, Event, GridSettings, HazardId, Obstacle, ProjectileId, WorldPoint,
    WELCOME_BANNER,
};
use outbreak_navigation::SpatialGrid;
use tracing::{debug, info, warn};

use agents::Agent;
use ordnance::{Hazard, Projectile};
use player::Player;

pub use ordnance::{
    HAZARD_DAMAGE, HAZARD_LIFETIME, HAZARD_RADIUS, PROJECTILE_DAMAGE, PROJECTILE_RANGE,
    PROJECTILE_SPEED,
};

/// Represents the authoritative Outbreak world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    clock: Duration,
    tick_index: u64,
    obstacles: Vec<Obstacle>,
    settings: GridSettings,
    grid: Option<SpatialGrid>,
    player: Player,
    agents: Vec<Agent>,
    projectiles: Vec<Projectile>,
    hazards: Vec<Hazard>,
    next_agent_id: u32,
    next_projectile_id: u32,
    next_hazard_id: u32,
}

impl World {
    /// Creates an empty arena with the player standing at the origin.
    #[must_use]
    pub fn new() -> Self {
        Self::with_player_at(WorldPoint::ORIGIN)
    }

    /// Creates an empty arena with the player standing at `position`.
    #[must_use]
    pub fn with_player_at(position: WorldPoint) -> Self {
        Self {
            banner: WELCOME_BANNER,
            clock: Duration::ZERO,
            tick_index: 0,
            obstacles: Vec::new(),
            settings: GridSettings::default(),
            grid: None,
            player: Player::spawn(position),
            agents: Vec::new(),
            projectiles: Vec::new(),
            hazards: Vec::new(),
            next_agent_id: 0,
            next_projectile_id: 0,
            next_hazard_id: 0,
        }
    }

    fn agent_index(&self, id: AgentId) -> Option<usize> {
        self.agents
            .binary_search_by_key(&id, |agent| agent.id())
            .ok()
    }

    fn allocate_agent_id(&mut self) -> AgentId {
        let id = AgentId::new(self.next_agent_id);
        self.next_agent_id = self.next_agent_id.wrapping_add(1);
        id
    }

    fn allocate_projectile_id(&mut self) -> ProjectileId {
        let id = ProjectileId::new(self.next_projectile_id);
        self.next_projectile_id = self.next_projectile_id.wrapping_add(1);
        id
    }

    fn allocate_hazard_id(&mut self) -> HazardId {
        let id = HazardId::new(self.next_hazard_id);
        self.next_hazard_id = self.next_hazard_id.wrapping_add(1);
        id
    }

    fn damage_agent(&mut self, index: usize, amount: u32, out_events: &mut Vec<Event>) {
        let agent = &mut self.agents[index];
        if agent.take_damage(amount) {
            let removed = self.agents.remove(index);
            debug!(agent = removed.id().get(), kind = ?removed.kind(), "agent destroyed");
            out_events.push(Event::AgentDestroyed {
                agent: removed.id(),
                kind: removed.kind(),
                position: removed.position(),
            });
        } else {
            out_events.push(Event::AgentDamaged {
                agent: agent.id(),
                remaining: agent.health(),
            });
        }
    }

    fn advance_ordnance(&mut self, out_events: &mut Vec<Event>) {
        let mut index = 0;
        while index < self.projectiles.len() {
            if self.projectiles[index].advance() {
                let expired = self.projectiles.remove(index);
                out_events.push(Event::ProjectileExpired {
                    projectile: expired.id(),
                });
            } else {
                index += 1;
            }
        }

        let now = self.clock;
        let mut index = 0;
        while index < self.hazards.len() {
            if self.hazards[index].is_expired(now) {
                let expired = self.hazards.remove(index);
                out_events.push(Event::HazardExpired {
                    hazard: expired.id(),
                });
            } else {
                index += 1;
            }
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureArena {
            obstacles,
            reference,
            settings,
        } => match SpatialGrid::build(&obstacles, reference, settings) {
            Ok(grid) => {
                info!(
                    obstacles = obstacles.len(),
                    cells_per_edge = grid.cells_per_edge(),
                    "arena configured"
                );
                out_events.push(Event::ArenaConfigured {
                    obstacle_count: obstacles.len(),
                    cells_per_edge: grid.cells_per_edge(),
                });
                world.obstacles = obstacles;
                world.settings = settings;
                world.grid = Some(grid);
            }
            Err(reason) => {
                warn!(%reason, "arena rejected");
                out_events.push(Event::GridRejected { reason });
            }
        },
        Command::RecenterGrid { reference } => {
            match SpatialGrid::build(&world.obstacles, reference, world.settings) {
                Ok(grid) => {
                    debug!(x = reference.x(), y = reference.y(), "grid recentered");
                    out_events.push(Event::GridRebuilt {
                        reference,
                        cells_per_edge: grid.cells_per_edge(),
                    });
                    world.grid = Some(grid);
                }
                Err(reason) => {
                    warn!(%reason, "grid rebuild rejected");
                    out_events.push(Event::GridRejected { reason });
                }
            }
        }
        Command::Tick { dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            world.clock = world.clock.saturating_add(dt);
            out_events.push(Event::TimeAdvanced { dt });
            world.advance_ordnance(out_events);
        }
        Command::MovePlayer { input } => {
            if world.player.is_dead() {
                return;
            }
            let from = world.player.position();
            match world.player.steer(input, &world.obstacles) {
                Some(outcome) if outcome.moved => out_events.push(Event::PlayerMoved {
                    from,
                    to: outcome.bounds.center(),
                }),
                Some(_) => out_events.push(Event::PlayerBlocked),
                None => {}
            }
        }
        Command::SpawnAgent {
            kind,
            position,
            speed_multiplier,
        } => {
            if !position.is_finite() || !speed_multiplier.is_finite() || speed_multiplier < 0.0 {
                warn!(?kind, "refusing to spawn agent with invalid placement");
                return;
            }
            let id = world.allocate_agent_id();
            world.agents.push(Agent::spawn(
                id,
                kind,
                position,
                speed_multiplier,
                world.clock,
            ));
            if kind == AgentKind::Boss {
                info!(agent = id.get(), "boss entered the arena");
            }
            out_events.push(Event::AgentSpawned {
                agent: id,
                kind,
                position,
            });
        }
        Command::SteerAgent {
            agent,
            destination,
            facing,
        } => {
            let Some(index) = world.agent_index(agent) else {
                return;
            };
            let steered = &mut world.agents[index];
            let from = steered.position();
            let outcome = steered.steer(destination, facing, &world.obstacles);
            if outcome.moved {
                let to = outcome.bounds.center();
                if to != from {
                    out_events.push(Event::AgentMoved { agent, from, to });
                }
            } else {
                debug!(agent = agent.get(), "agent move blocked");
                out_events.push(Event::AgentBlocked { agent });
            }
        }
        Command::FireProjectile { toward } => {
            let origin = world.player.position();
            let direction = (toward - origin).normalized();
            let (Some(direction), false) = (direction, world.player.is_dead()) else {
                out_events.push(Event::FireRejected);
                return;
            };
            let Some(ammo_left) = world.player.spend_ammo() else {
                out_events.push(Event::FireRejected);
                return;
            };
            let id = world.allocate_projectile_id();
            world
                .projectiles
                .push(Projectile::launch(id, origin, direction));
            out_events.push(Event::ProjectileFired {
                projectile: id,
                ammo_left,
            });
        }
        Command::ResolveProjectileHit { projectile, agent } => {
            let Some(projectile_index) = world
                .projectiles
                .iter()
                .position(|candidate| candidate.id() == projectile)
            else {
                return;
            };
            let Some(agent_index) = world.agent_index(agent) else {
                return;
            };
            let spent = world.projectiles.remove(projectile_index);
            out_events.push(Event::ProjectileExpired {
                projectile: spent.id(),
            });
            world.damage_agent(agent_index, spent.snapshot().damage, out_events);
        }
        Command::DamageAgent { agent, amount } => {
            if let Some(index) = world.agent_index(agent) {
                world.damage_agent(index, amount, out_events);
            }
        }
        Command::DamagePlayer { amount } => {
            if let Some(remaining) = world.player.take_damage(amount, world.clock) {
                out_events.push(Event::PlayerDamaged { remaining });
                if remaining.is_depleted() {
                    info!(elapsed = ?world.clock, "player died");
                    out_events.push(Event::PlayerDied);
                }
            }
        }
        Command::CreateHazard { center } => {
            if !center.is_finite() {
                return;
            }
            let id = world.allocate_hazard_id();
            world.hazards.push(Hazard::create(id, center, world.clock));
            out_events.push(Event::HazardCreated { hazard: id, center });
        }
        Command::DetonateAgent { agent } => {
            let Some(index) = world.agent_index(agent) else {
                return;
            };
            let burst = world.agents.remove(index);
            debug!(agent = agent.get(), "agent detonated");
            out_events.push(Event::AgentDetonated {
                agent,
                position: burst.position(),
            });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use outbreak_core::{
        AgentView, GridSettings, HazardSnapshot, Obstacle, PlayerSnapshot, ProjectileSnapshot,
    };
    use outbreak_navigation::SpatialGrid;

    use super::World;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Simulated time elapsed since the world was created.
    #[must_use]
    pub fn clock(world: &World) -> Duration {
        world.clock
    }

    /// Number of ticks processed so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Static obstacles making up the arena.
    #[must_use]
    pub fn obstacles(world: &World) -> &[Obstacle] {
        &world.obstacles
    }

    /// Settings used for the current navigation grid.
    #[must_use]
    pub fn grid_settings(world: &World) -> GridSettings {
        world.settings
    }

    /// Navigation grid for the current arena, if one has been built.
    #[must_use]
    pub fn grid(world: &World) -> Option<&SpatialGrid> {
        world.grid.as_ref()
    }

    /// Captures the player's current state.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        world.player.snapshot(world.clock)
    }

    /// Captures a read-only view of the agents in the arena.
    #[must_use]
    pub fn agent_view(world: &World) -> AgentView {
        AgentView::from_snapshots(world.agents.iter().map(|agent| agent.snapshot()).collect())
    }

    /// Projectiles currently in flight, ordered by identifier.
    #[must_use]
    pub fn projectiles(world: &World) -> Vec<ProjectileSnapshot> {
        let mut snapshots: Vec<_> = world
            .projectiles
            .iter()
            .map(|projectile| projectile.snapshot())
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        snapshots
    }

    /// Hazards currently lingering, ordered by identifier.
    #[must_use]
    pub fn hazards(world: &World) -> Vec<HazardSnapshot> {
        let mut snapshots: Vec<_> = world.hazards.iter().map(|hazard| hazard.snapshot()).collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        snapshots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use outbreak_core::{Aabb, GridError, Health, MoveInput, PLAYER_START_AMMO};

    fn configure(world: &mut World, obstacles: Vec<Obstacle>) -> Vec<Event> {
        let mut events = Vec::new();
        apply(
            world,
            Command::ConfigureArena {
                obstacles,
                reference: WorldPoint::ORIGIN,
                settings: GridSettings::default(),
            },
            &mut events,
        );
        events
    }

    fn spawn(world: &mut World, kind: AgentKind, position: WorldPoint) -> AgentId {
        let mut events = Vec::new();
        apply(
            world,
            Command::SpawnAgent {
                kind,
                position,
                speed_multiplier: 1.0,
            },
            &mut events,
        );
        match events.as_slice() {
            [Event::AgentSpawned { agent, .. }] => *agent,
            other => panic!("unexpected spawn events: {other:?}"),
        }
    }

    fn tick(world: &mut World, millis: u64) -> Vec<Event> {
        let mut events = Vec::new();
        apply(
            world,
            Command::Tick {
                dt: Duration::from_millis(millis),
            },
            &mut events,
        );
        events
    }

    #[test]
    fn configure_arena_builds_grid() {
        let mut world = World::new();
        let wall = Obstacle::solid(Aabb::from_corner(100.0, -100.0, 50.0, 200.0));

        let events = configure(&mut world, vec![wall]);

        assert_eq!(
            events,
            vec![Event::ArenaConfigured {
                obstacle_count: 1,
                cells_per_edge: 10,
            }]
        );
        let grid = query::grid(&world).expect("grid built");
        assert!(grid.walkable_count() < 100);
        assert_eq!(query::obstacles(&world).len(), 1);
    }

    #[test]
    fn rejected_arena_keeps_previous_state() {
        let mut world = World::new();
        let _ = configure(&mut world, Vec::new());
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::ConfigureArena {
                obstacles: vec![Obstacle::solid(Aabb::square(WorldPoint::ORIGIN, 10.0))],
                reference: WorldPoint::ORIGIN,
                settings: GridSettings::new(0.0, 2000.0),
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::GridRejected {
                reason: GridError::InvalidCellSize(0.0),
            }]
        );
        assert!(query::obstacles(&world).is_empty());
        assert!(query::grid(&world).is_some());
    }

    #[test]
    fn recenter_rebuilds_around_new_reference() {
        let mut world = World::new();
        let _ = configure(&mut world, Vec::new());
        let mut events = Vec::new();
        let reference = WorldPoint::new(400.0, -200.0);

        apply(&mut world, Command::RecenterGrid { reference }, &mut events);

        assert_eq!(
            events,
            vec![Event::GridRebuilt {
                reference,
                cells_per_edge: 10,
            }]
        );
        assert_eq!(query::grid(&world).expect("grid").reference(), reference);
    }

    #[test]
    fn player_moves_and_is_blocked_by_walls() {
        let mut world = World::new();
        let wall = Obstacle::solid(Aabb::from_corner(22.0, -100.0, 20.0, 200.0));
        let _ = configure(&mut world, vec![wall]);
        let right = MoveInput {
            right: true,
            ..MoveInput::default()
        };

        let mut events = Vec::new();
        apply(&mut world, Command::MovePlayer { input: right }, &mut events);
        apply(&mut world, Command::MovePlayer { input: right }, &mut events);

        assert_eq!(
            events,
            vec![
                Event::PlayerMoved {
                    from: WorldPoint::ORIGIN,
                    to: WorldPoint::new(5.0, 0.0),
                },
                Event::PlayerBlocked,
            ]
        );
    }

    #[test]
    fn player_damage_respects_invulnerability_window() {
        let mut world = World::new();
        let mut events = Vec::new();

        apply(&mut world, Command::DamagePlayer { amount: 10 }, &mut events);
        apply(&mut world, Command::DamagePlayer { amount: 10 }, &mut events);
        assert_eq!(
            events,
            vec![Event::PlayerDamaged {
                remaining: Health::new(90),
            }]
        );
        assert!(query::player(&world).invulnerable);

        let _ = tick(&mut world, 1000);
        events.clear();
        apply(&mut world, Command::DamagePlayer { amount: 95 }, &mut events);
        assert_eq!(
            events,
            vec![
                Event::PlayerDamaged {
                    remaining: Health::new(0),
                },
                Event::PlayerDied,
            ]
        );
        assert!(query::player(&world).is_dead());
    }

    #[test]
    fn projectile_hits_once_and_destroys_agent() {
        let mut world = World::new();
        let agent = spawn(&mut world, AgentKind::Walker, WorldPoint::new(100.0, 0.0));
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::FireProjectile {
                toward: WorldPoint::new(100.0, 0.0),
            },
            &mut events,
        );
        let projectile = query::projectiles(&world)[0].id;
        assert_eq!(
            events,
            vec![Event::ProjectileFired {
                projectile,
                ammo_left: PLAYER_START_AMMO - 1,
            }]
        );

        events.clear();
        apply(
            &mut world,
            Command::ResolveProjectileHit { projectile, agent },
            &mut events,
        );
        apply(
            &mut world,
            Command::ResolveProjectileHit { projectile, agent },
            &mut events,
        );
        assert_eq!(
            events,
            vec![
                Event::ProjectileExpired { projectile },
                Event::AgentDamaged {
                    agent,
                    remaining: Health::new(50),
                },
            ]
        );

        events.clear();
        apply(&mut world, Command::DamageAgent { agent, amount: 50 }, &mut events);
        assert_eq!(
            events,
            vec![Event::AgentDestroyed {
                agent,
                kind: AgentKind::Walker,
                position: WorldPoint::new(100.0, 0.0),
            }]
        );
        assert!(query::agent_view(&world).is_empty());
    }

    #[test]
    fn projectile_expires_beyond_range() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::FireProjectile {
                toward: WorldPoint::new(0.0, -1.0),
            },
            &mut events,
        );

        let mut expired_on = None;
        for tick_number in 1..=40 {
            let events = tick(&mut world, 16);
            if events
                .iter()
                .any(|event| matches!(event, Event::ProjectileExpired { .. }))
            {
                expired_on = Some(tick_number);
                break;
            }
        }

        assert_eq!(expired_on, Some(34));
        assert!(query::projectiles(&world).is_empty());
    }

    #[test]
    fn firing_without_aim_or_ammo_is_rejected() {
        let mut world = World::new();
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::FireProjectile {
                toward: WorldPoint::ORIGIN,
            },
            &mut events,
        );
        assert_eq!(events, vec![Event::FireRejected]);

        for _ in 0..PLAYER_START_AMMO {
            apply(
                &mut world,
                Command::FireProjectile {
                    toward: WorldPoint::new(1.0, 0.0),
                },
                &mut events,
            );
        }
        events.clear();
        apply(
            &mut world,
            Command::FireProjectile {
                toward: WorldPoint::new(1.0, 0.0),
            },
            &mut events,
        );
        assert_eq!(events, vec![Event::FireRejected]);
        assert_eq!(query::player(&world).ammo, 0);
    }

    #[test]
    fn steering_updates_facing_even_when_blocked() {
        let mut world = World::new();
        let wall = Obstacle::solid(Aabb::from_corner(216.0, -100.0, 50.0, 200.0));
        let _ = configure(&mut world, vec![wall]);
        let agent = spawn(&mut world, AgentKind::Walker, WorldPoint::new(200.0, 0.0));
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::SteerAgent {
                agent,
                destination: WorldPoint::new(202.5, 0.0),
                facing: 0.5,
            },
            &mut events,
        );

        assert_eq!(events, vec![Event::AgentBlocked { agent }]);
        let snapshot = *query::agent_view(&world).get(agent).expect("agent");
        assert_eq!(snapshot.position(), WorldPoint::new(200.0, 0.0));
        assert!((snapshot.facing - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn hazards_expire_after_lifetime() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::CreateHazard {
                center: WorldPoint::new(10.0, 10.0),
            },
            &mut events,
        );
        assert_eq!(query::hazards(&world).len(), 1);

        let early = tick(&mut world, 4999);
        assert!(!early
            .iter()
            .any(|event| matches!(event, Event::HazardExpired { .. })));
        let late = tick(&mut world, 1);
        assert!(late
            .iter()
            .any(|event| matches!(event, Event::HazardExpired { .. })));
        assert!(query::hazards(&world).is_empty());
    }

    #[test]
    fn detonation_removes_agent_without_kill() {
        let mut world = World::new();
        let agent = spawn(&mut world, AgentKind::Stalker, WorldPoint::new(50.0, 50.0));
        let mut events = Vec::new();

        apply(&mut world, Command::DetonateAgent { agent }, &mut events);
        apply(&mut world, Command::DetonateAgent { agent }, &mut events);

        assert_eq!(
            events,
            vec![Event::AgentDetonated {
                agent,
                position: WorldPoint::new(50.0, 50.0),
            }]
        );
    }

    #[test]
    fn agent_view_is_sorted_and_scaled_by_kind() {
        let mut world = World::new();
        let first = spawn(&mut world, AgentKind::Boss, WorldPoint::new(600.0, 0.0));
        let second = spawn(&mut world, AgentKind::Brute, WorldPoint::new(-600.0, 0.0));

        let view = query::agent_view(&world).into_vec();
        assert_eq!(view.len(), 2);
        assert_eq!(view[0].id, first);
        assert_eq!(view[1].id, second);
        assert!((view[0].bounds.half_width() - 22.5).abs() < f32::EPSILON);
        assert_eq!(view[1].health, Health::new(312));
    }
}
