use std::{fmt, time::Duration};

use anyhow::{bail, Context, Result};
use outbreak_core::{AgentView, Command, Event, MoveInput, PlayerSnapshot, WorldPoint};
use outbreak_system_arena::generate_maze;
use outbreak_system_combat::{Battlefield, Combat};
use outbreak_system_pursuit::{Pursuit, Terrain};
use outbreak_system_spawning::Spawning;
use outbreak_world::{self as world, query, World, PROJECTILE_RANGE};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::config::SimulationConfig;

const FLEE_RADIUS: f32 = 250.0;
const FIRE_COOLDOWN: Duration = Duration::from_millis(250);

/// Headless endless-mode run wiring the world to every system.
#[derive(Debug)]
pub(crate) struct Simulation {
    world: World,
    pursuit: Pursuit,
    combat: Combat,
    spawning: Spawning,
    autopilot: Autopilot,
    tick: Duration,
    duration: Duration,
    recenter_distance: f32,
    grid_reference: WorldPoint,
    shots_fired: u32,
    recenters: u32,
}

impl Simulation {
    /// Lays out the arena and prepares every system from `config`.
    pub(crate) fn new(config: &SimulationConfig) -> Result<Self> {
        let mut world = World::new();
        info!("{}", query::welcome_banner(&world));
        let reference = query::player(&world).position();
        let mut maze_rng = ChaCha8Rng::seed_from_u64(config.simulation.seed);
        let obstacles = generate_maze(reference, &config.maze_settings(), &mut maze_rng)
            .context("failed to generate arena layout")?;

        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::ConfigureArena {
                obstacles,
                reference,
                settings: config.grid_settings(),
            },
            &mut events,
        );
        if let Some(Event::GridRejected { reason }) = events.first() {
            bail!("world refused the arena: {reason}");
        }

        Ok(Self {
            world,
            pursuit: Pursuit::default(),
            combat: Combat::new(),
            spawning: Spawning::new(config.spawn_config()),
            autopilot: Autopilot::default(),
            tick: config.tick(),
            duration: config.duration(),
            recenter_distance: config.simulation.recenter_distance,
            grid_reference: reference,
            shots_fired: 0,
            recenters: 0,
        })
    }

    /// Runs until the configured duration elapses or the player dies.
    pub(crate) fn run(mut self) -> Summary {
        while query::clock(&self.world) < self.duration {
            if query::player(&self.world).is_dead() {
                break;
            }
            self.step();
        }
        self.summary()
    }

    fn step(&mut self) {
        let now = query::clock(&self.world);
        let player = query::player(&self.world);
        let agents = query::agent_view(&self.world);
        let mut events = Vec::new();

        let input = self.autopilot.steer(&player, &agents);
        world::apply(&mut self.world, Command::MovePlayer { input }, &mut events);

        if let Some(toward) = self.autopilot.aim(&player, &agents, now) {
            world::apply(&mut self.world, Command::FireProjectile { toward }, &mut events);
        }

        world::apply(&mut self.world, Command::Tick { dt: self.tick }, &mut events);
        self.dispatch(events);
        self.recenter_if_needed();
    }

    fn dispatch(&mut self, mut events: Vec<Event>) {
        while !events.is_empty() {
            for event in &events {
                match event {
                    Event::ProjectileFired { .. } => self.shots_fired += 1,
                    Event::GridRebuilt { reference, .. } => {
                        self.grid_reference = *reference;
                        self.recenters += 1;
                    }
                    _ => {}
                }
            }

            let now = query::clock(&self.world);
            let agents = query::agent_view(&self.world);
            let player = query::player(&self.world);
            let projectiles = query::projectiles(&self.world);
            let hazards = query::hazards(&self.world);
            let obstacles = query::obstacles(&self.world);
            let mut commands = Vec::new();

            self.pursuit.handle(
                &events,
                &agents,
                &player,
                Terrain {
                    obstacles,
                    grid: query::grid(&self.world),
                },
                now,
                &mut commands,
            );
            self.combat.handle(
                &events,
                Battlefield {
                    agents: &agents,
                    player: &player,
                    projectiles: &projectiles,
                    hazards: &hazards,
                    obstacles,
                },
                now,
                &mut commands,
            );
            self.spawning.handle(&events, &player, obstacles, &mut commands);

            events.clear();
            for command in commands {
                world::apply(&mut self.world, command, &mut events);
            }
        }
    }

    fn recenter_if_needed(&mut self) {
        let position = query::player(&self.world).position();
        if position.distance_to(self.grid_reference) <= self.recenter_distance {
            return;
        }
        debug!(x = position.x(), y = position.y(), "recentering navigation grid");
        let mut events = Vec::new();
        world::apply(
            &mut self.world,
            Command::RecenterGrid {
                reference: position,
            },
            &mut events,
        );
        self.dispatch(events);
    }

    fn summary(&self) -> Summary {
        let player = query::player(&self.world);
        let encounter = self.spawning.encounter();
        let summary = Summary {
            elapsed: query::clock(&self.world),
            ticks: query::tick_index(&self.world),
            survived: !player.is_dead(),
            health: player.health.get(),
            ammo: player.ammo,
            wave: encounter.wave(),
            kills: encounter.total_kills(),
            agents_alive: query::agent_view(&self.world).len(),
            shots_fired: self.shots_fired,
            path_searches: self.pursuit.searches(),
            recenters: self.recenters,
        };
        info!(
            survived = summary.survived,
            wave = summary.wave,
            kills = summary.kills,
            "simulation finished"
        );
        summary
    }
}

/// Scripted stand-in for a human player: backs away from the closest agent
/// and shoots at it while it is in range.
#[derive(Debug, Default)]
struct Autopilot {
    last_shot: Option<Duration>,
}

impl Autopilot {
    fn steer(&self, player: &PlayerSnapshot, agents: &AgentView) -> MoveInput {
        let Some(threat) = nearest(player.position(), agents) else {
            return MoveInput::default();
        };
        let offset = player.position() - threat;
        if offset.length() > FLEE_RADIUS {
            return MoveInput::default();
        }
        MoveInput {
            left: offset.x() < -1.0,
            right: offset.x() > 1.0,
            up: offset.y() < -1.0,
            down: offset.y() > 1.0,
        }
    }

    fn aim(&mut self, player: &PlayerSnapshot, agents: &AgentView, now: Duration) -> Option<WorldPoint> {
        if player.ammo == 0 {
            return None;
        }
        if self
            .last_shot
            .map_or(false, |last| now.saturating_sub(last) < FIRE_COOLDOWN)
        {
            return None;
        }
        let target = nearest(player.position(), agents)?;
        if target.distance_to(player.position()) > PROJECTILE_RANGE {
            return None;
        }
        self.last_shot = Some(now);
        Some(target)
    }
}

fn nearest(origin: WorldPoint, agents: &AgentView) -> Option<WorldPoint> {
    agents
        .iter()
        .map(|agent| agent.position())
        .min_by(|a, b| a.distance_to(origin).total_cmp(&b.distance_to(origin)))
}

/// Outcome of a headless run.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Summary {
    pub(crate) elapsed: Duration,
    pub(crate) ticks: u64,
    pub(crate) survived: bool,
    pub(crate) health: u32,
    pub(crate) ammo: u32,
    pub(crate) wave: u32,
    pub(crate) kills: u32,
    pub(crate) agents_alive: usize,
    pub(crate) shots_fired: u32,
    pub(crate) path_searches: u64,
    pub(crate) recenters: u32,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let outcome = if self.survived { "survived" } else { "died" };
        writeln!(
            f,
            "{outcome} after {:.1}s ({} ticks)",
            self.elapsed.as_secs_f32(),
            self.ticks
        )?;
        writeln!(f, "health {} ammo {}", self.health, self.ammo)?;
        writeln!(
            f,
            "wave {} kills {} agents alive {}",
            self.wave, self.kills, self.agents_alive
        )?;
        write!(
            f,
            "shots {} path searches {} grid recenters {}",
            self.shots_fired, self.path_searches, self.recenters
        )
    }
}
