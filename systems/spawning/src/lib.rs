#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic endless-mode spawning with a time and kill driven difficulty ramp.

mod encounter;

use std::{f32::consts::TAU, time::Duration};

use outbreak_core::{Aabb, AgentKind, Command, Event, Obstacle, PlayerSnapshot, WorldPoint};
use outbreak_navigation::collides;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

pub use encounter::Encounter;

/// Closest distance from the player at which agents appear.
pub const SPAWN_RING_INNER: f32 = 500.0;
/// Farthest distance from the player at which agents appear.
pub const SPAWN_RING_OUTER: f32 = 800.0;
/// Simulated time between two difficulty increases.
pub const DIFFICULTY_PERIOD: Duration = Duration::from_secs(30);
/// Ring positions drawn per agent before a blocked spawn is dropped.
pub const PLACEMENT_ATTEMPTS: usize = 16;

const REGULAR_KINDS: [AgentKind; 3] = [AgentKind::Walker, AgentKind::Brute, AgentKind::Stalker];

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    spawn_interval: Duration,
    minimum_interval: Duration,
    interval_step: Duration,
    speed_step: f32,
    initial_batch: u32,
    max_batch: u32,
    wave_threshold: u32,
    boss_wave: Option<u32>,
    rng_seed: u64,
}

impl Config {
    /// Creates the endless-mode configuration seeded with `rng_seed`.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self {
            spawn_interval: Duration::from_millis(3000),
            minimum_interval: Duration::from_millis(500),
            interval_step: Duration::from_millis(200),
            speed_step: 0.1,
            initial_batch: 2,
            max_batch: 10,
            wave_threshold: 10,
            boss_wave: None,
            rng_seed,
        }
    }

    /// Overrides the starting interval between spawn batches.
    #[must_use]
    pub fn with_spawn_interval(mut self, interval: Duration) -> Self {
        self.spawn_interval = interval;
        self
    }

    /// Overrides the floor the spawn interval shrinks to.
    #[must_use]
    pub fn with_minimum_interval(mut self, interval: Duration) -> Self {
        self.minimum_interval = interval;
        self
    }

    /// Overrides the starting and maximum batch sizes.
    #[must_use]
    pub fn with_batch_range(mut self, initial: u32, max: u32) -> Self {
        self.initial_batch = initial;
        self.max_batch = max;
        self
    }

    /// Overrides the kills required to finish the first wave.
    #[must_use]
    pub fn with_wave_threshold(mut self, kills: u32) -> Self {
        self.wave_threshold = kills;
        self
    }

    /// Spawns a single boss once the encounter reaches `wave`.
    #[must_use]
    pub fn with_boss_wave(mut self, wave: Option<u32>) -> Self {
        self.boss_wave = wave;
        self
    }

    /// Seed for the spawn position and kind generator.
    #[must_use]
    pub const fn rng_seed(&self) -> u64 {
        self.rng_seed
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Pure system that emits spawn commands on a shrinking interval.
#[derive(Debug)]
pub struct Spawning {
    config: Config,
    encounter: Encounter,
    accumulator: Duration,
    difficulty_clock: Duration,
    rng: ChaCha8Rng,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            encounter: Encounter::new(&config),
            accumulator: Duration::ZERO,
            difficulty_clock: Duration::ZERO,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            config,
        }
    }

    /// Progress of the current encounter.
    #[must_use]
    pub const fn encounter(&self) -> &Encounter {
        &self.encounter
    }

    /// Consumes events and the player's state to emit spawn commands.
    ///
    /// Agents are only placed where their box clears every obstacle.
    pub fn handle(
        &mut self,
        events: &[Event],
        player: &PlayerSnapshot,
        obstacles: &[Obstacle],
        out: &mut Vec<Command>,
    ) {
        let mut accumulated = Duration::ZERO;
        for event in events {
            match event {
                Event::TimeAdvanced { dt } => accumulated = accumulated.saturating_add(*dt),
                Event::AgentDestroyed { .. } => {
                    if self.encounter.record_kill() {
                        info!(
                            wave = self.encounter.wave(),
                            batch = self.encounter.batch_size(),
                            next_threshold = self.encounter.wave_threshold(),
                            "wave cleared"
                        );
                    }
                }
                _ => {}
            }
        }

        if accumulated.is_zero() || player.is_dead() {
            return;
        }

        self.difficulty_clock = self.difficulty_clock.saturating_add(accumulated);
        while self.difficulty_clock >= DIFFICULTY_PERIOD {
            self.difficulty_clock -= DIFFICULTY_PERIOD;
            self.encounter.ramp_difficulty(&self.config);
        }

        self.accumulator = self.accumulator.saturating_add(accumulated);
        let batches = self.resolve_spawn_attempts();
        let origin = player.position();
        for _ in 0..batches {
            for _ in 0..self.encounter.batch_size() {
                let kind = self.select_kind();
                let Some(position) = self.select_clear_position(origin, kind, obstacles) else {
                    debug!(?kind, "no clear spawn position found");
                    continue;
                };
                out.push(Command::SpawnAgent {
                    kind,
                    position,
                    speed_multiplier: self.encounter.speed_multiplier(),
                });
            }
        }
    }

    fn resolve_spawn_attempts(&mut self) -> usize {
        let interval = self.encounter.spawn_interval();
        if interval.is_zero() {
            return 0;
        }

        let mut attempts = 0;
        while self.accumulator >= interval {
            self.accumulator -= interval;
            attempts += 1;
        }
        attempts
    }

    fn select_kind(&mut self) -> AgentKind {
        if self.encounter.claim_boss(&self.config) {
            return AgentKind::Boss;
        }
        REGULAR_KINDS[self.rng.gen_range(0..REGULAR_KINDS.len())]
    }

    fn select_clear_position(
        &mut self,
        origin: WorldPoint,
        kind: AgentKind,
        obstacles: &[Obstacle],
    ) -> Option<WorldPoint> {
        (0..PLACEMENT_ATTEMPTS)
            .map(|_| self.select_position(origin))
            .find(|position| !collides(&Aabb::square(*position, kind.size()), obstacles))
    }

    fn select_position(&mut self, origin: WorldPoint) -> WorldPoint {
        let angle = self.rng.gen_range(0.0..TAU);
        let distance = self.rng.gen_range(SPAWN_RING_INNER..=SPAWN_RING_OUTER);
        origin + WorldPoint::new(angle.cos(), angle.sin()) * distance
    }
}
