use std::{fs, io, path::Path, time::Duration};

use outbreak_core::{GridError, GridSettings};
use outbreak_system_arena::MazeSettings;
use outbreak_system_spawning::Config as SpawnConfig;
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while loading a simulation config file.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config at {path}")]
    Read {
        /// Path that was requested.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The file is not valid TOML or has unknown keys.
    #[error("failed to parse config toml")]
    Parse(#[from] toml::de::Error),
    /// The arena tiling cannot be turned into a grid.
    #[error("invalid arena grid")]
    Grid(#[from] GridError),
    /// A probability lies outside `0.0..=1.0`.
    #[error("{field} must lie within 0.0..=1.0, got {value}")]
    Probability {
        /// Offending key.
        field: &'static str,
        /// Offending value.
        value: f32,
    },
    /// The simulation tick is zero.
    #[error("simulation.tick_millis must be positive")]
    ZeroTick,
}

/// Complete configuration of a headless run.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SimulationConfig {
    pub(crate) simulation: SimulationSection,
    pub(crate) arena: ArenaSection,
    pub(crate) spawning: SpawningSection,
}

/// `[simulation]` table.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SimulationSection {
    pub(crate) seed: u64,
    pub(crate) duration_secs: u64,
    pub(crate) tick_millis: u64,
    pub(crate) recenter_distance: f32,
}

impl Default for SimulationSection {
    fn default() -> Self {
        Self {
            seed: 0x5eed,
            duration_secs: 120,
            tick_millis: 16,
            recenter_distance: 500.0,
        }
    }
}

/// `[arena]` table.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ArenaSection {
    pub(crate) cell_size: f32,
    pub(crate) region_size: f32,
    pub(crate) fill_probability: f32,
    pub(crate) safe_margin: f32,
    pub(crate) harmful_probability: f32,
}

impl Default for ArenaSection {
    fn default() -> Self {
        let maze = MazeSettings::default();
        Self {
            cell_size: maze.grid.cell_size(),
            region_size: maze.grid.region_size(),
            fill_probability: maze.fill_probability,
            safe_margin: maze.safe_margin,
            harmful_probability: maze.harmful_probability,
        }
    }
}

/// `[spawning]` table.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SpawningSection {
    pub(crate) initial_interval_ms: u64,
    pub(crate) minimum_interval_ms: u64,
    pub(crate) initial_batch: u32,
    pub(crate) max_batch: u32,
    pub(crate) wave_threshold: u32,
    pub(crate) boss_wave: Option<u32>,
}

impl Default for SpawningSection {
    fn default() -> Self {
        Self {
            initial_interval_ms: 3000,
            minimum_interval_ms: 500,
            initial_batch: 2,
            max_batch: 10,
            wave_threshold: 10,
            boss_wave: Some(3),
        }
    }
}

impl SimulationConfig {
    /// Reads and validates the config stored at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&contents)
    }

    /// Parses and validates a config from TOML text.
    pub(crate) fn parse(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.simulation.tick_millis == 0 {
            return Err(ConfigError::ZeroTick);
        }
        for (field, value) in [
            ("arena.fill_probability", self.arena.fill_probability),
            ("arena.harmful_probability", self.arena.harmful_probability),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Probability { field, value });
            }
        }
        let _ = self.grid_settings().cells_per_edge()?;
        Ok(())
    }

    pub(crate) fn tick(&self) -> Duration {
        Duration::from_millis(self.simulation.tick_millis)
    }

    pub(crate) fn duration(&self) -> Duration {
        Duration::from_secs(self.simulation.duration_secs)
    }

    pub(crate) fn grid_settings(&self) -> GridSettings {
        GridSettings::new(self.arena.cell_size, self.arena.region_size)
    }

    pub(crate) fn maze_settings(&self) -> MazeSettings {
        MazeSettings {
            grid: self.grid_settings(),
            fill_probability: self.arena.fill_probability,
            safe_margin: self.arena.safe_margin,
            harmful_probability: self.arena.harmful_probability,
        }
    }

    pub(crate) fn spawn_config(&self) -> SpawnConfig {
        let spawning = &self.spawning;
        SpawnConfig::new(self.simulation.seed)
            .with_spawn_interval(Duration::from_millis(spawning.initial_interval_ms))
            .with_minimum_interval(Duration::from_millis(spawning.minimum_interval_ms))
            .with_batch_range(spawning.initial_batch, spawning.max_batch)
            .with_wave_threshold(spawning.wave_threshold)
            .with_boss_wave(spawning.boss_wave)
    }
}
