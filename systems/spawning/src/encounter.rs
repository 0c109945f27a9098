use std::time::Duration;

use crate::Config;

/// Difficulty and wave progress of a single endless-mode encounter.
#[derive(Clone, Debug, PartialEq)]
pub struct Encounter {
    wave: u32,
    wave_kills: u32,
    wave_threshold: u32,
    total_kills: u32,
    batch_size: u32,
    batch_cap: u32,
    speed_multiplier: f32,
    spawn_interval: Duration,
    boss_spawned: bool,
}

impl Encounter {
    pub(crate) fn new(config: &Config) -> Self {
        Self {
            wave: 1,
            wave_kills: 0,
            wave_threshold: config.wave_threshold,
            total_kills: 0,
            batch_size: config.initial_batch.min(config.max_batch),
            batch_cap: config.max_batch,
            speed_multiplier: 1.0,
            spawn_interval: config.spawn_interval,
            boss_spawned: false,
        }
    }

    /// Current wave, starting at 1.
    #[must_use]
    pub const fn wave(&self) -> u32 {
        self.wave
    }

    /// Kills needed to clear the current wave.
    #[must_use]
    pub const fn wave_threshold(&self) -> u32 {
        self.wave_threshold
    }

    /// Kills scored during the current wave.
    #[must_use]
    pub const fn wave_kills(&self) -> u32 {
        self.wave_kills
    }

    /// Kills scored over the whole encounter.
    #[must_use]
    pub const fn total_kills(&self) -> u32 {
        self.total_kills
    }

    /// Agents released per spawn batch.
    #[must_use]
    pub const fn batch_size(&self) -> u32 {
        self.batch_size
    }

    /// Speed multiplier applied to newly spawned agents.
    #[must_use]
    pub const fn speed_multiplier(&self) -> f32 {
        self.speed_multiplier
    }

    /// Time between spawn batches.
    #[must_use]
    pub const fn spawn_interval(&self) -> Duration {
        self.spawn_interval
    }

    /// Whether this encounter's boss has already appeared.
    #[must_use]
    pub const fn boss_spawned(&self) -> bool {
        self.boss_spawned
    }

    /// Counts a kill, returning `true` when it cleared the wave.
    pub(crate) fn record_kill(&mut self) -> bool {
        self.total_kills = self.total_kills.saturating_add(1);
        self.wave_kills = self.wave_kills.saturating_add(1);
        if self.wave_kills < self.wave_threshold {
            return false;
        }

        self.wave = self.wave.saturating_add(1);
        self.wave_kills = 0;
        self.wave_threshold = self.wave_threshold.saturating_mul(3) / 2;
        self.batch_size = self.batch_size.saturating_add(1).min(self.batch_cap);
        true
    }

    pub(crate) fn ramp_difficulty(&mut self, config: &Config) {
        self.speed_multiplier += config.speed_step;
        self.spawn_interval = self
            .spawn_interval
            .saturating_sub(config.interval_step)
            .max(config.minimum_interval);
    }

    /// Claims the boss slot once the configured wave is reached.
    pub(crate) fn claim_boss(&mut self, config: &Config) -> bool {
        let due = config.boss_wave.map_or(false, |wave| self.wave >= wave);
        if !due || self.boss_spawned {
            return false;
        }
        self.boss_spawned = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn waves_grow_threshold_and_batch() {
        let mut encounter = Encounter::new(&Config::new(0));

        let cleared = (0..10).filter(|_| encounter.record_kill()).count();
        assert_eq!(cleared, 1);
        assert_eq!(encounter.wave(), 2);
        assert_eq!(encounter.wave_threshold(), 15);
        assert_eq!(encounter.batch_size(), 3);

        for _ in 0..15 {
            let _ = encounter.record_kill();
        }
        assert_eq!(encounter.wave(), 3);
        assert_eq!(encounter.wave_threshold(), 22);
        assert_eq!(encounter.total_kills(), 25);
    }

    #[test]
    fn batch_size_is_capped() {
        let config = Config::new(0).with_batch_range(9, 10).with_wave_threshold(1);
        let mut encounter = Encounter::new(&config);

        for _ in 0..5 {
            let _ = encounter.record_kill();
        }

        assert_eq!(encounter.batch_size(), 10);
    }

    #[test]
    fn interval_bottoms_out() {
        let config = Config::new(0);
        let mut encounter = Encounter::new(&config);

        for _ in 0..20 {
            encounter.ramp_difficulty(&config);
        }

        assert_eq!(encounter.spawn_interval(), Duration::from_millis(500));
        assert!((encounter.speed_multiplier() - 3.0).abs() < 1e-4);
    }

    #[test]
    fn boss_is_claimed_once() {
        let config = Config::new(0).with_boss_wave(Some(1));
        let mut encounter = Encounter::new(&config);

        assert!(encounter.claim_boss(&config));
        assert!(!encounter.claim_boss(&config));
        assert!(encounter.boss_spawned());
    }
}
