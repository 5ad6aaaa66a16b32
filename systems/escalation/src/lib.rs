#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Difficulty escalation rules applied between waves.

use std::num::NonZeroU32;

use horde_core::{PickupKind, WaveNumber};
use thiserror::Error;

const DEFAULT_GROWTH_FACTOR: f64 = 2.0;

/// Errors raised when escalation parameters are invalid.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// Growth factor is below one or not a finite number.
    #[error("growth factor must be a finite number >= 1, got {0}")]
    InvalidGrowthFactor(f64),
}

/// Read-only rule set governing how wave difficulty grows.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    growth_factor: f64,
    cap: Option<NonZeroU32>,
    boss_interval: Option<NonZeroU32>,
    pickup_interval: Option<NonZeroU32>,
}

impl Config {
    /// Creates a validated escalation configuration.
    pub fn new(
        growth_factor: f64,
        cap: Option<NonZeroU32>,
        boss_interval: Option<NonZeroU32>,
        pickup_interval: Option<NonZeroU32>,
    ) -> Result<Self, ConfigError> {
        if !growth_factor.is_finite() || growth_factor < 1.0 {
            return Err(ConfigError::InvalidGrowthFactor(growth_factor));
        }

        Ok(Self {
            growth_factor,
            cap,
            boss_interval,
            pickup_interval,
        })
    }

    /// Multiplier applied to the quota after every wave.
    #[must_use]
    pub const fn growth_factor(&self) -> f64 {
        self.growth_factor
    }

    /// Upper bound of any quota, if configured.
    #[must_use]
    pub const fn cap(&self) -> Option<NonZeroU32> {
        self.cap
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            growth_factor: DEFAULT_GROWTH_FACTOR,
            cap: None,
            boss_interval: None,
            pickup_interval: None,
        }
    }
}

/// Stateless policy answering escalation questions.
#[derive(Clone, Copy, Debug, Default)]
pub struct EscalationPolicy {
    config: Config,
}

impl EscalationPolicy {
    /// Creates a new policy using the supplied configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Quota of the wave that follows a wave with the provided quota.
    ///
    /// The result is `round(quota * growth_factor)` clamped to `[1, cap]`.
    #[must_use]
    pub fn next_quota(&self, quota: u32) -> u32 {
        let grown = (f64::from(quota) * self.config.growth_factor).round();
        let grown = if grown >= f64::from(u32::MAX) {
            u32::MAX
        } else {
            grown as u32
        };
        let ceiling = self.config.cap.map_or(u32::MAX, NonZeroU32::get);
        grown.clamp(1, ceiling)
    }

    /// Reports whether the final slot of the wave spawns a boss.
    #[must_use]
    pub fn should_spawn_boss(&self, wave: WaveNumber) -> bool {
        is_multiple(wave, self.config.boss_interval)
    }

    /// Reports whether clearing the wave rewards an ammunition pickup.
    #[must_use]
    pub fn should_spawn_pickup(&self, wave: WaveNumber) -> bool {
        is_multiple(wave, self.config.pickup_interval)
    }

    /// Kind of pickup rewarded for the wave; alternates between rifle and
    /// pistol ammunition on consecutive pickup waves.
    #[must_use]
    pub fn pickup_kind(&self, wave: WaveNumber) -> Option<PickupKind> {
        let interval = self.config.pickup_interval?.get();
        let occurrence = (wave.get() / interval).saturating_sub(1);
        if occurrence % 2 == 0 {
            Some(PickupKind::RifleAmmo)
        } else {
            Some(PickupKind::PistolAmmo)
        }
    }
}

fn is_multiple(wave: WaveNumber, interval: Option<NonZeroU32>) -> bool {
    interval.is_some_and(|interval| wave.get() % interval.get() == 0)
}
