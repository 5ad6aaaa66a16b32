//! TOML game configuration.

use std::{fs, num::NonZeroU32, path::Path, time::Duration};

use anyhow::{bail, Context, Result};
use horde_core::{EnemyTemplate, Vec3, WeaponKind, WeaponSpec};
use horde_system_escalation::Config as EscalationConfig;
use horde_system_placement::{AnchorSelection, Config as PlacementConfig, OffsetBounds};
use horde_system_session::SessionConfig;
use horde_system_victory::Config as VictoryConfig;
use horde_system_waves::Config as WaveConfig;
use horde_world::WorldSettings;
use serde::Deserialize;

const DEFAULT_SEED: u64 = 0x9e37_79b9_7f4a_7c15;

/// Game configuration as read from disk; every section is optional.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GameConfig {
    pub(crate) player: PlayerSection,
    pub(crate) waves: WavesSection,
    pub(crate) escalation: EscalationSection,
    pub(crate) placement: PlacementSection,
    pub(crate) victory: VictorySection,
    pub(crate) weapons: WeaponsSection,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct PlayerSection {
    max_health: f32,
    damage_cooldown_secs: f64,
    corpse_lifetime_secs: f64,
}

impl Default for PlayerSection {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            damage_cooldown_secs: 0.05,
            corpse_lifetime_secs: 2.0,
        }
    }
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct WavesSection {
    initial_quota: u32,
    spawn_delay_secs: f64,
    cooldown_secs: f64,
    zombie_health: Option<f32>,
    boss_health: Option<f32>,
    pickup_amount: u32,
}

impl Default for WavesSection {
    fn default() -> Self {
        Self {
            initial_quota: 5,
            spawn_delay_secs: 0.5,
            cooldown_secs: 10.0,
            zombie_health: Some(100.0),
            boss_health: None,
            pickup_amount: 30,
        }
    }
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct EscalationSection {
    growth_factor: f64,
    cap: Option<u32>,
    boss_interval: Option<u32>,
    pickup_interval: Option<u32>,
}

impl Default for EscalationSection {
    fn default() -> Self {
        Self {
            growth_factor: 2.0,
            cap: None,
            boss_interval: None,
            pickup_interval: None,
        }
    }
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct PlacementSection {
    anchors: Vec<[f32; 3]>,
    origin: [f32; 3],
    selection: AnchorSelection,
    offset_x: [f32; 2],
    offset_z: [f32; 2],
    seed: Option<u64>,
}

impl Default for PlacementSection {
    fn default() -> Self {
        Self {
            anchors: Vec::new(),
            origin: [0.0; 3],
            selection: AnchorSelection::RoundRobin,
            offset_x: [-1.0, 1.0],
            offset_z: [-1.0, 10.0],
            seed: None,
        }
    }
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct VictorySection {
    debounce_secs: f64,
}

impl Default for VictorySection {
    fn default() -> Self {
        Self {
            debounce_secs: 0.2,
        }
    }
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct WeaponsSection {
    rifle: WeaponSection,
    pistol: WeaponSection,
}

/// Overrides of a weapon's built-in statistics.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct WeaponSection {
    magazine_size: Option<u32>,
    reload_secs: Option<f64>,
    damage: Option<f32>,
    reserve: u32,
}

impl WeaponSection {
    fn apply(self, settings: WorldSettings, weapon: WeaponKind, name: &str) -> Result<WorldSettings> {
        let base = settings.weapon(weapon);
        let magazine_size = self.magazine_size.unwrap_or(base.magazine_size());
        if magazine_size == 0 {
            bail!("`weapons.{name}.magazine_size` must be at least 1");
        }
        let reload_time = match self.reload_secs {
            Some(value) => seconds(value, &format!("weapons.{name}.reload_secs"))?,
            None => base.reload_time(),
        };
        let damage = self.damage.unwrap_or(base.damage());
        if !damage.is_finite() || damage < 0.0 {
            bail!("`weapons.{name}.damage` must be a non-negative number, got {damage}");
        }

        let spec = WeaponSpec::new(magazine_size, reload_time, damage);
        Ok(settings.with_weapon(weapon, spec, self.reserve))
    }
}

impl GameConfig {
    /// Reads and parses the configuration at the provided path.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read game config at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("invalid game config at {}", path.display()))
    }

    pub(crate) fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse game config toml contents")
    }

    /// Validates every section and builds the session configuration.
    ///
    /// A seed passed on the command line overrides the configured one.
    pub(crate) fn into_session_config(self, seed: Option<u64>) -> Result<SessionConfig> {
        let player = self.player;
        let world = WorldSettings::new(
            player.max_health,
            seconds(player.damage_cooldown_secs, "player.damage_cooldown_secs")?,
            seconds(player.corpse_lifetime_secs, "player.corpse_lifetime_secs")?,
        );
        let world = self
            .weapons
            .rifle
            .apply(world, WeaponKind::Rifle, "rifle")
            .context("invalid [weapons.rifle] section")?;
        let world = self
            .weapons
            .pistol
            .apply(world, WeaponKind::Pistol, "pistol")
            .context("invalid [weapons.pistol] section")?;

        let waves = self.waves;
        let wave_config = WaveConfig::new(
            waves.initial_quota,
            seconds(waves.spawn_delay_secs, "waves.spawn_delay_secs")?,
            seconds(waves.cooldown_secs, "waves.cooldown_secs")?,
            waves.zombie_health.map(EnemyTemplate::new),
            waves.boss_health.map(EnemyTemplate::new),
        )
        .context("invalid [waves] section")?
        .with_pickup_amount(waves.pickup_amount);

        let escalation = self.escalation;
        let escalation_config = EscalationConfig::new(
            escalation.growth_factor,
            at_least_one(escalation.cap, "escalation.cap")?,
            at_least_one(escalation.boss_interval, "escalation.boss_interval")?,
            at_least_one(escalation.pickup_interval, "escalation.pickup_interval")?,
        )
        .context("invalid [escalation] section")?;

        let placement = self.placement;
        let placement_config = PlacementConfig::new(
            placement.anchors.into_iter().map(Vec3::from_array).collect(),
            placement.selection,
            OffsetBounds::new(placement.offset_x[0], placement.offset_x[1]),
            OffsetBounds::new(placement.offset_z[0], placement.offset_z[1]),
            seed.or(placement.seed).unwrap_or(DEFAULT_SEED),
        )
        .with_default_anchor(Vec3::from_array(placement.origin));

        let victory = VictoryConfig::new(seconds(
            self.victory.debounce_secs,
            "victory.debounce_secs",
        )?);

        Ok(SessionConfig {
            world,
            waves: wave_config,
            placement: placement_config,
            escalation: escalation_config,
            victory,
        })
    }
}

/// Converts seconds into a duration, rejecting negative and non-finite values.
pub(crate) fn seconds(value: f64, field: &str) -> Result<Duration> {
    Duration::try_from_secs_f64(value)
        .with_context(|| format!("`{field}` must be a non-negative number of seconds, got {value}"))
}

/// Rejects an explicit zero; leaving the field out is how it is disabled.
fn at_least_one(value: Option<u32>, field: &str) -> Result<Option<NonZeroU32>> {
    value
        .map(|value| {
            NonZeroU32::new(value)
                .with_context(|| format!("`{field}` must be at least 1; omit it to disable"))
        })
        .transpose()
}
