#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Horde Survival engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::time::Duration;

pub use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Horde Survival.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the world's tunable parameters.
    ConfigureWorld {
        /// Health the player starts with and can be healed back up to.
        player_max_health: f32,
        /// Minimum simulated time between two accepted hits on the player.
        damage_cooldown: Duration,
        /// Real time a dead enemy lingers before it is removed from the arena.
        corpse_lifetime: Duration,
    },
    /// Replaces a weapon's statistics, refills its magazine and sets the
    /// rounds held in reserve for it.
    ConfigureWeapon {
        /// Weapon being configured.
        weapon: WeaponKind,
        /// Magazine, reload and damage statistics.
        spec: WeaponSpec,
        /// Rounds held in reserve for the weapon's ammunition family.
        reserve: u32,
    },
    /// Advances the clocks by the provided real (unscaled) elapsed time.
    Tick {
        /// Wall-clock time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Changes the multiplier applied to real time to derive simulated time.
    SetTimeScale {
        /// New multiplier; zero freezes the simulation.
        scale: f32,
    },
    /// Requests that a hostile entity be instantiated.
    SpawnEnemy {
        /// Category of enemy being spawned.
        kind: EnemyKind,
        /// Statistics applied to the new enemy.
        template: EnemyTemplate,
        /// World-space spawn position.
        position: Vec3,
    },
    /// Applies damage to a hostile entity.
    DamageEnemy {
        /// Handle of the enemy being hit.
        enemy: EnemyId,
        /// Amount of health removed.
        amount: f32,
    },
    /// Removes a hostile entity from the arena regardless of its health.
    DespawnEnemy {
        /// Handle of the enemy being removed.
        enemy: EnemyId,
    },
    /// Applies damage to the player.
    DamagePlayer {
        /// Amount of health removed.
        amount: f32,
    },
    /// Restores player health.
    HealPlayer {
        /// Amount of health restored.
        amount: f32,
    },
    /// Pulls the trigger of a weapon, optionally hitting an enemy.
    ///
    /// Refused while the magazine is empty or a reload is running.
    FireWeapon {
        /// Weapon being fired.
        weapon: WeaponKind,
        /// Enemy hit by the bullet, if any.
        target: Option<EnemyId>,
    },
    /// Starts reloading a weapon from its reserve.
    ReloadWeapon {
        /// Weapon being reloaded.
        weapon: WeaponKind,
    },
    /// Requests that a pickup be placed into the arena.
    SpawnPickup {
        /// Category of the pickup.
        kind: PickupKind,
        /// Rounds granted when the pickup is collected.
        amount: u32,
        /// World-space spawn position.
        position: Vec3,
    },
    /// Requests that the player collect an existing pickup.
    CollectPickup {
        /// Identifier of the pickup being collected.
        pickup: PickupId,
    },
    /// Records the start of a new wave.
    StartWave {
        /// Number of the wave that begins.
        wave: WaveNumber,
        /// Number of enemies the wave will issue.
        quota: u32,
        /// Whether the final slot of the wave spawns a boss.
        boss: bool,
    },
    /// Records that the live population was confirmed empty.
    DeclarePopulationCleared,
    /// Records the start of the rest interval that follows a cleared wave.
    BeginCooldown {
        /// Wave that was cleared.
        wave: WaveNumber,
        /// Length of the rest interval.
        duration: Duration,
    },
    /// Updates the remaining cooldown shown to the player.
    UpdateCooldown {
        /// Time left before the next wave starts.
        remaining: Duration,
    },
    /// Records the end of the rest interval.
    EndCooldown,
    /// Announces that an upcoming wave ends with a boss.
    AnnounceBossWave {
        /// Wave that will contain the boss.
        wave: WaveNumber,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the clocks advanced.
    TimeAdvanced {
        /// Wall-clock time that elapsed; unaffected by pausing.
        real: Duration,
        /// Gameplay time that elapsed after applying the time scale.
        simulated: Duration,
    },
    /// Announces that the time scale changed.
    TimeScaleChanged {
        /// Multiplier that became active.
        scale: f32,
    },
    /// Confirms that an enemy entered the arena.
    EnemySpawned {
        /// Handle allocated to the enemy.
        enemy: EnemyId,
        /// Category of the enemy.
        kind: EnemyKind,
        /// Position the enemy spawned at.
        position: Vec3,
    },
    /// Reports that an enemy lost health.
    EnemyDamaged {
        /// Handle of the damaged enemy.
        enemy: EnemyId,
        /// Health left after the hit.
        remaining: f32,
    },
    /// Reports that an enemy's health reached zero.
    EnemyDied {
        /// Handle of the enemy that died.
        enemy: EnemyId,
    },
    /// Reports that an enemy was removed from the arena.
    EnemyDespawned {
        /// Handle of the removed enemy; it is stale from now on.
        enemy: EnemyId,
    },
    /// Reports that the player lost health.
    PlayerDamaged {
        /// Health left after the hit.
        health: f32,
    },
    /// Reports that the player recovered health.
    PlayerHealed {
        /// Health after healing.
        health: f32,
    },
    /// Reports that the player's health reached zero.
    PlayerDied,
    /// Confirms that a weapon fired one round.
    WeaponFired {
        /// Weapon that fired.
        weapon: WeaponKind,
        /// Rounds left in the magazine.
        bullets_left: u32,
    },
    /// Reports that the trigger was pulled on an empty magazine.
    WeaponDryFired {
        /// Weapon that clicked.
        weapon: WeaponKind,
    },
    /// Reports that a weapon started reloading.
    ReloadStarted {
        /// Weapon being reloaded.
        weapon: WeaponKind,
    },
    /// Reports that a reload finished.
    WeaponReloaded {
        /// Weapon that was reloaded.
        weapon: WeaponKind,
        /// Rounds in the magazine after the reload.
        bullets_left: u32,
        /// Rounds left in reserve after the reload.
        reserve: u32,
    },
    /// Confirms that a pickup was placed into the arena.
    PickupSpawned {
        /// Identifier allocated to the pickup.
        pickup: PickupId,
        /// Category of the pickup.
        kind: PickupKind,
        /// Position of the pickup.
        position: Vec3,
    },
    /// Confirms that the player collected a pickup.
    PickupCollected {
        /// Identifier of the collected pickup.
        pickup: PickupId,
        /// Category of the pickup.
        kind: PickupKind,
        /// Rounds added to the matching reserve.
        amount: u32,
    },
    /// Announces that a wave began.
    WaveStarted {
        /// Number of the wave.
        wave: WaveNumber,
        /// Number of enemies the wave will issue.
        quota: u32,
        /// Whether the wave ends with a boss.
        boss: bool,
    },
    /// Announces that the live population was confirmed empty.
    PopulationCleared,
    /// Announces that the rest interval began.
    CooldownStarted {
        /// Wave that was cleared.
        wave: WaveNumber,
        /// Length of the rest interval.
        duration: Duration,
    },
    /// Announces that the rest interval ended.
    CooldownEnded,
    /// Announces that an upcoming wave ends with a boss.
    BossWaveAnnounced {
        /// Wave that will contain the boss.
        wave: WaveNumber,
    },
}

/// Signals derived from the event stream describing population changes.
///
/// Signals preserve the order of the events they were derived from so that
/// consumers observe registrations, deaths and elapsed time in sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PopulationSignal {
    /// A hostile entity joined the live population.
    Registered {
        /// Handle of the registered enemy.
        enemy: EnemyId,
        /// Live population after the registration.
        live: u32,
    },
    /// A hostile entity left the live population.
    Unregistered {
        /// Handle of the unregistered enemy.
        enemy: EnemyId,
        /// Live population after the removal.
        live: u32,
    },
    /// Real (unscaled) time elapsed.
    RealTimeElapsed {
        /// Amount of real time that elapsed.
        dt: Duration,
    },
}

/// Generation-checked handle to a hostile entity owned by the world.
///
/// Slots are recycled once an enemy is despawned; the generation counter
/// distinguishes the new occupant from stale handles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnemyId {
    index: u32,
    generation: u32,
}

impl EnemyId {
    /// Creates a new enemy handle from an arena slot and generation.
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Arena slot the handle refers to.
    #[must_use]
    pub const fn index(&self) -> u32 {
        self.index
    }

    /// Generation of the slot occupant the handle was issued for.
    #[must_use]
    pub const fn generation(&self) -> u32 {
        self.generation
    }
}

/// Unique identifier assigned to a pickup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PickupId(u32);

impl PickupId {
    /// Creates a new pickup identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// One-based wave counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WaveNumber(u32);

impl WaveNumber {
    /// The first wave of a session.
    pub const FIRST: Self = Self(1);

    /// Creates a wave number, clamping zero to the first wave.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        if value == 0 {
            Self::FIRST
        } else {
            Self(value)
        }
    }

    /// Retrieves the numeric representation of the wave.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Wave that follows this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

/// Categories of hostile entities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Standard zombie issued for every regular slot.
    Regular,
    /// Tougher zombie issued for the final slot of a boss wave.
    Boss,
}

/// Statistics applied to a spawned enemy.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyTemplate {
    max_health: f32,
}

impl EnemyTemplate {
    /// Creates a template with the provided maximum health.
    #[must_use]
    pub const fn new(max_health: f32) -> Self {
        Self { max_health }
    }

    /// Health the enemy spawns with.
    #[must_use]
    pub const fn max_health(&self) -> f32 {
        self.max_health
    }
}

/// Categories of collectible pickups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PickupKind {
    /// Ammunition box for rifles.
    RifleAmmo,
    /// Ammunition box for pistols.
    PistolAmmo,
}

/// Firearms carried by the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WeaponKind {
    /// Automatic rifle fed from rifle ammunition.
    Rifle,
    /// Sidearm fed from pistol ammunition.
    Pistol,
}

impl WeaponKind {
    /// Ammunition family that refills this weapon's reserve.
    #[must_use]
    pub const fn ammo(self) -> PickupKind {
        match self {
            Self::Rifle => PickupKind::RifleAmmo,
            Self::Pistol => PickupKind::PistolAmmo,
        }
    }
}

/// Magazine, reload and damage statistics of a weapon.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeaponSpec {
    magazine_size: u32,
    reload_time: Duration,
    damage: f32,
}

impl WeaponSpec {
    /// Creates a weapon specification.
    #[must_use]
    pub const fn new(magazine_size: u32, reload_time: Duration, damage: f32) -> Self {
        Self {
            magazine_size,
            reload_time,
            damage,
        }
    }

    /// Rounds a full magazine holds.
    #[must_use]
    pub const fn magazine_size(&self) -> u32 {
        self.magazine_size
    }

    /// Simulated time a reload takes.
    #[must_use]
    pub const fn reload_time(&self) -> Duration {
        self.reload_time
    }

    /// Damage dealt by each bullet.
    #[must_use]
    pub const fn damage(&self) -> f32 {
        self.damage
    }
}

#[cfg(test)]
mod tests {
    use super::{EnemyId, EnemyKind, EnemyTemplate, PickupKind, WaveNumber, WeaponKind};
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn wave_number_clamps_zero_to_first_wave() {
        assert_eq!(WaveNumber::new(0), WaveNumber::FIRST);
        assert_eq!(WaveNumber::new(7).get(), 7);
    }

    #[test]
    fn wave_number_next_increments() {
        assert_eq!(WaveNumber::FIRST.next().get(), 2);
        assert_eq!(WaveNumber::new(u32::MAX).next().get(), u32::MAX);
    }

    #[test]
    fn enemy_ids_differ_by_generation() {
        let first = EnemyId::new(3, 0);
        let recycled = EnemyId::new(3, 1);
        assert_ne!(first, recycled);
        assert_eq!(first.index(), recycled.index());
    }

    #[test]
    fn weapons_draw_from_their_own_ammo_family() {
        assert_eq!(WeaponKind::Rifle.ammo(), PickupKind::RifleAmmo);
        assert_eq!(WeaponKind::Pistol.ammo(), PickupKind::PistolAmmo);
    }

    #[test]
    fn enemy_template_round_trips_through_bincode() {
        assert_round_trip(&EnemyTemplate::new(250.0));
        assert_round_trip(&EnemyKind::Boss);
    }
}
