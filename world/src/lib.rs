#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Horde Survival.
//!
//! The world stands in for the engine's entity system: it owns every enemy,
//! pickup and the player, performs damage bookkeeping, and records the wave
//! status shown on the HUD. Systems never mutate it directly; they submit
//! commands through [`apply`].

mod arena;

use std::{collections::BTreeMap, time::Duration};

use horde_core::{
    Command, EnemyId, Event, PickupId, PickupKind, Vec3, WaveNumber, WeaponKind, WeaponSpec,
    WELCOME_BANNER,
};

use self::arena::{Enemy, EnemyArena, Vitality};

const DEFAULT_PLAYER_MAX_HEALTH: f32 = 100.0;
const DEFAULT_DAMAGE_COOLDOWN: Duration = Duration::from_millis(50);
const DEFAULT_CORPSE_LIFETIME: Duration = Duration::from_secs(2);
const DEFAULT_RIFLE: WeaponSpec = WeaponSpec::new(30, Duration::from_millis(2_000), 20.0);
const DEFAULT_PISTOL: WeaponSpec = WeaponSpec::new(7, Duration::from_millis(1_500), 20.0);

/// Tunable parameters of the world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldSettings {
    player_max_health: f32,
    damage_cooldown: Duration,
    corpse_lifetime: Duration,
    rifle: WeaponSpec,
    pistol: WeaponSpec,
    starting_ammo: AmmoReserve,
}

impl WorldSettings {
    /// Creates settings from the provided tuning values.
    #[must_use]
    pub const fn new(
        player_max_health: f32,
        damage_cooldown: Duration,
        corpse_lifetime: Duration,
    ) -> Self {
        Self {
            player_max_health,
            damage_cooldown,
            corpse_lifetime,
            rifle: DEFAULT_RIFLE,
            pistol: DEFAULT_PISTOL,
            starting_ammo: AmmoReserve { rifle: 0, pistol: 0 },
        }
    }

    /// Replaces the statistics of a weapon and the reserve it starts with.
    #[must_use]
    pub fn with_weapon(mut self, weapon: WeaponKind, spec: WeaponSpec, reserve: u32) -> Self {
        match weapon {
            WeaponKind::Rifle => self.rifle = spec,
            WeaponKind::Pistol => self.pistol = spec,
        }
        self.starting_ammo.set(weapon.ammo(), reserve);
        self
    }

    /// Commands that install these settings into a world.
    #[must_use]
    pub fn to_commands(&self) -> Vec<Command> {
        let mut commands = vec![Command::ConfigureWorld {
            player_max_health: self.player_max_health,
            damage_cooldown: self.damage_cooldown,
            corpse_lifetime: self.corpse_lifetime,
        }];
        for weapon in [WeaponKind::Rifle, WeaponKind::Pistol] {
            commands.push(Command::ConfigureWeapon {
                weapon,
                spec: self.weapon(weapon),
                reserve: self.starting_ammo.get(weapon.ammo()),
            });
        }
        commands
    }

    /// Health the player starts with.
    #[must_use]
    pub const fn player_max_health(&self) -> f32 {
        self.player_max_health
    }

    /// Minimum simulated time between two accepted hits on the player.
    #[must_use]
    pub const fn damage_cooldown(&self) -> Duration {
        self.damage_cooldown
    }

    /// Real time a corpse lingers before removal.
    #[must_use]
    pub const fn corpse_lifetime(&self) -> Duration {
        self.corpse_lifetime
    }

    /// Statistics of the provided weapon.
    #[must_use]
    pub const fn weapon(&self, weapon: WeaponKind) -> WeaponSpec {
        match weapon {
            WeaponKind::Rifle => self.rifle,
            WeaponKind::Pistol => self.pistol,
        }
    }

    /// Rounds the player starts with in reserve.
    #[must_use]
    pub const fn starting_ammo(&self) -> AmmoReserve {
        self.starting_ammo
    }
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self::new(
            DEFAULT_PLAYER_MAX_HEALTH,
            DEFAULT_DAMAGE_COOLDOWN,
            DEFAULT_CORPSE_LIFETIME,
        )
    }
}

/// Rounds held in reserve for each weapon family.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AmmoReserve {
    /// Rifle rounds available for reloading.
    pub rifle: u32,
    /// Pistol rounds available for reloading.
    pub pistol: u32,
}

impl AmmoReserve {
    /// Rounds held for the provided ammunition family.
    #[must_use]
    pub const fn get(&self, kind: PickupKind) -> u32 {
        match kind {
            PickupKind::RifleAmmo => self.rifle,
            PickupKind::PistolAmmo => self.pistol,
        }
    }

    fn slot(&mut self, kind: PickupKind) -> &mut u32 {
        match kind {
            PickupKind::RifleAmmo => &mut self.rifle,
            PickupKind::PistolAmmo => &mut self.pistol,
        }
    }

    fn set(&mut self, kind: PickupKind, amount: u32) {
        *self.slot(kind) = amount;
    }

    fn add(&mut self, kind: PickupKind, amount: u32) {
        let slot = self.slot(kind);
        *slot = slot.saturating_add(amount);
    }

    /// Removes up to `amount` rounds and returns how many were taken.
    fn take(&mut self, kind: PickupKind, amount: u32) -> u32 {
        let slot = self.slot(kind);
        let taken = amount.min(*slot);
        *slot -= taken;
        taken
    }
}

/// Rounds loaded into a weapon and the state of its reload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MagazineStatus {
    /// Rounds left in the magazine.
    pub bullets_left: u32,
    /// Rounds a full magazine holds.
    pub magazine_size: u32,
    /// Simulated time left until a running reload completes.
    pub reloading: Option<Duration>,
}

#[derive(Clone, Copy, Debug)]
struct Weapon {
    spec: WeaponSpec,
    bullets_left: u32,
    reload_remaining: Option<Duration>,
}

impl Weapon {
    fn new(spec: WeaponSpec) -> Self {
        Self {
            spec,
            bullets_left: spec.magazine_size(),
            reload_remaining: None,
        }
    }

    fn status(&self) -> MagazineStatus {
        MagazineStatus {
            bullets_left: self.bullets_left,
            magazine_size: self.spec.magazine_size(),
            reloading: self.reload_remaining,
        }
    }
}

/// Remaining rest time between two waves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CooldownStatus {
    /// Wave that was cleared.
    pub wave: WaveNumber,
    /// Time left before the next wave starts.
    pub remaining: Duration,
}

/// Wave bookkeeping mirrored from the scheduler for presentation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WaveStatus {
    /// Wave currently running or most recently cleared.
    pub current: Option<WaveNumber>,
    /// Quota of the current wave.
    pub quota: u32,
    /// Whether the current wave ends with a boss.
    pub boss: bool,
    /// Active rest interval, if any.
    pub cooldown: Option<CooldownStatus>,
    /// Upcoming wave that was announced as a boss wave.
    pub boss_announced: Option<WaveNumber>,
    /// Number of times the population was confirmed empty.
    pub clearances: u32,
}

#[derive(Clone, Debug)]
struct Player {
    health: f32,
    max_health: f32,
    since_last_hit: Duration,
    dead: bool,
}

impl Player {
    fn new(settings: &WorldSettings) -> Self {
        Self {
            health: settings.player_max_health,
            max_health: settings.player_max_health,
            since_last_hit: settings.damage_cooldown,
            dead: false,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Pickup {
    kind: PickupKind,
    amount: u32,
    position: Vec3,
}

/// Represents the authoritative Horde Survival world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    settings: WorldSettings,
    time_scale: f32,
    real_elapsed: Duration,
    simulated_elapsed: Duration,
    enemies: EnemyArena,
    pickups: BTreeMap<PickupId, Pickup>,
    next_pickup_id: u32,
    player: Player,
    ammo: AmmoReserve,
    rifle: Weapon,
    pistol: Weapon,
    wave: WaveStatus,
}

impl World {
    /// Creates a new world with default settings and an empty arena.
    #[must_use]
    pub fn new() -> Self {
        let settings = WorldSettings::default();
        Self {
            banner: WELCOME_BANNER,
            player: Player::new(&settings),
            settings,
            time_scale: 1.0,
            real_elapsed: Duration::ZERO,
            simulated_elapsed: Duration::ZERO,
            enemies: EnemyArena::new(),
            pickups: BTreeMap::new(),
            next_pickup_id: 0,
            ammo: settings.starting_ammo,
            rifle: Weapon::new(settings.rifle),
            pistol: Weapon::new(settings.pistol),
            wave: WaveStatus::default(),
        }
    }

    fn weapon(&self, weapon: WeaponKind) -> &Weapon {
        match weapon {
            WeaponKind::Rifle => &self.rifle,
            WeaponKind::Pistol => &self.pistol,
        }
    }

    fn weapon_mut(&mut self, weapon: WeaponKind) -> &mut Weapon {
        match weapon {
            WeaponKind::Rifle => &mut self.rifle,
            WeaponKind::Pistol => &mut self.pistol,
        }
    }

    fn advance_clocks(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let simulated = scale_duration(dt, self.time_scale);
        self.real_elapsed = self.real_elapsed.saturating_add(dt);
        self.simulated_elapsed = self.simulated_elapsed.saturating_add(simulated);
        self.player.since_last_hit = self.player.since_last_hit.saturating_add(simulated);
        out_events.push(Event::TimeAdvanced {
            real: dt,
            simulated,
        });

        let mut expired = Vec::new();
        for (id, enemy) in self.enemies.iter_mut() {
            if let Vitality::Corpse { remaining } = enemy.vitality {
                let remaining = remaining.saturating_sub(dt);
                enemy.vitality = Vitality::Corpse { remaining };
                if remaining.is_zero() {
                    expired.push(id);
                }
            }
        }

        for enemy in expired {
            if self.enemies.remove(enemy).is_some() {
                out_events.push(Event::EnemyDespawned { enemy });
            }
        }

        for kind in [WeaponKind::Rifle, WeaponKind::Pistol] {
            let weapon = self.weapon_mut(kind);
            let Some(remaining) = weapon.reload_remaining else {
                continue;
            };
            let remaining = remaining.saturating_sub(simulated);
            weapon.reload_remaining = Some(remaining);
            if remaining.is_zero() {
                self.complete_reload(kind, out_events);
            }
        }
    }

    fn fire(&mut self, kind: WeaponKind, target: Option<EnemyId>, out_events: &mut Vec<Event>) {
        if self.player.dead {
            return;
        }
        let weapon = self.weapon_mut(kind);
        if weapon.reload_remaining.is_some() {
            log::debug!("{kind:?} cannot fire while reloading");
            return;
        }
        if weapon.bullets_left == 0 {
            out_events.push(Event::WeaponDryFired { weapon: kind });
            return;
        }

        weapon.bullets_left -= 1;
        let bullets_left = weapon.bullets_left;
        let damage = weapon.spec.damage();
        out_events.push(Event::WeaponFired {
            weapon: kind,
            bullets_left,
        });
        if let Some(enemy) = target {
            self.damage_enemy(enemy, damage, out_events);
        }
    }

    fn start_reload(&mut self, kind: WeaponKind, out_events: &mut Vec<Event>) {
        if self.player.dead {
            return;
        }
        let weapon = self.weapon_mut(kind);
        if weapon.reload_remaining.is_some()
            || weapon.bullets_left >= weapon.spec.magazine_size()
        {
            return;
        }

        weapon.reload_remaining = Some(weapon.spec.reload_time());
        out_events.push(Event::ReloadStarted { weapon: kind });
        if weapon.spec.reload_time().is_zero() {
            self.complete_reload(kind, out_events);
        }
    }

    fn complete_reload(&mut self, kind: WeaponKind, out_events: &mut Vec<Event>) {
        let weapon = self.weapon(kind);
        let needed = weapon.spec.magazine_size().saturating_sub(weapon.bullets_left);
        let loaded = self.ammo.take(kind.ammo(), needed);

        let weapon = self.weapon_mut(kind);
        weapon.bullets_left += loaded;
        weapon.reload_remaining = None;
        let bullets_left = weapon.bullets_left;
        log::debug!("{kind:?} reloaded {loaded} rounds");
        out_events.push(Event::WeaponReloaded {
            weapon: kind,
            bullets_left,
            reserve: self.ammo.get(kind.ammo()),
        });
    }

    fn damage_enemy(&mut self, enemy: EnemyId, amount: f32, out_events: &mut Vec<Event>) {
        if !is_positive(amount) {
            return;
        }
        let corpse_lifetime = self.settings.corpse_lifetime;
        let Some(target) = self.enemies.get_mut(enemy) else {
            log::debug!("damage ignored for stale enemy {enemy:?}");
            return;
        };
        if !target.is_alive() {
            return;
        }

        target.health = (target.health - amount).max(0.0);
        out_events.push(Event::EnemyDamaged {
            enemy,
            remaining: target.health,
        });

        if target.health <= 0.0 {
            target.vitality = Vitality::Corpse {
                remaining: corpse_lifetime,
            };
            out_events.push(Event::EnemyDied { enemy });
            if corpse_lifetime.is_zero() && self.enemies.remove(enemy).is_some() {
                out_events.push(Event::EnemyDespawned { enemy });
            }
        }
    }

    fn damage_player(&mut self, amount: f32, out_events: &mut Vec<Event>) {
        if self.player.dead || !is_positive(amount) {
            return;
        }
        if self.player.since_last_hit < self.settings.damage_cooldown {
            return;
        }

        self.player.since_last_hit = Duration::ZERO;
        self.player.health = (self.player.health - amount).clamp(0.0, self.player.max_health);
        log::debug!(
            "player took {amount} damage, health {}/{}",
            self.player.health,
            self.player.max_health
        );
        out_events.push(Event::PlayerDamaged {
            health: self.player.health,
        });

        if self.player.health <= 0.0 {
            self.player.dead = true;
            log::info!("player died");
            out_events.push(Event::PlayerDied);
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
        Command::ConfigureWorld {
            player_max_health,
            damage_cooldown,
            corpse_lifetime,
        } => {
            if !is_positive(player_max_health) {
                log::warn!("ignoring invalid player max health {player_max_health}");
                return;
            }
            world.settings = WorldSettings {
                player_max_health,
                damage_cooldown,
                corpse_lifetime,
                ..world.settings
            };
            world.player = Player::new(&world.settings);
        }
        Command::ConfigureWeapon {
            weapon,
            spec,
            reserve,
        } => {
            world.settings = world.settings.with_weapon(weapon, spec, reserve);
            *world.weapon_mut(weapon) = Weapon::new(spec);
            world.ammo.set(weapon.ammo(), reserve);
        }
        Command::Tick { dt } => world.advance_clocks(dt, out_events),
        Command::SetTimeScale { scale } => {
            let scale = if scale.is_finite() { scale.max(0.0) } else { 1.0 };
            world.time_scale = scale;
            out_events.push(Event::TimeScaleChanged { scale });
        }
        Command::SpawnEnemy {
            kind,
            template,
            position,
        } => {
            let enemy = world
                .enemies
                .insert(Enemy::from_template(kind, template, position));
            out_events.push(Event::EnemySpawned {
                enemy,
                kind,
                position,
            });
        }
        Command::DamageEnemy { enemy, amount } => world.damage_enemy(enemy, amount, out_events),
        Command::DespawnEnemy { enemy } => {
            if world.enemies.remove(enemy).is_some() {
                out_events.push(Event::EnemyDespawned { enemy });
            }
        }
        Command::DamagePlayer { amount } => world.damage_player(amount, out_events),
        Command::FireWeapon { weapon, target } => world.fire(weapon, target, out_events),
        Command::ReloadWeapon { weapon } => world.start_reload(weapon, out_events),
        Command::HealPlayer { amount } => {
            if world.player.dead || !is_positive(amount) {
                return;
            }
            world.player.health = (world.player.health + amount).min(world.player.max_health);
            out_events.push(Event::PlayerHealed {
                health: world.player.health,
            });
        }
        Command::SpawnPickup {
            kind,
            amount,
            position,
        } => {
            let pickup = PickupId::new(world.next_pickup_id);
            world.next_pickup_id = world.next_pickup_id.wrapping_add(1);
            let _ = world.pickups.insert(
                pickup,
                Pickup {
                    kind,
                    amount,
                    position,
                },
            );
            out_events.push(Event::PickupSpawned {
                pickup,
                kind,
                position,
            });
        }
        Command::CollectPickup { pickup } => {
            if world.player.dead {
                return;
            }
            if let Some(collected) = world.pickups.remove(&pickup) {
                world.ammo.add(collected.kind, collected.amount);
                out_events.push(Event::PickupCollected {
                    pickup,
                    kind: collected.kind,
                    amount: collected.amount,
                });
            }
        }
        Command::StartWave { wave, quota, boss } => {
            world.wave.current = Some(wave);
            world.wave.quota = quota;
            world.wave.boss = boss;
            world.wave.cooldown = None;
            if world.wave.boss_announced.is_some_and(|announced| announced <= wave) {
                world.wave.boss_announced = None;
            }
            out_events.push(Event::WaveStarted { wave, quota, boss });
        }
        Command::DeclarePopulationCleared => {
            world.wave.clearances = world.wave.clearances.saturating_add(1);
            out_events.push(Event::PopulationCleared);
        }
        Command::BeginCooldown { wave, duration } => {
            world.wave.cooldown = Some(CooldownStatus {
                wave,
                remaining: duration,
            });
            out_events.push(Event::CooldownStarted { wave, duration });
        }
        Command::UpdateCooldown { remaining } => {
            if let Some(cooldown) = world.wave.cooldown.as_mut() {
                cooldown.remaining = remaining;
            }
        }
        Command::EndCooldown => {
            if world.wave.cooldown.take().is_some() {
                out_events.push(Event::CooldownEnded);
            }
        }
        Command::AnnounceBossWave { wave } => {
            world.wave.boss_announced = Some(wave);
            out_events.push(Event::BossWaveAnnounced { wave });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::{AmmoReserve, MagazineStatus, WaveStatus, World, WorldSettings};
    use horde_core::{EnemyId, EnemyKind, PickupId, PickupKind, Vec3, WeaponKind};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides the active tunable parameters.
    #[must_use]
    pub fn settings(world: &World) -> WorldSettings {
        world.settings
    }

    /// Multiplier currently applied to real time.
    #[must_use]
    pub fn time_scale(world: &World) -> f32 {
        world.time_scale
    }

    /// Total real and simulated time elapsed since the world was created.
    #[must_use]
    pub fn clock(world: &World) -> (Duration, Duration) {
        (world.real_elapsed, world.simulated_elapsed)
    }

    /// Reports whether the handle refers to an enemy that is alive.
    #[must_use]
    pub fn is_alive(world: &World, enemy: EnemyId) -> bool {
        world.enemies.get(enemy).is_some_and(|enemy| enemy.is_alive())
    }

    /// Lists handles of every living enemy in ascending order.
    #[must_use]
    pub fn live_enemies(world: &World) -> Vec<EnemyId> {
        world
            .enemies
            .iter()
            .filter(|(_, enemy)| enemy.is_alive())
            .map(|(id, _)| id)
            .collect()
    }

    /// Captures a read-only view of every enemy in the arena, corpses included.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        let snapshots = world
            .enemies
            .iter()
            .map(|(id, enemy)| EnemySnapshot {
                id,
                kind: enemy.kind,
                position: enemy.position,
                health: enemy.health,
                max_health: enemy.max_health,
                alive: enemy.is_alive(),
            })
            .collect();
        EnemyView { snapshots }
    }

    /// Lists pickups waiting to be collected in identifier order.
    #[must_use]
    pub fn pickups(world: &World) -> Vec<PickupSnapshot> {
        world
            .pickups
            .iter()
            .map(|(id, pickup)| PickupSnapshot {
                id: *id,
                kind: pickup.kind,
                amount: pickup.amount,
                position: pickup.position,
            })
            .collect()
    }

    /// Captures the player's health state.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        PlayerSnapshot {
            health: world.player.health,
            max_health: world.player.max_health,
            dead: world.player.dead,
        }
    }

    /// Rounds held in reserve.
    #[must_use]
    pub fn ammo(world: &World) -> AmmoReserve {
        world.ammo
    }

    /// Magazine of the provided weapon.
    #[must_use]
    pub fn magazine(world: &World, weapon: WeaponKind) -> MagazineStatus {
        world.weapon(weapon).status()
    }

    /// Wave bookkeeping for presentation.
    #[must_use]
    pub fn wave_status(world: &World) -> WaveStatus {
        world.wave
    }

    /// Read-only snapshot describing all enemies in the arena.
    #[derive(Clone, Debug, Default)]
    pub struct EnemyView {
        snapshots: Vec<EnemySnapshot>,
    }

    impl EnemyView {
        /// Iterator over the captured snapshots in slot order.
        pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
            self.snapshots.iter()
        }

        /// Consumes the view, yielding the underlying snapshots.
        #[must_use]
        pub fn into_vec(self) -> Vec<EnemySnapshot> {
            self.snapshots
        }
    }

    /// Immutable representation of a single enemy.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct EnemySnapshot {
        /// Handle of the enemy.
        pub id: EnemyId,
        /// Category of the enemy.
        pub kind: EnemyKind,
        /// Spawn position of the enemy.
        pub position: Vec3,
        /// Health left.
        pub health: f32,
        /// Health the enemy spawned with.
        pub max_health: f32,
        /// Whether the enemy is still alive.
        pub alive: bool,
    }

    /// Immutable representation of a pickup.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct PickupSnapshot {
        /// Identifier of the pickup.
        pub id: PickupId,
        /// Category of the pickup.
        pub kind: PickupKind,
        /// Rounds granted on collection.
        pub amount: u32,
        /// Position of the pickup.
        pub position: Vec3,
    }

    /// Immutable representation of the player's health.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct PlayerSnapshot {
        /// Health left.
        pub health: f32,
        /// Maximum health.
        pub max_health: f32,
        /// Whether the player died.
        pub dead: bool,
    }
}

fn is_positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

fn scale_duration(dt: Duration, scale: f32) -> Duration {
    if scale == 1.0 {
        return dt;
    }
    Duration::try_from_secs_f64(dt.as_secs_f64() * f64::from(scale)).unwrap_or(Duration::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use horde_core::{EnemyKind, EnemyTemplate};

    fn spawn(world: &mut World, health: f32) -> EnemyId {
        let mut events = Vec::new();
        apply(
            world,
            Command::SpawnEnemy {
                kind: EnemyKind::Regular,
                template: EnemyTemplate::new(health),
                position: Vec3::new(1.0, 0.0, 2.0),
            },
            &mut events,
        );
        match events.as_slice() {
            [Event::EnemySpawned { enemy, .. }] => *enemy,
            other => panic!("unexpected events: {other:?}"),
        }
    }

    #[test]
    fn tick_reports_real_and_scaled_time() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(&mut world, Command::SetTimeScale { scale: 0.5 }, &mut events);
        events.clear();

        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_secs(2),
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::TimeAdvanced {
                real: Duration::from_secs(2),
                simulated: Duration::from_secs(1),
            }]
        );
    }

    #[test]
    fn invalid_time_scale_is_sanitized() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(&mut world, Command::SetTimeScale { scale: -3.0 }, &mut events);
        assert_eq!(query::time_scale(&world), 0.0);
        apply(
            &mut world,
            Command::SetTimeScale { scale: f32::NAN },
            &mut events,
        );
        assert_eq!(query::time_scale(&world), 1.0);
    }

    #[test]
    fn lethal_damage_kills_and_corpse_expires_in_real_time() {
        let mut world = World::new();
        let enemy = spawn(&mut world, 30.0);
        let mut events = Vec::new();
        apply(&mut world, Command::SetTimeScale { scale: 0.0 }, &mut events);
        events.clear();

        apply(
            &mut world,
            Command::DamageEnemy { enemy, amount: 45.0 },
            &mut events,
        );
        assert_eq!(
            events,
            vec![
                Event::EnemyDamaged {
                    enemy,
                    remaining: 0.0
                },
                Event::EnemyDied { enemy },
            ]
        );
        assert!(!query::is_alive(&world, enemy));
        assert!(query::live_enemies(&world).is_empty());

        events.clear();
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_secs(2),
            },
            &mut events,
        );
        assert!(events.contains(&Event::EnemyDespawned { enemy }));
        assert!(query::enemy_view(&world).into_vec().is_empty());
    }

    #[test]
    fn damage_to_dead_or_stale_enemies_is_ignored() {
        let mut world = World::new();
        let enemy = spawn(&mut world, 10.0);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::DamageEnemy { enemy, amount: 10.0 },
            &mut events,
        );
        events.clear();

        apply(
            &mut world,
            Command::DamageEnemy { enemy, amount: 10.0 },
            &mut events,
        );
        apply(&mut world, Command::DespawnEnemy { enemy }, &mut events);
        assert_eq!(events, vec![Event::EnemyDespawned { enemy }]);

        events.clear();
        apply(
            &mut world,
            Command::DamageEnemy { enemy, amount: 10.0 },
            &mut events,
        );
        apply(&mut world, Command::DespawnEnemy { enemy }, &mut events);
        assert!(events.is_empty());
    }

    #[test]
    fn player_damage_respects_cooldown_and_death() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::DamagePlayer { amount: 60.0 },
            &mut events,
        );
        apply(
            &mut world,
            Command::DamagePlayer { amount: 60.0 },
            &mut events,
        );
        assert_eq!(events, vec![Event::PlayerDamaged { health: 40.0 }]);

        events.clear();
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(50),
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::DamagePlayer { amount: 60.0 },
            &mut events,
        );
        assert!(events.contains(&Event::PlayerDamaged { health: 0.0 }));
        assert!(events.contains(&Event::PlayerDied));
        assert!(query::player(&world).dead);

        events.clear();
        apply(
            &mut world,
            Command::HealPlayer { amount: 10.0 },
            &mut events,
        );
        assert!(events.is_empty(), "dead players cannot be healed");
    }

    #[test]
    fn collected_pickups_fill_the_matching_reserve() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SpawnPickup {
                kind: PickupKind::PistolAmmo,
                amount: 24,
                position: Vec3::ZERO,
            },
            &mut events,
        );
        let pickup = query::pickups(&world)[0].id;
        events.clear();

        apply(&mut world, Command::CollectPickup { pickup }, &mut events);
        apply(&mut world, Command::CollectPickup { pickup }, &mut events);

        assert_eq!(
            events,
            vec![Event::PickupCollected {
                pickup,
                kind: PickupKind::PistolAmmo,
                amount: 24,
            }]
        );
        assert_eq!(
            query::ammo(&world),
            AmmoReserve {
                rifle: 0,
                pistol: 24
            }
        );
    }

    fn fire(world: &mut World, weapon: WeaponKind, target: Option<EnemyId>) -> Vec<Event> {
        let mut events = Vec::new();
        apply(world, Command::FireWeapon { weapon, target }, &mut events);
        events
    }

    #[test]
    fn reload_is_clamped_to_the_reserve() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::ConfigureWeapon {
                weapon: WeaponKind::Rifle,
                spec: WeaponSpec::new(30, Duration::from_secs(1), 20.0),
                reserve: 10,
            },
            &mut events,
        );
        for _ in 0..25 {
            let _ = fire(&mut world, WeaponKind::Rifle, None);
        }
        assert_eq!(query::magazine(&world, WeaponKind::Rifle).bullets_left, 5);

        apply(
            &mut world,
            Command::ReloadWeapon {
                weapon: WeaponKind::Rifle,
            },
            &mut events,
        );
        assert_eq!(events, vec![Event::ReloadStarted { weapon: WeaponKind::Rifle }]);
        events.clear();

        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_secs(1),
            },
            &mut events,
        );
        assert!(events.contains(&Event::WeaponReloaded {
            weapon: WeaponKind::Rifle,
            bullets_left: 15,
            reserve: 0,
        }));
        assert_eq!(
            query::magazine(&world, WeaponKind::Rifle),
            MagazineStatus {
                bullets_left: 15,
                magazine_size: 30,
                reloading: None,
            }
        );
        assert_eq!(query::ammo(&world).rifle, 0);
    }

    #[test]
    fn empty_magazine_refuses_to_fire_until_reloaded() {
        let mut world = World::new();
        let enemy = spawn(&mut world, 100.0);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::ConfigureWeapon {
                weapon: WeaponKind::Pistol,
                spec: WeaponSpec::new(2, Duration::from_millis(500), 30.0),
                reserve: 5,
            },
            &mut events,
        );

        let shot = fire(&mut world, WeaponKind::Pistol, Some(enemy));
        assert_eq!(
            shot,
            vec![
                Event::WeaponFired {
                    weapon: WeaponKind::Pistol,
                    bullets_left: 1,
                },
                Event::EnemyDamaged {
                    enemy,
                    remaining: 70.0,
                },
            ]
        );
        let _ = fire(&mut world, WeaponKind::Pistol, Some(enemy));
        assert_eq!(
            fire(&mut world, WeaponKind::Pistol, Some(enemy)),
            vec![Event::WeaponDryFired {
                weapon: WeaponKind::Pistol
            }]
        );

        apply(
            &mut world,
            Command::ReloadWeapon {
                weapon: WeaponKind::Pistol,
            },
            &mut events,
        );
        assert!(
            fire(&mut world, WeaponKind::Pistol, Some(enemy)).is_empty(),
            "no shots while reloading"
        );

        events.clear();
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(500),
            },
            &mut events,
        );
        assert!(events.contains(&Event::WeaponReloaded {
            weapon: WeaponKind::Pistol,
            bullets_left: 2,
            reserve: 3,
        }));
        assert_eq!(query::ammo(&world).pistol, 3);
        assert_eq!(query::magazine(&world, WeaponKind::Rifle).bullets_left, 30);
    }

    #[test]
    fn full_magazine_is_not_reloaded() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::ReloadWeapon {
                weapon: WeaponKind::Rifle,
            },
            &mut events,
        );
        assert!(events.is_empty());
        assert_eq!(query::magazine(&world, WeaponKind::Rifle).reloading, None);
    }

    #[test]
    fn wave_bookkeeping_tracks_cooldown() {
        let mut world = World::new();
        let mut events = Vec::new();
        let wave = WaveNumber::new(3);
        apply(
            &mut world,
            Command::BeginCooldown {
                wave,
                duration: Duration::from_secs(10),
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::UpdateCooldown {
                remaining: Duration::from_millis(4_200),
            },
            &mut events,
        );

        let status = query::wave_status(&world);
        assert_eq!(
            status.cooldown,
            Some(CooldownStatus {
                wave,
                remaining: Duration::from_millis(4_200),
            })
        );

        apply(&mut world, Command::EndCooldown, &mut events);
        apply(&mut world, Command::EndCooldown, &mut events);
        assert_eq!(
            events
                .iter()
                .filter(|event| matches!(event, Event::CooldownEnded))
                .count(),
            1
        );
    }
}
