#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wave scheduling state machine.
//!
//! A session alternates between two phases. While spawning, the scheduler
//! issues one slot per `spawn_delay` of simulated time until the wave quota
//! is exhausted, then waits for the population to be declared cleared. The
//! cooldown that follows is counted down in real time so it keeps running
//! while gameplay is paused; when it expires the next, escalated wave starts.

use std::time::Duration;

use horde_core::{Command, EnemyKind, EnemyTemplate, Event, WaveNumber};
use horde_system_escalation::EscalationPolicy;
use horde_system_placement::SpawnPlacementPolicy;
use thiserror::Error;

const DEFAULT_INITIAL_QUOTA: u32 = 5;
const DEFAULT_SPAWN_DELAY: Duration = Duration::from_millis(500);
const DEFAULT_COOLDOWN: Duration = Duration::from_secs(10);
const DEFAULT_ZOMBIE_HEALTH: f32 = 100.0;
const DEFAULT_PICKUP_AMOUNT: u32 = 30;

/// Errors raised when scheduler parameters are invalid.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// A wave must contain at least one slot.
    #[error("initial quota must be at least one")]
    ZeroQuota,
    /// Slots must be separated by a positive delay.
    #[error("spawn delay must be positive")]
    ZeroSpawnDelay,
    /// Enemy templates must spawn with positive, finite health.
    #[error("enemy template health must be positive, got {0}")]
    InvalidHealth(f32),
}

/// Configuration parameters required to construct the wave scheduler.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    initial_quota: u32,
    spawn_delay: Duration,
    cooldown: Duration,
    regular: Option<EnemyTemplate>,
    boss: Option<EnemyTemplate>,
    pickup_amount: u32,
}

impl Config {
    /// Creates a validated scheduler configuration.
    ///
    /// Absent templates are accepted: the matching slots are skipped.
    pub fn new(
        initial_quota: u32,
        spawn_delay: Duration,
        cooldown: Duration,
        regular: Option<EnemyTemplate>,
        boss: Option<EnemyTemplate>,
    ) -> Result<Self, ConfigError> {
        if initial_quota == 0 {
            return Err(ConfigError::ZeroQuota);
        }
        if spawn_delay.is_zero() {
            return Err(ConfigError::ZeroSpawnDelay);
        }
        for template in [regular, boss].into_iter().flatten() {
            let health = template.max_health();
            if !health.is_finite() || health <= 0.0 {
                return Err(ConfigError::InvalidHealth(health));
            }
        }

        Ok(Self {
            initial_quota,
            spawn_delay,
            cooldown,
            regular,
            boss,
            pickup_amount: DEFAULT_PICKUP_AMOUNT,
        })
    }

    /// Sets the number of rounds granted by reward pickups.
    #[must_use]
    pub const fn with_pickup_amount(mut self, amount: u32) -> Self {
        self.pickup_amount = amount;
        self
    }

    /// Quota of the first wave.
    #[must_use]
    pub const fn initial_quota(&self) -> u32 {
        self.initial_quota
    }

    /// Simulated time between two slots.
    #[must_use]
    pub const fn spawn_delay(&self) -> Duration {
        self.spawn_delay
    }

    /// Real time between clearance and the next wave.
    #[must_use]
    pub const fn cooldown(&self) -> Duration {
        self.cooldown
    }

    fn template(&self, kind: EnemyKind) -> Option<EnemyTemplate> {
        match kind {
            EnemyKind::Regular => self.regular,
            EnemyKind::Boss => self.boss,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_quota: DEFAULT_INITIAL_QUOTA,
            spawn_delay: DEFAULT_SPAWN_DELAY,
            cooldown: DEFAULT_COOLDOWN,
            regular: Some(EnemyTemplate::new(DEFAULT_ZOMBIE_HEALTH)),
            boss: None,
            pickup_amount: DEFAULT_PICKUP_AMOUNT,
        }
    }
}

/// One discrete batch of hostile entities.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Wave {
    /// One-based number of the wave.
    pub number: WaveNumber,
    /// Number of slots the wave issues.
    pub quota: u32,
    /// Slots issued so far, skipped slots included; never exceeds `quota`.
    pub spawned: u32,
    /// Whether the final slot spawns the boss template.
    pub boss: bool,
}

impl Wave {
    fn remaining_slots(&self) -> u32 {
        self.quota - self.spawned
    }
}

/// Rest interval between clearance and the next wave.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CooldownState {
    /// Whether the interval is running.
    pub active: bool,
    /// Real time left; clamped at zero.
    pub remaining: Duration,
}

/// Phase of the active cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Slots are being issued or the wave waits for clearance.
    Spawning,
    /// The wave was cleared and the rest interval runs.
    Cooldown,
}

#[derive(Debug)]
struct Cycle {
    wave: Wave,
    slot_timer: Duration,
    issued: u32,
    cleared_observed: bool,
    cooldown: CooldownState,
}

/// Pure system that drives wave spawning and cooldowns.
#[derive(Debug)]
pub struct WaveScheduler {
    config: Config,
    placement: SpawnPlacementPolicy,
    escalation: EscalationPolicy,
    cycle: Option<Cycle>,
    pickups_placed: u32,
}

impl WaveScheduler {
    /// Creates a new scheduler using the supplied configuration and policies.
    #[must_use]
    pub fn new(
        config: Config,
        placement: SpawnPlacementPolicy,
        escalation: EscalationPolicy,
    ) -> Self {
        Self {
            config,
            placement,
            escalation,
            cycle: None,
            pickups_placed: 0,
        }
    }

    /// Starts the first wave. Repeated calls are ignored.
    pub fn begin(&mut self, out: &mut Vec<Command>) {
        if self.cycle.is_some() {
            log::debug!("wave scheduler already running");
            return;
        }
        self.start_wave(WaveNumber::FIRST, self.config.initial_quota, out);
    }

    /// Number of the wave currently running or most recently cleared.
    #[must_use]
    pub fn current_wave(&self) -> Option<WaveNumber> {
        self.cycle.as_ref().map(|cycle| cycle.wave.number)
    }

    /// Snapshot of the current wave.
    #[must_use]
    pub fn wave(&self) -> Option<Wave> {
        self.cycle.as_ref().map(|cycle| cycle.wave)
    }

    /// Phase of the active cycle; `None` before [`WaveScheduler::begin`].
    #[must_use]
    pub fn phase(&self) -> Option<Phase> {
        self.cycle.as_ref().map(|cycle| {
            if cycle.cooldown.active {
                Phase::Cooldown
            } else {
                Phase::Spawning
            }
        })
    }

    /// State of the rest interval.
    #[must_use]
    pub fn cooldown(&self) -> CooldownState {
        self.cycle
            .as_ref()
            .map(|cycle| cycle.cooldown)
            .unwrap_or_default()
    }

    /// Consumes world events in order and emits wave commands.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::TimeAdvanced { real, simulated } => self.advance(*real, *simulated, out),
                Event::EnemySpawned { .. } => {
                    if let Some(cycle) = self.cycle.as_mut() {
                        cycle.cleared_observed = false;
                    }
                }
                Event::PopulationCleared => self.observe_clearance(out),
                _ => {}
            }
        }
    }

    fn advance(&mut self, real: Duration, simulated: Duration, out: &mut Vec<Command>) {
        let Some(cycle) = self.cycle.as_mut() else {
            return;
        };

        if cycle.cooldown.active {
            cycle.cooldown.remaining = cycle.cooldown.remaining.saturating_sub(real);
            if cycle.cooldown.remaining.is_zero() {
                self.finish_cooldown(out);
            } else {
                out.push(Command::UpdateCooldown {
                    remaining: cycle.cooldown.remaining,
                });
            }
            return;
        }

        if cycle.wave.remaining_slots() > 0 {
            cycle.slot_timer = cycle.slot_timer.saturating_add(simulated);
            self.issue_due_slots(out);
        }
    }

    fn observe_clearance(&mut self, out: &mut Vec<Command>) {
        let Some(cycle) = self.cycle.as_mut() else {
            return;
        };
        if cycle.cooldown.active {
            return;
        }

        if cycle.wave.remaining_slots() == 0 {
            self.begin_cooldown(out);
        } else {
            log::debug!(
                "population cleared with {} slots left in wave {}",
                cycle.wave.remaining_slots(),
                cycle.wave.number.get()
            );
            cycle.cleared_observed = true;
        }
    }

    fn issue_due_slots(&mut self, out: &mut Vec<Command>) {
        let delay = self.config.spawn_delay;
        let mut exhausted = false;

        if let Some(cycle) = self.cycle.as_mut() {
            while cycle.wave.remaining_slots() > 0 && cycle.slot_timer >= delay {
                cycle.slot_timer -= delay;
                let slot = cycle.wave.spawned;
                let kind = if cycle.wave.boss && cycle.wave.remaining_slots() == 1 {
                    EnemyKind::Boss
                } else {
                    EnemyKind::Regular
                };
                cycle.wave.spawned += 1;

                let Some(template) = self.config.template(kind) else {
                    log::warn!(
                        "no {kind:?} template configured, skipping slot {slot} of wave {}",
                        cycle.wave.number.get()
                    );
                    continue;
                };

                let placement = self.placement.next_position(slot);
                cycle.issued += 1;
                cycle.cleared_observed = false;
                out.push(Command::SpawnEnemy {
                    kind,
                    template,
                    position: placement.position,
                });
            }

            if cycle.wave.remaining_slots() == 0 {
                cycle.slot_timer = Duration::ZERO;
                exhausted = cycle.cleared_observed || cycle.issued == 0;
            }
        }

        if exhausted {
            self.begin_cooldown(out);
        }
    }

    fn start_wave(&mut self, number: WaveNumber, quota: u32, out: &mut Vec<Command>) {
        let boss = self.escalation.should_spawn_boss(number);
        let wave = Wave {
            number,
            quota: quota.max(1),
            spawned: 0,
            boss,
        };
        log::info!(
            "wave {} started with {} enemies{}",
            number.get(),
            wave.quota,
            if boss { " including a boss" } else { "" }
        );
        out.push(Command::StartWave {
            wave: number,
            quota: wave.quota,
            boss,
        });

        self.cycle = Some(Cycle {
            wave,
            slot_timer: self.config.spawn_delay,
            issued: 0,
            cleared_observed: false,
            cooldown: CooldownState::default(),
        });
        self.issue_due_slots(out);
    }

    fn begin_cooldown(&mut self, out: &mut Vec<Command>) {
        let duration = self.config.cooldown;
        let Some(cycle) = self.cycle.as_mut() else {
            return;
        };
        let completed = cycle.wave.number;
        cycle.cooldown = CooldownState {
            active: true,
            remaining: duration,
        };
        cycle.cleared_observed = false;

        log::info!("wave {} cleared", completed.get());
        out.push(Command::BeginCooldown {
            wave: completed,
            duration,
        });

        if self.escalation.should_spawn_pickup(completed) {
            if let Some(kind) = self.escalation.pickup_kind(completed) {
                let placement = self.placement.next_position(self.pickups_placed);
                self.pickups_placed = self.pickups_placed.wrapping_add(1);
                out.push(Command::SpawnPickup {
                    kind,
                    amount: self.config.pickup_amount,
                    position: placement.position,
                });
            }
        }

        let upcoming = completed.next();
        if self.escalation.should_spawn_boss(upcoming) {
            out.push(Command::AnnounceBossWave { wave: upcoming });
        }
    }

    fn finish_cooldown(&mut self, out: &mut Vec<Command>) {
        let Some(cycle) = self.cycle.as_ref() else {
            return;
        };
        let completed = cycle.wave;
        out.push(Command::EndCooldown);

        let quota = self.escalation.next_quota(completed.quota);
        self.start_wave(completed.number.next(), quota, out);
    }
}
