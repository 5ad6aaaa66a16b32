#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Game-session orchestration for Horde Survival.
//!
//! A [`Session`] owns the world and every pure system. External commands are
//! applied to the world and the resulting events are pumped through the
//! population tracker, the victory coordinator and the wave scheduler until
//! no system has anything left to say. The session also owns the lose flow:
//! when the player dies the simulation freezes and the reached wave is
//! offered to the best-wave store.

mod store;

use std::time::Duration;

use horde_core::{Command, Event, PopulationSignal, WaveNumber};
use horde_system_escalation::{Config as EscalationConfig, EscalationPolicy};
use horde_system_placement::{Config as PlacementConfig, SpawnPlacementPolicy};
use horde_system_population::PopulationTracker;
use horde_system_victory::{Config as VictoryConfig, VictoryCoordinator};
use horde_system_waves::{Config as WaveConfig, WaveScheduler};
use horde_world::{self as world, query, World, WorldSettings};

pub use store::{BestWaveStore, MemoryStore, StoreError};

/// Aggregated configuration of every system driven by the session.
#[derive(Clone, Debug, Default)]
pub struct SessionConfig {
    /// Tuning applied to the world when the session boots.
    pub world: WorldSettings,
    /// Wave cadence, cooldown and templates.
    pub waves: WaveConfig,
    /// Spawn anchors and offsets.
    pub placement: PlacementConfig,
    /// Difficulty growth and special waves.
    pub escalation: EscalationConfig,
    /// Clearance debounce.
    pub victory: VictoryConfig,
}

/// Result of the session so far.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The player is still alive.
    InProgress,
    /// The player died; the scene should transition to the main menu.
    Defeated {
        /// Wave that was running when the player died.
        wave: WaveNumber,
        /// Best wave on record after the defeat was saved.
        best: u32,
    },
}

/// Owner of the world and all systems of a single game.
#[derive(Debug)]
pub struct Session {
    world: World,
    settings: WorldSettings,
    tracker: PopulationTracker,
    victory: VictoryCoordinator,
    waves: WaveScheduler,
    store: Option<Box<dyn BestWaveStore>>,
    best_wave: u32,
    outcome: Outcome,
    booted: bool,
    event_log: Vec<Event>,
}

impl Session {
    /// Creates a session around the provided world.
    #[must_use]
    pub fn new(world: World, config: SessionConfig, store: Option<Box<dyn BestWaveStore>>) -> Self {
        let waves = WaveScheduler::new(
            config.waves,
            SpawnPlacementPolicy::new(config.placement),
            EscalationPolicy::new(config.escalation),
        );

        Self {
            world,
            settings: config.world,
            tracker: PopulationTracker::new(),
            victory: VictoryCoordinator::new(config.victory),
            waves,
            store,
            best_wave: 0,
            outcome: Outcome::InProgress,
            booted: false,
            event_log: Vec::new(),
        }
    }

    /// Configures the world, loads the best wave and starts wave one.
    pub fn boot(&mut self) {
        if self.booted {
            return;
        }
        self.booted = true;

        log::info!("{}", query::welcome_banner(&self.world));
        self.pump(self.settings.to_commands());
        self.tracker.resync(query::live_enemies(&self.world));
        self.best_wave = self.load_best_wave();

        let mut commands = Vec::new();
        self.waves.begin(&mut commands);
        self.pump(commands);
    }

    /// Applies an external command and runs every system until quiescent.
    pub fn submit(&mut self, command: Command) {
        if self.is_over() {
            log::debug!("ignoring {command:?} after defeat");
            return;
        }
        self.pump(vec![command]);
    }

    /// Advances the clocks by the provided real elapsed time.
    pub fn advance(&mut self, dt: Duration) {
        self.submit(Command::Tick { dt });
    }

    /// Stores the score if it beats the best wave on record.
    ///
    /// Returns the best wave after the attempt. Without a store the attempt
    /// is logged and nothing is saved.
    pub fn try_record_best_wave(&mut self, score: u32) -> u32 {
        let Some(store) = self.store.as_mut() else {
            log::warn!("no best wave store available, wave {score} not saved");
            return self.best_wave;
        };

        let stored = match store.load() {
            Ok(stored) => stored,
            Err(error) => {
                log::warn!("failed to read best wave: {error}");
                self.best_wave
            }
        };
        self.best_wave = stored;

        if score > stored {
            match store.save(score) {
                Ok(()) => {
                    log::info!("new best wave {score}");
                    self.best_wave = score;
                }
                Err(error) => log::warn!("failed to save best wave {score}: {error}"),
            }
        }
        self.best_wave
    }

    /// Read-only access to the world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Read-only access to the wave scheduler.
    #[must_use]
    pub fn waves(&self) -> &WaveScheduler {
        &self.waves
    }

    /// Number of enemies the tracker considers alive.
    #[must_use]
    pub fn live_population(&self) -> u32 {
        self.tracker.live()
    }

    /// Best wave on record as last loaded or saved.
    #[must_use]
    pub fn best_wave(&self) -> u32 {
        self.best_wave
    }

    /// Result of the session so far.
    #[must_use]
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Every event broadcast by the world since the session was created.
    #[must_use]
    pub fn event_log(&self) -> &[Event] {
        &self.event_log
    }

    fn is_over(&self) -> bool {
        matches!(self.outcome, Outcome::Defeated { .. })
    }

    fn load_best_wave(&self) -> u32 {
        let Some(store) = self.store.as_ref() else {
            log::warn!("no best wave store available, best wave defaults to 0");
            return 0;
        };
        match store.load() {
            Ok(best) => best,
            Err(error) => {
                log::warn!("failed to read best wave: {error}");
                0
            }
        }
    }

    fn pump(&mut self, commands: Vec<Command>) {
        let mut events = Vec::new();
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }

        let mut signals: Vec<PopulationSignal> = Vec::new();
        while !events.is_empty() {
            let mut follow_up = Vec::new();

            signals.clear();
            self.tracker.handle(&events, &mut signals);
            self.victory.handle(&signals, &mut follow_up);
            self.waves.handle(&events, &mut follow_up);
            self.observe_defeat(&events, &mut follow_up);

            self.event_log.append(&mut events);
            for command in follow_up {
                world::apply(&mut self.world, command, &mut events);
            }
        }
    }

    fn observe_defeat(&mut self, events: &[Event], out: &mut Vec<Command>) {
        if self.is_over() || !events.contains(&Event::PlayerDied) {
            return;
        }

        let wave = self.waves.current_wave().unwrap_or(WaveNumber::FIRST);
        log::info!("player died during wave {}", wave.get());
        out.push(Command::SetTimeScale { scale: 0.0 });
        let best = self.try_record_best_wave(wave.get());
        self.outcome = Outcome::Defeated { wave, best };
    }
}
