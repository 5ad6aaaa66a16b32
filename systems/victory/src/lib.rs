#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Debounced detection of a cleared hostile population.
//!
//! A zero-crossing of the live population does not immediately count as a
//! victory: the coordinator waits for a short window of real time and only
//! declares the population cleared if no enemy registers in the meantime.

use std::time::Duration;

use horde_core::{Command, PopulationSignal};

const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(200);

/// Configuration parameters required to construct the victory coordinator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    debounce: Duration,
}

impl Config {
    /// Creates a configuration with the provided debounce window.
    #[must_use]
    pub const fn new(debounce: Duration) -> Self {
        Self { debounce }
    }

    /// Window of real time that must pass without registrations.
    #[must_use]
    pub const fn debounce(&self) -> Duration {
        self.debounce
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

/// States of the clearance check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VictoryState {
    /// Enemies are alive, or no population cycle has completed yet.
    Idle,
    /// Population reached zero and the debounce window is running.
    PendingCleared {
        /// Real time accumulated inside the window.
        elapsed: Duration,
    },
    /// Population was confirmed empty.
    Cleared,
}

/// Pure system that turns population signals into clearance declarations.
#[derive(Debug)]
pub struct VictoryCoordinator {
    debounce: Duration,
    state: VictoryState,
}

impl VictoryCoordinator {
    /// Creates a new coordinator using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            debounce: config.debounce,
            state: VictoryState::Idle,
        }
    }

    /// Current state of the clearance check.
    #[must_use]
    pub fn state(&self) -> VictoryState {
        self.state
    }

    /// Consumes population signals in order and emits clearance commands.
    pub fn handle(&mut self, signals: &[PopulationSignal], out: &mut Vec<Command>) {
        for signal in signals {
            match *signal {
                PopulationSignal::Registered { .. } => {
                    if self.state != VictoryState::Idle {
                        log::debug!("registration reset clearance check from {:?}", self.state);
                    }
                    self.state = VictoryState::Idle;
                }
                PopulationSignal::Unregistered { live, .. } => {
                    if live == 0 && self.state == VictoryState::Idle {
                        self.state = VictoryState::PendingCleared {
                            elapsed: Duration::ZERO,
                        };
                        self.settle(out);
                    }
                }
                PopulationSignal::RealTimeElapsed { dt } => {
                    if let VictoryState::PendingCleared { elapsed } = self.state {
                        self.state = VictoryState::PendingCleared {
                            elapsed: elapsed.saturating_add(dt),
                        };
                        self.settle(out);
                    }
                }
            }
        }
    }

    fn settle(&mut self, out: &mut Vec<Command>) {
        if let VictoryState::PendingCleared { elapsed } = self.state {
            if elapsed >= self.debounce {
                self.state = VictoryState::Cleared;
                log::debug!("population confirmed cleared");
                out.push(Command::DeclarePopulationCleared);
            }
        }
    }
}

impl Default for VictoryCoordinator {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
