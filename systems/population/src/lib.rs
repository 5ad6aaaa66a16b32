#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Live hostile population tracking.
//!
//! The tracker keeps the set of enemies that are alive and translates world
//! events into ordered [`PopulationSignal`]s. Membership is keyed by
//! [`EnemyId`], so repeated death or despawn notifications for the same
//! enemy never drive the count below its true value.

use std::collections::BTreeSet;

use horde_core::{EnemyId, Event, PopulationSignal};

/// Pure system that maintains the live hostile population.
#[derive(Debug, Default)]
pub struct PopulationTracker {
    live: BTreeSet<EnemyId>,
}

impl PopulationTracker {
    /// Creates a tracker with an empty population.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the enemy to the live population.
    ///
    /// Returns `None` when the enemy was already registered.
    pub fn register(&mut self, enemy: EnemyId) -> Option<PopulationSignal> {
        if !self.live.insert(enemy) {
            log::debug!("ignoring repeated registration of {enemy:?}");
            return None;
        }
        Some(PopulationSignal::Registered {
            enemy,
            live: self.live(),
        })
    }

    /// Removes the enemy from the live population.
    ///
    /// Returns `None` when the enemy was not live, which makes a second
    /// unregistration of the same enemy a no-op.
    pub fn unregister(&mut self, enemy: EnemyId) -> Option<PopulationSignal> {
        if !self.live.remove(&enemy) {
            return None;
        }
        Some(PopulationSignal::Unregistered {
            enemy,
            live: self.live(),
        })
    }

    /// Consumes world events and emits population signals in event order.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<PopulationSignal>) {
        for event in events {
            let signal = match event {
                Event::EnemySpawned { enemy, .. } => self.register(*enemy),
                Event::EnemyDied { enemy } | Event::EnemyDespawned { enemy } => {
                    self.unregister(*enemy)
                }
                Event::TimeAdvanced { real, .. } if !real.is_zero() => {
                    Some(PopulationSignal::RealTimeElapsed { dt: *real })
                }
                _ => None,
            };
            out.extend(signal);
        }
    }

    /// Replaces the live population with an authoritative listing.
    pub fn resync<I>(&mut self, live_enemies: I)
    where
        I: IntoIterator<Item = EnemyId>,
    {
        self.live = live_enemies.into_iter().collect();
        log::debug!("population resynchronised to {}", self.live.len());
    }

    /// Number of enemies currently alive.
    #[must_use]
    pub fn live(&self) -> u32 {
        u32::try_from(self.live.len()).unwrap_or(u32::MAX)
    }

    /// Reports whether the enemy is part of the live population.
    #[must_use]
    pub fn contains(&self, enemy: EnemyId) -> bool {
        self.live.contains(&enemy)
    }
}
