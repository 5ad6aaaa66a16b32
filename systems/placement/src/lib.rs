#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Spawn placement around configured anchors.
//!
//! Each spawn slot resolves to an anchor, either cycling through the anchors
//! in order or picking one uniformly, and a random horizontal offset inside
//! independent X and Z bounds. The vertical coordinate of the anchor is kept.

use horde_core::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

const DEFAULT_SEED: u64 = 0x6a09_e667_f3bc_c908;

/// Configured spatial point used as a base for spawn placement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnAnchor {
    index: usize,
    position: Vec3,
}

impl SpawnAnchor {
    /// Position of the anchor in world space.
    #[must_use]
    pub const fn position(&self) -> Vec3 {
        self.position
    }

    /// Position of the anchor in the configured sequence.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }
}

/// Strategy used to choose the anchor of a slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorSelection {
    /// Slot `n` uses anchor `n % anchors`.
    #[default]
    RoundRobin,
    /// Anchors are chosen uniformly at random.
    Random,
}

/// Inclusive range of a random offset along one axis.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OffsetBounds {
    /// Lower bound of the offset.
    pub min: f32,
    /// Upper bound of the offset.
    pub max: f32,
}

impl OffsetBounds {
    /// Creates bounds, swapping the limits when they are inverted.
    #[must_use]
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }.normalised()
    }

    /// Bounds that never move the anchor.
    #[must_use]
    pub const fn zero() -> Self {
        Self { min: 0.0, max: 0.0 }
    }

    fn normalised(self) -> Self {
        let min = finite_or_zero(self.min);
        let max = finite_or_zero(self.max);
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    fn sample(self, rng: &mut ChaCha8Rng) -> f32 {
        if self.min < self.max {
            rng.gen_range(self.min..=self.max)
        } else {
            self.min
        }
    }
}

fn finite_or_zero(value: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Configuration parameters required to construct the placement policy.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    anchors: Vec<Vec3>,
    default_anchor: Vec3,
    selection: AnchorSelection,
    offset_x: OffsetBounds,
    offset_z: OffsetBounds,
    seed: u64,
}

impl Config {
    /// Creates a configuration with the provided anchors and offset bounds.
    #[must_use]
    pub fn new(
        anchors: Vec<Vec3>,
        selection: AnchorSelection,
        offset_x: OffsetBounds,
        offset_z: OffsetBounds,
        seed: u64,
    ) -> Self {
        Self {
            anchors,
            default_anchor: Vec3::ZERO,
            selection,
            offset_x: offset_x.normalised(),
            offset_z: offset_z.normalised(),
            seed,
        }
    }

    /// Sets the anchor used when no anchors are configured.
    #[must_use]
    pub fn with_default_anchor(mut self, origin: Vec3) -> Self {
        self.default_anchor = origin;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(
            Vec::new(),
            AnchorSelection::RoundRobin,
            OffsetBounds::new(-1.0, 1.0),
            OffsetBounds::new(-1.0, 10.0),
            DEFAULT_SEED,
        )
    }
}

/// Resolved location of a spawn slot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    /// Anchor the slot was placed around.
    pub anchor: SpawnAnchor,
    /// Final spawn position.
    pub position: Vec3,
}

/// Deterministic policy choosing spawn positions.
#[derive(Debug)]
pub struct SpawnPlacementPolicy {
    anchors: Vec<SpawnAnchor>,
    selection: AnchorSelection,
    offset_x: OffsetBounds,
    offset_z: OffsetBounds,
    rng: ChaCha8Rng,
}

impl SpawnPlacementPolicy {
    /// Creates a new policy using the supplied configuration.
    ///
    /// An empty anchor list falls back to the configured default anchor.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let mut positions = config.anchors;
        if positions.is_empty() {
            log::warn!(
                "no spawn anchors configured, falling back to {:?}",
                config.default_anchor
            );
            positions.push(config.default_anchor);
        }

        let anchors = positions
            .into_iter()
            .enumerate()
            .map(|(index, position)| SpawnAnchor { index, position })
            .collect();

        Self {
            anchors,
            selection: config.selection,
            offset_x: config.offset_x,
            offset_z: config.offset_z,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
        }
    }

    /// Anchors available to the policy; never empty.
    #[must_use]
    pub fn anchors(&self) -> &[SpawnAnchor] {
        &self.anchors
    }

    /// Resolves the position of the provided spawn slot.
    pub fn next_position(&mut self, slot: u32) -> Placement {
        let index = match self.selection {
            AnchorSelection::RoundRobin => slot as usize % self.anchors.len(),
            AnchorSelection::Random => self.rng.gen_range(0..self.anchors.len()),
        };
        let anchor = self.anchors[index];
        let dx = self.offset_x.sample(&mut self.rng);
        let dz = self.offset_z.sample(&mut self.rng);

        Placement {
            anchor,
            position: anchor.position + Vec3::new(dx, 0.0, dz),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchors() -> Vec<Vec3> {
        vec![
            Vec3::new(0.0, 1.5, 0.0),
            Vec3::new(10.0, 2.0, 0.0),
            Vec3::new(0.0, 0.5, 10.0),
        ]
    }

    #[test]
    fn round_robin_visits_anchors_cyclically() {
        let mut policy = SpawnPlacementPolicy::new(Config::new(
            anchors(),
            AnchorSelection::RoundRobin,
            OffsetBounds::new(-1.0, 1.0),
            OffsetBounds::new(-1.0, 10.0),
            7,
        ));

        let visited: Vec<usize> = (0..7)
            .map(|slot| policy.next_position(slot).anchor.index())
            .collect();
        assert_eq!(visited, vec![0, 1, 2, 0, 1, 2, 0]);
    }

    #[test]
    fn offsets_stay_within_bounds_and_keep_height() {
        let mut policy = SpawnPlacementPolicy::new(Config::new(
            anchors(),
            AnchorSelection::Random,
            OffsetBounds::new(-1.0, 1.0),
            OffsetBounds::new(-1.0, 10.0),
            42,
        ));

        for slot in 0..200 {
            let placement = policy.next_position(slot);
            let delta = placement.position - placement.anchor.position();
            assert!((-1.001..=1.001).contains(&delta.x), "x offset {delta:?}");
            assert!((-1.001..=10.001).contains(&delta.z), "z offset {delta:?}");
            assert_eq!(placement.position.y, placement.anchor.position().y);
        }
    }

    #[test]
    fn zero_width_bounds_produce_anchor_position() {
        let mut policy = SpawnPlacementPolicy::new(Config::new(
            anchors(),
            AnchorSelection::RoundRobin,
            OffsetBounds::zero(),
            OffsetBounds::new(3.0, 3.0),
            1,
        ));
        let placement = policy.next_position(1);
        assert_eq!(placement.position, Vec3::new(10.0, 2.0, 3.0));
    }

    #[test]
    fn inverted_bounds_are_normalised() {
        let bounds = OffsetBounds::new(5.0, -2.0);
        assert_eq!(bounds, OffsetBounds { min: -2.0, max: 5.0 });
    }

    #[test]
    fn missing_anchors_fall_back_to_default() {
        let origin = Vec3::new(4.0, 0.0, -4.0);
        let mut policy = SpawnPlacementPolicy::new(
            Config::new(
                Vec::new(),
                AnchorSelection::RoundRobin,
                OffsetBounds::zero(),
                OffsetBounds::zero(),
                1,
            )
            .with_default_anchor(origin),
        );

        assert_eq!(policy.anchors().len(), 1);
        assert_eq!(policy.next_position(3).position, origin);
    }

    #[test]
    fn identical_seeds_produce_identical_positions() {
        let build = || {
            SpawnPlacementPolicy::new(Config::new(
                anchors(),
                AnchorSelection::Random,
                OffsetBounds::new(-1.0, 1.0),
                OffsetBounds::new(-1.0, 10.0),
                0x1234,
            ))
        };
        let mut first = build();
        let mut second = build();

        for slot in 0..32 {
            assert_eq!(first.next_position(slot), second.next_position(slot));
        }
    }
}
