//! Round configuration: quota, weighted spawn table, positional overrides.
//!
//! A round's composition is resolved one spawn at a time: an override pinned
//! to the spawn index wins outright; otherwise a uniform roll over the
//! cumulative weight breakpoints picks an archetype. Resolution is a pure
//! function of the config and the RNG.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::EnemyArchetype;
use crate::error::ConfigError;

/// One entry of the weighted spawn table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightedEntry {
    pub archetype: EnemyArchetype,
    /// Relative weight; zero entries are legal but never selected.
    pub weight: u32,
}

/// Pins a specific archetype to one index of the spawn sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnOverride {
    /// Spawn-sequence index this override applies to.
    pub position: u32,
    pub archetype: EnemyArchetype,
}

/// Timing and capacity parameters of the wave spawner.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SpawnerParams {
    /// Delay before the first wave (seconds).
    pub initial_delay_secs: f64,
    /// Minimum interval between spawns; also the capacity re-poll interval.
    pub min_spawn_interval_secs: f64,
    /// Delay between waves (seconds).
    pub wave_delay_secs: f64,
    /// Spawns attempted per wave.
    pub spawns_per_wave: u32,
    /// Live-population cap; -1 means unbounded.
    pub max_active: i32,
}

impl Default for SpawnerParams {
    fn default() -> Self {
        Self {
            initial_delay_secs: INITIAL_SPAWN_DELAY,
            min_spawn_interval_secs: MINIMUM_SPAWN_INTERVAL,
            wave_delay_secs: MINIMUM_WAVE_DELAY,
            spawns_per_wave: SPAWNS_PER_WAVE,
            max_active: MAX_ACTIVE_ENEMIES,
        }
    }
}

/// Composition of a single round. Immutable once the round starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundConfig {
    /// Total enemies to spawn this round.
    pub quota: u32,
    /// Weighted archetype table; cumulative sums form the roll breakpoints.
    pub weights: Vec<WeightedEntry>,
    /// Pinned archetypes, sorted strictly ascending by position.
    pub overrides: Vec<SpawnOverride>,
}

impl RoundConfig {
    /// Validates the config. Unsorted or duplicated overrides are rejected
    /// here rather than silently tolerated by the resolution scan, and a
    /// table that cannot resolve every spawn index is rejected before the
    /// round starts rather than mid-wave.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut last: Option<u32> = None;
        for o in &self.overrides {
            match last {
                Some(prev) if o.position == prev => {
                    return Err(ConfigError::DuplicateOverride {
                        position: o.position,
                    });
                }
                Some(prev) if o.position < prev => {
                    return Err(ConfigError::UnsortedOverrides {
                        position: o.position,
                    });
                }
                _ => {}
            }
            last = Some(o.position);
        }

        if self.total_weight() == 0 && !self.fully_pinned() {
            return Err(ConfigError::EmptySpawnTable);
        }
        Ok(())
    }

    /// Whether overrides pin every spawn index in `[0, quota)`. With strict
    /// ascending order, the first `quota` overrides cover the range exactly
    /// when the entry at `quota - 1` sits at position `quota - 1`.
    fn fully_pinned(&self) -> bool {
        if self.quota == 0 {
            return true;
        }
        let quota = self.quota as usize;
        self.overrides.len() >= quota && self.overrides[quota - 1].position == self.quota - 1
    }

    /// Sum of all table weights; the exclusive upper bound of a roll.
    pub fn total_weight(&self) -> u32 {
        self.weights.iter().map(|e| e.weight).sum()
    }

    /// Looks up an override pinned to `spawn_index`. The list is sorted
    /// ascending, so the scan exits early once past the index.
    pub fn planned(&self, spawn_index: u32) -> Option<EnemyArchetype> {
        for o in &self.overrides {
            if o.position == spawn_index {
                return Some(o.archetype);
            }
            if o.position > spawn_index {
                return None;
            }
        }
        None
    }

    /// Rolls a uniform value over the cumulative breakpoints and returns the
    /// first entry whose breakpoint exceeds it. Ties favor earlier entries by
    /// construction: breakpoints are strictly increasing for positive weights.
    pub fn roll<R: Rng>(&self, rng: &mut R) -> Result<EnemyArchetype, ConfigError> {
        let total = self.total_weight();
        if total == 0 {
            return Err(ConfigError::EmptySpawnTable);
        }

        let roll = rng.gen_range(0..total);
        let mut breakpoint = 0;
        for entry in &self.weights {
            breakpoint += entry.weight;
            if roll < breakpoint {
                return Ok(entry.archetype);
            }
        }

        // Unreachable: roll < total and total is the final breakpoint.
        Err(ConfigError::EmptySpawnTable)
    }

    /// Resolves the archetype for spawn `spawn_index`: a pinned override wins
    /// without consuming randomness; otherwise the weighted table is rolled.
    pub fn resolve<R: Rng>(
        &self,
        spawn_index: u32,
        rng: &mut R,
    ) -> Result<EnemyArchetype, ConfigError> {
        if let Some(archetype) = self.planned(spawn_index) {
            return Ok(archetype);
        }
        self.roll(rng)
    }
}
