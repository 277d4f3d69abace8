//! Built-in round progression.
//!
//! Three rounds of escalating pressure. Custom progressions can be supplied
//! through `MatchConfig::rounds`; these are the defaults the host falls back
//! to.

use overrun_core::enums::EnemyArchetype;
use overrun_core::round::{RoundConfig, SpawnOverride, WeightedEntry};

/// Build the default three-round progression.
pub fn default_rounds() -> Vec<RoundConfig> {
    vec![first_contact(), mixed_pack(), brute_siege()]
}

/// Round 1: "First Contact"
/// 10 Shamblers, nothing else. A warm-up quota.
fn first_contact() -> RoundConfig {
    RoundConfig {
        quota: 10,
        weights: vec![WeightedEntry {
            archetype: EnemyArchetype::Shambler,
            weight: 1,
        }],
        overrides: vec![],
    }
}

/// Round 2: "Mixed Pack"
/// 20 enemies, mostly Shamblers with Lurkers mixed in. A Lurker is pinned
/// to the first spawn so the pace change is felt immediately.
fn mixed_pack() -> RoundConfig {
    RoundConfig {
        quota: 20,
        weights: vec![
            WeightedEntry {
                archetype: EnemyArchetype::Shambler,
                weight: 70,
            },
            WeightedEntry {
                archetype: EnemyArchetype::Lurker,
                weight: 30,
            },
        ],
        overrides: vec![SpawnOverride {
            position: 0,
            archetype: EnemyArchetype::Lurker,
        }],
    }
}

/// Round 3: "Brute Siege"
/// 30 enemies across all archetypes. Brutes are pinned to the first and
/// last spawns; the rest of the table rolls with a small Brute share.
fn brute_siege() -> RoundConfig {
    RoundConfig {
        quota: 30,
        weights: vec![
            WeightedEntry {
                archetype: EnemyArchetype::Shambler,
                weight: 60,
            },
            WeightedEntry {
                archetype: EnemyArchetype::Lurker,
                weight: 30,
            },
            WeightedEntry {
                archetype: EnemyArchetype::Brute,
                weight: 10,
            },
        ],
        overrides: vec![
            SpawnOverride {
                position: 0,
                archetype: EnemyArchetype::Brute,
            },
            SpawnOverride {
                position: 29,
                archetype: EnemyArchetype::Brute,
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rounds_are_valid() {
        let rounds = default_rounds();
        assert_eq!(rounds.len(), 3);
        for round in &rounds {
            round.validate().expect("default round should validate");
            assert!(round.total_weight() > 0);
        }
    }

    #[test]
    fn quotas_escalate() {
        let rounds = default_rounds();
        for pair in rounds.windows(2) {
            assert!(pair[0].quota < pair[1].quota);
        }
    }
}
