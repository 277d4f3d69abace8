//! Events emitted by the simulation for observers.
//!
//! The engine collects events during a tick and publishes them on the
//! snapshot after all state mutation for the tick is done, so observers
//! never see an inconsistent state/round pairing.

use serde::{Deserialize, Serialize};

use crate::enums::*;

/// Observer-facing match events.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MatchEvent {
    /// The match state machine transitioned.
    StateChanged {
        state: MatchState,
        round: Option<u32>,
    },
    /// A round began and its spawner started.
    RoundStarted { round: u32, quota: u32 },
    /// A wave of the current round began spawning.
    WaveStarted { size: u32 },
    /// An enemy entered the arena.
    EnemySpawned {
        enemy_id: u32,
        archetype: EnemyArchetype,
    },
    /// The live enemy population changed.
    EnemyCountChanged { count: u32 },
    /// The round's spawn quota was reached.
    QuotaMet { round: u32, quota: u32 },
    /// Spawning was cancelled before the quota was reached.
    SpawningCancelled { spawned: u32 },
    /// An enemy was killed.
    EnemyKilled { enemy_id: u32, score_value: u32 },
    /// A participant joined.
    PlayerJoined { player_id: u32 },
    /// A participant left.
    PlayerLeft { player_id: u32 },
    /// A participant took damage.
    PlayerDamaged { player_id: u32, health: i32 },
    /// A participant was eliminated.
    PlayerDied { player_id: u32 },
    /// A new high score was latched at match end.
    HighScoreUpdated { score: u32 },
    /// The restart delay elapsed; the host should reload the match.
    RestartRequested,
}
