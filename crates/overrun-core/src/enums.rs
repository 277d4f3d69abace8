//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Enemy archetype category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyArchetype {
    /// Slow melee walker; the bulk of every round.
    Shambler,
    /// Fast flanker with a harder bite.
    Lurker,
    /// Heavy bruiser; rare, high score value.
    Brute,
}

/// Enemy behavior phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyPhase {
    /// Advancing toward the assigned target.
    #[default]
    Seeking,
    /// In striking range, attacking on a fixed cadence.
    Attacking,
    /// Killed; sinking until despawned.
    Dead,
}

/// Match state (top-level state machine).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchState {
    /// No participants yet.
    #[default]
    Waiting,
    /// Pre-round countdown.
    Warmup,
    /// A round is live: the spawner is running and enemies are active.
    InProgress,
    /// Match over; awaiting restart.
    End,
}

/// Wave scheduler lifecycle phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchedulerPhase {
    /// Not started.
    #[default]
    Idle,
    /// Waiting out the initial delay before the first wave.
    InitialDelay,
    /// Waiting out the delay between waves.
    WaveDelay,
    /// Emitting spawns for the current wave.
    Spawning,
    /// Blocked on the live-population cap; re-polls on the spawn interval.
    AwaitingCapacity,
    /// Quota reached. Terminal.
    Completed,
    /// Stopped early by an external cancel. Terminal, not an error.
    Cancelled,
}

impl SchedulerPhase {
    /// Whether the scheduler has finished (naturally or by cancellation).
    pub fn is_terminal(self) -> bool {
        matches!(self, SchedulerPhase::Completed | SchedulerPhase::Cancelled)
    }
}
