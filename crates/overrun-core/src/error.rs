//! Error taxonomy for the simulation core.
//!
//! Configuration and invariant errors are programmer errors: they are
//! surfaced immediately and never retried. Scheduler cancellation is not an
//! error at all — it is a terminal `SchedulerPhase`.

use thiserror::Error;

/// A round or spawner configuration the engine cannot run with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A random resolution was requested from an empty or zero-weight table.
    #[error("spawn table is empty or has zero total weight")]
    EmptySpawnTable,
    /// Spawn overrides must be sorted strictly ascending by position.
    #[error("spawn override at position {position} breaks ascending order")]
    UnsortedOverrides { position: u32 },
    /// At most one override is permitted per spawn position.
    #[error("duplicate spawn override for position {position}")]
    DuplicateOverride { position: u32 },
    /// A match needs at least one configured round.
    #[error("no rounds configured")]
    NoRounds,
    /// A match needs at least one spawn point.
    #[error("no spawn points configured")]
    NoSpawnPoints,
    /// A round index beyond the configured rounds list was requested.
    #[error("round index {round} out of range ({rounds} rounds configured)")]
    RoundOutOfRange { round: u32, rounds: u32 },
}

/// A caller-discipline invariant of the spawn registry was broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// Recording this spawn would push the spawned count past the quota.
    #[error("spawn would exceed the round quota of {quota}")]
    QuotaExceeded { quota: u32 },
    /// The entity is already registered as live.
    #[error("entity is already registered as live")]
    AlreadyLive,
    /// A death was recorded for an entity that is not live (double death or
    /// unknown entity).
    #[error("death recorded for an entity that is not live")]
    NotLive,
}
