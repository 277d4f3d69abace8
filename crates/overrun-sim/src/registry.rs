//! Spawn registry — authoritative bookkeeping for one round's enemies.
//!
//! Tracks the live set and the spawned/killed running totals that decide
//! quota completion. Mutated only by the spawn pipeline (on spawn) and the
//! death path (on kill); both run on the engine's single logical timeline.

use std::collections::HashSet;

use hecs::Entity;

use overrun_core::error::InvariantViolation;

/// Per-round spawn accounting. Invariants: `killed <= spawned <= quota`;
/// `live.len() == spawned - killed`.
#[derive(Debug, Default)]
pub struct SpawnRegistry {
    quota: u32,
    spawned: u32,
    killed: u32,
    live: HashSet<Entity>,
}

impl SpawnRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the live set and zeroes both counters for a new round.
    pub fn reset(&mut self, quota: u32) {
        self.quota = quota;
        self.spawned = 0;
        self.killed = 0;
        self.live.clear();
    }

    /// Registers a freshly spawned enemy. Rejects spawns past the quota and
    /// double-registration — both are caller bugs, not recoverable states.
    pub fn record_spawn(&mut self, entity: Entity) -> Result<(), InvariantViolation> {
        if self.spawned >= self.quota {
            return Err(InvariantViolation::QuotaExceeded { quota: self.quota });
        }
        if !self.live.insert(entity) {
            return Err(InvariantViolation::AlreadyLive);
        }
        self.spawned += 1;
        Ok(())
    }

    /// Registers the death of a live enemy. A death for an entity that is
    /// not live is a double death or an unknown entity.
    pub fn record_death(&mut self, entity: Entity) -> Result<(), InvariantViolation> {
        if !self.live.remove(&entity) {
            return Err(InvariantViolation::NotLive);
        }
        self.killed += 1;
        Ok(())
    }

    pub fn quota(&self) -> u32 {
        self.quota
    }

    pub fn spawned(&self) -> u32 {
        self.spawned
    }

    pub fn killed(&self) -> u32 {
        self.killed
    }

    /// Currently live enemies.
    pub fn population(&self) -> u32 {
        self.live.len() as u32
    }

    /// Enemies still to be killed before the round is cleared.
    pub fn remaining(&self) -> u32 {
        self.quota - self.killed
    }

    /// Whether every enemy of the round has been spawned.
    pub fn quota_met(&self) -> bool {
        self.spawned >= self.quota
    }

    /// Whether the round is fully resolved: everything spawned and killed.
    pub fn is_cleared(&self) -> bool {
        self.quota_met() && self.live.is_empty()
    }
}
