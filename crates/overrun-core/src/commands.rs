//! Host commands sent to the simulation.
//!
//! Commands are queued and processed at the next tick boundary. Ids that no
//! longer resolve to an entity are host input going stale, not invariant
//! breaches — they are dropped with a warning.

use serde::{Deserialize, Serialize};

/// All possible host/player actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    /// A participant joins the match. Participants stay joined, including
    /// across restarts, until they leave.
    JoinMatch { player_id: u32 },
    /// A participant leaves the match.
    LeaveMatch { player_id: u32 },
    /// Apply weapon damage to an enemy. This is the external damage channel;
    /// the core does not model player weapons.
    DamageEnemy { enemy_id: u32, amount: i32 },
    /// Reload the match after End. The roster survives; everything else
    /// resets.
    RestartMatch,
}
