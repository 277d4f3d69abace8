//! Match snapshot — the complete visible state published after each tick.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::MatchEvent;
use crate::types::{Position, SimTime};

/// Complete match state broadcast to the host after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub time: SimTime,
    pub state: MatchState,
    /// Zero-based round index; None before the first round starts.
    pub round: Option<u32>,
    pub enemies: Vec<EnemyView>,
    pub players: Vec<PlayerView>,
    pub spawner: SpawnerView,
    pub score: ScoreView,
    /// Events that occurred during this tick.
    pub events: Vec<MatchEvent>,
}

/// A live (or sinking) enemy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyView {
    pub enemy_id: u32,
    pub archetype: EnemyArchetype,
    pub phase: EnemyPhase,
    pub position: Position,
    /// Heading in radians (0 = North, clockwise).
    pub heading: f64,
    pub health: i32,
    pub target_player: Option<u32>,
}

/// A joined participant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerView {
    pub player_id: u32,
    pub position: Position,
    pub health: i32,
    pub max_health: i32,
    pub alive: bool,
}

/// Wave spawner status for the current round.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpawnerView {
    pub phase: SchedulerPhase,
    pub quota: u32,
    pub spawned: u32,
    pub killed: u32,
    /// Enemies still to be killed before the round is cleared.
    pub remaining: u32,
    /// Currently live enemies.
    pub population: u32,
}

/// Running score for display.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreView {
    pub score: u32,
    pub high_score: u32,
    /// Whether the latched high score was set by this match.
    pub high_score_is_new: bool,
    pub enemies_killed: u32,
}
