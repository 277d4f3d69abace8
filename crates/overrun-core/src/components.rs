//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in systems, not components.

use serde::{Deserialize, Serialize};

use crate::enums::*;

/// Hit points, shared by enemies and participants.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Health {
    pub current: i32,
    pub max: i32,
}

/// Identity of a spawned enemy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EnemyInfo {
    /// Stable id assigned by the engine at spawn.
    pub enemy_id: u32,
    pub archetype: EnemyArchetype,
}

/// Behavioral state driven by the enemy FSM each tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyBrain {
    pub phase: EnemyPhase,
    /// Simulation time at which the current phase began.
    pub phase_started_secs: f64,
    /// Simulation time before which the enemy may not strike again.
    pub next_attack_secs: f64,
    /// Player id this enemy is hunting, if any participant is alive.
    pub target_player: Option<u32>,
}

/// Identity of a joined participant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub player_id: u32,
    /// Max health before round progression boosts.
    pub base_max_health: i32,
}

/// Marks an entity as a spawned enemy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Enemy;

/// Marks an entity as a participant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Player;

// Position and Velocity from types.rs double as ECS components.
