//! Archetype-specific behavioral profiles.
//!
//! Consolidates per-archetype parameters for the enemy FSM and the
//! simulation's combat and scoring systems.

use overrun_core::enums::EnemyArchetype;

/// Behavioral profile for an enemy archetype.
pub struct EnemyBehaviorProfile {
    /// Walk speed (m/s).
    pub speed: f64,
    /// Health at spawn.
    pub starting_health: i32,
    /// Range at which the enemy can strike (m).
    pub attack_range: f64,
    /// Damage per strike.
    pub attack_damage: i32,
    /// Interval between strikes (seconds).
    pub attack_interval_secs: f64,
    /// Score credited when this enemy is killed.
    pub score_value: u32,
}

/// Get the behavioral profile for a given archetype.
pub fn get_profile(archetype: EnemyArchetype) -> EnemyBehaviorProfile {
    use overrun_core::constants::*;

    match archetype {
        EnemyArchetype::Shambler => EnemyBehaviorProfile {
            speed: SHAMBLER_SPEED,
            starting_health: SHAMBLER_HEALTH,
            attack_range: ENEMY_ATTACK_RANGE,
            attack_damage: SHAMBLER_ATTACK_DAMAGE,
            attack_interval_secs: ENEMY_ATTACK_INTERVAL,
            score_value: SHAMBLER_SCORE,
        },
        EnemyArchetype::Lurker => EnemyBehaviorProfile {
            speed: LURKER_SPEED,
            starting_health: LURKER_HEALTH,
            attack_range: ENEMY_ATTACK_RANGE,
            attack_damage: LURKER_ATTACK_DAMAGE,
            attack_interval_secs: ENEMY_ATTACK_INTERVAL * 1.5,
            score_value: LURKER_SCORE,
        },
        EnemyArchetype::Brute => EnemyBehaviorProfile {
            speed: BRUTE_SPEED,
            starting_health: BRUTE_HEALTH,
            attack_range: BRUTE_ATTACK_RANGE,
            attack_damage: BRUTE_ATTACK_DAMAGE,
            attack_interval_secs: ENEMY_ATTACK_INTERVAL * 2.0,
            score_value: BRUTE_SCORE,
        },
    }
}
