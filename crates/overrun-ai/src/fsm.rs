//! Enemy behavior finite state machine.
//!
//! Pure functions that compute phase transitions and velocity adjustments
//! for enemy entities based on their archetype, current phase, and target.
//! No ECS dependency — operates on plain data.

use overrun_core::enums::EnemyPhase;
use overrun_core::types::{Position, Velocity};

use crate::profiles::EnemyBehaviorProfile;

/// Input to the enemy FSM for a single entity.
pub struct EnemyContext {
    pub phase: EnemyPhase,
    pub position: Position,
    /// Position of the hunted participant; None when nobody is left alive.
    pub target: Option<Position>,
}

/// Output from the enemy FSM.
pub struct EnemyUpdate {
    pub new_phase: EnemyPhase,
    pub new_velocity: Velocity,
    pub phase_changed: bool,
}

/// Evaluate the FSM for one enemy. Returns the updated phase and velocity.
/// Strike timing is owned by the simulation; the FSM only decides whether
/// the enemy is in striking position.
pub fn evaluate(ctx: &EnemyContext, profile: &EnemyBehaviorProfile) -> EnemyUpdate {
    let hold = EnemyUpdate {
        new_phase: ctx.phase,
        new_velocity: Velocity::default(),
        phase_changed: false,
    };

    // Dead is absorbing — the corpse sinks where it fell.
    if ctx.phase == EnemyPhase::Dead {
        return hold;
    }

    // Nobody left to hunt: stand down in place.
    let Some(target) = ctx.target else {
        return EnemyUpdate {
            new_phase: EnemyPhase::Seeking,
            new_velocity: Velocity::default(),
            phase_changed: ctx.phase != EnemyPhase::Seeking,
        };
    };

    let range = ctx.position.range_to(&target);

    match ctx.phase {
        EnemyPhase::Seeking => {
            if range <= profile.attack_range {
                EnemyUpdate {
                    new_phase: EnemyPhase::Attacking,
                    new_velocity: Velocity::default(),
                    phase_changed: true,
                }
            } else {
                EnemyUpdate {
                    new_phase: EnemyPhase::Seeking,
                    new_velocity: Velocity::toward(&ctx.position, &target, profile.speed),
                    phase_changed: false,
                }
            }
        }
        EnemyPhase::Attacking => {
            if range > profile.attack_range {
                // Target moved (or retargeted) out of reach — resume pursuit.
                EnemyUpdate {
                    new_phase: EnemyPhase::Seeking,
                    new_velocity: Velocity::toward(&ctx.position, &target, profile.speed),
                    phase_changed: true,
                }
            } else {
                hold
            }
        }
        EnemyPhase::Dead => hold,
    }
}
