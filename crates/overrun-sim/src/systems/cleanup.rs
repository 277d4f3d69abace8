//! Cleanup system: removes enemy corpses after their sink delay.
//!
//! Death accounting happened when the enemy was killed; this despawn is
//! purely cosmetic lifetime management.

use hecs::{Entity, World};

use overrun_core::components::{Enemy, EnemyBrain};
use overrun_core::constants::ENEMY_SINK_DURATION;
use overrun_core::enums::EnemyPhase;

/// Despawn dead enemies whose sink delay has elapsed.
/// Uses a pre-allocated buffer to avoid per-tick allocation.
pub fn run(world: &mut World, despawn_buffer: &mut Vec<Entity>, now_secs: f64) {
    despawn_buffer.clear();

    for (entity, (_enemy, brain)) in world.query_mut::<(&Enemy, &EnemyBrain)>() {
        if brain.phase == EnemyPhase::Dead
            && now_secs - brain.phase_started_secs >= ENEMY_SINK_DURATION
        {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
