//! Entity spawn factories for setting up the arena world.
//!
//! Creates participant and enemy entities with appropriate component
//! bundles, plus the default spawn-point ring.

use hecs::{Entity, World};

use overrun_ai::profiles::get_profile;
use overrun_core::components::*;
use overrun_core::constants::*;
use overrun_core::enums::{EnemyArchetype, EnemyPhase};
use overrun_core::types::{Position, Velocity};

/// Default spawn points: evenly spaced on the arena perimeter ring.
pub fn default_spawn_points() -> Vec<Position> {
    (0..SPAWN_POINT_COUNT)
        .map(|i| {
            let bearing = std::f64::consts::TAU * f64::from(i) / f64::from(SPAWN_POINT_COUNT);
            Position::new(ARENA_RADIUS * bearing.sin(), ARENA_RADIUS * bearing.cos())
        })
        .collect()
}

/// Spawn a participant near the arena center. Participants are placed on a
/// small inner ring so they never stack exactly on one another.
pub fn spawn_player(world: &mut World, player_id: u32) -> Entity {
    let bearing = f64::from(player_id) * std::f64::consts::FRAC_PI_2;
    let position = Position::new(2.0 * bearing.sin(), 2.0 * bearing.cos());

    world.spawn((
        Player,
        PlayerInfo {
            player_id,
            base_max_health: PLAYER_STARTING_HEALTH,
        },
        position,
        Health {
            current: PLAYER_STARTING_HEALTH,
            max: PLAYER_STARTING_HEALTH,
        },
    ))
}

/// Spawn a single enemy at the given spawn point, hunting the assigned
/// participant. The enemy starts seeking and may strike as soon as it
/// closes to attack range.
pub fn spawn_enemy(
    world: &mut World,
    archetype: EnemyArchetype,
    spawn_point: Position,
    enemy_id: u32,
    now_secs: f64,
    target_player: Option<u32>,
) -> Entity {
    let profile = get_profile(archetype);

    world.spawn((
        Enemy,
        EnemyInfo { enemy_id, archetype },
        spawn_point,
        Velocity::default(),
        Health {
            current: profile.starting_health,
            max: profile.starting_health,
        },
        EnemyBrain {
            phase: EnemyPhase::Seeking,
            phase_started_secs: now_secs,
            next_attack_secs: now_secs,
            target_player,
        },
    ))
}
