//! Snapshot system: queries the ECS world and builds a complete MatchSnapshot.
//!
//! This system is read-only — it never modifies the world.

use hecs::World;

use overrun_core::components::*;
use overrun_core::enums::MatchState;
use overrun_core::events::MatchEvent;
use overrun_core::state::*;
use overrun_core::types::{Position, SimTime, Velocity};

use crate::engine::ScoreState;
use crate::registry::SpawnRegistry;
use crate::systems::wave_scheduler::WaveScheduler;

/// Build a complete MatchSnapshot from the current world state.
#[allow(clippy::too_many_arguments)]
pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    state: MatchState,
    round: Option<u32>,
    scheduler: &WaveScheduler,
    registry: &SpawnRegistry,
    score: &ScoreState,
    events: Vec<MatchEvent>,
) -> MatchSnapshot {
    MatchSnapshot {
        time: *time,
        state,
        round,
        enemies: build_enemies(world),
        players: build_players(world),
        spawner: SpawnerView {
            phase: scheduler.phase(),
            quota: registry.quota(),
            spawned: registry.spawned(),
            killed: registry.killed(),
            remaining: registry.remaining(),
            population: registry.population(),
        },
        score: ScoreView {
            score: score.score,
            high_score: score.high_score,
            high_score_is_new: score.high_score_is_new,
            enemies_killed: score.enemies_killed,
        },
        events,
    }
}

/// Build EnemyView list, sorted by enemy id for deterministic output.
fn build_enemies(world: &World) -> Vec<EnemyView> {
    let mut enemies: Vec<EnemyView> = world
        .query::<(&Enemy, &EnemyInfo, &EnemyBrain, &Position, &Velocity, &Health)>()
        .iter()
        .map(|(_, (_, info, brain, pos, vel, health))| EnemyView {
            enemy_id: info.enemy_id,
            archetype: info.archetype,
            phase: brain.phase,
            position: *pos,
            heading: vel.heading(),
            health: health.current,
            target_player: brain.target_player,
        })
        .collect();
    enemies.sort_unstable_by_key(|e| e.enemy_id);
    enemies
}

/// Build PlayerView list, sorted by player id for deterministic output.
fn build_players(world: &World) -> Vec<PlayerView> {
    let mut players: Vec<PlayerView> = world
        .query::<(&Player, &PlayerInfo, &Position, &Health)>()
        .iter()
        .map(|(_, (_, info, pos, health))| PlayerView {
            player_id: info.player_id,
            position: *pos,
            health: health.current,
            max_health: health.max,
            alive: health.current > 0,
        })
        .collect();
    players.sort_unstable_by_key(|p| p.player_id);
    players
}
