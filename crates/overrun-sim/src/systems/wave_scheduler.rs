//! Wave scheduling system — paces a round's spawns into discrete waves.
//!
//! The scheduler is a poll-driven state machine advanced once per tick.
//! Every tick boundary is a suspension point: delays, the capacity wait,
//! and cancellation are all observed there and nowhere else. Cancellation
//! leaves partial progress intact — spawned enemies are never retracted.

use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use overrun_core::components::{Player, PlayerInfo};
use overrun_core::enums::{EnemyArchetype, SchedulerPhase};
use overrun_core::error::ConfigError;
use overrun_core::events::MatchEvent;
use overrun_core::round::{RoundConfig, SpawnerParams};
use overrun_core::types::Position;

use crate::registry::SpawnRegistry;
use crate::world_setup;

/// Paces one round's spawns. Created once per match; `start` rearms it for
/// each round.
#[derive(Debug)]
pub struct WaveScheduler {
    params: SpawnerParams,
    phase: SchedulerPhase,
    /// Seconds until the next suspension point expires.
    timer: f64,
    /// Spawns left in the current wave.
    wave_remaining: u32,
    /// Spawn point chosen for the current wave; every spawn of a wave
    /// emerges from the same point.
    wave_spawn_point: usize,
    /// Archetype resolved for the next spawn, held across a capacity wait.
    /// Resolution happens before the gate, so a blocked spawn keeps its
    /// pick instead of re-rolling.
    pending_spawn: Option<EnemyArchetype>,
}

impl WaveScheduler {
    pub fn new(params: SpawnerParams) -> Self {
        Self {
            params,
            phase: SchedulerPhase::Idle,
            timer: 0.0,
            wave_remaining: 0,
            wave_spawn_point: 0,
            pending_spawn: None,
        }
    }

    pub fn phase(&self) -> SchedulerPhase {
        self.phase
    }

    pub fn params(&self) -> &SpawnerParams {
        &self.params
    }

    /// Arm the scheduler for a freshly bound round.
    pub fn start(&mut self) {
        self.phase = SchedulerPhase::InitialDelay;
        self.timer = self.params.initial_delay_secs;
        self.wave_remaining = 0;
        self.pending_spawn = None;
    }

    /// Cancel spawning. Returns true if the scheduler was actually running;
    /// terminal and idle schedulers are left untouched.
    pub fn cancel(&mut self) -> bool {
        match self.phase {
            SchedulerPhase::Idle | SchedulerPhase::Completed | SchedulerPhase::Cancelled => false,
            _ => {
                self.phase = SchedulerPhase::Cancelled;
                true
            }
        }
    }

    /// Return to Idle. Used when the whole match resets.
    pub fn reset(&mut self) {
        self.phase = SchedulerPhase::Idle;
        self.timer = 0.0;
        self.wave_remaining = 0;
        self.pending_spawn = None;
    }

    fn at_capacity(&self, population: u32) -> bool {
        self.params.max_active != -1 && population as i64 >= i64::from(self.params.max_active)
    }
}

/// Advance the scheduler by one tick, spawning at most one enemy.
///
/// Spawn targets rotate round-robin over the joined participants via
/// `target_rotation`; `next_enemy_id` hands out stable enemy ids.
#[allow(clippy::too_many_arguments)]
pub fn run(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    scheduler: &mut WaveScheduler,
    config: &RoundConfig,
    registry: &mut SpawnRegistry,
    spawn_points: &[Position],
    round: u32,
    next_enemy_id: &mut u32,
    target_rotation: &mut usize,
    now_secs: f64,
    dt: f64,
    events: &mut Vec<MatchEvent>,
) -> Result<(), ConfigError> {
    if matches!(
        scheduler.phase,
        SchedulerPhase::Idle | SchedulerPhase::Completed | SchedulerPhase::Cancelled
    ) {
        return Ok(());
    }

    scheduler.timer -= dt;

    loop {
        match scheduler.phase {
            SchedulerPhase::InitialDelay | SchedulerPhase::WaveDelay => {
                if scheduler.timer > 0.0 {
                    break;
                }
                if registry.quota_met() {
                    // Zero-quota round: nothing to spawn.
                    complete(scheduler, registry, round, events);
                    break;
                }
                let size = registry.quota().saturating_sub(registry.spawned());
                let size = size.min(scheduler.params.spawns_per_wave);
                scheduler.wave_remaining = size;
                scheduler.wave_spawn_point = rng.gen_range(0..spawn_points.len());
                scheduler.phase = SchedulerPhase::Spawning;
                scheduler.timer = 0.0;
                events.push(MatchEvent::WaveStarted { size });
                log::debug!("new wave spawning ({size} enemies)");
            }
            SchedulerPhase::Spawning => {
                if scheduler.timer > 0.0 {
                    break;
                }
                // The archetype is resolved before the capacity gate and
                // survives the wait; a blocked spawn keeps its pick.
                let archetype = match scheduler.pending_spawn {
                    Some(archetype) => archetype,
                    None => {
                        let archetype = config.resolve(registry.spawned(), rng)?;
                        scheduler.pending_spawn = Some(archetype);
                        archetype
                    }
                };

                // Capacity gate precedes every spawn. The re-poll interval
                // is deliberately the spawn interval.
                if scheduler.at_capacity(registry.population()) {
                    log::debug!("spawn blocked by enemy limit; waiting one spawn cycle");
                    scheduler.phase = SchedulerPhase::AwaitingCapacity;
                    scheduler.timer = scheduler.params.min_spawn_interval_secs;
                    break;
                }

                scheduler.pending_spawn = None;
                let target = next_target(world, target_rotation);
                let spawn_point = spawn_points[scheduler.wave_spawn_point];
                let enemy_id = *next_enemy_id;
                *next_enemy_id += 1;

                let entity = world_setup::spawn_enemy(
                    world, archetype, spawn_point, enemy_id, now_secs, target,
                );
                registry
                    .record_spawn(entity)
                    .expect("scheduler spawns within the round quota");

                events.push(MatchEvent::EnemySpawned { enemy_id, archetype });
                events.push(MatchEvent::EnemyCountChanged {
                    count: registry.population(),
                });
                scheduler.wave_remaining = scheduler.wave_remaining.saturating_sub(1);

                if registry.quota_met() {
                    complete(scheduler, registry, round, events);
                } else if scheduler.wave_remaining == 0 {
                    scheduler.phase = SchedulerPhase::WaveDelay;
                    scheduler.timer = scheduler.params.wave_delay_secs;
                    log::debug!("spawn wave completed");
                } else {
                    scheduler.timer = scheduler.params.min_spawn_interval_secs;
                }
                break;
            }
            SchedulerPhase::AwaitingCapacity => {
                if scheduler.timer > 0.0 {
                    break;
                }
                if scheduler.at_capacity(registry.population()) {
                    scheduler.timer = scheduler.params.min_spawn_interval_secs;
                    break;
                }
                // Room opened up — spawn without further delay.
                scheduler.phase = SchedulerPhase::Spawning;
                scheduler.timer = 0.0;
            }
            _ => break,
        }
    }

    Ok(())
}

fn complete(
    scheduler: &mut WaveScheduler,
    registry: &SpawnRegistry,
    round: u32,
    events: &mut Vec<MatchEvent>,
) {
    scheduler.phase = SchedulerPhase::Completed;
    events.push(MatchEvent::QuotaMet {
        round,
        quota: registry.quota(),
    });
    log::info!("round {round} quota met ({} spawned)", registry.spawned());
}

/// Rotate the spawn-target assignment across joined participants, lowest
/// player id first. Returns None when nobody has joined.
fn next_target(world: &World, target_rotation: &mut usize) -> Option<u32> {
    let mut player_ids: Vec<u32> = world
        .query::<(&Player, &PlayerInfo)>()
        .iter()
        .map(|(_, (_, info))| info.player_id)
        .collect();
    if player_ids.is_empty() {
        return None;
    }
    player_ids.sort_unstable();

    *target_rotation = (*target_rotation + 1) % player_ids.len();
    Some(player_ids[*target_rotation])
}
