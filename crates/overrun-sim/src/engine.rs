//! Match engine — the core of the game.
//!
//! `MatchEngine` owns the hecs ECS world, the match director, the wave
//! scheduler, and the spawn registry. It processes host commands, runs all
//! systems, and produces `MatchSnapshot`s. Completely headless, enabling
//! deterministic testing.

use std::collections::VecDeque;

use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use overrun_ai::profiles::get_profile;
use overrun_core::commands::PlayerCommand;
use overrun_core::components::{Enemy, EnemyBrain, EnemyInfo, Health, Player, PlayerInfo};
use overrun_core::constants::{
    END_DELAY, HEALTH_BOOST_PER_ROUND, MAX_HEALTH_MULTIPLIER, RESTART_DELAY, WARMUP_DELAY,
};
use overrun_core::enums::{EnemyPhase, MatchState};
use overrun_core::error::ConfigError;
use overrun_core::events::MatchEvent;
use overrun_core::round::{RoundConfig, SpawnerParams};
use overrun_core::state::MatchSnapshot;
use overrun_core::types::{Position, SimTime, Velocity};

use crate::director::{DirectorSignal, MatchDirector};
use crate::registry::SpawnRegistry;
use crate::rounds;
use crate::systems;
use crate::systems::wave_scheduler::WaveScheduler;
use crate::world_setup;

/// Configuration for starting a new match.
pub struct MatchConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Wave spawner timing and capacity parameters.
    pub spawner: SpawnerParams,
    /// Warmup countdown before each round (seconds).
    pub warmup_delay_secs: f64,
    /// Countdown before the match ends once an end condition holds (seconds).
    pub end_delay_secs: f64,
    /// Delay in End before a restart is requested (seconds).
    pub restart_delay_secs: f64,
    /// Round progression, played in order.
    pub rounds: Vec<RoundConfig>,
    /// Spawn points on the arena perimeter.
    pub spawn_points: Vec<Position>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            spawner: SpawnerParams::default(),
            warmup_delay_secs: WARMUP_DELAY,
            end_delay_secs: END_DELAY,
            restart_delay_secs: RESTART_DELAY,
            rounds: rounds::default_rounds(),
            spawn_points: world_setup::default_spawn_points(),
        }
    }
}

/// Running score state tracked by the engine. The high score survives
/// match restarts; everything else resets with the match.
#[derive(Debug, Clone, Default)]
pub struct ScoreState {
    pub score: u32,
    pub high_score: u32,
    pub high_score_is_new: bool,
    pub enemies_killed: u32,
}

/// The match engine. Owns the ECS world and all match state.
pub struct MatchEngine {
    world: World,
    time: SimTime,
    rng: ChaCha8Rng,
    director: MatchDirector,
    scheduler: WaveScheduler,
    registry: SpawnRegistry,
    score: ScoreState,
    rounds: Vec<RoundConfig>,
    spawn_points: Vec<Position>,
    command_queue: VecDeque<PlayerCommand>,
    events: Vec<MatchEvent>,
    despawn_buffer: Vec<Entity>,
    next_enemy_id: u32,
    target_rotation: usize,
}

impl MatchEngine {
    /// Create a new match engine. Every round config is validated here so
    /// configuration errors surface before the first tick, never mid-wave.
    pub fn new(config: MatchConfig) -> Result<Self, ConfigError> {
        if config.rounds.is_empty() {
            return Err(ConfigError::NoRounds);
        }
        if config.spawn_points.is_empty() {
            return Err(ConfigError::NoSpawnPoints);
        }
        for round in &config.rounds {
            round.validate()?;
        }

        Ok(Self {
            world: World::new(),
            time: SimTime::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            director: MatchDirector::new(
                config.warmup_delay_secs,
                config.end_delay_secs,
                config.restart_delay_secs,
            ),
            scheduler: WaveScheduler::new(config.spawner),
            registry: SpawnRegistry::new(),
            score: ScoreState::default(),
            rounds: config.rounds,
            spawn_points: config.spawn_points,
            command_queue: VecDeque::new(),
            events: Vec::new(),
            despawn_buffer: Vec::new(),
            next_enemy_id: 0,
            target_rotation: 0,
        })
    }

    /// Queue a host command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the match by one tick of `dt` seconds and return the
    /// resulting snapshot.
    pub fn tick(&mut self, dt: f64) -> MatchSnapshot {
        self.process_commands();
        self.run_director(dt);
        self.run_systems(dt);
        self.time.advance(dt);

        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(
            &self.world,
            &self.time,
            self.director.state(),
            self.director.round(),
            &self.scheduler,
            &self.registry,
            &self.score,
            events,
        )
    }

    /// Get the current match state.
    pub fn state(&self) -> MatchState {
        self.director.state()
    }

    /// Get the current round index, if a round has started.
    pub fn round(&self) -> Option<u32> {
        self.director.round()
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Get a read-only reference to the score state.
    pub fn score(&self) -> &ScoreState {
        &self.score
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single host command.
    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::JoinMatch { player_id } => self.join_player(player_id),
            PlayerCommand::LeaveMatch { player_id } => self.leave_player(player_id),
            PlayerCommand::DamageEnemy { enemy_id, amount } => {
                self.damage_enemy(enemy_id, amount);
            }
            PlayerCommand::RestartMatch => self.restart_match(),
        }
    }

    fn join_player(&mut self, player_id: u32) {
        let already_joined = self
            .world
            .query::<&PlayerInfo>()
            .iter()
            .any(|(_, info)| info.player_id == player_id);
        if already_joined {
            log::warn!("player {player_id} already joined; ignoring");
            return;
        }

        let _ = world_setup::spawn_player(&mut self.world, player_id);
        self.events.push(MatchEvent::PlayerJoined { player_id });
        log::info!("player {player_id} joined");
    }

    fn leave_player(&mut self, player_id: u32) {
        let entity = self
            .world
            .query::<&PlayerInfo>()
            .iter()
            .find(|(_, info)| info.player_id == player_id)
            .map(|(entity, _)| entity);

        match entity {
            Some(entity) => {
                let _ = self.world.despawn(entity);
                self.events.push(MatchEvent::PlayerLeft { player_id });
                log::info!("player {player_id} left");
            }
            None => log::warn!("leave for unknown player {player_id}; ignoring"),
        }
    }

    /// Apply external weapon damage to an enemy. Stale ids are host input
    /// going out of date, not invariant breaches — they are dropped.
    fn damage_enemy(&mut self, enemy_id: u32, amount: i32) {
        let now = self.time.elapsed_secs;
        let mut found = false;
        let mut killed: Option<(Entity, u32)> = None;

        for (entity, (info, health, brain, vel)) in self
            .world
            .query_mut::<(&EnemyInfo, &mut Health, &mut EnemyBrain, &mut Velocity)>()
        {
            if info.enemy_id != enemy_id {
                continue;
            }
            found = true;
            if brain.phase == EnemyPhase::Dead {
                break;
            }

            health.current -= amount;
            if health.current <= 0 {
                brain.phase = EnemyPhase::Dead;
                brain.phase_started_secs = now;
                *vel = Velocity::default();
                killed = Some((entity, get_profile(info.archetype).score_value));
            }
            break;
        }

        if !found {
            log::warn!("damage for unknown enemy {enemy_id}; ignoring");
            return;
        }

        if let Some((entity, score_value)) = killed {
            self.registry
                .record_death(entity)
                .expect("killed enemy is tracked as live by the registry");
            self.score.score += score_value;
            self.score.enemies_killed += 1;
            self.events.push(MatchEvent::EnemyKilled {
                enemy_id,
                score_value,
            });
            self.events.push(MatchEvent::EnemyCountChanged {
                count: self.registry.population(),
            });
            log::debug!("enemy {enemy_id} killed (+{score_value})");
        }
    }

    /// Reload the match after End — the scene-reload analog. The joined
    /// roster survives; everything else resets. The high score persists.
    fn restart_match(&mut self) {
        if self.director.state() != MatchState::End {
            log::warn!("restart requested outside End state; ignoring");
            return;
        }

        let enemies: Vec<Entity> = self
            .world
            .query::<&Enemy>()
            .iter()
            .map(|(entity, _)| entity)
            .collect();
        for entity in enemies {
            let _ = self.world.despawn(entity);
        }

        for (_entity, (info, health)) in self.world.query_mut::<(&PlayerInfo, &mut Health)>() {
            health.max = info.base_max_health;
            health.current = info.base_max_health;
        }

        self.registry.reset(0);
        self.scheduler.reset();
        self.director.reset();
        self.score.score = 0;
        self.score.enemies_killed = 0;
        self.score.high_score_is_new = false;
        self.next_enemy_id = 0;
        self.target_rotation = 0;
        self.time = SimTime::default();

        self.events.push(MatchEvent::StateChanged {
            state: MatchState::Waiting,
            round: None,
        });
        log::info!("match reloaded");
    }

    /// Evaluate the match state machine and commit at most one transition.
    fn run_director(&mut self, dt: f64) {
        let (joined, any_alive) = self.roster_status();
        match self
            .director
            .poll(dt, joined, any_alive, &self.registry, self.rounds.len())
        {
            DirectorSignal::Transition(next) => self.to_match_state(next),
            DirectorSignal::RequestRestart => {
                self.events.push(MatchEvent::RestartRequested);
                log::info!("restart delay elapsed; requesting match reload");
            }
            DirectorSignal::None => {}
        }
    }

    fn roster_status(&self) -> (usize, bool) {
        let mut joined = 0;
        let mut any_alive = false;
        for (_entity, (_player, health)) in self.world.query::<(&Player, &Health)>().iter() {
            joined += 1;
            if health.current > 0 {
                any_alive = true;
            }
        }
        (joined, any_alive)
    }

    /// Run the exit actions of the old state, then the entry actions of the
    /// new state, then notify observers — in that order, so observers never
    /// see an inconsistent state/round pairing.
    fn to_match_state(&mut self, next: MatchState) {
        let previous = self.director.state();
        log::info!("match state: {previous:?} -> {next:?}");

        if previous == MatchState::InProgress && self.scheduler.cancel() {
            self.events.push(MatchEvent::SpawningCancelled {
                spawned: self.registry.spawned(),
            });
            log::info!(
                "spawning cancelled at {}/{} enemies",
                self.registry.spawned(),
                self.registry.quota()
            );
        }

        self.director.set_state(next);
        match next {
            MatchState::Waiting | MatchState::Warmup => {}
            MatchState::InProgress => self.begin_round(),
            MatchState::End => self.finish_match(),
        }

        self.events.push(MatchEvent::StateChanged {
            state: next,
            round: self.director.round(),
        });
    }

    /// InProgress entry: advance the round, bind its config, reset the
    /// registry, start the spawner, and apply participant progression.
    fn begin_round(&mut self) {
        let round = self.director.advance_round();
        let config = self
            .rounds
            .get(round as usize)
            .expect("director never starts a round past the configured list");

        self.registry.reset(config.quota);
        self.scheduler.start();

        let multiplier =
            (1.0 + HEALTH_BOOST_PER_ROUND * f64::from(round)).min(MAX_HEALTH_MULTIPLIER);
        for (_entity, (info, health)) in self.world.query_mut::<(&PlayerInfo, &mut Health)>() {
            health.max = (f64::from(info.base_max_health) * multiplier).round() as i32;
            health.current = health.current.min(health.max);
        }

        self.events.push(MatchEvent::RoundStarted {
            round,
            quota: config.quota,
        });
        log::info!("round {} starting (quota {})", round + 1, config.quota);
    }

    /// End entry: latch the high score.
    fn finish_match(&mut self) {
        if self.score.score > self.score.high_score {
            self.score.high_score = self.score.score;
            self.score.high_score_is_new = true;
            self.events.push(MatchEvent::HighScoreUpdated {
                score: self.score.high_score,
            });
            log::info!("new high score: {}", self.score.high_score);
        }
    }

    /// Run all systems in order. Spawning is gated on InProgress; the enemy
    /// systems run in every state so survivors keep acting through End and
    /// corpses finish sinking between rounds.
    fn run_systems(&mut self, dt: f64) {
        let now = self.time.elapsed_secs;

        // 1. Wave spawning — only while a round is live
        if self.director.state() == MatchState::InProgress {
            let round = self
                .director
                .round()
                .expect("InProgress always has a bound round");
            let config = &self.rounds[round as usize];
            systems::wave_scheduler::run(
                &mut self.world,
                &mut self.rng,
                &mut self.scheduler,
                config,
                &mut self.registry,
                &self.spawn_points,
                round,
                &mut self.next_enemy_id,
                &mut self.target_rotation,
                now,
                dt,
                &mut self.events,
            )
            .expect("round configs validated at engine construction");
        }
        // 2. Enemy AI (retargeting, pursuit, strikes)
        systems::enemy_ai::run(&mut self.world, &mut self.rng, now, &mut self.events);
        // 3. Movement integration
        systems::movement::run(&mut self.world, dt);
        // 4. Cleanup (sunk corpses)
        systems::cleanup::run(&mut self.world, &mut self.despawn_buffer, now);
    }
}
