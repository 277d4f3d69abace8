//! overrun-host: headless demo driver for the OVERRUN match simulation.
//!
//! Usage:
//!   overrun-host [--seed N] [--players N] [--duration SECS]
//!                [--rounds rounds.json] [--fire-damage N]
//!
//! Runs the match at 30Hz in a background thread with a simple scripted
//! marksman standing in for player weapons, and prints a score summary
//! when the match ends or the duration elapses.

use std::process;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use overrun_core::commands::PlayerCommand;
use overrun_core::enums::MatchState;
use overrun_core::events::MatchEvent;
use overrun_core::round::RoundConfig;
use overrun_core::state::MatchSnapshot;
use overrun_sim::engine::{MatchConfig, MatchEngine};

mod game_loop;

use game_loop::{spawn_game_loop, GameLoopCommand};

/// How often the scripted marksman fires.
const FIRE_INTERVAL: Duration = Duration::from_millis(250);

/// How often the driver polls the latest snapshot.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return;
    }

    let seed = parse_u64(&args, "--seed", 42);
    let players = parse_u64(&args, "--players", 1).min(4) as u32;
    let duration_secs = parse_f64(&args, "--duration", 120.0);
    let fire_damage = parse_u64(&args, "--fire-damage", 34) as i32;

    let mut config = MatchConfig {
        seed,
        ..Default::default()
    };
    if let Some(rounds) = load_rounds(&args) {
        config.rounds = rounds;
    }

    let engine = match MatchEngine::new(config) {
        Ok(engine) => engine,
        Err(err) => {
            eprintln!("Error: invalid match config: {err}");
            process::exit(1);
        }
    };

    let latest = Arc::new(Mutex::new(None));
    let (tx, handle) = spawn_game_loop(engine, Arc::clone(&latest));

    for player_id in 0..players {
        tx.send(GameLoopCommand::Player(PlayerCommand::JoinMatch {
            player_id,
        }))
        .expect("game loop exited early");
    }

    eprintln!("overrun-host: {players} player(s), seed {seed}, up to {duration_secs}s");
    let summary = drive_match(&tx, &latest, duration_secs, fire_damage);

    let _ = tx.send(GameLoopCommand::Shutdown);
    handle.join().expect("game loop thread panicked");

    match summary {
        Some(snapshot) => print_summary(&snapshot),
        None => eprintln!("no snapshot was ever published"),
    }
}

/// Poll snapshots, fire at enemies on a fixed cadence, and stop when the
/// match requests a restart or the duration elapses.
fn drive_match(
    tx: &std::sync::mpsc::Sender<GameLoopCommand>,
    latest: &Mutex<Option<MatchSnapshot>>,
    duration_secs: f64,
    fire_damage: i32,
) -> Option<MatchSnapshot> {
    let deadline = Instant::now() + Duration::from_secs_f64(duration_secs);
    let mut next_shot = Instant::now();
    let mut last_seen: Option<MatchSnapshot> = None;

    while Instant::now() < deadline {
        std::thread::sleep(POLL_INTERVAL);

        let snapshot = match latest.lock() {
            Ok(lock) => lock.clone(),
            Err(_) => break,
        };
        let Some(snapshot) = snapshot else { continue };

        for event in &snapshot.events {
            report_event(event);
        }

        // The scripted marksman: shoot the closest-to-spawn live enemy.
        if Instant::now() >= next_shot {
            if let Some(enemy) = snapshot
                .enemies
                .iter()
                .find(|e| e.health > 0)
            {
                let _ = tx.send(GameLoopCommand::Player(PlayerCommand::DamageEnemy {
                    enemy_id: enemy.enemy_id,
                    amount: fire_damage,
                }));
            }
            next_shot = Instant::now() + FIRE_INTERVAL;
        }

        let ended = snapshot.state == MatchState::End
            && snapshot
                .events
                .iter()
                .any(|e| matches!(e, MatchEvent::RestartRequested));
        last_seen = Some(snapshot);
        if ended {
            break;
        }
    }

    last_seen
}

fn report_event(event: &MatchEvent) {
    match event {
        MatchEvent::StateChanged { state, round } => {
            eprintln!("state -> {state:?} (round {round:?})");
        }
        MatchEvent::RoundStarted { round, quota } => {
            eprintln!("round {} started, quota {quota}", round + 1);
        }
        MatchEvent::QuotaMet { round, quota } => {
            eprintln!("round {} quota met ({quota} spawned)", round + 1);
        }
        MatchEvent::PlayerDied { player_id } => {
            eprintln!("player {player_id} down");
        }
        MatchEvent::HighScoreUpdated { score } => {
            eprintln!("new high score: {score}");
        }
        _ => {}
    }
}

fn print_summary(snapshot: &MatchSnapshot) {
    println!(
        "match summary: state {:?}, round {:?}, score {} (high {}), {} kills, {:.1}s simulated",
        snapshot.state,
        snapshot.round,
        snapshot.score.score,
        snapshot.score.high_score,
        snapshot.score.enemies_killed,
        snapshot.time.elapsed_secs,
    );
}

fn print_usage() {
    eprintln!(
        "overrun-host: headless OVERRUN match driver\n\
         \n\
         Options:\n\
         \n\
           --seed <N>          RNG seed (default: 42)\n\
           --players <N>       participants to join, 1-4 (default: 1)\n\
           --duration <SECS>   wall-clock run limit (default: 120)\n\
           --rounds <FILE>     JSON round list overriding the built-ins\n\
           --fire-damage <N>   marksman damage per shot (default: 34)\n\
         \n\
         Examples:\n\
         \n\
           overrun-host --players 2 --duration 60\n\
           RUST_LOG=debug overrun-host --rounds rounds.json\n"
    );
}

fn parse_u64(args: &[String], flag: &str, default: u64) -> u64 {
    for i in 0..args.len() {
        if args[i] == flag && i + 1 < args.len() {
            if let Ok(n) = args[i + 1].parse::<u64>() {
                return n;
            }
            eprintln!("Error: {flag} expects a number");
            process::exit(1);
        }
    }
    default
}

fn parse_f64(args: &[String], flag: &str, default: f64) -> f64 {
    for i in 0..args.len() {
        if args[i] == flag && i + 1 < args.len() {
            if let Ok(n) = args[i + 1].parse::<f64>() {
                return n;
            }
            eprintln!("Error: {flag} expects a number");
            process::exit(1);
        }
    }
    default
}

/// Load a round list from `--rounds <FILE>`, if given.
fn load_rounds(args: &[String]) -> Option<Vec<RoundConfig>> {
    for i in 0..args.len() {
        if args[i] == "--rounds" && i + 1 < args.len() {
            let path = &args[i + 1];
            let data = match std::fs::read_to_string(path) {
                Ok(data) => data,
                Err(err) => {
                    eprintln!("Error reading {path}: {err}");
                    process::exit(1);
                }
            };
            match serde_json::from_str::<Vec<RoundConfig>>(&data) {
                Ok(rounds) => return Some(rounds),
                Err(err) => {
                    eprintln!("Error parsing {path}: {err}");
                    process::exit(1);
                }
            }
        }
    }
    None
}
