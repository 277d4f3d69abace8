//! Game loop thread — runs the match engine at 30Hz and publishes snapshots.
//!
//! The engine is moved into the thread; commands arrive via `mpsc` channel
//! and the latest snapshot is stored in shared state for synchronous
//! polling by the driver.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use overrun_core::commands::PlayerCommand;
use overrun_core::constants::{DT, TICK_RATE};
use overrun_core::state::MatchSnapshot;
use overrun_sim::MatchEngine;

/// Nominal duration of one tick.
const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Commands accepted by the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// Forward a command to the engine at the next tick boundary.
    Player(PlayerCommand),
    /// Stop the loop and let the thread exit.
    Shutdown,
}

/// Spawns the game loop in a new thread.
///
/// Returns the command sender and the join handle for a clean shutdown.
pub fn spawn_game_loop(
    engine: MatchEngine,
    latest_snapshot: Arc<Mutex<Option<MatchSnapshot>>>,
) -> (mpsc::Sender<GameLoopCommand>, JoinHandle<()>) {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    let handle = std::thread::Builder::new()
        .name("overrun-game-loop".into())
        .spawn(move || {
            run_game_loop(engine, cmd_rx, &latest_snapshot);
        })
        .expect("failed to spawn game loop thread");

    (cmd_tx, handle)
}

/// The game loop. Runs until a Shutdown command or channel disconnect.
fn run_game_loop(
    mut engine: MatchEngine,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &Mutex<Option<MatchSnapshot>>,
) {
    log::info!("game loop running at {TICK_RATE}Hz");
    let mut next_tick_time = Instant::now();

    loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::Player(cmd)) => engine.queue_command(cmd),
                Ok(GameLoopCommand::Shutdown) => return,
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => return,
            }
        }

        // 2. Advance one tick
        let snapshot = engine.tick(DT);

        // 3. Store the latest snapshot for synchronous polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot);
        }

        // 4. Sleep until the next tick
        next_tick_time += TICK_DURATION;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > TICK_DURATION * 2 {
            // Too far behind — reset to avoid a catch-up spiral
            next_tick_time = now;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use overrun_core::enums::MatchState;
    use overrun_sim::engine::MatchConfig;

    #[test]
    fn test_command_channel_round_trip() {
        let (tx, rx) = mpsc::channel::<GameLoopCommand>();

        tx.send(GameLoopCommand::Player(PlayerCommand::JoinMatch {
            player_id: 0,
        }))
        .unwrap();
        tx.send(GameLoopCommand::Player(PlayerCommand::RestartMatch))
            .unwrap();
        tx.send(GameLoopCommand::Shutdown).unwrap();

        let mut commands = Vec::new();
        while let Ok(cmd) = rx.try_recv() {
            commands.push(cmd);
        }

        assert_eq!(commands.len(), 3);
        assert!(matches!(
            commands[0],
            GameLoopCommand::Player(PlayerCommand::JoinMatch { player_id: 0 })
        ));
        assert!(matches!(commands[2], GameLoopCommand::Shutdown));
    }

    #[test]
    fn test_tick_duration_constant() {
        // 30Hz = 33.333ms per tick
        let expected_nanos = 1_000_000_000u64 / 30;
        assert_eq!(TICK_DURATION.as_nanos(), expected_nanos as u128);
    }

    #[test]
    fn test_loop_thread_publishes_snapshots() {
        let engine = MatchEngine::new(MatchConfig::default()).unwrap();
        let latest = Arc::new(Mutex::new(None));
        let (tx, handle) = spawn_game_loop(engine, Arc::clone(&latest));

        tx.send(GameLoopCommand::Player(PlayerCommand::JoinMatch {
            player_id: 0,
        }))
        .unwrap();

        // Give the loop a few ticks to publish.
        let deadline = Instant::now() + Duration::from_secs(2);
        let mut got_warmup = false;
        while Instant::now() < deadline {
            if let Some(snapshot) = latest.lock().unwrap().clone() {
                if snapshot.state != MatchState::Waiting {
                    got_warmup = true;
                    break;
                }
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        assert!(got_warmup, "loop should process the join and leave Waiting");

        tx.send(GameLoopCommand::Shutdown).unwrap();
        handle.join().unwrap();
    }
}
