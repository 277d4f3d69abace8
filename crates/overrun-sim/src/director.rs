//! Match director — the top-level match state machine.
//!
//! Decides state transitions from the participant roster and the spawn
//! registry; the engine executes the exit/entry actions and publishes the
//! resulting events. One transition is evaluated per tick.

use overrun_core::enums::MatchState;

use crate::registry::SpawnRegistry;

/// What the director wants the engine to do after a poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectorSignal {
    /// Nothing this tick.
    None,
    /// Transition to the given state (exit + entry actions, then notify).
    Transition(MatchState),
    /// The End restart delay elapsed; the host should reload the match.
    RequestRestart,
}

/// Top-level match flow state.
#[derive(Debug)]
pub struct MatchDirector {
    state: MatchState,
    /// Zero-based round index; None until the first round starts.
    round: Option<u32>,
    /// Countdown used by Warmup, the InProgress end conditions, and End.
    transition_timer: f64,
    warmup_delay_secs: f64,
    end_delay_secs: f64,
    restart_delay_secs: f64,
    restart_requested: bool,
}

impl MatchDirector {
    pub fn new(warmup_delay_secs: f64, end_delay_secs: f64, restart_delay_secs: f64) -> Self {
        Self {
            state: MatchState::Waiting,
            round: None,
            transition_timer: 0.0,
            warmup_delay_secs,
            end_delay_secs,
            restart_delay_secs,
            restart_requested: false,
        }
    }

    pub fn state(&self) -> MatchState {
        self.state
    }

    pub fn round(&self) -> Option<u32> {
        self.round
    }

    /// Evaluate the state machine for one tick. The timer only counts down
    /// inside the branches that are waiting on it, so an end condition that
    /// stops holding stops the countdown with it.
    pub fn poll(
        &mut self,
        dt: f64,
        players_joined: usize,
        any_player_alive: bool,
        registry: &SpawnRegistry,
        rounds_configured: usize,
    ) -> DirectorSignal {
        match self.state {
            MatchState::Waiting => {
                if players_joined > 0 {
                    return DirectorSignal::Transition(MatchState::Warmup);
                }
            }
            MatchState::Warmup => {
                self.transition_timer -= dt;
                if self.transition_timer <= 0.0 {
                    return DirectorSignal::Transition(MatchState::InProgress);
                }
            }
            MatchState::InProgress => {
                if !any_player_alive {
                    self.transition_timer -= dt;
                    if self.transition_timer <= 0.0 {
                        return DirectorSignal::Transition(MatchState::End);
                    }
                } else if registry.is_cleared() {
                    let next_round = self.round.map_or(0, |r| r + 1) as usize;
                    if next_round < rounds_configured {
                        return DirectorSignal::Transition(MatchState::Warmup);
                    }
                    self.transition_timer -= dt;
                    if self.transition_timer <= 0.0 {
                        return DirectorSignal::Transition(MatchState::End);
                    }
                }
            }
            MatchState::End => {
                self.transition_timer -= dt;
                if self.transition_timer <= 0.0 && !self.restart_requested {
                    self.restart_requested = true;
                    return DirectorSignal::RequestRestart;
                }
            }
        }
        DirectorSignal::None
    }

    /// Commit a transition decided by `poll`. Called by the engine after it
    /// has run the exit actions for the old state; the engine runs the entry
    /// actions after this returns.
    pub fn set_state(&mut self, next: MatchState) {
        self.state = next;
        match next {
            MatchState::Waiting | MatchState::Warmup => {
                self.transition_timer = self.warmup_delay_secs;
            }
            MatchState::InProgress => {
                self.transition_timer = self.end_delay_secs;
            }
            MatchState::End => {
                self.transition_timer = self.restart_delay_secs;
            }
        }
    }

    /// Advance to the next round index. Called on InProgress entry.
    pub fn advance_round(&mut self) -> u32 {
        let next = self.round.map_or(0, |r| r + 1);
        self.round = Some(next);
        next
    }

    /// Return to the pre-match state, keeping nothing but the configuration.
    pub fn reset(&mut self) {
        self.state = MatchState::Waiting;
        self.round = None;
        self.transition_timer = 0.0;
        self.restart_requested = false;
    }
}
