//! Simulation engine for OVERRUN.
//!
//! Owns the hecs ECS world, drives the match state machine and wave
//! spawner each tick, and produces MatchSnapshots for the host.

pub mod director;
pub mod engine;
pub mod registry;
pub mod rounds;
pub mod systems;
pub mod world_setup;

pub use engine::MatchEngine;
pub use overrun_core as core;

#[cfg(test)]
mod tests;
