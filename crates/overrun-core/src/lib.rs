//! Core types and definitions for the OVERRUN simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! components, commands, round configuration, state snapshots, events,
//! errors, and constants. It has no dependency on the ECS or any runtime
//! framework.

pub mod commands;
pub mod components;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod round;
pub mod state;
pub mod types;
