//! Domain model for the game state store.

pub mod aggregates;
pub mod board;
pub mod commands;
pub mod events;
pub mod state;
