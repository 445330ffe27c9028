//! Millboard Core — shared domain abstractions.
//!
//! Traits and types that the game bounded context and its infrastructure
//! depend on. Nothing in this crate knows about the board itself.

pub mod aggregate;
pub mod clock;
pub mod command;
pub mod error;
pub mod event;
pub mod repository;
