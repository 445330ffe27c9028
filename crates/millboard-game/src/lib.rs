//! Millboard — game state store bounded context.
//!
//! Bookkeeping for a two-player mill game on the fixed 24-point board:
//! whose turn it is, how many pieces each side has left, the caller-managed
//! phase, and what sits on (and is highlighted at) every position. Legality,
//! mill detection, and victory are decided by the caller; the store records
//! the consequences it is told about.

pub mod application;
pub mod config;
pub mod domain;
pub mod store;

pub use config::{ConfigError, GameConfig};
pub use domain::board::{BOARD_SIZE, Board, Cell, Color, Phase, Position};
pub use domain::commands::GameCommand;
pub use domain::state::GameState;
pub use store::{GameStore, SharedGameStore, SubscriptionId};
