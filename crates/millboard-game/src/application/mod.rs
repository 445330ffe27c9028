//! Application layer: command and query handlers for repository-hosted games.

pub mod command_handlers;
pub mod query_handlers;
