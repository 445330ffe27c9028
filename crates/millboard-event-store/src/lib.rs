//! Millboard event store.
//!
//! Hosts the event streams of any number of games in process memory,
//! keyed by game id.

pub mod memory_event_repository;

pub use memory_event_repository::MemoryEventRepository;
