//! Shared test mocks and utilities for the Millboard game state store.

mod clock;
mod repository;
mod telemetry;

pub use clock::{FixedClock, fixed_now};
pub use repository::{EmptyEventRepository, FailingEventRepository, RecordingEventRepository};
pub use telemetry::init_tracing;
