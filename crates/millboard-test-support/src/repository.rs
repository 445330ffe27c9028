//! Test repositories — mock `EventRepository` implementations for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use millboard_core::error::DomainError;
use millboard_core::repository::{EventRepository, StoredEvent};
use uuid::Uuid;

/// An event repository seeded with a fixed history. `load_events` always
/// returns the seed; every `append_events` call is recorded and succeeds.
#[derive(Debug)]
pub struct RecordingEventRepository {
    seed: Vec<StoredEvent>,
    appended: Mutex<Vec<(Uuid, i64, Vec<StoredEvent>)>>,
}

impl RecordingEventRepository {
    /// Create a recording repository whose streams all read as `seed`.
    #[must_use]
    pub fn new(seed: Vec<StoredEvent>) -> Self {
        Self {
            seed,
            appended: Mutex::new(Vec::new()),
        }
    }

    /// Returns a snapshot of all `(aggregate_id, expected_version, events)`
    /// appends.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn appended_events(&self) -> Vec<(Uuid, i64, Vec<StoredEvent>)> {
        self.appended.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventRepository for RecordingEventRepository {
    async fn load_events(&self, _aggregate_id: Uuid) -> Result<Vec<StoredEvent>, DomainError> {
        Ok(self.seed.clone())
    }

    async fn append_events(
        &self,
        aggregate_id: Uuid,
        expected_version: i64,
        events: &[StoredEvent],
    ) -> Result<(), DomainError> {
        self.appended
            .lock()
            .unwrap()
            .push((aggregate_id, expected_version, events.to_vec()));
        Ok(())
    }
}

/// An event repository that always returns an empty event list and silently
/// accepts appends. Useful for "game not found" scenarios and for starting
/// new games.
#[derive(Debug)]
pub struct EmptyEventRepository;

#[async_trait]
impl EventRepository for EmptyEventRepository {
    async fn load_events(&self, _aggregate_id: Uuid) -> Result<Vec<StoredEvent>, DomainError> {
        Ok(vec![])
    }

    async fn append_events(
        &self,
        _aggregate_id: Uuid,
        _expected_version: i64,
        _events: &[StoredEvent],
    ) -> Result<(), DomainError> {
        Ok(())
    }
}

/// An event repository whose appends always fail with an infrastructure
/// error. Without a seed, loads fail as well; with one, loads return it so a
/// command gets as far as persistence.
#[derive(Debug, Default)]
pub struct FailingEventRepository {
    seed: Vec<StoredEvent>,
}

impl FailingEventRepository {
    /// Create a failing repository whose loads return `seed`.
    #[must_use]
    pub fn with_history(seed: Vec<StoredEvent>) -> Self {
        Self { seed }
    }
}

#[async_trait]
impl EventRepository for FailingEventRepository {
    async fn load_events(&self, _aggregate_id: Uuid) -> Result<Vec<StoredEvent>, DomainError> {
        if self.seed.is_empty() {
            return Err(DomainError::Infrastructure("connection refused".into()));
        }
        Ok(self.seed.clone())
    }

    async fn append_events(
        &self,
        _aggregate_id: Uuid,
        _expected_version: i64,
        _events: &[StoredEvent],
    ) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }
}
