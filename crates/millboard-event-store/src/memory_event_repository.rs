//! In-memory implementation of the `EventRepository` trait.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use millboard_core::error::DomainError;
use millboard_core::repository::{EventRepository, StoredEvent};

/// Event repository that keeps every stream in a mutex-guarded map.
///
/// Appends are checked against the stream length: an append whose
/// `expected_version` differs from the number of stored events is rejected
/// with `DomainError::ConcurrencyConflict` and writes nothing.
#[derive(Debug, Default)]
pub struct MemoryEventRepository {
    streams: Mutex<HashMap<Uuid, Vec<StoredEvent>>>,
}

impl MemoryEventRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the ids of every stream holding at least one event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the internal lock is poisoned.
    pub fn aggregate_ids(&self) -> Result<Vec<Uuid>, DomainError> {
        let streams = self.lock()?;
        let mut ids: Vec<Uuid> = streams
            .iter()
            .filter(|(_, events)| !events.is_empty())
            .map(|(id, _)| *id)
            .collect();
        ids.sort();
        Ok(ids)
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<Uuid, Vec<StoredEvent>>>, DomainError> {
        self.streams
            .lock()
            .map_err(|e| DomainError::Infrastructure(format!("event store lock poisoned: {e}")))
    }
}

#[async_trait]
impl EventRepository for MemoryEventRepository {
    async fn load_events(&self, aggregate_id: Uuid) -> Result<Vec<StoredEvent>, DomainError> {
        let streams = self.lock()?;
        Ok(streams.get(&aggregate_id).cloned().unwrap_or_default())
    }

    async fn append_events(
        &self,
        aggregate_id: Uuid,
        expected_version: i64,
        events: &[StoredEvent],
    ) -> Result<(), DomainError> {
        if events.is_empty() {
            return Ok(());
        }

        let mut streams = self.lock()?;
        let stream = streams.entry(aggregate_id).or_default();

        let actual = i64::try_from(stream.len())
            .map_err(|e| DomainError::Infrastructure(format!("stream too long: {e}")))?;
        if actual != expected_version {
            return Err(DomainError::ConcurrencyConflict {
                aggregate_id,
                expected: expected_version,
                actual,
            });
        }

        stream.extend_from_slice(events);
        debug!(%aggregate_id, appended = events.len(), version = stream.len(), "events appended");
        Ok(())
    }
}
