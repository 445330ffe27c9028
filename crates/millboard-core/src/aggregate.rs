//! Aggregate root abstraction.

use uuid::Uuid;

use crate::event::DomainEvent;

/// Trait for aggregate roots that reconstitute from event history.
pub trait AggregateRoot: Send + Sync {
    /// The event type this aggregate produces and consumes.
    type Event: DomainEvent;

    /// Returns the aggregate identifier.
    fn aggregate_id(&self) -> Uuid;

    /// Returns the current version (number of events applied).
    fn version(&self) -> i64;

    /// Apply an event, installing the state it describes.
    fn apply(&mut self, event: &Self::Event);

    /// Returns events recorded by command handling but not yet applied or
    /// persisted.
    fn uncommitted_events(&self) -> &[Self::Event];

    /// Clears uncommitted events after persistence.
    fn clear_uncommitted_events(&mut self);

    /// Applies every uncommitted event in order and clears them, returning
    /// the events that were applied.
    fn commit(&mut self) -> Vec<Self::Event>
    where
        Self::Event: Clone,
    {
        let pending = self.uncommitted_events().to_vec();
        for event in &pending {
            self.apply(event);
        }
        self.clear_uncommitted_events();
        pending
    }
}
