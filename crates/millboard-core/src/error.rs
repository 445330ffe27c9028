//! Domain error types.

use thiserror::Error;
use uuid::Uuid;

/// Top-level domain error type.
///
/// Every rejected command surfaces as one of these variants and leaves the
/// aggregate's previous state in place.
#[derive(Debug, Error)]
pub enum DomainError {
    /// An aggregate was not found.
    #[error("aggregate not found: {0}")]
    AggregateNotFound(Uuid),

    /// Optimistic concurrency conflict.
    #[error("concurrency conflict on aggregate {aggregate_id}: expected version {expected}, found {actual}")]
    ConcurrencyConflict {
        /// The aggregate that had the conflict.
        aggregate_id: Uuid,
        /// The expected version.
        expected: i64,
        /// The actual version found.
        actual: i64,
    },

    /// A command violated a precondition of the current state.
    #[error("validation error: {0}")]
    Validation(String),

    /// A command argument had the wrong shape (e.g. an index off the board).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_display_includes_message() {
        let err = DomainError::InvalidArgument("location 24 is off the board".into());
        assert_eq!(
            err.to_string(),
            "invalid argument: location 24 is off the board"
        );
    }

    #[test]
    fn test_concurrency_conflict_display_includes_versions() {
        let id = Uuid::nil();
        let err = DomainError::ConcurrencyConflict {
            aggregate_id: id,
            expected: 1,
            actual: 3,
        };
        assert_eq!(
            err.to_string(),
            format!("concurrency conflict on aggregate {id}: expected version 1, found 3")
        );
    }
}
