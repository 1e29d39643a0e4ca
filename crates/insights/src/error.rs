//! Error types for the insights learner.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Result type for insights operations.
pub type InsightsResult<T> = Result<T, InsightsError>;

/// Errors that can occur while configuring or feeding the learner.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InsightsError {
    /// Sample older than the last ingested one. The learner state is left
    /// untouched; the caller decides whether to drop or re-sort.
    #[error("sample at {received} is older than the last ingested sample at {last}")]
    OutOfOrder {
        last: DateTime<Utc>,
        received: DateTime<Utc>,
    },

    /// Settings that cannot drive the learner.
    #[error("invalid insights setting '{field}': {message}")]
    InvalidSettings {
        field: &'static str,
        message: String,
    },

    /// Serialized insights with a location in the wrong slot.
    #[error("{slot} slot holds a {found} location")]
    LocationKindMismatch {
        slot: &'static str,
        found: &'static str,
    },
}
