//! Error types for route values.

use thiserror::Error;

/// Result type for route operations.
pub type Result<T> = std::result::Result<T, RouteError>;

/// Errors raised when building route values or duration bands.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteError {
    /// Distance or duration that is negative or not finite.
    #[error("invalid {field} value {value}: must be finite and non-negative")]
    InvalidValue { field: &'static str, value: f64 },

    /// Band whose lower bound exceeds its upper bound.
    #[error("invalid duration band: min {min} exceeds max {max}")]
    InvalidBand { min: f64, max: f64 },
}
