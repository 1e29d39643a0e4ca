//! Error types for geometry construction.

use thiserror::Error;

/// Result type for geometry operations.
pub type Result<T> = std::result::Result<T, GeometryError>;

/// Errors raised when building coordinates or shapes.
///
/// Queries (`contains`, `distance_to`, ...) never fail; every check happens
/// at construction time.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// Latitude outside [-90, 90] or not finite.
    #[error("invalid latitude {0}: must be within [-90, 90]")]
    InvalidLatitude(f64),

    /// Longitude outside [-180, 180] or not finite.
    #[error("invalid longitude {0}: must be within [-180, 180]")]
    InvalidLongitude(f64),

    /// Circle radius that is zero, negative or not finite.
    #[error("invalid radius {0}: must be a positive number of meters")]
    InvalidRadius(f64),

    /// Polygon ring with fewer than three distinct vertices.
    #[error("polygon needs at least 3 distinct vertices, got {0}")]
    TooFewVertices(usize),
}
