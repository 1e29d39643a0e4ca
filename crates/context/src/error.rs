use locus_model::RegionType;
use thiserror::Error;

/// Errors raised while building a context snapshot.
///
/// An empty match (no geofence, place or region) is never an error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ContextError {
    /// A region was supplied for a slot of another type.
    #[error("region '{id}' has type {found} but was placed in the {slot} slot")]
    RegionTypeMismatch {
        id: String,
        slot: RegionType,
        found: RegionType,
    },
}

pub type Result<T> = std::result::Result<T, ContextError>;
