//! Resolution limits and tunables.
//!
//! Single place for the numbers that shape a resolved context.

use serde::{Deserialize, Serialize};

/// Places further than this from the fix are not considered (meters).
pub const DEFAULT_MAX_PLACE_DISTANCE_METERS: f64 = 100.0;

/// Tunables for [`crate::ContextResolver`].
///
/// Missing fields fall back to their defaults when loaded from JSON.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResolverSettings {
    /// Maximum distance between the fix and the selected place, in meters.
    pub max_place_distance_meters: f64,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            max_place_distance_meters: DEFAULT_MAX_PLACE_DISTANCE_METERS,
        }
    }
}
