//! Route cost model.
//!
//! Value objects for route distance and duration, each carrying a numeric
//! value and a human-readable text. Comparisons always use the numeric value.
//! Also provides rough route estimates per travel mode and the duration band
//! used to recognise commutes.

mod band;
mod error;
mod mode;
mod value;

pub use band::DurationBand;
pub use error::{Result, RouteError};
pub use mode::{estimate_route, RouteMode, DETOUR_FACTOR};
pub use value::{DistanceUnits, Route, RouteDistance, RouteDuration};
