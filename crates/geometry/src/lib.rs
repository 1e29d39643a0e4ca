//! Geometry primitives for locus.
//!
//! - [`Coordinate`]: validated latitude/longitude pair
//! - [`haversine_distance`]: great-circle distance on a spherical earth
//! - [`GeofenceGeometry`]: closed set of shapes (circle, polygon) that answer
//!   `contains`, `centroid` and `area`
//!
//! All validation happens at construction time. Once a shape exists, every
//! query on it is infallible.
//!
//! # Example
//!
//! ```
//! use locus_geometry::{Coordinate, GeofenceGeometry};
//!
//! let center = Coordinate::new(40.7128, -74.0060).unwrap();
//! let fence = GeofenceGeometry::circle(center, 100.0).unwrap();
//!
//! assert!(fence.contains(&center.offset(0.0, 50.0)));
//! assert!(!fence.contains(&center.offset(0.0, 150.0)));
//! ```

mod coordinate;
mod error;
mod shape;

pub use coordinate::{
    haversine_distance, longitude_delta, normalize_longitude, Coordinate, EARTH_RADIUS_METERS,
};
pub use error::{GeometryError, Result};
pub use shape::{CircleGeometry, GeofenceGeometry, PolygonGeometry};
