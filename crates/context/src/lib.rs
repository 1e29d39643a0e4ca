//! Context resolution for locus.
//!
//! Given a location fix and read-only candidate sources, this crate builds a
//! [`RadarContext`]:
//! - Geofences containing the point (tightest first, one per id)
//! - Nearest place within a relevance distance
//! - Most specific country / state / DMA / postal code
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Domain Layer                             │
//! │  region.rs   - RegionHierarchy selection (pure)              │
//! │  state.rs    - RadarContext snapshot                         │
//! │  provider.rs - Traits for candidate lookup                   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Application Layer                          │
//! │  resolver.rs - ContextResolver, one call per location fix    │
//! │  limits.rs   - ResolverSettings                              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use locus_context::{ContextResolver, NullProvider};
//! use locus_geometry::{Coordinate, GeofenceGeometry};
//! use locus_model::Geofence;
//!
//! let here = Coordinate::new(40.7128, -74.0060).unwrap();
//! let fences = vec![Geofence::new("hq", GeofenceGeometry::circle(here, 100.0).unwrap())];
//!
//! let resolver = ContextResolver::default();
//! let context = resolver.resolve(&here, &fences, &NullProvider, &NullProvider);
//!
//! assert_eq!(context.primary_geofence().map(|g| g.id.as_str()), Some("hq"));
//! ```

mod error;
mod limits;
mod provider;
mod region;
mod resolver;
mod state;

pub use error::{ContextError, Result};
pub use limits::{ResolverSettings, DEFAULT_MAX_PLACE_DISTANCE_METERS};
pub use provider::{GeofenceSource, NullProvider, PlaceSource, RegionSource};
pub use region::RegionHierarchy;
pub use resolver::ContextResolver;
pub use state::RadarContext;
