//! Lookup capabilities the resolver reads from.
//!
//! These traits abstract the spatial index / reverse-geocode services that
//! produce candidates, so resolution stays pure and testable against fixed
//! fixtures. Implementations may pre-filter by proximity; the resolver still
//! checks containment and distance itself.

use locus_geometry::Coordinate;
use locus_model::{Geofence, Place, Region};

/// Source of geofence candidates for a point.
pub trait GeofenceSource: Send + Sync {
    fn geofences_near(&self, point: &Coordinate) -> Vec<&Geofence>;
}

/// Source of place candidates for a point.
pub trait PlaceSource: Send + Sync {
    fn places_near(&self, point: &Coordinate) -> Vec<&Place>;
}

/// Source of administrative region candidates for a point.
pub trait RegionSource: Send + Sync {
    fn regions_near(&self, point: &Coordinate) -> Vec<&Region>;
}

// Plain collections act as unfiltered sources.

impl GeofenceSource for [Geofence] {
    fn geofences_near(&self, _point: &Coordinate) -> Vec<&Geofence> {
        self.iter().collect()
    }
}

impl GeofenceSource for Vec<Geofence> {
    fn geofences_near(&self, point: &Coordinate) -> Vec<&Geofence> {
        self.as_slice().geofences_near(point)
    }
}

impl PlaceSource for [Place] {
    fn places_near(&self, _point: &Coordinate) -> Vec<&Place> {
        self.iter().collect()
    }
}

impl PlaceSource for Vec<Place> {
    fn places_near(&self, point: &Coordinate) -> Vec<&Place> {
        self.as_slice().places_near(point)
    }
}

impl RegionSource for [Region] {
    fn regions_near(&self, _point: &Coordinate) -> Vec<&Region> {
        self.iter().collect()
    }
}

impl RegionSource for Vec<Region> {
    fn regions_near(&self, point: &Coordinate) -> Vec<&Region> {
        self.as_slice().regions_near(point)
    }
}

/// Null implementation for callers with no catalog of a given kind.
pub struct NullProvider;

impl GeofenceSource for NullProvider {
    fn geofences_near(&self, _point: &Coordinate) -> Vec<&Geofence> {
        Vec::new()
    }
}

impl PlaceSource for NullProvider {
    fn places_near(&self, _point: &Coordinate) -> Vec<&Place> {
        Vec::new()
    }
}

impl RegionSource for NullProvider {
    fn regions_near(&self, _point: &Coordinate) -> Vec<&Region> {
        Vec::new()
    }
}
