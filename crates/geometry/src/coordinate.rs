//! Geographic coordinates and great-circle distance.

use crate::error::{GeometryError, Result};
use serde::{Deserialize, Serialize};

/// Mean earth radius used for every distance computation (meters).
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// A validated (latitude, longitude) pair in degrees.
///
/// Serialized as `{ "lat": .., "lng": .. }`. Deserialization goes through
/// [`Coordinate::new`], so out-of-range input is rejected on the way in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    lat: f64,
    lng: f64,
}

#[derive(Deserialize)]
struct RawCoordinate {
    lat: f64,
    lng: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = GeometryError;

    fn try_from(raw: RawCoordinate) -> Result<Self> {
        Coordinate::new(raw.lat, raw.lng)
    }
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(GeometryError::InvalidLatitude(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(GeometryError::InvalidLongitude(longitude));
        }
        Ok(Self {
            lat: latitude,
            lng: longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.lat
    }

    pub fn longitude(&self) -> f64 {
        self.lng
    }

    /// Great-circle distance to `other` in meters.
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        haversine_distance(self, other)
    }

    /// Destination reached by travelling `distance_meters` from here along
    /// the initial `bearing_degrees` (0 = north, 90 = east).
    ///
    /// Longitude is wrapped into [-180, 180); latitude is clamped at the poles.
    /// A non-finite bearing or distance leaves the coordinate where it is.
    pub fn offset(&self, bearing_degrees: f64, distance_meters: f64) -> Coordinate {
        if !bearing_degrees.is_finite() || !distance_meters.is_finite() {
            return *self;
        }
        let angular = distance_meters / EARTH_RADIUS_METERS;
        let bearing = bearing_degrees.to_radians();
        let lat1 = self.lat.to_radians();
        let lng1 = self.lng.to_radians();

        let sin_lat2 = (lat1.sin() * angular.cos() + lat1.cos() * angular.sin() * bearing.cos())
            .clamp(-1.0, 1.0);
        let lat2 = sin_lat2.asin();
        let lng2 = lng1
            + (bearing.sin() * angular.sin() * lat1.cos())
                .atan2(angular.cos() - lat1.sin() * sin_lat2);

        Coordinate {
            lat: lat2.to_degrees().clamp(-90.0, 90.0),
            lng: normalize_longitude(lng2.to_degrees()),
        }
    }
}

/// Wraps any finite longitude into [-180, 180).
pub fn normalize_longitude(longitude: f64) -> f64 {
    (longitude + 180.0).rem_euclid(360.0) - 180.0
}

/// Signed east-positive difference `to - from` in degrees, taking the short
/// way around the antimeridian. Always within [-180, 180).
pub fn longitude_delta(from: f64, to: f64) -> f64 {
    normalize_longitude(to - from)
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}

/// Haversine distance between two coordinates in meters, on a sphere of
/// radius [`EARTH_RADIUS_METERS`].
pub fn haversine_distance(a: &Coordinate, b: &Coordinate) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    // Rounding can push h a hair above 1.0 for antipodal points.
    let c = 2.0 * h.sqrt().min(1.0).asin();
    EARTH_RADIUS_METERS * c
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).unwrap()
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert_eq!(
            Coordinate::new(90.5, 0.0),
            Err(GeometryError::InvalidLatitude(90.5))
        );
        assert_eq!(
            Coordinate::new(0.0, -180.1),
            Err(GeometryError::InvalidLongitude(-180.1))
        );
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(-90.0, 180.0).is_ok());
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        let p = coord(40.7128, -74.0060);
        assert_eq!(p.distance_to(&p), 0.0);
    }

    #[test]
    fn test_one_degree_at_equator() {
        let d = haversine_distance(&coord(0.0, 0.0), &coord(0.0, 1.0));
        // 2 * pi * R / 360
        assert!((d - 111_194.93).abs() < 1.0, "got {d}");
    }

    #[test]
    fn test_known_city_distance() {
        // New York -> London, roughly 5570 km on a sphere.
        let nyc = coord(40.7128, -74.0060);
        let london = coord(51.5074, -0.1278);
        let d = nyc.distance_to(&london) / 1000.0;
        assert!((5_550.0..5_590.0).contains(&d), "got {d} km");
    }

    #[test]
    fn test_offset_round_trips_distance() {
        let origin = coord(37.422, -122.084);
        for bearing in [0.0, 45.0, 90.0, 180.0, 270.0] {
            let moved = origin.offset(bearing, 250.0);
            let d = origin.distance_to(&moved);
            assert!((d - 250.0).abs() < 0.01, "bearing {bearing}: {d}");
        }
    }

    #[test]
    fn test_offset_wraps_antimeridian() {
        let p = coord(0.0, 179.999).offset(90.0, 1_000.0);
        assert!(p.longitude() < -179.0);
    }

    #[test]
    fn test_offset_guards_bad_input() {
        let p = coord(10.0, 20.0);
        assert_eq!(p.offset(f64::NAN, 100.0), p);
        assert_eq!(p.offset(90.0, f64::INFINITY), p);

        // Half way around the globe and more, longitude stays in range.
        let far = coord(0.0, 170.0).offset(90.0, 30_000_000.0);
        assert!((-180.0..180.0).contains(&far.longitude()), "{far}");
        assert!(Coordinate::new(far.latitude(), far.longitude()).is_ok());
    }

    #[test]
    fn test_longitude_helpers() {
        assert_eq!(normalize_longitude(190.0), -170.0);
        assert_eq!(normalize_longitude(-540.0), -180.0);
        assert_eq!(normalize_longitude(45.0), 45.0);
        assert!((longitude_delta(179.9, -179.9) - 0.2).abs() < 1e-9);
        assert!((longitude_delta(-179.9, 179.9) + 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Coordinate = serde_json::from_str(r#"{"lat": 1.5, "lng": 2.5}"#).unwrap();
        assert_eq!(ok, coord(1.5, 2.5));

        let bad = serde_json::from_str::<Coordinate>(r#"{"lat": 100.0, "lng": 0.0}"#);
        assert!(bad.is_err());
    }
}
