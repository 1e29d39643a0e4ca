//! Travel modes and straight-line route estimates.

use crate::{DistanceUnits, Result, Route, RouteDistance, RouteDuration};
use locus_geometry::Coordinate;
use serde::{Deserialize, Serialize};

/// Ratio between road distance and great-circle distance used by estimates.
pub const DETOUR_FACTOR: f64 = 1.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteMode {
    Foot,
    Bike,
    Car,
    Truck,
    Motorbike,
}

impl RouteMode {
    /// Nominal urban travel speed in meters per second.
    pub fn nominal_speed_mps(&self) -> f64 {
        match self {
            RouteMode::Foot => 1.4,
            RouteMode::Bike => 4.5,
            RouteMode::Car => 11.0,
            RouteMode::Truck => 9.0,
            RouteMode::Motorbike => 12.0,
        }
    }
}

impl std::fmt::Display for RouteMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            RouteMode::Foot => "foot",
            RouteMode::Bike => "bike",
            RouteMode::Car => "car",
            RouteMode::Truck => "truck",
            RouteMode::Motorbike => "motorbike",
        };
        f.write_str(label)
    }
}

/// Rough route between two points: great-circle distance times
/// [`DETOUR_FACTOR`], driven at the mode's nominal speed.
pub fn estimate_route(
    origin: &Coordinate,
    destination: &Coordinate,
    mode: RouteMode,
    units: DistanceUnits,
) -> Result<Route> {
    let meters = origin.distance_to(destination) * DETOUR_FACTOR;
    let minutes = meters / mode.nominal_speed_mps() / 60.0;
    Ok(Route::new(
        RouteDistance::from_meters(meters, units)?,
        RouteDuration::from_minutes(minutes)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_scales_with_mode() {
        let a = Coordinate::new(37.422, -122.084).unwrap();
        let b = a.offset(90.0, 5_000.0);

        let walk = estimate_route(&a, &b, RouteMode::Foot, DistanceUnits::Metric).unwrap();
        let drive = estimate_route(&a, &b, RouteMode::Car, DistanceUnits::Metric).unwrap();

        assert!((walk.distance.meters() - 6_500.0).abs() < 1.0);
        assert_eq!(walk.distance.text(), "6.5 km");
        assert!(drive.is_faster_than(&walk));
        assert!(!drive.is_shorter_than(&walk));
    }

    #[test]
    fn test_estimate_same_point() {
        let a = Coordinate::new(0.0, 0.0).unwrap();
        let r = estimate_route(&a, &a, RouteMode::Bike, DistanceUnits::Imperial).unwrap();
        assert_eq!(r.distance.meters(), 0.0);
        assert_eq!(r.duration.text(), "0 mins");
    }
}
