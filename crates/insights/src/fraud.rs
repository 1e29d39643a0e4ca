//! Per-sample fraud flags.

use crate::types::LocationSample;
use chrono::{DateTime, Utc};
use locus_geometry::Coordinate;
use serde::{Deserialize, Serialize};

/// Fraud assessment of the latest sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Fraud {
    /// Reported through a proxy or VPN.
    pub proxy: bool,
    /// Location reported as simulated by the OS.
    pub mocked: bool,
    /// Device integrity check failed.
    pub compromised: bool,
    /// Implausible speed since the previous trusted fix.
    pub jumped: bool,
}

impl Fraud {
    /// Whether the sample may be used as evidence.
    pub fn is_trusted(&self) -> bool {
        !self.mocked && !self.jumped
    }
}

/// Last fix accepted as evidence, reference point for jump detection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub(crate) struct TrustedFix {
    pub timestamp: DateTime<Utc>,
    pub location: Coordinate,
}

/// Flags a sample, comparing it with the previous trusted fix.
///
/// Two fixes at the same instant are a jump once they are further apart than
/// `same_instant_tolerance_meters`.
pub(crate) fn assess(
    sample: &LocationSample,
    previous: Option<&TrustedFix>,
    max_speed_mps: f64,
    same_instant_tolerance_meters: f64,
) -> Fraud {
    let jumped = previous.is_some_and(|prev| {
        let meters = prev.location.distance_to(&sample.location);
        let seconds = (sample.timestamp - prev.timestamp).num_milliseconds() as f64 / 1_000.0;
        if seconds <= 0.0 {
            meters > same_instant_tolerance_meters
        } else {
            meters / seconds > max_speed_mps
        }
    });

    Fraud {
        proxy: sample.proxy,
        mocked: sample.mocked,
        compromised: sample.compromised,
        jumped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fix(secs: i64, lat: f64, lng: f64) -> TrustedFix {
        TrustedFix {
            timestamp: Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap(),
            location: Coordinate::new(lat, lng).unwrap(),
        }
    }

    fn sample(secs: i64, lat: f64, lng: f64) -> LocationSample {
        let f = fix(secs, lat, lng);
        LocationSample::new(f.timestamp, f.location)
    }

    #[test]
    fn test_first_sample_never_jumps() {
        let fraud = assess(&sample(0, 10.0, 10.0), None, 350.0, 150.0);
        assert!(!fraud.jumped);
        assert!(fraud.is_trusted());
    }

    #[test]
    fn test_teleport_is_flagged() {
        let prev = fix(0, 40.7128, -74.0060);
        // New York to London in one minute.
        let fraud = assess(&sample(60, 51.5074, -0.1278), Some(&prev), 350.0, 150.0);
        assert!(fraud.jumped);
        assert!(!fraud.is_trusted());
    }

    #[test]
    fn test_driving_is_not_flagged() {
        let prev = fix(0, 40.7128, -74.0060);
        let moved = prev.location.offset(90.0, 1_500.0);
        let s = LocationSample::new(prev.timestamp + chrono::Duration::seconds(120), moved);
        assert!(!assess(&s, Some(&prev), 350.0, 150.0).jumped);
    }

    #[test]
    fn test_same_instant_tolerance() {
        let prev = fix(0, 0.0, 0.0);
        let near = LocationSample::new(prev.timestamp, prev.location.offset(0.0, 40.0));
        let far = LocationSample::new(prev.timestamp, prev.location.offset(0.0, 4_000.0));
        assert!(!assess(&near, Some(&prev), 350.0, 150.0).jumped);
        assert!(assess(&far, Some(&prev), 350.0, 150.0).jumped);
    }

    #[test]
    fn test_flags_carried_from_sample() {
        let mut s = sample(0, 1.0, 1.0).mocked();
        s.proxy = true;
        let fraud = assess(&s, None, 350.0, 150.0);
        assert!(fraud.mocked && fraud.proxy && !fraud.compromised);
        assert!(!fraud.is_trusted());
    }
}
