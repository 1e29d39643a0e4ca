use crate::{Result, RouteDuration, RouteError};
use serde::{Deserialize, Serialize};

/// Inclusive range of acceptable travel durations, in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBand", rename_all = "camelCase")]
pub struct DurationBand {
    min_minutes: f64,
    max_minutes: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBand {
    min_minutes: f64,
    max_minutes: f64,
}

impl TryFrom<RawBand> for DurationBand {
    type Error = RouteError;

    fn try_from(raw: RawBand) -> Result<Self> {
        Self::new(raw.min_minutes, raw.max_minutes)
    }
}

impl DurationBand {
    pub fn new(min_minutes: f64, max_minutes: f64) -> Result<Self> {
        for (field, value) in [("band min", min_minutes), ("band max", max_minutes)] {
            if !value.is_finite() || value < 0.0 {
                return Err(RouteError::InvalidValue { field, value });
            }
        }
        if min_minutes > max_minutes {
            return Err(RouteError::InvalidBand {
                min: min_minutes,
                max: max_minutes,
            });
        }
        Ok(Self {
            min_minutes,
            max_minutes,
        })
    }

    pub fn min_minutes(&self) -> f64 {
        self.min_minutes
    }

    pub fn max_minutes(&self) -> f64 {
        self.max_minutes
    }

    pub fn contains(&self, duration: &RouteDuration) -> bool {
        self.contains_minutes(duration.minutes())
    }

    pub fn contains_minutes(&self, minutes: f64) -> bool {
        (self.min_minutes..=self.max_minutes).contains(&minutes)
    }
}

impl Default for DurationBand {
    /// 5 to 90 minutes door to door.
    fn default() -> Self {
        Self {
            min_minutes: 5.0,
            max_minutes: 90.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_bounds_inclusive() {
        let band = DurationBand::new(10.0, 45.0).unwrap();
        assert!(band.contains(&RouteDuration::from_minutes(10.0).unwrap()));
        assert!(band.contains(&RouteDuration::from_minutes(45.0).unwrap()));
        assert!(!band.contains(&RouteDuration::from_minutes(45.5).unwrap()));
        assert!(!band.contains_minutes(9.9));
    }

    #[test]
    fn test_band_rejects_inverted() {
        assert_eq!(
            DurationBand::new(30.0, 10.0),
            Err(RouteError::InvalidBand {
                min: 30.0,
                max: 10.0
            })
        );
        assert!(DurationBand::new(-1.0, 10.0).is_err());
    }

    #[test]
    fn test_band_json() {
        let band: DurationBand =
            serde_json::from_str(r#"{"minMinutes": 5, "maxMinutes": 60}"#).unwrap();
        assert_eq!(band.max_minutes(), 60.0);
        assert!(serde_json::from_str::<DurationBand>(r#"{"minMinutes": 9, "maxMinutes": 1}"#)
            .is_err());
    }
}
