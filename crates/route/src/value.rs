//! Distance and duration values.

use crate::{Result, RouteError};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

const FEET_PER_METER: f64 = 3.280_84;
const FEET_PER_MILE: f64 = 5_280.0;

/// Unit system used when formatting distances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnits {
    #[default]
    Metric,
    Imperial,
}

fn check(field: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(RouteError::InvalidValue { field, value })
    }
}

/// Distance of a route. `value` is always meters; `text` is display-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawValue")]
pub struct RouteDistance {
    value: f64,
    text: String,
}

/// Duration of a route. `value` is always minutes; `text` is display-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawValue")]
pub struct RouteDuration {
    value: f64,
    text: String,
}

#[derive(Deserialize)]
struct RawValue {
    value: f64,
    text: String,
}

impl TryFrom<RawValue> for RouteDistance {
    type Error = RouteError;

    fn try_from(raw: RawValue) -> Result<Self> {
        Self::new(raw.value, raw.text)
    }
}

impl TryFrom<RawValue> for RouteDuration {
    type Error = RouteError;

    fn try_from(raw: RawValue) -> Result<Self> {
        Self::new(raw.value, raw.text)
    }
}

impl RouteDistance {
    pub fn new(meters: f64, text: impl Into<String>) -> Result<Self> {
        Ok(Self {
            value: check("distance", meters)?,
            text: text.into(),
        })
    }

    /// Builds a distance with generated text ("850 m", "1.2 km", "500 ft", "2.3 mi").
    pub fn from_meters(meters: f64, units: DistanceUnits) -> Result<Self> {
        let meters = check("distance", meters)?;
        let text = match units {
            DistanceUnits::Metric if meters < 1_000.0 => format!("{} m", meters.round()),
            DistanceUnits::Metric => format!("{:.1} km", meters / 1_000.0),
            DistanceUnits::Imperial => {
                let feet = meters * FEET_PER_METER;
                if feet < 0.1 * FEET_PER_MILE {
                    format!("{} ft", feet.round())
                } else {
                    format!("{:.1} mi", feet / FEET_PER_MILE)
                }
            }
        };
        Ok(Self { value: meters, text })
    }

    pub fn meters(&self) -> f64 {
        self.value
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Numeric ordering; the text is ignored.
    pub fn cmp_value(&self, other: &Self) -> Ordering {
        self.value.total_cmp(&other.value)
    }
}

impl RouteDuration {
    pub fn new(minutes: f64, text: impl Into<String>) -> Result<Self> {
        Ok(Self {
            value: check("duration", minutes)?,
            text: text.into(),
        })
    }

    /// Builds a duration with generated text ("1 min", "25 mins", "1 hr 5 mins").
    pub fn from_minutes(minutes: f64) -> Result<Self> {
        let minutes = check("duration", minutes)?;
        let rounded = minutes.round() as u64;
        let (hours, mins) = (rounded / 60, rounded % 60);
        let mins_text = |m: u64| if m == 1 { "1 min".to_string() } else { format!("{m} mins") };

        let text = match (hours, mins) {
            (0, m) => mins_text(m),
            (h, 0) => format!("{h} hr"),
            (h, m) => format!("{h} hr {}", mins_text(m)),
        };
        Ok(Self {
            value: minutes,
            text,
        })
    }

    pub fn minutes(&self) -> f64 {
        self.value
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Numeric ordering; the text is ignored.
    pub fn cmp_value(&self, other: &Self) -> Ordering {
        self.value.total_cmp(&other.value)
    }
}

/// A route between an origin and a destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub distance: RouteDistance,
    pub duration: RouteDuration,
}

impl Route {
    pub fn new(distance: RouteDistance, duration: RouteDuration) -> Self {
        Self { distance, duration }
    }

    pub fn is_shorter_than(&self, other: &Route) -> bool {
        self.distance.cmp_value(&other.distance) == Ordering::Less
    }

    pub fn is_faster_than(&self, other: &Route) -> bool {
        self.duration.cmp_value(&other.duration) == Ordering::Less
    }

    /// Average speed over the route in meters per second, `None` for a
    /// zero-duration route.
    pub fn average_speed_mps(&self) -> Option<f64> {
        let seconds = self.duration.minutes() * 60.0;
        (seconds > 0.0).then(|| self.distance.meters() / seconds)
    }
}
