//! Samples in, insights out.

use crate::confidence::Confidence;
use crate::error::InsightsError;
use chrono::{DateTime, Utc};
use locus_geometry::Coordinate;
use serde::{Deserialize, Serialize};

/// One location fix from the device.
///
/// Producers: location sensor pipeline (external)
/// Consumers: InsightsLearner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationSample {
    pub timestamp: DateTime<Utc>,
    pub location: Coordinate,

    /// How long the device had already been stopped here, if the producer
    /// detected a stop.
    #[serde(default)]
    pub dwell_minutes: Option<f64>,

    #[serde(default)]
    pub mocked: bool,

    #[serde(default)]
    pub proxy: bool,

    #[serde(default)]
    pub compromised: bool,
}

impl LocationSample {
    pub fn new(timestamp: DateTime<Utc>, location: Coordinate) -> Self {
        Self {
            timestamp,
            location,
            dwell_minutes: None,
            mocked: false,
            proxy: false,
            compromised: false,
        }
    }

    pub fn with_dwell_minutes(mut self, minutes: f64) -> Self {
        self.dwell_minutes = Some(minutes);
        self
    }

    pub fn mocked(mut self) -> Self {
        self.mocked = true;
        self
    }
}

/// Which learned location a slot describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationKind {
    Home,
    Office,
}

impl LocationKind {
    pub fn label(&self) -> &'static str {
        match self {
            LocationKind::Home => "home",
            LocationKind::Office => "office",
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            LocationKind::Home => LocationKind::Office,
            LocationKind::Office => LocationKind::Home,
        }
    }
}

impl std::fmt::Display for LocationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A learned home or office location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInsightsLocation {
    pub location: Coordinate,
    pub confidence: Confidence,
    #[serde(rename = "type")]
    pub kind: LocationKind,
}

/// Classification of the latest sample.
///
/// `home` and `office` are computed independently and may both hold when the
/// two locations are close together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserInsightsState {
    pub home: bool,
    pub office: bool,
    pub traveling: bool,
    #[serde(default)]
    pub commuting: bool,
}

/// Learned locations plus the current state.
///
/// Serialized as `{ homeLocation, officeLocation, state }`. A location whose
/// `type` does not match its slot is rejected when deserializing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawInsights", rename_all = "camelCase")]
pub struct UserInsights {
    home_location: Option<UserInsightsLocation>,
    office_location: Option<UserInsightsLocation>,
    state: UserInsightsState,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawInsights {
    #[serde(default)]
    home_location: Option<UserInsightsLocation>,
    #[serde(default)]
    office_location: Option<UserInsightsLocation>,
    #[serde(default)]
    state: UserInsightsState,
}

impl TryFrom<RawInsights> for UserInsights {
    type Error = InsightsError;

    fn try_from(raw: RawInsights) -> Result<Self, Self::Error> {
        Self::new(raw.home_location, raw.office_location, raw.state)
    }
}

fn check_kind(
    expected: LocationKind,
    location: Option<UserInsightsLocation>,
) -> Result<Option<UserInsightsLocation>, InsightsError> {
    match location {
        Some(l) if l.kind != expected => Err(InsightsError::LocationKindMismatch {
            slot: expected.label(),
            found: l.kind.label(),
        }),
        other => Ok(other),
    }
}

impl UserInsights {
    pub fn new(
        home_location: Option<UserInsightsLocation>,
        office_location: Option<UserInsightsLocation>,
        state: UserInsightsState,
    ) -> Result<Self, InsightsError> {
        Ok(Self {
            home_location: check_kind(LocationKind::Home, home_location)?,
            office_location: check_kind(LocationKind::Office, office_location)?,
            state,
        })
    }

    /// Built from slots whose kinds are already known to match.
    pub(crate) fn from_parts(
        home_location: Option<UserInsightsLocation>,
        office_location: Option<UserInsightsLocation>,
        state: UserInsightsState,
    ) -> Self {
        Self {
            home_location,
            office_location,
            state,
        }
    }

    pub fn home_location(&self) -> Option<&UserInsightsLocation> {
        self.home_location.as_ref()
    }

    pub fn office_location(&self) -> Option<&UserInsightsLocation> {
        self.office_location.as_ref()
    }

    pub fn state(&self) -> UserInsightsState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(kind: LocationKind) -> UserInsightsLocation {
        UserInsightsLocation {
            location: Coordinate::new(37.422, -122.084).unwrap(),
            confidence: Confidence::High,
            kind,
        }
    }

    #[test]
    fn test_insights_json_keys() {
        let insights = UserInsights::new(
            Some(location(LocationKind::Home)),
            None,
            UserInsightsState {
                home: true,
                ..Default::default()
            },
        )
        .unwrap();

        let json = serde_json::to_value(&insights).unwrap();
        assert_eq!(json["homeLocation"]["type"], "home");
        assert_eq!(json["homeLocation"]["confidence"], "high");
        assert!(json["officeLocation"].is_null());
        assert_eq!(json["state"]["home"], true);

        let back: UserInsights = serde_json::from_value(json).unwrap();
        assert_eq!(back, insights);
    }

    #[test]
    fn test_rejects_swapped_slots() {
        let err = UserInsights::new(
            Some(location(LocationKind::Office)),
            None,
            UserInsightsState::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            InsightsError::LocationKindMismatch {
                slot: "home",
                found: "office"
            }
        );

        let raw = r#"{"officeLocation":{"location":{"lat":1,"lng":1},"confidence":"low","type":"home"},
                      "state":{"home":false,"office":false,"traveling":false}}"#;
        assert!(serde_json::from_str::<UserInsights>(raw).is_err());
    }

    #[test]
    fn test_sample_json_defaults() {
        let raw = r#"{"timestamp":"2026-03-02T23:00:00Z","location":{"lat":1,"lng":2}}"#;
        let sample: LocationSample = serde_json::from_str(raw).unwrap();
        assert_eq!(sample.dwell_minutes, None);
        assert!(!sample.mocked);
    }
}
