use crate::settings::InsightsSettings;
use serde::{Deserialize, Serialize};

/// Coarse certainty attached to a learned location.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    #[default]
    None,
    Low,
    Medium,
    High,
}

impl Confidence {
    /// Level earned by a number of distinct evidence days.
    pub fn for_days(days: u32, settings: &InsightsSettings) -> Self {
        if days >= settings.high_after_days {
            Confidence::High
        } else if days >= settings.medium_after_days {
            Confidence::Medium
        } else if days >= 1 {
            Confidence::Low
        } else {
            Confidence::None
        }
    }

    /// Evidence days a level corresponds to; used to rewind the day count
    /// after a downgrade.
    pub fn threshold_days(&self, settings: &InsightsSettings) -> u32 {
        match self {
            Confidence::None => 0,
            Confidence::Low => 1,
            Confidence::Medium => settings.medium_after_days,
            Confidence::High => settings.high_after_days,
        }
    }

    /// One level lower, saturating at `None`.
    pub fn downgraded(&self) -> Self {
        match self {
            Confidence::High => Confidence::Medium,
            Confidence::Medium => Confidence::Low,
            Confidence::Low | Confidence::None => Confidence::None,
        }
    }

    /// Whether a location at this level is exposed to callers.
    pub fn is_established(&self) -> bool {
        *self >= Confidence::Medium
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Confidence::None => "none",
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_days_thresholds() {
        let s = InsightsSettings::default();
        assert_eq!(Confidence::for_days(0, &s), Confidence::None);
        assert_eq!(Confidence::for_days(1, &s), Confidence::Low);
        assert_eq!(Confidence::for_days(2, &s), Confidence::Low);
        assert_eq!(Confidence::for_days(3, &s), Confidence::Medium);
        assert_eq!(Confidence::for_days(7, &s), Confidence::High);
        assert_eq!(Confidence::for_days(40, &s), Confidence::High);
    }

    #[test]
    fn test_downgrade_is_one_step() {
        assert_eq!(Confidence::High.downgraded(), Confidence::Medium);
        assert_eq!(Confidence::Medium.downgraded(), Confidence::Low);
        assert_eq!(Confidence::None.downgraded(), Confidence::None);
    }

    #[test]
    fn test_threshold_round_trip() {
        let s = InsightsSettings::default();
        for level in [Confidence::Low, Confidence::Medium, Confidence::High] {
            assert_eq!(Confidence::for_days(level.threshold_days(&s), &s), level);
        }
    }
}
