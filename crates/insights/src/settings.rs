//! Learner configuration.
//!
//! All thresholds of the home/office learner live here. Loaded from JSON,
//! any missing field falls back to its default.

use crate::error::{InsightsError, InsightsResult};
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Timelike};
use locus_route::DurationBand;
use serde::{Deserialize, Serialize};

/// Daily window of local hours, `[start_hour, end_hour)`.
///
/// A window with `start_hour > end_hour` wraps past midnight (e.g. 21 to 6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourWindow {
    pub start_hour: u32,
    pub end_hour: u32,

    /// Only Monday to Friday (judged on the window's evidence day).
    #[serde(default)]
    pub weekdays_only: bool,
}

impl HourWindow {
    pub const fn new(start_hour: u32, end_hour: u32, weekdays_only: bool) -> Self {
        Self {
            start_hour,
            end_hour,
            weekdays_only,
        }
    }

    pub fn wraps_midnight(&self) -> bool {
        self.start_hour > self.end_hour
    }

    fn contains_hour(&self, hour: u32) -> bool {
        if self.wraps_midnight() {
            hour >= self.start_hour || hour < self.end_hour
        } else {
            (self.start_hour..self.end_hour).contains(&hour)
        }
    }

    /// Day a local time is credited to. Early-morning hours of a window that
    /// wraps midnight belong to the previous evening.
    pub fn evidence_day(&self, local: &DateTime<FixedOffset>) -> NaiveDate {
        let date = local.date_naive();
        if self.wraps_midnight() && local.hour() < self.end_hour {
            date.pred_opt().unwrap_or(date)
        } else {
            date
        }
    }

    pub fn contains(&self, local: &DateTime<FixedOffset>) -> bool {
        if !self.contains_hour(local.hour()) {
            return false;
        }
        !self.weekdays_only || self.evidence_day(local).weekday().number_from_monday() <= 5
    }

    fn validate(&self, field: &'static str) -> InsightsResult<()> {
        if self.start_hour > 23 || self.end_hour > 23 || self.start_hour == self.end_hour {
            return Err(InsightsError::InvalidSettings {
                field,
                message: format!(
                    "hours must be distinct values in 0..=23, got {}..{}",
                    self.start_hour, self.end_hour
                ),
            });
        }
        Ok(())
    }
}

/// Tunables for [`crate::InsightsLearner`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InsightsSettings {
    /// Shortest stay that counts as a dwell.
    pub min_dwell_minutes: f64,

    /// Radius around a centroid within which a dwell confirms it.
    pub cluster_radius_meters: f64,

    /// Hours whose dwells count toward home.
    pub night_window: HourWindow,

    /// Hours whose dwells count toward office.
    pub work_window: HourWindow,

    /// Evidence days needed for medium confidence.
    pub medium_after_days: u32,

    /// Evidence days needed for high confidence.
    pub high_after_days: u32,

    /// Consecutive contrary dwells needed to drop one confidence level.
    pub downgrade_after_samples: u32,

    /// Weight of a new dwell when moving the centroid (0, 1].
    pub ema_alpha: f64,

    /// Distance from every known centroid beyond which the user may be traveling.
    pub traveling_distance_meters: f64,

    /// How long the user must stay beyond that distance.
    pub traveling_min_minutes: f64,

    /// Local hours during which home/office transit counts as commuting.
    pub commute_windows: Vec<HourWindow>,

    /// Expected door-to-door commute duration.
    pub commute_band: DurationBand,

    /// Implied speed between fixes above which a sample is flagged as a jump.
    pub max_plausible_speed_mps: f64,

    /// Offset of the user's local time from UTC.
    pub utc_offset_minutes: i32,
}

impl Default for InsightsSettings {
    fn default() -> Self {
        Self {
            min_dwell_minutes: 20.0,
            cluster_radius_meters: 150.0,
            night_window: HourWindow::new(21, 6, false),
            work_window: HourWindow::new(9, 17, true),
            medium_after_days: 3,
            high_after_days: 7,
            downgrade_after_samples: 5,
            ema_alpha: 0.2,
            traveling_distance_meters: 50_000.0,
            traveling_min_minutes: 60.0,
            commute_windows: vec![HourWindow::new(6, 10, true), HourWindow::new(16, 20, true)],
            commute_band: DurationBand::default(),
            max_plausible_speed_mps: 350.0,
            utc_offset_minutes: 0,
        }
    }
}

fn positive(field: &'static str, value: f64) -> InsightsResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(InsightsError::InvalidSettings {
            field,
            message: format!("must be a positive number, got {value}"),
        })
    }
}

impl InsightsSettings {
    /// Parses and validates settings from JSON.
    pub fn from_json(json: &str) -> InsightsResult<Self> {
        let settings: Self =
            serde_json::from_str(json).map_err(|e| InsightsError::InvalidSettings {
                field: "json",
                message: e.to_string(),
            })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> InsightsResult<()> {
        positive("minDwellMinutes", self.min_dwell_minutes)?;
        positive("clusterRadiusMeters", self.cluster_radius_meters)?;
        positive("travelingDistanceMeters", self.traveling_distance_meters)?;
        positive("maxPlausibleSpeedMps", self.max_plausible_speed_mps)?;

        if !self.traveling_min_minutes.is_finite() || self.traveling_min_minutes < 0.0 {
            return Err(InsightsError::InvalidSettings {
                field: "travelingMinMinutes",
                message: format!("must be non-negative, got {}", self.traveling_min_minutes),
            });
        }
        if !(self.ema_alpha > 0.0 && self.ema_alpha <= 1.0) {
            return Err(InsightsError::InvalidSettings {
                field: "emaAlpha",
                message: format!("must be within (0, 1], got {}", self.ema_alpha),
            });
        }
        if self.medium_after_days == 0 || self.medium_after_days > self.high_after_days {
            return Err(InsightsError::InvalidSettings {
                field: "mediumAfterDays",
                message: format!(
                    "need 1 <= mediumAfterDays <= highAfterDays, got {} and {}",
                    self.medium_after_days, self.high_after_days
                ),
            });
        }
        if self.downgrade_after_samples < 2 {
            return Err(InsightsError::InvalidSettings {
                field: "downgradeAfterSamples",
                message: "a single sample must never downgrade a location".to_string(),
            });
        }

        self.night_window.validate("nightWindow")?;
        self.work_window.validate("workWindow")?;
        for window in &self.commute_windows {
            window.validate("commuteWindows")?;
        }
        self.local_offset().map(|_| ())
    }

    /// The configured UTC offset, rejected beyond +/-18 hours.
    pub fn local_offset(&self) -> InsightsResult<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60)).ok_or_else(|| {
            InsightsError::InvalidSettings {
                field: "utcOffsetMinutes",
                message: format!("offset {} is out of range", self.utc_offset_minutes),
            }
        })
    }
}
