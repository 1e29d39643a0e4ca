//! Home/office learner.
//!
//! ```text
//! LocationSample
//!      │
//!      ▼
//!  ordering check ──► OutOfOrder (state untouched)
//!      │
//!      ▼
//!  fraud assess ──► untrusted: flags recorded, no evidence
//!      │
//!      ▼
//!  dwell detection (hint or derived stay)
//!      │
//!      ▼
//!  night window ──► home slot      work window ──► office slot
//!      │
//!      ▼
//!  classify: home / office / traveling / commuting
//! ```

use crate::confidence::Confidence;
use crate::error::{InsightsError, InsightsResult};
use crate::fraud::{self, Fraud, TrustedFix};
use crate::settings::InsightsSettings;
use crate::slot::{LearnedSlot, SlotUpdate};
use crate::types::{LocationKind, LocationSample, UserInsights, UserInsightsState};
use chrono::{DateTime, Duration, FixedOffset, Utc};
use locus_geometry::Coordinate;
use locus_model::Point;
use locus_route::{
    estimate_route, DistanceUnits, Route, RouteDistance, RouteDuration, RouteMode, DETOUR_FACTOR,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Coarse progress of the learner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LearnerPhase {
    /// No evidence yet.
    Unknown,
    /// Evidence, but nothing established.
    Learning,
    HomeKnown,
    OfficeKnown,
    Both,
}

/// Stop derived from consecutive samples near one anchor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Stay {
    anchor: Coordinate,
    started: DateTime<Utc>,
    last_seen: DateTime<Utc>,
    /// End of the part already reported through dwell hints.
    #[serde(default)]
    reported_until: Option<DateTime<Utc>>,
}

impl Stay {
    fn new(anchor: Coordinate, started: DateTime<Utc>, last_seen: DateTime<Utc>) -> Self {
        Self {
            anchor,
            started,
            last_seen,
            reported_until: None,
        }
    }

    /// The part of the stay from `start` on that no hint has reported yet.
    fn unreported(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Dwell {
        let start = self.reported_until.map_or(start, |until| until.max(start));
        Dwell {
            location: self.anchor,
            start,
            end,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AnchorVisit {
    kind: LocationKind,
    last_seen: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Dwell {
    location: Coordinate,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl Dwell {
    fn minutes(&self) -> f64 {
        minutes_between(self.start, self.end)
    }

    fn midpoint(&self) -> DateTime<Utc> {
        self.start + (self.end - self.start) / 2
    }
}

/// Start of a stop the device reports as `minutes` long at `end`, `None`
/// for hints that are negative, not finite or out of the representable range.
fn hinted_start(end: DateTime<Utc>, minutes: f64) -> Option<DateTime<Utc>> {
    if !minutes.is_finite() || minutes < 0.0 {
        return None;
    }
    let span = Duration::try_milliseconds((minutes * 60_000.0) as i64)?;
    end.checked_sub_signed(span)
}

fn minutes_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / 60_000.0
}

/// Everything the learner knows, serializable for persistence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LearnerState {
    home: LearnedSlot,
    office: LearnedSlot,
    last_timestamp: Option<DateTime<Utc>>,
    last_trusted: Option<TrustedFix>,
    stay: Option<Stay>,
    away_since: Option<DateTime<Utc>>,
    last_anchor: Option<AnchorVisit>,
    observed_commute: Option<Route>,
    current: UserInsightsState,
    fraud: Fraud,
}

impl LearnerState {
    pub fn home(&self) -> &LearnedSlot {
        &self.home
    }

    pub fn office(&self) -> &LearnedSlot {
        &self.office
    }

    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.last_timestamp
    }
}

/// Learns home and office from a time-ordered stream of samples.
///
/// Each call to [`InsightsLearner::ingest`] is a pure step over
/// [`LearnerState`]: the same settings, prior state and sample always
/// produce the same result.
#[derive(Debug, Clone)]
pub struct InsightsLearner {
    settings: InsightsSettings,
    offset: FixedOffset,
    state: LearnerState,
}

impl InsightsLearner {
    pub fn new(settings: InsightsSettings) -> InsightsResult<Self> {
        Self::from_state(settings, LearnerState::default())
    }

    /// Resumes from a persisted state.
    pub fn from_state(settings: InsightsSettings, state: LearnerState) -> InsightsResult<Self> {
        settings.validate()?;
        let offset = settings.local_offset()?;
        Ok(Self {
            settings,
            offset,
            state,
        })
    }

    pub fn settings(&self) -> &InsightsSettings {
        &self.settings
    }

    pub fn state(&self) -> &LearnerState {
        &self.state
    }

    pub fn into_state(self) -> LearnerState {
        self.state
    }

    /// Classification of the latest trusted sample.
    pub fn current_state(&self) -> UserInsightsState {
        self.state.current
    }

    /// Fraud flags of the latest sample, trusted or not.
    pub fn fraud(&self) -> Fraud {
        self.state.fraud
    }

    /// Last home/office transit whose duration fell inside the commute band.
    pub fn observed_commute(&self) -> Option<&Route> {
        self.state.observed_commute.as_ref()
    }

    /// Rough home to office route for a travel mode, once both are established.
    pub fn estimated_commute(&self, mode: RouteMode, units: DistanceUnits) -> Option<Route> {
        let home = self.state.home.established_centroid()?;
        let office = self.state.office.established_centroid()?;
        estimate_route(&home, &office, mode, units).ok()
    }

    pub fn phase(&self) -> LearnerPhase {
        let home = self.state.home.confidence();
        let office = self.state.office.confidence();
        match (home.is_established(), office.is_established()) {
            (true, true) => LearnerPhase::Both,
            (true, false) => LearnerPhase::HomeKnown,
            (false, true) => LearnerPhase::OfficeKnown,
            _ if home == Confidence::None && office == Confidence::None => LearnerPhase::Unknown,
            _ => LearnerPhase::Learning,
        }
    }

    /// Established locations plus the current state.
    pub fn insights(&self) -> UserInsights {
        UserInsights::from_parts(
            self.state.home.location(LocationKind::Home),
            self.state.office.location(LocationKind::Office),
            self.state.current,
        )
    }

    /// Uses points tagged `home` or `office` as starting centroids. Seeds
    /// carry no confidence and never override learned evidence.
    pub fn seed_from_points(&mut self, points: &[Point]) {
        for point in points {
            let (kind, slot) = if point.has_tag(LocationKind::Home.label()) {
                (LocationKind::Home, &mut self.state.home)
            } else if point.has_tag(LocationKind::Office.label()) {
                (LocationKind::Office, &mut self.state.office)
            } else {
                continue;
            };
            if slot.seed(point.location) {
                debug!(kind = %kind, point = %point.id, "seeded location from point");
            }
        }
    }

    /// Feeds one sample.
    ///
    /// A sample older than the last one is rejected and leaves the state
    /// untouched. Mocked or jumped samples are recorded in [`Self::fraud`] but
    /// never used as evidence; the previous state is returned for them.
    pub fn ingest(&mut self, sample: &LocationSample) -> InsightsResult<UserInsightsState> {
        if let Some(last) = self.state.last_timestamp {
            if sample.timestamp < last {
                warn!(
                    last = %last,
                    received = %sample.timestamp,
                    "rejecting out-of-order sample"
                );
                return Err(InsightsError::OutOfOrder {
                    last,
                    received: sample.timestamp,
                });
            }
        }
        self.state.last_timestamp = Some(sample.timestamp);

        let fraud = fraud::assess(
            sample,
            self.state.last_trusted.as_ref(),
            self.settings.max_plausible_speed_mps,
            self.settings.cluster_radius_meters,
        );
        self.state.fraud = fraud;
        if !fraud.is_trusted() {
            warn!(
                mocked = fraud.mocked,
                jumped = fraud.jumped,
                location = %sample.location,
                "ignoring untrusted sample"
            );
            return Ok(self.state.current);
        }
        self.state.last_trusted = Some(TrustedFix {
            timestamp: sample.timestamp,
            location: sample.location,
        });

        for dwell in self.detect_dwells(sample) {
            self.apply_dwell(&dwell);
        }

        let state = self.classify(sample);
        if state != self.state.current {
            debug!(
                home = state.home,
                office = state.office,
                traveling = state.traveling,
                commuting = state.commuting,
                "user state changed"
            );
        }
        self.state.current = state;
        Ok(state)
    }

    fn detect_dwells(&mut self, sample: &LocationSample) -> Vec<Dwell> {
        let radius = self.settings.cluster_radius_meters;
        let mut dwells = Vec::new();

        let still_here = self
            .state
            .stay
            .is_some_and(|stay| stay.anchor.distance_to(&sample.location) <= radius);

        if still_here {
            if let Some(stay) = self.state.stay.as_mut() {
                stay.last_seen = sample.timestamp;
            }
        } else if let Some(left) = self.state.stay.take() {
            let dwell = left.unreported(left.started, left.last_seen);
            if dwell.minutes() >= self.settings.min_dwell_minutes {
                dwells.push(dwell);
            }
        }

        match sample.dwell_minutes.map(|minutes| (minutes, hinted_start(sample.timestamp, minutes))) {
            Some((_, Some(start))) => {
                let stay = self
                    .state
                    .stay
                    .get_or_insert(Stay::new(sample.location, start, sample.timestamp));
                stay.started = stay.started.min(start);

                // A hint shorter than a dwell only says the device stopped;
                // the stay keeps growing and is reported later.
                let dwell = stay.unreported(start, sample.timestamp);
                if dwell.minutes() >= self.settings.min_dwell_minutes {
                    stay.reported_until = Some(sample.timestamp);
                    dwells.push(dwell);
                }
            }
            Some((minutes, None)) => {
                warn!(minutes, "ignoring invalid dwell hint");
            }
            None => {}
        }

        if self.state.stay.is_none() {
            self.state.stay = Some(Stay::new(sample.location, sample.timestamp, sample.timestamp));
        }

        dwells
    }

    fn apply_dwell(&mut self, dwell: &Dwell) {
        if dwell.minutes() < self.settings.min_dwell_minutes {
            return;
        }
        let local = dwell.midpoint().with_timezone(&self.offset);
        let radius = self.settings.cluster_radius_meters;

        if self.settings.night_window.contains(&local) {
            let day = self.settings.night_window.evidence_day(&local);
            let update = self.state.home.observe(dwell.location, day, &self.settings);
            log_update(LocationKind::Home, update, &self.state.home);
        }

        if self.settings.work_window.contains(&local) {
            let at_home = self
                .state
                .home
                .established_centroid()
                .is_some_and(|home| home.distance_to(&dwell.location) <= radius);
            if at_home {
                debug!("work-hours dwell at home is not office evidence");
            } else {
                let day = self.settings.work_window.evidence_day(&local);
                let update = self.state.office.observe(dwell.location, day, &self.settings);
                log_update(LocationKind::Office, update, &self.state.office);
            }
        }
    }

    fn classify(&mut self, sample: &LocationSample) -> UserInsightsState {
        let radius = self.settings.cluster_radius_meters;
        let home_centroid = self.state.home.established_centroid();
        let office_centroid = self.state.office.established_centroid();

        let home = home_centroid.is_some_and(|c| c.distance_to(&sample.location) <= radius);
        let office = office_centroid.is_some_and(|c| c.distance_to(&sample.location) <= radius);

        let traveling = self.track_travel(sample, &[home_centroid, office_centroid]);
        let commuting = self.track_commute(sample, home, office, home_centroid, office_centroid);

        UserInsightsState {
            home,
            office,
            traveling,
            commuting,
        }
    }

    fn track_travel(&mut self, sample: &LocationSample, anchors: &[Option<Coordinate>]) -> bool {
        let mut known = anchors.iter().flatten().peekable();
        let beyond = known.peek().is_some()
            && known.all(|c| c.distance_to(&sample.location) > self.settings.traveling_distance_meters);

        if !beyond {
            self.state.away_since = None;
            return false;
        }
        let since = *self.state.away_since.get_or_insert(sample.timestamp);
        minutes_between(since, sample.timestamp) >= self.settings.traveling_min_minutes
    }

    fn track_commute(
        &mut self,
        sample: &LocationSample,
        home: bool,
        office: bool,
        home_centroid: Option<Coordinate>,
        office_centroid: Option<Coordinate>,
    ) -> bool {
        let (Some(home_centroid), Some(office_centroid)) = (home_centroid, office_centroid) else {
            return false;
        };

        let at = if home {
            Some(LocationKind::Home)
        } else if office {
            Some(LocationKind::Office)
        } else {
            None
        };

        match (at, self.state.last_anchor) {
            (Some(kind), previous) => {
                if let Some(prev) = previous.filter(|p| p.kind == kind.opposite()) {
                    let minutes = minutes_between(prev.last_seen, sample.timestamp);
                    if self.settings.commute_band.contains_minutes(minutes) {
                        let meters = home_centroid.distance_to(&office_centroid) * DETOUR_FACTOR;
                        if let (Ok(distance), Ok(duration)) = (
                            RouteDistance::from_meters(meters, DistanceUnits::Metric),
                            RouteDuration::from_minutes(minutes),
                        ) {
                            info!(
                                from = %prev.kind,
                                to = %kind,
                                duration = duration.text(),
                                "observed commute"
                            );
                            self.state.observed_commute = Some(Route::new(distance, duration));
                        }
                    }
                }
                self.state.last_anchor = Some(AnchorVisit {
                    kind,
                    last_seen: sample.timestamp,
                });
                false
            }
            (None, Some(prev)) => {
                let elapsed = minutes_between(prev.last_seen, sample.timestamp);
                let local = sample.timestamp.with_timezone(&self.offset);
                elapsed <= self.settings.commute_band.max_minutes()
                    && self.settings.commute_windows.iter().any(|w| w.contains(&local))
            }
            (None, None) => false,
        }
    }
}

fn log_update(kind: LocationKind, update: SlotUpdate, slot: &LearnedSlot) {
    match update {
        SlotUpdate::Started => {
            debug!(kind = %kind, "started location candidate");
        }
        SlotUpdate::Confirmed {
            escalated_to: Some(level),
        } => {
            info!(
                kind = %kind,
                confidence = %level,
                days = slot.evidence_days(),
                "location confidence raised"
            );
        }
        SlotUpdate::Confirmed { escalated_to: None } => {
            debug!(kind = %kind, days = slot.evidence_days(), "location confirmed");
        }
        SlotUpdate::Contrary {
            downgraded_to: Some(level),
            relocated,
            ..
        } => {
            info!(kind = %kind, confidence = %level, relocated, "location confidence lowered");
        }
        SlotUpdate::Contrary { run, .. } => {
            debug!(kind = %kind, run, "contrary dwell");
        }
    }
}
