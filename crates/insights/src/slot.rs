//! Evidence accounting for one learned location (home or office).

use crate::confidence::Confidence;
use crate::settings::InsightsSettings;
use crate::types::{LocationKind, UserInsightsLocation};
use chrono::NaiveDate;
use locus_geometry::{longitude_delta, normalize_longitude, Coordinate};
use serde::{Deserialize, Serialize};

/// Candidate location with its evidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Cluster {
    centroid: Coordinate,
    days: u32,
    last_day: Option<NaiveDate>,
}

impl Cluster {
    fn start(location: Coordinate, day: NaiveDate) -> Self {
        Self {
            centroid: location,
            days: 1,
            last_day: Some(day),
        }
    }

    fn seeded(location: Coordinate) -> Self {
        Self {
            centroid: location,
            days: 0,
            last_day: None,
        }
    }

    /// EMA step toward `location`, counting `day` once.
    fn absorb(&mut self, location: Coordinate, day: NaiveDate, alpha: f64) {
        let lat = self.centroid.latitude()
            + alpha * (location.latitude() - self.centroid.latitude());
        let lng = normalize_longitude(
            self.centroid.longitude()
                + alpha * longitude_delta(self.centroid.longitude(), location.longitude()),
        );
        // A convex combination of valid coordinates is valid.
        self.centroid = Coordinate::new(lat, lng).unwrap_or(self.centroid);

        if self.last_day != Some(day) {
            self.days += 1;
            self.last_day = Some(day);
        }
    }

    fn is_near(&self, location: &Coordinate, radius: f64) -> bool {
        self.centroid.distance_to(location) <= radius
    }
}

/// What a dwell did to a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SlotUpdate {
    /// First evidence (or replaced an unconfirmed seed).
    Started,
    /// Dwell near the centroid.
    Confirmed { escalated_to: Option<Confidence> },
    /// Dwell elsewhere during the slot's hours.
    Contrary {
        run: u32,
        downgraded_to: Option<Confidence>,
        relocated: bool,
    },
}

/// Learned state for one location kind.
///
/// Confidence only rises through confirming dwells on new days, and only
/// falls one level at a time after a sustained run of contrary dwells.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnedSlot {
    cluster: Option<Cluster>,
    confidence: Confidence,
    contrary_run: u32,
    challenger: Option<Cluster>,
}

impl LearnedSlot {
    pub fn confidence(&self) -> Confidence {
        self.confidence
    }

    /// Current centroid, including unconfirmed ones.
    pub fn centroid(&self) -> Option<Coordinate> {
        self.cluster.as_ref().map(|c| c.centroid)
    }

    /// Centroid once confidence is at least medium.
    pub fn established_centroid(&self) -> Option<Coordinate> {
        if self.confidence.is_established() {
            self.centroid()
        } else {
            None
        }
    }

    pub fn evidence_days(&self) -> u32 {
        self.cluster.as_ref().map_or(0, |c| c.days)
    }

    pub fn contrary_run(&self) -> u32 {
        self.contrary_run
    }

    pub fn location(&self, kind: LocationKind) -> Option<UserInsightsLocation> {
        self.established_centroid().map(|location| UserInsightsLocation {
            location,
            confidence: self.confidence,
            kind,
        })
    }

    /// Prior centroid from a saved point. Adds no confidence and is ignored
    /// once the slot has a cluster.
    pub(crate) fn seed(&mut self, location: Coordinate) -> bool {
        if self.cluster.is_some() {
            return false;
        }
        self.cluster = Some(Cluster::seeded(location));
        true
    }

    pub(crate) fn observe(
        &mut self,
        location: Coordinate,
        day: NaiveDate,
        settings: &InsightsSettings,
    ) -> SlotUpdate {
        let radius = settings.cluster_radius_meters;
        let near = self.cluster.as_ref().map(|c| c.is_near(&location, radius));

        match near {
            None => self.restart(location, day),
            Some(true) => self.confirm(location, day, settings),
            // An unconfirmed seed yields to real evidence.
            Some(false) if self.confidence == Confidence::None => self.restart(location, day),
            Some(false) => self.contradict(location, day, settings),
        }
    }

    fn restart(&mut self, location: Coordinate, day: NaiveDate) -> SlotUpdate {
        self.cluster = Some(Cluster::start(location, day));
        self.confidence = Confidence::Low;
        self.contrary_run = 0;
        self.challenger = None;
        SlotUpdate::Started
    }

    fn confirm(
        &mut self,
        location: Coordinate,
        day: NaiveDate,
        settings: &InsightsSettings,
    ) -> SlotUpdate {
        let Some(cluster) = self.cluster.as_mut() else {
            return self.restart(location, day);
        };
        cluster.absorb(location, day, settings.ema_alpha);
        let earned = Confidence::for_days(cluster.days, settings);

        self.contrary_run = 0;
        self.challenger = None;

        if earned > self.confidence {
            self.confidence = earned;
            SlotUpdate::Confirmed {
                escalated_to: Some(earned),
            }
        } else {
            SlotUpdate::Confirmed { escalated_to: None }
        }
    }

    fn contradict(
        &mut self,
        location: Coordinate,
        day: NaiveDate,
        settings: &InsightsSettings,
    ) -> SlotUpdate {
        let radius = settings.cluster_radius_meters;
        self.contrary_run += 1;

        let near_challenger = self
            .challenger
            .as_ref()
            .is_some_and(|c| c.is_near(&location, radius));
        if near_challenger {
            if let Some(challenger) = self.challenger.as_mut() {
                challenger.absorb(location, day, settings.ema_alpha);
            }
        } else {
            self.challenger = Some(Cluster::start(location, day));
        }

        let run = self.contrary_run;
        if run < settings.downgrade_after_samples {
            return SlotUpdate::Contrary {
                run,
                downgraded_to: None,
                relocated: false,
            };
        }

        self.contrary_run = 0;
        let lowered = self.confidence.downgraded();

        if lowered == Confidence::None {
            // Nothing left to protect: move to where the user actually dwells.
            if let Some(challenger) = self.challenger.take() {
                self.confidence = Confidence::for_days(challenger.days, settings).max(Confidence::Low);
                self.cluster = Some(challenger);
            }
            SlotUpdate::Contrary {
                run,
                downgraded_to: Some(self.confidence),
                relocated: true,
            }
        } else {
            self.confidence = lowered;
            if let Some(cluster) = self.cluster.as_mut() {
                cluster.days = lowered.threshold_days(settings);
            }
            SlotUpdate::Contrary {
                run,
                downgraded_to: Some(lowered),
                relocated: false,
            }
        }
    }
}
