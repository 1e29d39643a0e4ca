//! Resolved context snapshot.

use crate::error::{ContextError, Result};
use crate::region::RegionHierarchy;
use locus_model::{Geofence, Place, Region};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;

/// Where the user is for one location fix.
///
/// Built fresh for every resolution and never mutated afterwards. The
/// geofence list is deduplicated by id and ordered tightest first, so
/// [`RadarContext::primary_geofence`] is the most specific match.
///
/// Serialized as
/// `{ geofences, place, country, state, dma, postalCode }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawContext", rename_all = "camelCase")]
pub struct RadarContext {
    geofences: Vec<Geofence>,
    place: Option<Place>,
    #[serde(flatten)]
    regions: RegionHierarchy,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawContext {
    #[serde(default)]
    geofences: Vec<Geofence>,
    #[serde(default)]
    place: Option<Place>,
    #[serde(flatten)]
    regions: RegionHierarchy,
}

impl TryFrom<RawContext> for RadarContext {
    type Error = ContextError;

    fn try_from(raw: RawContext) -> Result<Self> {
        Ok(Self::from_parts(raw.geofences, raw.place, raw.regions))
    }
}

/// Tighter (smaller area) first; equal areas by id.
pub(crate) fn tightness(a: &Geofence, b: &Geofence) -> Ordering {
    a.geometry
        .area()
        .total_cmp(&b.geometry.area())
        .then_with(|| a.id.cmp(&b.id))
}

/// Sorts tightest first and keeps the first (tightest) entry per id.
pub(crate) fn order_geofences(mut geofences: Vec<Geofence>) -> Vec<Geofence> {
    geofences.sort_by(tightness);
    let mut seen = HashSet::new();
    geofences.retain(|g| seen.insert(g.id.clone()));
    geofences
}

impl RadarContext {
    /// Builds a snapshot from its parts.
    ///
    /// Geofences are reordered and deduplicated; a region in a slot of the
    /// wrong type is rejected.
    pub fn new(
        geofences: Vec<Geofence>,
        place: Option<Place>,
        country: Option<Region>,
        state: Option<Region>,
        dma: Option<Region>,
        postal_code: Option<Region>,
    ) -> Result<Self> {
        let regions = RegionHierarchy::from_slots(country, state, dma, postal_code)?;
        Ok(Self::from_parts(geofences, place, regions))
    }

    pub(crate) fn from_parts(
        geofences: Vec<Geofence>,
        place: Option<Place>,
        regions: RegionHierarchy,
    ) -> Self {
        Self {
            geofences: order_geofences(geofences),
            place,
            regions,
        }
    }

    /// Matching geofences, tightest first.
    pub fn geofences(&self) -> &[Geofence] {
        &self.geofences
    }

    /// The most specific matching geofence.
    pub fn primary_geofence(&self) -> Option<&Geofence> {
        self.geofences.first()
    }

    pub fn place(&self) -> Option<&Place> {
        self.place.as_ref()
    }

    pub fn regions(&self) -> &RegionHierarchy {
        &self.regions
    }

    pub fn country(&self) -> Option<&Region> {
        self.regions.country()
    }

    pub fn state(&self) -> Option<&Region> {
        self.regions.state()
    }

    pub fn dma(&self) -> Option<&Region> {
        self.regions.dma()
    }

    pub fn postal_code(&self) -> Option<&Region> {
        self.regions.postal_code()
    }

    pub fn has_geofence_tag(&self, tag: &str) -> bool {
        self.geofences.iter().any(|g| g.tag.as_deref() == Some(tag))
    }

    pub fn is_empty(&self) -> bool {
        self.geofences.is_empty() && self.place.is_none() && self.regions.is_empty()
    }
}
