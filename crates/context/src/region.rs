//! Region hierarchy resolution.
//!
//! Pure domain logic - no I/O.

use crate::error::{ContextError, Result};
use locus_geometry::Coordinate;
use locus_model::{Region, RegionType};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// At most one region per administrative level.
///
/// Each level has its own slot, so two regions of the same type cannot
/// coexist. Slots are checked on construction and on deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawHierarchy", rename_all = "camelCase")]
pub struct RegionHierarchy {
    country: Option<Region>,
    state: Option<Region>,
    dma: Option<Region>,
    postal_code: Option<Region>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawHierarchy {
    #[serde(default)]
    country: Option<Region>,
    #[serde(default)]
    state: Option<Region>,
    #[serde(default)]
    dma: Option<Region>,
    #[serde(default)]
    postal_code: Option<Region>,
}

impl TryFrom<RawHierarchy> for RegionHierarchy {
    type Error = ContextError;

    fn try_from(raw: RawHierarchy) -> Result<Self> {
        Self::from_slots(raw.country, raw.state, raw.dma, raw.postal_code)
    }
}

fn check_slot(slot: RegionType, region: Option<Region>) -> Result<Option<Region>> {
    match region {
        Some(r) if r.region_type != slot => Err(ContextError::RegionTypeMismatch {
            id: r.id,
            slot,
            found: r.region_type,
        }),
        other => Ok(other),
    }
}

/// Smaller area wins; equal areas fall back to the smaller id.
fn specificity(a: &Region, b: &Region) -> Ordering {
    a.area()
        .total_cmp(&b.area())
        .then_with(|| a.id.cmp(&b.id))
}

impl RegionHierarchy {
    /// Builds a hierarchy from explicit slots, rejecting a region in the
    /// wrong slot.
    pub fn from_slots(
        country: Option<Region>,
        state: Option<Region>,
        dma: Option<Region>,
        postal_code: Option<Region>,
    ) -> Result<Self> {
        Ok(Self {
            country: check_slot(RegionType::Country, country)?,
            state: check_slot(RegionType::State, state)?,
            dma: check_slot(RegionType::Dma, dma)?,
            postal_code: check_slot(RegionType::PostalCode, postal_code)?,
        })
    }

    /// Picks the most specific containing region of each type.
    pub fn resolve<'a, I>(point: &Coordinate, candidates: I) -> Self
    where
        I: IntoIterator<Item = &'a Region>,
    {
        let mut hierarchy = Self::default();

        for region in candidates.into_iter().filter(|r| r.contains(point)) {
            let slot = hierarchy.slot_mut(region.region_type);
            let replace = match slot.as_ref() {
                Some(current) => specificity(region, current) == Ordering::Less,
                None => true,
            };
            if replace {
                *slot = Some(region.clone());
            }
        }

        hierarchy
    }

    fn slot_mut(&mut self, region_type: RegionType) -> &mut Option<Region> {
        match region_type {
            RegionType::Country => &mut self.country,
            RegionType::State => &mut self.state,
            RegionType::Dma => &mut self.dma,
            RegionType::PostalCode => &mut self.postal_code,
        }
    }

    pub fn get(&self, region_type: RegionType) -> Option<&Region> {
        match region_type {
            RegionType::Country => self.country.as_ref(),
            RegionType::State => self.state.as_ref(),
            RegionType::Dma => self.dma.as_ref(),
            RegionType::PostalCode => self.postal_code.as_ref(),
        }
    }

    pub fn country(&self) -> Option<&Region> {
        self.country.as_ref()
    }

    pub fn state(&self) -> Option<&Region> {
        self.state.as_ref()
    }

    pub fn dma(&self) -> Option<&Region> {
        self.dma.as_ref()
    }

    pub fn postal_code(&self) -> Option<&Region> {
        self.postal_code.as_ref()
    }

    /// Resolved regions, broadest level first.
    pub fn iter(&self) -> impl Iterator<Item = &Region> {
        RegionType::ALL.into_iter().filter_map(|t| self.get(t))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}
