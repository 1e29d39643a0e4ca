//! Shared catalog records.
//!
//! These are read-only snapshots handed to locus by whoever syncs the
//! geofence catalog or looks up nearby places and regions. Nothing in locus
//! creates or mutates them.
//!
//! JSON field names follow the SDK wire format (`externalId`, `postalCode`, ...).

use locus_geometry::{Coordinate, GeofenceGeometry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Custom key-value pairs attached to catalog records.
pub type Metadata = BTreeMap<String, String>;

/// A geofence from the synced catalog.
///
/// Producers: catalog sync (external)
/// Consumers: context resolver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Geofence {
    pub id: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub tag: Option<String>,

    #[serde(default)]
    pub external_id: Option<String>,

    #[serde(default)]
    pub metadata: Metadata,

    pub geometry: GeofenceGeometry,
}

impl Geofence {
    pub fn new(id: impl Into<String>, geometry: GeofenceGeometry) -> Self {
        Self {
            id: id.into(),
            description: None,
            tag: None,
            external_id: None,
            metadata: Metadata::new(),
            geometry,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_external_id(mut self, external_id: impl Into<String>) -> Self {
        self.external_id = Some(external_id.into());
        self
    }

    pub fn contains(&self, point: &Coordinate) -> bool {
        self.geometry.contains(point)
    }
}

/// Chain a place belongs to (e.g. a coffee chain).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chain {
    pub slug: String,
    pub name: String,

    #[serde(default)]
    pub external_id: Option<String>,

    #[serde(default)]
    pub metadata: Metadata,
}

/// A place candidate near the device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub id: String,
    pub name: String,
    pub location: Coordinate,

    #[serde(default)]
    pub chain: Option<Chain>,

    #[serde(default)]
    pub categories: Vec<String>,

    #[serde(default)]
    pub group: Option<String>,

    #[serde(default)]
    pub metadata: Metadata,
}

impl Place {
    pub fn new(id: impl Into<String>, name: impl Into<String>, location: Coordinate) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            location,
            chain: None,
            categories: Vec::new(),
            group: None,
            metadata: Metadata::new(),
        }
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }
}

/// Administrative level of a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RegionType {
    Country,
    State,
    Dma,
    PostalCode,
}

impl RegionType {
    pub const ALL: [RegionType; 4] = [
        RegionType::Country,
        RegionType::State,
        RegionType::Dma,
        RegionType::PostalCode,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RegionType::Country => "country",
            RegionType::State => "state",
            RegionType::Dma => "dma",
            RegionType::PostalCode => "postalCode",
        }
    }
}

impl std::fmt::Display for RegionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// An administrative region candidate (country, state, DMA, postal code).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub id: String,

    #[serde(rename = "type")]
    pub region_type: RegionType,

    pub name: String,

    /// Short code, e.g. "US", "CA", "501", "10001".
    pub code: String,

    /// Emoji flag, countries only.
    #[serde(default)]
    pub flag: Option<String>,

    pub geometry: GeofenceGeometry,
}

impl Region {
    pub fn new(
        id: impl Into<String>,
        region_type: RegionType,
        name: impl Into<String>,
        code: impl Into<String>,
        geometry: GeofenceGeometry,
    ) -> Self {
        Self {
            id: id.into(),
            region_type,
            name: name.into(),
            code: code.into(),
            flag: None,
            geometry,
        }
    }

    pub fn contains(&self, point: &Coordinate) -> bool {
        self.geometry.contains(point)
    }

    /// Bounding area in square meters; smaller is more specific.
    pub fn area(&self) -> f64 {
        self.geometry.area()
    }
}

/// A tracked location record (e.g. a saved address).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Point {
    pub id: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub tag: Option<String>,

    #[serde(default)]
    pub external_id: Option<String>,

    #[serde(default)]
    pub metadata: Metadata,

    pub location: Coordinate,
}

impl Point {
    pub fn new(id: impl Into<String>, location: Coordinate) -> Self {
        Self {
            id: id.into(),
            description: String::new(),
            tag: None,
            external_id: None,
            metadata: Metadata::new(),
            location,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tag.as_deref() == Some(tag)
    }
}
