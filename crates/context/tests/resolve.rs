//! Integration tests for context resolution.
//!
//! Uses small fixed catalogs around lower Manhattan.

use locus_context::{ContextResolver, GeofenceSource, NullProvider, RadarContext, RegionSource};
use locus_geometry::{Coordinate, GeofenceGeometry};
use locus_model::{Geofence, Place, Region, RegionType};

fn coord(lat: f64, lng: f64) -> Coordinate {
    Coordinate::new(lat, lng).expect("valid coordinate")
}

fn origin() -> Coordinate {
    coord(40.7128, -74.0060)
}

fn circle(id: &str, center: Coordinate, radius: f64) -> Geofence {
    Geofence::new(id, GeofenceGeometry::circle(center, radius).unwrap())
}

fn region(id: &str, region_type: RegionType, radius: f64) -> Region {
    Region::new(
        id,
        region_type,
        id,
        id,
        GeofenceGeometry::circle(origin(), radius).unwrap(),
    )
}

fn catalog() -> Vec<Geofence> {
    let o = origin();
    vec![
        circle("district", o, 2_000.0).with_tag("district"),
        circle("block", o.offset(90.0, 20.0), 150.0).with_tag("block"),
        circle("store", o.offset(0.0, 10.0), 40.0).with_tag("store"),
        circle("elsewhere", o.offset(0.0, 5_000.0), 300.0),
        circle("store", o.offset(0.0, 10.0), 60.0).with_tag("store"),
    ]
}

fn places() -> Vec<Place> {
    let o = origin();
    vec![
        Place::new("deli", "Deli", o.offset(270.0, 35.0)),
        Place::new("cafe", "Cafe", o.offset(90.0, 25.0)),
    ]
}

fn regions() -> Vec<Region> {
    vec![
        region("US", RegionType::Country, 3_000_000.0),
        region("NY", RegionType::State, 200_000.0),
        region("NJ-overlap", RegionType::State, 400_000.0),
        region("501", RegionType::Dma, 80_000.0),
        region("10007", RegionType::PostalCode, 1_500.0),
        region("10006", RegionType::PostalCode, 1_500.0),
    ]
}

// =============================================================================
// Geofence ordering
// =============================================================================

mod geofences {
    use super::*;

    #[test]
    fn test_tightest_first_and_deduplicated() {
        let ctx = ContextResolver::default().resolve(&origin(), &catalog(), &places(), &regions());

        let ids: Vec<_> = ctx.geofences().iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["store", "block", "district"]);

        let radii: Vec<f64> = ctx
            .geofences()
            .iter()
            .map(|g| match &g.geometry {
                GeofenceGeometry::Circle(c) => c.radius(),
                GeofenceGeometry::Polygon(_) => unreachable!(),
            })
            .collect();
        assert!(radii.windows(2).all(|w| w[0] <= w[1]), "{radii:?}");
        assert_eq!(radii[0], 40.0);
    }

    #[test]
    fn test_ordering_is_monotonic_for_many_circles() {
        let o = origin();
        let fences: Vec<Geofence> = (0..40)
            .map(|i| {
                let radius = 30.0 + ((i * 37) % 41) as f64 * 10.0;
                circle(&format!("g{i:02}"), o.offset((i * 9) as f64, 5.0), radius)
            })
            .collect();

        let ctx = ContextResolver::default().resolve(&o, &fences, &NullProvider, &NullProvider);
        assert_eq!(ctx.geofences().len(), 40);

        let areas: Vec<f64> = ctx.geofences().iter().map(|g| g.geometry.area()).collect();
        assert!(areas.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_polygon_and_circle_mix() {
        let o = origin();
        let square = GeofenceGeometry::polygon(vec![
            o.offset(225.0, 14.0),
            o.offset(135.0, 14.0),
            o.offset(45.0, 14.0),
            o.offset(315.0, 14.0),
        ])
        .unwrap();
        let fences = vec![
            circle("circle", o, 50.0),
            Geofence::new("lobby", square),
        ];

        let ctx = ContextResolver::default().resolve(&o, &fences, &NullProvider, &NullProvider);
        assert_eq!(ctx.primary_geofence().map(|g| g.id.as_str()), Some("lobby"));
    }

    #[test]
    fn test_no_match_is_empty_not_error() {
        let far = coord(-33.86, 151.21);
        let ctx = ContextResolver::default().resolve(&far, &catalog(), &places(), &regions());
        assert!(ctx.geofences().is_empty());
        assert!(ctx.place().is_none());
        assert!(ctx.regions().is_empty());
        assert!(ctx.is_empty());
    }
}

// =============================================================================
// Place and regions
// =============================================================================

mod place_and_regions {
    use super::*;

    #[test]
    fn test_nearest_place_selected() {
        let ctx = ContextResolver::default().resolve(&origin(), &catalog(), &places(), &regions());
        assert_eq!(ctx.place().map(|p| p.id.as_str()), Some("cafe"));
    }

    #[test]
    fn test_one_region_per_type() {
        let ctx = ContextResolver::default().resolve(&origin(), &catalog(), &places(), &regions());

        assert_eq!(ctx.country().map(|r| r.id.as_str()), Some("US"));
        assert_eq!(ctx.state().map(|r| r.id.as_str()), Some("NY"));
        assert_eq!(ctx.dma().map(|r| r.id.as_str()), Some("501"));
        // Equal areas: smaller id wins.
        assert_eq!(ctx.postal_code().map(|r| r.id.as_str()), Some("10006"));

        let mut types: Vec<_> = ctx.regions().iter().map(|r| r.region_type).collect();
        let before = types.len();
        types.dedup();
        assert_eq!(types.len(), before);
    }
}

// =============================================================================
// Purity and wire format
// =============================================================================

mod purity {
    use super::*;

    #[test]
    fn test_resolve_is_deterministic_and_read_only() {
        let fences = catalog();
        let place_list = places();
        let region_list = regions();
        let (fences_before, places_before, regions_before) =
            (fences.clone(), place_list.clone(), region_list.clone());

        let resolver = ContextResolver::default();
        let first = resolver.resolve(&origin(), &fences, &place_list, &region_list);
        let second = resolver.resolve(&origin(), &fences, &place_list, &region_list);

        assert_eq!(first, second);
        assert_eq!(fences, fences_before);
        assert_eq!(place_list, places_before);
        assert_eq!(region_list, regions_before);
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let mut reversed = catalog();
        reversed.reverse();
        let mut reversed_regions = regions();
        reversed_regions.reverse();

        let resolver = ContextResolver::default();
        let a = resolver.resolve(&origin(), &catalog(), &places(), &regions());
        let b = resolver.resolve(&origin(), &reversed, &places(), &reversed_regions);
        assert_eq!(a, b);
    }

    #[test]
    fn test_json_round_trip() {
        let ctx = ContextResolver::default().resolve(&origin(), &catalog(), &places(), &regions());
        let json = serde_json::to_string(&ctx).unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        for key in ["geofences", "place", "country", "state", "dma", "postalCode"] {
            assert!(value.get(key).is_some(), "missing key {key}");
        }

        let back: RadarContext = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ctx);
    }

    #[test]
    fn test_json_rejects_region_in_wrong_slot() {
        let ctx = ContextResolver::default().resolve(&origin(), &catalog(), &places(), &regions());
        let mut value = serde_json::to_value(&ctx).unwrap();
        value["country"] = value["dma"].clone();

        assert!(serde_json::from_value::<RadarContext>(value).is_err());
    }
}

// =============================================================================
// Custom sources
// =============================================================================

/// Source that only exposes candidates within a fixed box around the point,
/// the way a spatial index would.
struct BoxedIndex {
    geofences: Vec<Geofence>,
    regions: Vec<Region>,
}

impl GeofenceSource for BoxedIndex {
    fn geofences_near(&self, point: &Coordinate) -> Vec<&Geofence> {
        self.geofences
            .iter()
            .filter(|g| g.geometry.centroid().distance_to(point) < 3_000.0)
            .collect()
    }
}

impl RegionSource for BoxedIndex {
    fn regions_near(&self, _point: &Coordinate) -> Vec<&Region> {
        self.regions.iter().collect()
    }
}

#[test]
fn test_custom_source_matches_plain_vec() {
    let index = BoxedIndex {
        geofences: catalog(),
        regions: regions(),
    };
    let resolver = ContextResolver::default();

    let via_index = resolver.resolve(&origin(), &index, &places(), &index);
    let via_vec = resolver.resolve(&origin(), &catalog(), &places(), &regions());
    assert_eq!(via_index, via_vec);
}
