//! Context resolver - turns one location fix into a [`RadarContext`].

use crate::limits::ResolverSettings;
use crate::provider::{GeofenceSource, PlaceSource, RegionSource};
use crate::region::RegionHierarchy;
use crate::state::{order_geofences, RadarContext};
use locus_geometry::Coordinate;
use locus_model::{Geofence, Place};

/// Stateless resolver. Safe to share across threads.
#[derive(Debug, Clone, Default)]
pub struct ContextResolver {
    settings: ResolverSettings,
}

impl ContextResolver {
    pub fn new(settings: ResolverSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    /// Resolves the context for `point`.
    ///
    /// Never fails: no match is an empty list or `None`. Sources are only
    /// read, and the same inputs always give the same snapshot.
    pub fn resolve<G, P, R>(
        &self,
        point: &Coordinate,
        geofences: &G,
        places: &P,
        regions: &R,
    ) -> RadarContext
    where
        G: GeofenceSource + ?Sized,
        P: PlaceSource + ?Sized,
        R: RegionSource + ?Sized,
    {
        let matched = self.matching_geofences(point, geofences);
        let place = self.nearest_place(point, places);
        let hierarchy = RegionHierarchy::resolve(point, regions.regions_near(point));

        tracing::debug!(
            point = %point,
            geofences = matched.len(),
            primary = matched.first().map(|g| g.id.as_str()),
            place = place.as_ref().map(|p| p.id.as_str()),
            regions = hierarchy.iter().count(),
            "context resolved"
        );

        RadarContext::from_parts(matched, place, hierarchy)
    }

    /// Geofences containing `point`, tightest first, one per id.
    pub fn matching_geofences<G>(&self, point: &Coordinate, geofences: &G) -> Vec<Geofence>
    where
        G: GeofenceSource + ?Sized,
    {
        let matched = geofences
            .geofences_near(point)
            .into_iter()
            .filter(|g| g.contains(point))
            .cloned()
            .collect();
        order_geofences(matched)
    }

    /// Closest place within the relevance distance; ties go to the smaller id.
    pub fn nearest_place<P>(&self, point: &Coordinate, places: &P) -> Option<Place>
    where
        P: PlaceSource + ?Sized,
    {
        let max = self.settings.max_place_distance_meters;

        places
            .places_near(point)
            .into_iter()
            .map(|p| (point.distance_to(&p.location), p))
            .filter(|(d, _)| *d <= max)
            .min_by(|(da, a), (db, b)| da.total_cmp(db).then_with(|| a.id.cmp(&b.id)))
            .map(|(_, p)| p.clone())
    }
}
