//! Example: Resolve a context from a small fixed catalog and print it as JSON.
//!
//! Run with: cargo run -p locus-context --example resolve_context

use locus_context::{ContextResolver, ResolverSettings};
use locus_geometry::{Coordinate, GeofenceGeometry};
use locus_model::{Geofence, Place, Region, RegionType};

fn main() -> anyhow::Result<()> {
    // Initialize tracing for debug output
    tracing_subscriber::fmt()
        .with_env_filter("locus_context=debug")
        .init();

    let here = Coordinate::new(40.7128, -74.0060)?;

    let geofences = vec![
        Geofence::new("city-hall", GeofenceGeometry::circle(here, 150.0)?).with_tag("landmark"),
        Geofence::new("downtown", GeofenceGeometry::circle(here.offset(0.0, 300.0), 1_500.0)?)
            .with_tag("district"),
        Geofence::new("brooklyn", GeofenceGeometry::circle(here.offset(120.0, 4_000.0), 2_000.0)?),
    ];

    let places = vec![
        Place::new("p-coffee", "Corner Coffee", here.offset(45.0, 30.0)),
        Place::new("p-deli", "Chambers Deli", here.offset(200.0, 80.0)),
    ];

    let regions = vec![
        Region::new(
            "us",
            RegionType::Country,
            "United States",
            "US",
            GeofenceGeometry::circle(here, 2_500_000.0)?,
        ),
        Region::new(
            "ny",
            RegionType::State,
            "New York",
            "NY",
            GeofenceGeometry::circle(here, 250_000.0)?,
        ),
        Region::new(
            "10007",
            RegionType::PostalCode,
            "10007",
            "10007",
            GeofenceGeometry::circle(here, 800.0)?,
        ),
    ];

    let resolver = ContextResolver::new(ResolverSettings::default());
    let context = resolver.resolve(&here, &geofences, &places, &regions);

    println!("=== Context at {} ===", here);
    println!(
        "Primary geofence: {}",
        context
            .primary_geofence()
            .map(|g| g.id.as_str())
            .unwrap_or("(none)")
    );
    println!("{}", serde_json::to_string_pretty(&context)?);

    Ok(())
}
