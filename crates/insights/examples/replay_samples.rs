//! Example: Replay two synthetic work weeks through the learner and print
//! the learned insights as JSON.
//!
//! Run with: cargo run -p locus-insights --example replay_samples

use chrono::{Duration, TimeZone, Utc};
use locus_geometry::Coordinate;
use locus_insights::{InsightsLearner, InsightsSettings, LocationSample};
use locus_route::{DistanceUnits, RouteMode};

fn main() -> anyhow::Result<()> {
    // Initialize tracing for debug output
    tracing_subscriber::fmt()
        .with_env_filter("locus_insights=info")
        .init();

    let home = Coordinate::new(37.422, -122.084)?;
    let office = home.offset(45.0, 8_000.0);
    let midway = home.offset(45.0, 4_000.0);

    let settings = InsightsSettings::from_json(r#"{"minDwellMinutes": 30}"#)?;
    let mut learner = InsightsLearner::new(settings)?;

    // 2026-03-02 is a Monday.
    let monday = Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).single();
    let monday = monday.ok_or_else(|| anyhow::anyhow!("invalid start date"))?;

    for week in 0..2 {
        for weekday in 0..5 {
            let day = monday + Duration::days(week * 7 + weekday);
            let at = |hour: i64, minute: i64| day + Duration::hours(hour) + Duration::minutes(minute);

            let samples = [
                LocationSample::new(at(7, 50), home),
                LocationSample::new(at(8, 10), midway),
                LocationSample::new(at(8, 35), office),
                LocationSample::new(at(12, 0), office),
                LocationSample::new(at(17, 0), office),
                LocationSample::new(at(17, 20), midway),
                LocationSample::new(at(17, 45), home),
                LocationSample::new(at(23, 0), home),
            ];

            for sample in &samples {
                let state = learner.ingest(sample)?;
                if state.commuting {
                    println!("{} commuting", sample.timestamp);
                }
            }
        }
    }

    println!("=== Phase: {:?} ===", learner.phase());
    if let Some(route) = learner.observed_commute() {
        println!(
            "Observed commute: {} in {}",
            route.distance.text(),
            route.duration.text()
        );
    }
    if let Some(route) = learner.estimated_commute(RouteMode::Bike, DistanceUnits::Metric) {
        println!("By bike: about {}", route.duration.text());
    }
    println!("{}", serde_json::to_string_pretty(&learner.insights())?);

    Ok(())
}
