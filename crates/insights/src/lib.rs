//! Home and office learning for locus.
//!
//! Consumes a time-ordered stream of [`LocationSample`]s and learns where the
//! user lives and works:
//! - Night dwells build the home location, weekday work-hour dwells the office
//! - Confidence rises with distinct evidence days and falls one level at a
//!   time after a sustained run of contrary dwells
//! - Every trusted sample is classified as home / office / traveling /
//!   commuting
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Domain Layer                             │
//! │  types.rs      - Samples and UserInsights snapshot           │
//! │  confidence.rs - Confidence levels                           │
//! │  slot.rs       - Evidence accounting per location            │
//! │  fraud.rs      - Mocked / jumped sample detection            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Application Layer                          │
//! │  learner.rs  - InsightsLearner state machine                 │
//! │  settings.rs - InsightsSettings                              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use locus_geometry::Coordinate;
//! use locus_insights::{InsightsLearner, InsightsSettings, LocationSample};
//!
//! let mut learner = InsightsLearner::new(InsightsSettings::default()).unwrap();
//! let home = Coordinate::new(37.422, -122.084).unwrap();
//!
//! for day in 2..10 {
//!     let at = Utc.with_ymd_and_hms(2026, 3, day, 23, 0, 0).unwrap();
//!     learner.ingest(&LocationSample::new(at, home).with_dwell_minutes(90.0)).unwrap();
//! }
//!
//! let insights = learner.insights();
//! assert!(insights.home_location().is_some());
//! assert!(insights.state().home);
//! ```

mod confidence;
mod error;
mod fraud;
mod learner;
mod settings;
mod slot;
mod types;

pub use confidence::Confidence;
pub use error::{InsightsError, InsightsResult};
pub use fraud::Fraud;
pub use learner::{InsightsLearner, LearnerPhase, LearnerState};
pub use settings::{HourWindow, InsightsSettings};
pub use slot::LearnedSlot;
pub use types::{LocationKind, LocationSample, UserInsights, UserInsightsLocation, UserInsightsState};
