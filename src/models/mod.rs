//! Course-planning domain models.
//!
//! Immutable value types shared by the conflict model, scoring, and the
//! beam-search generator: catalog data (`Course`, `Section`,
//! `Meeting`), time primitives (`Day`, `TimeOfDay`, `TimeRange`),
//! student input (`Preferences`, `RequirementGroup`), and the
//! generator's structured result (`PlanSet`).
//!
//! All types serialize with serde; `Day` and `TimeOfDay` use the
//! catalog wire forms (`"M".."F"`, `"HH:MM"`).

mod course;
mod plan;
mod preferences;
mod requirement;
mod section;
mod time;

pub use course::Course;
pub use plan::PlanSet;
pub use preferences::{DensityPreference, FridayPreference, Preferences, ProtectedBlock};
pub use requirement::{GroupMetric, RequirementGroup, SatisfactionRule};
pub use section::{Meeting, Section};
pub use time::{Day, ParseError, TimeOfDay, TimeRange};
