//! Plan generation: beam search, scoring, and explanations.
//!
//! The generator expands partial schedules requirement group by
//! requirement group, scoring candidates with an eight-term weighted
//! function and keeping a bounded beam of survivors. The winning
//! schedule gets one rationale string per course.
//!
//! # Example
//!
//! ```no_run
//! use course_plan::planner::{PlanGenerator, PlanRequest};
//! # let request: PlanRequest = unimplemented!();
//!
//! let plans = PlanGenerator::new().generate(&request);
//! if plans.is_empty() && plans.has_lock_conflicts() {
//!     // locked sections are mutually unsatisfiable
//! }
//! ```

pub mod beam;
pub mod explain;
pub mod scoring;

pub use beam::{PlanGenerator, PlanRequest, DEFAULT_BEAM_SIZE, DEFAULT_MAX_NODES};
pub use explain::build_explanations;
pub use scoring::{score_schedule, ScoreBreakdown, ScoreInputs};
