//! Generated-plan model.
//!
//! The generator's structured result. Every field is always present;
//! "no feasible schedule" and "locked sections unsatisfiable" are
//! expressed through emptiness, never through errors.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::section::Section;

/// Up to three ranked, conflict-free weekly schedules.
///
/// `scores` is sorted descending and parallel to
/// `[primary, backups[0], backups[1]]`. Explanations cover the primary
/// schedule only. `lock_conflicts` maps a course id to the reasons its
/// locked section is (or nearly is) unschedulable; an empty `primary`
/// with non-empty `lock_conflicts` means the locks themselves are
/// unsatisfiable, while both empty means no feasible combination
/// exists under the current preferences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSet {
    /// Best schedule found. Sections ordered by (weekday, start time).
    pub primary: Vec<Section>,
    /// Up to two alternative schedules, best first.
    pub backups: Vec<Vec<Section>>,
    /// Scores for primary and backups, descending.
    pub scores: Vec<f64>,
    /// Per-course rationale strings for the primary schedule.
    pub explanations: BTreeMap<String, String>,
    /// Per-course reasons a locked section conflicts with the request.
    pub lock_conflicts: BTreeMap<String, String>,
}

impl PlanSet {
    /// An empty result carrying only lock-conflict diagnostics.
    pub(crate) fn conflicted(lock_conflicts: BTreeMap<String, String>) -> Self {
        Self {
            lock_conflicts,
            ..Self::default()
        }
    }

    /// Number of schedules produced (0–3).
    pub fn plan_count(&self) -> usize {
        self.scores.len()
    }

    /// Whether no schedule was produced.
    pub fn is_empty(&self) -> bool {
        self.primary.is_empty()
    }

    /// Whether any locked section reported conflicts.
    pub fn has_lock_conflicts(&self) -> bool {
        !self.lock_conflicts.is_empty()
    }
}
