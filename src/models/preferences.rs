//! Scheduling preferences.
//!
//! Preferences come from an onboarding/advisor flow outside this crate.
//! Only protected blocks act as hard constraints during search; the
//! rest shape the score (time window, days-off, Friday handling) or are
//! carried for callers (instructor lists, density, minimum break).

use serde::{Deserialize, Serialize};

use super::time::{Day, TimeOfDay, TimeRange};

/// How the student feels about Friday meetings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FridayPreference {
    /// Penalize any schedule with a Friday meeting.
    Avoid,
    /// No opinion.
    #[default]
    Neutral,
    /// Fridays are welcome.
    Prefer,
}

/// Preferred weekly shape.
///
/// Advisory: the balance score is symmetric and does not read this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DensityPreference {
    /// Few, heavily loaded days.
    Compact,
    /// Meetings spread across the week.
    Spread,
}

/// A caller-declared time window to keep free of classes.
///
/// Protected blocks are hard constraints: a section meeting inside one
/// is never added to a schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtectedBlock {
    /// Day the block applies to.
    pub day: Day,
    /// Block start (inclusive).
    pub start: TimeOfDay,
    /// Block end (exclusive).
    pub end: TimeOfDay,
    /// Optional caller label, e.g. `"work shift"`.
    #[serde(default)]
    pub label: Option<String>,
}

impl ProtectedBlock {
    /// Creates an unlabeled protected block.
    pub fn new(day: Day, start: TimeOfDay, end: TimeOfDay) -> Self {
        Self {
            day,
            start,
            end,
            label: None,
        }
    }

    /// Sets the caller label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// The block's time range within its day.
    #[inline]
    pub fn range(&self) -> TimeRange {
        TimeRange::new(self.start, self.end)
    }
}

/// Student scheduling preferences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    /// Earliest acceptable meeting start.
    pub earliest: Option<TimeOfDay>,
    /// Latest acceptable meeting end.
    pub latest: Option<TimeOfDay>,
    /// Days the student would like entirely meeting-free.
    pub days_off: Vec<Day>,
    /// Hard-blocked time windows.
    pub protected_blocks: Vec<ProtectedBlock>,
    /// Desired credit load for the term.
    pub target_credits: Option<f64>,
    /// Desired minimum break between classes, in minutes. Advisory
    /// only; the break penalty uses a fixed threshold.
    pub min_break_mins: Option<u16>,
    /// Instructors to avoid.
    pub avoid_instructor_ids: Vec<String>,
    /// Instructors to prefer.
    pub prefer_instructor_ids: Vec<String>,
    /// Weekly shape preference.
    pub density: Option<DensityPreference>,
    /// Friday handling.
    pub fridays: FridayPreference,
}

impl Preferences {
    /// Creates empty preferences (no constraints, neutral Fridays).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the earliest acceptable start.
    pub fn with_earliest(mut self, t: TimeOfDay) -> Self {
        self.earliest = Some(t);
        self
    }

    /// Sets the latest acceptable end.
    pub fn with_latest(mut self, t: TimeOfDay) -> Self {
        self.latest = Some(t);
        self
    }

    /// Adds a preferred day off.
    pub fn with_day_off(mut self, day: Day) -> Self {
        self.days_off.push(day);
        self
    }

    /// Adds a protected block.
    pub fn with_protected_block(mut self, block: ProtectedBlock) -> Self {
        self.protected_blocks.push(block);
        self
    }

    /// Sets the target credit load.
    pub fn with_target_credits(mut self, credits: f64) -> Self {
        self.target_credits = Some(credits);
        self
    }

    /// Sets the Friday preference.
    pub fn with_fridays(mut self, fridays: FridayPreference) -> Self {
        self.fridays = fridays;
        self
    }

    /// Sets the density preference.
    pub fn with_density(mut self, density: DensityPreference) -> Self {
        self.density = Some(density);
        self
    }
}
