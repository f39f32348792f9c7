//! Requirement-group input model.
//!
//! A requirement group is a satisfaction rule over a pool of candidate
//! courses, produced by a requirement-resolution step outside this
//! crate. `needed` arrives already reduced by whatever the student has
//! fulfilled.

use serde::{Deserialize, Serialize};

/// How a requirement group is satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SatisfactionRule {
    /// Every candidate course is required.
    AllOf,
    /// Any candidate satisfies the group; the group itself is optional.
    AnyOf,
    /// A fixed number of candidates must be taken.
    ChooseN,
    /// Candidates must be taken until a credit total is reached.
    MinCredits,
    /// Candidates must be taken until a course count is reached.
    MinCount,
}

/// What a group's progress is measured in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupMetric {
    /// Progress counts selected courses.
    Count,
    /// Progress sums selected course credits.
    Credits,
}

impl SatisfactionRule {
    /// Whether the group is mandatory. Only `anyOf` groups are optional.
    #[inline]
    pub fn is_required(self) -> bool {
        !matches!(self, SatisfactionRule::AnyOf)
    }

    /// The metric `needed` is expressed in.
    #[inline]
    pub fn metric(self) -> GroupMetric {
        match self {
            SatisfactionRule::MinCredits => GroupMetric::Credits,
            _ => GroupMetric::Count,
        }
    }
}

/// A remaining requirement group, as handed to the generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementGroup {
    /// Unique group identifier.
    pub id: String,
    /// Human-readable title, used in explanations when present.
    #[serde(default)]
    pub title: Option<String>,
    /// Candidate course ids the group may be satisfied from.
    pub candidate_course_ids: Vec<String>,
    /// Satisfaction rule.
    pub rule: SatisfactionRule,
    /// Remaining count or credit target, depending on the rule's metric.
    pub needed: f64,
}

impl RequirementGroup {
    /// Creates a group with the given rule and remaining need.
    pub fn new(id: impl Into<String>, rule: SatisfactionRule, needed: f64) -> Self {
        Self {
            id: id.into(),
            title: None,
            candidate_course_ids: Vec::new(),
            rule,
            needed,
        }
    }

    /// Sets the display title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Adds a candidate course.
    pub fn with_candidate(mut self, course_id: impl Into<String>) -> Self {
        self.candidate_course_ids.push(course_id.into());
        self
    }

    /// Sets the full candidate pool.
    pub fn with_candidates(mut self, course_ids: Vec<String>) -> Self {
        self.candidate_course_ids = course_ids;
        self
    }

    /// Whether the group is mandatory.
    #[inline]
    pub fn is_required(&self) -> bool {
        self.rule.is_required()
    }

    /// Title for display, falling back to the group id.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.id)
    }
}
