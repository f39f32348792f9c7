//! Schedule scoring.
//!
//! Computes an eight-term weighted score for a candidate schedule. The
//! positive terms are normalized to roughly [0, 1]; the penalties are
//! raw counts.
//!
//! # Terms
//!
//! | Term | Weight | Definition |
//! |------|--------|-----------|
//! | Coverage | +6 | Fraction of required courses present |
//! | Interest | +3 | Mean per-section interest score |
//! | Time window | +3 | 1 − fraction of sections outside the window |
//! | Day off | +2 | Fraction of preferred days-off left free |
//! | Density | +1 | 1 − normalized variance of per-day meeting counts |
//! | Friday | −2 | 1 if Fridays are avoided but scheduled |
//! | Break | −2 | Section pairs with a gap under 15 minutes |
//! | Capacity | −1 | Sections with no remaining seats |

use std::collections::{HashMap, HashSet};

use crate::conflict::{regroup_linked, sections_overlap, violates_preferred_window};
use crate::models::{Course, Day, FridayPreference, Preferences, Section};

/// Interest score assumed for courses the interest map does not cover.
const DEFAULT_INTEREST: f64 = 0.5;

/// Two classes closer together than this count as a missing break.
const MIN_BREAK_MINS: i32 = 15;

/// Lookups the scoring terms read. Borrowed from the plan request.
#[derive(Debug, Clone, Copy)]
pub struct ScoreInputs<'a> {
    /// Student preferences.
    pub prefs: &'a Preferences,
    /// Courses the degree still requires.
    pub required_course_ids: &'a HashSet<String>,
    /// Per-course interest in [0, 1].
    pub interest_by_course: &'a HashMap<String, f64>,
    /// Course catalog, for credits and capacity checks.
    pub courses_by_id: &'a HashMap<String, Course>,
}

impl ScoreInputs<'_> {
    /// Interest score for a course, defaulting when unrated.
    pub fn interest_of(&self, course_id: &str) -> f64 {
        self.interest_by_course
            .get(course_id)
            .copied()
            .unwrap_or(DEFAULT_INTEREST)
    }
}

/// Per-term scores for one candidate schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBreakdown {
    /// Fraction of required courses present (1 when none required).
    pub coverage: f64,
    /// Mean per-section interest (0 for an empty schedule).
    pub interest: f64,
    /// 1 − fraction of sections violating the preferred window.
    pub time_window: f64,
    /// Fraction of preferred days-off that stay meeting-free.
    pub day_off: f64,
    /// Weekly balance: 1 − normalized variance of per-day meeting counts.
    pub density: f64,
    /// 1 when Fridays are avoided but any meeting falls on one.
    pub friday_penalty: f64,
    /// Count of same-term section pairs with a sub-15-minute gap.
    pub break_penalty: f64,
    /// Count of sections with no remaining seats.
    pub capacity_penalty: f64,
}

impl ScoreBreakdown {
    /// Weighted total used to rank schedules.
    pub fn total(&self) -> f64 {
        self.coverage * 6.0
            + self.interest * 3.0
            + self.time_window * 3.0
            + self.day_off * 2.0
            + self.density
            - self.friday_penalty * 2.0
            - self.break_penalty * 2.0
            - self.capacity_penalty
    }
}

/// Scores a candidate schedule.
///
/// The section list is walked linked-unit by linked-unit, so a
/// lecture/lab pair contributes each of its sections to the per-section
/// terms (its course counts once per section in the interest mean).
pub fn score_schedule(sections: &[&Section], inputs: &ScoreInputs<'_>) -> ScoreBreakdown {
    let flattened: Vec<&Section> = regroup_linked(sections).into_iter().flatten().collect();

    ScoreBreakdown {
        coverage: coverage_score(&flattened, inputs.required_course_ids),
        interest: interest_score(&flattened, inputs),
        time_window: time_window_score(&flattened, inputs.prefs),
        day_off: day_off_score(&flattened, inputs.prefs),
        density: density_score(&flattened),
        friday_penalty: friday_penalty(&flattened, inputs.prefs),
        break_penalty: break_penalty(&flattened),
        capacity_penalty: capacity_penalty(&flattened, inputs.courses_by_id),
    }
}

fn coverage_score(sections: &[&Section], required: &HashSet<String>) -> f64 {
    if required.is_empty() {
        return 1.0;
    }
    let covered: HashSet<&str> = sections
        .iter()
        .filter(|s| required.contains(&s.course_id))
        .map(|s| s.course_id.as_str())
        .collect();
    covered.len() as f64 / required.len() as f64
}

fn interest_score(sections: &[&Section], inputs: &ScoreInputs<'_>) -> f64 {
    if sections.is_empty() {
        return 0.0;
    }
    let total: f64 = sections.iter().map(|s| inputs.interest_of(&s.course_id)).sum();
    total / sections.len() as f64
}

fn time_window_score(sections: &[&Section], prefs: &Preferences) -> f64 {
    if sections.is_empty() {
        return 1.0;
    }
    let violations = sections
        .iter()
        .filter(|s| violates_preferred_window(s, prefs))
        .count();
    (1.0 - violations as f64 / sections.len() as f64).max(0.0)
}

fn day_off_score(sections: &[&Section], prefs: &Preferences) -> f64 {
    if prefs.days_off.is_empty() {
        return 1.0;
    }
    let meeting_days: HashSet<Day> = sections
        .iter()
        .flat_map(|s| s.meetings.iter().map(|m| m.day))
        .collect();
    let free = prefs
        .days_off
        .iter()
        .filter(|day| !meeting_days.contains(day))
        .count();
    free as f64 / prefs.days_off.len() as f64
}

/// Balance of meetings across the week.
///
/// Symmetric: both piling every meeting onto one day and an even spread
/// move the variance, not a directional compact/spread preference.
fn density_score(sections: &[&Section]) -> f64 {
    if sections.is_empty() {
        return 1.0;
    }
    let mut counts = [0.0_f64; 5];
    for section in sections {
        for meeting in &section.meetings {
            counts[meeting.day.index()] += 1.0;
        }
    }
    let total: f64 = counts.iter().sum();
    if total == 0.0 {
        return 1.0;
    }

    let mean = total / counts.len() as f64;
    let variance = counts.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / counts.len() as f64;
    let normalized = (variance / (total * total)).min(1.0);
    1.0 - normalized
}

fn friday_penalty(sections: &[&Section], prefs: &Preferences) -> f64 {
    if prefs.fridays != FridayPreference::Avoid {
        return 0.0;
    }
    let has_friday = sections
        .iter()
        .any(|s| s.meetings.iter().any(|m| m.day == Day::Fri));
    if has_friday {
        1.0
    } else {
        0.0
    }
}

/// Counts same-term section pairs squeezed closer than 15 minutes.
///
/// Only each section's first meeting is compared, so gaps between later
/// meetings in the week go undetected. Sections without meetings are
/// skipped.
fn break_penalty(sections: &[&Section]) -> f64 {
    let mut ordered: Vec<&Section> = sections.to_vec();
    ordered.sort_by_key(|s| s.meetings.first().map_or(0, |m| m.start.minutes()));

    let mut penalty = 0.0;
    for i in 0..ordered.len() {
        for j in (i + 1)..ordered.len() {
            let (a, b) = (ordered[i], ordered[j]);
            if a.term_id != b.term_id || sections_overlap(a, b) {
                continue;
            }
            let (Some(first_a), Some(first_b)) = (a.meetings.first(), b.meetings.first()) else {
                continue;
            };
            let gap =
                (i32::from(first_b.start.minutes()) - i32::from(first_a.end.minutes())).abs();
            if gap < MIN_BREAK_MINS {
                penalty += 1.0;
            }
        }
    }
    penalty
}

fn capacity_penalty(sections: &[&Section], courses_by_id: &HashMap<String, Course>) -> f64 {
    sections
        .iter()
        .filter(|s| courses_by_id.contains_key(&s.course_id) && s.is_full())
        .count() as f64
}
