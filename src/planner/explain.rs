//! Per-course rationales for the winning schedule.
//!
//! One sentence per distinct course: which requirement group it
//! fulfills, whether it sits inside the student's protected times and
//! preferred window, how it relates to the Friday preference, and the
//! course's interest score.

use std::collections::{BTreeMap, HashMap};

use crate::conflict::{violates_preferred_window, violates_protected_block};
use crate::models::{Day, FridayPreference, RequirementGroup, Section};
use crate::planner::scoring::ScoreInputs;

/// Builds one rationale string per distinct course in a schedule.
///
/// A course is attributed to the first group (in caller input order)
/// whose candidate pool contains it; a course no group claims falls
/// back to its own id.
pub fn build_explanations(
    sections: &[&Section],
    groups: &[RequirementGroup],
    inputs: &ScoreInputs<'_>,
) -> BTreeMap<String, String> {
    let mut group_by_course: HashMap<&str, &RequirementGroup> = HashMap::new();
    for group in groups {
        for course_id in &group.candidate_course_ids {
            group_by_course.entry(course_id.as_str()).or_insert(group);
        }
    }

    let mut explanations = BTreeMap::new();
    for &section in sections {
        if explanations.contains_key(&section.course_id) {
            continue;
        }

        let title = group_by_course
            .get(section.course_id.as_str())
            .map_or(section.course_id.as_str(), |group| group.display_title());

        let within_window = !violates_protected_block(section, inputs.prefs)
            && !violates_preferred_window(section, inputs.prefs);
        let window_text = if within_window {
            "fits your protected times"
        } else {
            "needs flexibility"
        };

        let has_friday = section.meetings.iter().any(|m| m.day == Day::Fri);
        let friday_text = if has_friday {
            if inputs.prefs.fridays == FridayPreference::Avoid {
                "may require Fridays"
            } else {
                "includes Friday sessions"
            }
        } else {
            "avoids Fridays"
        };

        let interest = inputs.interest_of(&section.course_id);
        explanations.insert(
            section.course_id.clone(),
            format!("Fulfills {title}; {window_text}; {friday_text}; interest {interest:.2}."),
        );
    }

    explanations
}
