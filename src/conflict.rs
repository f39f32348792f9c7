//! Time-conflict predicates and linked-section grouping.
//!
//! The conflict model answers three questions during search: do two
//! sections collide, does a section land in a protected block, and does
//! it leave the preferred time window. It also resolves `linked_with`
//! references into the connected component of sections that must be
//! scheduled as one unit.
//!
//! Overlap is strict half-open on minute ranges within a shared day;
//! back-to-back meetings never conflict.

use std::collections::{HashMap, HashSet};

use crate::models::{Preferences, Section};

/// Whether any meeting of `a` collides with any meeting of `b`.
pub fn sections_overlap(a: &Section, b: &Section) -> bool {
    a.meetings.iter().any(|ma| {
        b.meetings
            .iter()
            .any(|mb| ma.day == mb.day && ma.range().overlaps(&mb.range()))
    })
}

/// Whether `candidate` collides with any already-chosen section.
pub fn conflicts_with_any(existing: &[&Section], candidate: &Section) -> bool {
    existing.iter().any(|s| sections_overlap(s, candidate))
}

/// Whether any meeting falls inside a protected block on the same day.
pub fn violates_protected_block(section: &Section, prefs: &Preferences) -> bool {
    if prefs.protected_blocks.is_empty() {
        return false;
    }
    section.meetings.iter().any(|meeting| {
        prefs
            .protected_blocks
            .iter()
            .any(|block| block.day == meeting.day && block.range().overlaps(&meeting.range()))
    })
}

/// Whether any meeting starts before `earliest` or ends after `latest`.
///
/// Each bound is only checked when the preference sets it; with neither
/// set the window is unbounded.
pub fn violates_preferred_window(section: &Section, prefs: &Preferences) -> bool {
    if prefs.earliest.is_none() && prefs.latest.is_none() {
        return false;
    }
    section.meetings.iter().any(|meeting| {
        if let Some(earliest) = prefs.earliest {
            if meeting.start < earliest {
                return true;
            }
        }
        if let Some(latest) = prefs.latest {
            if meeting.end > latest {
                return true;
            }
        }
        false
    })
}

/// Collects the connected component of sections reachable from
/// `section` through `linked_with` references.
///
/// Stack-based traversal, cycle-safe, deduplicated by id. The starting
/// section is always first; the component may have any size, not just
/// two. Dangling references are skipped.
pub fn linked_group<'a>(
    section: &'a Section,
    index: &HashMap<&str, &'a Section>,
) -> Vec<&'a Section> {
    let mut stack = vec![section];
    let mut seen: HashSet<&str> = HashSet::new();
    let mut collected = Vec::new();

    while let Some(current) = stack.pop() {
        if !seen.insert(current.id.as_str()) {
            continue;
        }
        collected.push(current);
        if let Some(partner_id) = current.linked_with.as_deref() {
            if let Some(&partner) = index.get(partner_id) {
                if !seen.contains(partner.id.as_str()) {
                    stack.push(partner);
                }
            }
        }
    }

    collected
}

/// Partitions a schedule's section list into linked components.
///
/// Only links whose partner is present in the list are followed;
/// sections without resolvable links form singleton groups. Used by
/// scoring to walk a schedule linked-unit by linked-unit.
pub fn regroup_linked<'a>(sections: &[&'a Section]) -> Vec<Vec<&'a Section>> {
    let in_list: HashMap<&str, &Section> =
        sections.iter().map(|s| (s.id.as_str(), *s)).collect();
    let mut visited: HashSet<&str> = HashSet::new();
    let mut groups = Vec::new();

    for &section in sections {
        if visited.contains(section.id.as_str()) {
            continue;
        }
        let component = linked_group(section, &in_list);
        let mut group = Vec::new();
        for member in component {
            if visited.insert(member.id.as_str()) {
                group.push(member);
            }
        }
        groups.push(group);
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Day, Meeting, ProtectedBlock, TimeOfDay};

    fn t(s: &str) -> TimeOfDay {
        s.parse().unwrap()
    }

    fn section(id: &str, meetings: &[(Day, &str, &str)]) -> Section {
        let mut s = Section::new(id, format!("c-{id}"), "2026-fall");
        for (day, start, end) in meetings {
            s = s.with_meeting(Meeting::new(*day, t(start), t(end)));
        }
        s
    }

    #[test]
    fn test_sections_overlap_same_day() {
        let a = section("a", &[(Day::Mon, "09:00", "10:15")]);
        let b = section("b", &[(Day::Mon, "10:00", "11:15")]);
        assert!(sections_overlap(&a, &b));
        assert!(sections_overlap(&b, &a));
    }

    #[test]
    fn test_sections_no_overlap_across_days() {
        let a = section("a", &[(Day::Mon, "09:00", "10:15")]);
        let b = section("b", &[(Day::Tue, "09:00", "10:15")]);
        assert!(!sections_overlap(&a, &b));
    }

    #[test]
    fn test_back_to_back_sections_do_not_overlap() {
        let a = section("a", &[(Day::Wed, "09:00", "10:00")]);
        let b = section("b", &[(Day::Wed, "10:00", "11:00")]);
        assert!(!sections_overlap(&a, &b));
    }

    #[test]
    fn test_multi_meeting_overlap_found_on_any_day() {
        let a = section("a", &[(Day::Mon, "09:00", "10:15"), (Day::Wed, "09:00", "10:15")]);
        let b = section("b", &[(Day::Tue, "09:00", "10:15"), (Day::Wed, "10:00", "11:15")]);
        assert!(sections_overlap(&a, &b)); // Wednesday collision
    }

    #[test]
    fn test_conflicts_with_any() {
        let a = section("a", &[(Day::Mon, "09:00", "10:15")]);
        let b = section("b", &[(Day::Tue, "09:00", "10:15")]);
        let c = section("c", &[(Day::Mon, "09:30", "10:00")]);

        assert!(conflicts_with_any(&[&a, &b], &c));
        assert!(!conflicts_with_any(&[&b], &c));
        assert!(!conflicts_with_any(&[], &c));
    }

    #[test]
    fn test_protected_block_violation() {
        let prefs = Preferences::new()
            .with_protected_block(ProtectedBlock::new(Day::Mon, t("12:00"), t("13:00")));
        let clashing = section("a", &[(Day::Mon, "12:30", "13:45")]);
        let clear = section("b", &[(Day::Mon, "13:00", "14:15")]);
        let other_day = section("c", &[(Day::Tue, "12:30", "13:45")]);

        assert!(violates_protected_block(&clashing, &prefs));
        assert!(!violates_protected_block(&clear, &prefs));
        assert!(!violates_protected_block(&other_day, &prefs));
        assert!(!violates_protected_block(&clashing, &Preferences::new()));
    }

    #[test]
    fn test_preferred_window_violation() {
        let prefs = Preferences::new()
            .with_earliest(t("09:00"))
            .with_latest(t("17:00"));
        let early = section("a", &[(Day::Mon, "08:00", "09:15")]);
        let late = section("b", &[(Day::Mon, "16:30", "17:45")]);
        let inside = section("c", &[(Day::Mon, "09:00", "17:00")]);

        assert!(violates_preferred_window(&early, &prefs));
        assert!(violates_preferred_window(&late, &prefs));
        assert!(!violates_preferred_window(&inside, &prefs));
    }

    #[test]
    fn test_window_unset_bounds_are_not_checked() {
        let early = section("a", &[(Day::Mon, "06:00", "07:15")]);
        assert!(!violates_preferred_window(&early, &Preferences::new()));

        let only_latest = Preferences::new().with_latest(t("17:00"));
        assert!(!violates_preferred_window(&early, &only_latest));
    }

    #[test]
    fn test_linked_group_pair() {
        let lecture = section("lec", &[(Day::Mon, "09:00", "10:15")]).with_linked("lab");
        let lab = section("lab", &[(Day::Thu, "14:00", "16:00")]).with_linked("lec");
        let index: HashMap<&str, &Section> =
            [("lec", &lecture), ("lab", &lab)].into_iter().collect();

        let group = linked_group(&lecture, &index);
        let ids: Vec<&str> = group.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["lec", "lab"]);

        // Starting from the lab reaches the lecture too.
        let from_lab = linked_group(&lab, &index);
        assert_eq!(from_lab.len(), 2);
    }

    #[test]
    fn test_linked_group_is_cycle_safe_beyond_pairs() {
        // Three-section ring: a → b → c → a
        let a = section("a", &[(Day::Mon, "09:00", "10:00")]).with_linked("b");
        let b = section("b", &[(Day::Tue, "09:00", "10:00")]).with_linked("c");
        let c = section("c", &[(Day::Wed, "09:00", "10:00")]).with_linked("a");
        let index: HashMap<&str, &Section> =
            [("a", &a), ("b", &b), ("c", &c)].into_iter().collect();

        let group = linked_group(&a, &index);
        assert_eq!(group.len(), 3);
        assert_eq!(group[0].id, "a");
    }

    #[test]
    fn test_linked_group_dangling_reference() {
        let orphan = section("a", &[(Day::Mon, "09:00", "10:00")]).with_linked("missing");
        let index: HashMap<&str, &Section> = [("a", &orphan)].into_iter().collect();

        let group = linked_group(&orphan, &index);
        assert_eq!(group.len(), 1);
    }

    #[test]
    fn test_regroup_linked_partitions_list() {
        let lecture = section("lec", &[(Day::Mon, "09:00", "10:15")]).with_linked("lab");
        let lab = section("lab", &[(Day::Thu, "14:00", "16:00")]).with_linked("lec");
        let solo = section("solo", &[(Day::Fri, "09:00", "10:15")]);

        let groups = regroup_linked(&[&lecture, &solo, &lab]);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].len(), 2); // lecture + lab
        assert_eq!(groups[1].len(), 1); // solo
        let flattened: usize = groups.iter().map(Vec::len).sum();
        assert_eq!(flattened, 3);
    }

    #[test]
    fn test_regroup_linked_ignores_absent_partner() {
        let lecture = section("lec", &[(Day::Mon, "09:00", "10:15")]).with_linked("lab");
        let groups = regroup_linked(&[&lecture]);
        assert_eq!(groups, vec![vec![&lecture]]);
    }
}
