//! Beam-search schedule generator.
//!
//! # Algorithm
//!
//! 1. Seed a root node with the caller's locked sections, recording
//!    every conflict reason per locked course; an unseedable lock
//!    aborts the whole search.
//! 2. Process requirement groups in priority order (mandatory first,
//!    then ascending candidate-pool size, then group id). For each
//!    group, extend every beam node with every feasible section
//!    combination that satisfies the group's remaining need.
//! 3. After each group, keep only the top `beam_size` nodes by score.
//! 4. Deduplicate survivors by selected-course set and return the top
//!    three as primary plus up to two backups.
//!
//! A global node budget caps total node creation; once spent, expansion
//! stops early and the search continues with whatever nodes exist.
//!
//! # Complexity
//! O(g * b * p * s) node attempts where g=groups, b=beam width,
//! p=candidate pool size, s=sections per course, independent of the
//! node budget cap.
//!
//! # Reference
//! Lowerre (1976), "The HARPY Speech Recognition System" (beam search)

use std::collections::{BTreeMap, HashMap, HashSet};

use log::{debug, trace, warn};

use crate::conflict::{
    conflicts_with_any, linked_group, sections_overlap, violates_protected_block,
};
use crate::models::{
    Course, GroupMetric, PlanSet, Preferences, RequirementGroup, Section,
};
use crate::planner::explain::build_explanations;
use crate::planner::scoring::{score_schedule, ScoreInputs};

/// Beam width kept after each requirement group.
pub const DEFAULT_BEAM_SIZE: usize = 6;

/// Global cap on search-node creations.
pub const DEFAULT_MAX_NODES: usize = 2000;

/// Plans returned: one primary plus up to two backups.
const MAX_PLANS: usize = 3;

/// Input container for plan generation.
///
/// Owns the catalog slices and lookups the search reads; the engine is
/// a pure function of this request.
#[derive(Debug, Clone)]
pub struct PlanRequest {
    /// Remaining requirement groups, in resolver order.
    pub groups: Vec<RequirementGroup>,
    /// Candidate sections per course id.
    pub sections_by_course: HashMap<String, Vec<Section>>,
    /// Course catalog by id.
    pub courses_by_id: HashMap<String, Course>,
    /// Student scheduling preferences.
    pub prefs: Preferences,
    /// Desired credit load; search tolerates a small buffer above it.
    pub target_credits: f64,
    /// Courses the degree still requires, for the coverage score.
    pub required_course_ids: HashSet<String>,
    /// Per-course interest in [0, 1].
    pub interest_by_course: HashMap<String, f64>,
    /// Section ids the user has pinned.
    pub locked_section_ids: Vec<String>,
    /// Beam width kept after each group.
    pub beam_size: usize,
    /// Global node budget.
    pub max_nodes: usize,
}

impl PlanRequest {
    /// Creates a request with default beam width and node budget.
    pub fn new(
        groups: Vec<RequirementGroup>,
        sections_by_course: HashMap<String, Vec<Section>>,
        courses_by_id: HashMap<String, Course>,
        prefs: Preferences,
        target_credits: f64,
    ) -> Self {
        Self {
            groups,
            sections_by_course,
            courses_by_id,
            prefs,
            target_credits,
            required_course_ids: HashSet::new(),
            interest_by_course: HashMap::new(),
            locked_section_ids: Vec::new(),
            beam_size: DEFAULT_BEAM_SIZE,
            max_nodes: DEFAULT_MAX_NODES,
        }
    }

    /// Sets the beam width.
    pub fn with_beam_size(mut self, beam_size: usize) -> Self {
        self.beam_size = beam_size;
        self
    }

    /// Sets the global node budget.
    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    /// Sets the locked section ids.
    pub fn with_locked_sections(mut self, section_ids: Vec<String>) -> Self {
        self.locked_section_ids = section_ids;
        self
    }

    /// Sets the required course ids.
    pub fn with_required_courses(mut self, course_ids: HashSet<String>) -> Self {
        self.required_course_ids = course_ids;
        self
    }

    /// Sets the per-course interest map.
    pub fn with_interest(mut self, interest: HashMap<String, f64>) -> Self {
        self.interest_by_course = interest;
        self
    }

    /// Credit slack tolerated above the target load.
    pub fn credit_buffer(&self) -> f64 {
        (self.target_credits * 0.2).round().max(3.0)
    }
}

/// A partial schedule under construction.
///
/// Extension always clones first, so sibling beam branches never share
/// mutable state. Sections are borrowed from the request catalog.
#[derive(Debug, Clone)]
struct BeamNode<'a> {
    /// Sections chosen so far, in discovery order.
    sections: Vec<&'a Section>,
    /// Course ids already satisfied by a section.
    selected_courses: HashSet<&'a str>,
    /// Credit total across selected courses.
    credits: f64,
    /// Per-group progress in the group's metric.
    group_progress: HashMap<&'a str, f64>,
    /// Score of the node's schedule; stale until (re-)evaluated.
    score: f64,
}

impl<'a> BeamNode<'a> {
    fn empty(groups: &'a [RequirementGroup]) -> Self {
        Self {
            sections: Vec::new(),
            selected_courses: HashSet::new(),
            credits: 0.0,
            group_progress: groups.iter().map(|g| (g.id.as_str(), 0.0)).collect(),
            score: 0.0,
        }
    }

    fn progress(&self, group_id: &str) -> f64 {
        self.group_progress.get(group_id).copied().unwrap_or(0.0)
    }

    /// Signature over section ids, for within-group deduplication.
    fn section_signature(&self) -> String {
        let mut ids: Vec<&str> = self.sections.iter().map(|s| s.id.as_str()).collect();
        ids.sort_unstable();
        ids.join("|")
    }

    /// Signature over course ids, for final plan deduplication.
    fn course_signature(&self) -> String {
        let mut ids: Vec<&str> = self.selected_courses.iter().copied().collect();
        ids.sort_unstable();
        ids.join("|")
    }
}

/// Node-creation budget threaded through one search.
#[derive(Debug, Clone, Copy)]
struct SearchBudget {
    max_nodes: usize,
    generated: usize,
}

impl SearchBudget {
    fn new(max_nodes: usize) -> Self {
        Self {
            max_nodes,
            generated: 0,
        }
    }

    fn exhausted(&self) -> bool {
        self.generated >= self.max_nodes
    }

    fn record(&mut self) {
        self.generated += 1;
        if self.generated == self.max_nodes {
            warn!(
                "node budget of {} exhausted; continuing with nodes found so far",
                self.max_nodes
            );
        }
    }
}

/// Conflict reasons per locked course, in discovery order.
#[derive(Debug, Default)]
struct LockReasons {
    by_course: Vec<(String, Vec<String>)>,
}

impl LockReasons {
    fn add(&mut self, course_id: &str, reason: String) {
        let index = match self.by_course.iter().position(|(id, _)| id == course_id) {
            Some(i) => i,
            None => {
                self.by_course.push((course_id.to_string(), Vec::new()));
                self.by_course.len() - 1
            }
        };
        push_unique(&mut self.by_course[index].1, reason);
    }

    fn has_any(&self, course_id: &str) -> bool {
        self.by_course
            .iter()
            .any(|(id, reasons)| id == course_id && !reasons.is_empty())
    }

    fn into_map(self) -> BTreeMap<String, String> {
        self.by_course
            .into_iter()
            .filter(|(_, reasons)| !reasons.is_empty())
            .map(|(course_id, reasons)| (course_id, reasons.join("; ")))
            .collect()
    }
}

/// Beam-search plan generator.
///
/// Deterministic and single-threaded; a `generate` call owns no state
/// beyond its stack, so callers may run it on a worker thread and
/// discard superseded results.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use course_plan::models::{
///     Course, Meeting, Preferences, RequirementGroup, SatisfactionRule, Section,
/// };
/// use course_plan::planner::{PlanGenerator, PlanRequest};
///
/// let course = Course::new("BUS-201").with_code("BUS 201").with_credits(3.0);
/// let section = Section::new("BUS-201-A", "BUS-201", "T1")
///     .with_label("A")
///     .with_meeting(Meeting::new(
///         "M".parse().unwrap(),
///         "09:00".parse().unwrap(),
///         "10:15".parse().unwrap(),
///     ));
/// let group = RequirementGroup::new("core", SatisfactionRule::AllOf, 1.0)
///     .with_candidate("BUS-201");
///
/// let request = PlanRequest::new(
///     vec![group],
///     HashMap::from([("BUS-201".to_string(), vec![section])]),
///     HashMap::from([("BUS-201".to_string(), course)]),
///     Preferences::new(),
///     9.0,
/// );
/// let plans = PlanGenerator::new().generate(&request);
/// assert_eq!(plans.primary.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PlanGenerator;

impl PlanGenerator {
    /// Creates a generator.
    pub fn new() -> Self {
        Self
    }

    /// Generates up to three ranked schedules for the request.
    ///
    /// Infeasibility is a structured outcome: an unseedable locked
    /// section yields an empty result carrying `lock_conflicts`, and an
    /// unsatisfiable requirement mix yields an empty result with no
    /// conflicts recorded.
    pub fn generate(&self, request: &PlanRequest) -> PlanSet {
        let mut search = Search::new(request);
        let mut lock_reasons = LockReasons::default();

        let seed = match search.seed_locked(&mut lock_reasons) {
            Some(node) => node,
            None => {
                warn!("locked sections cannot be scheduled together; aborting search");
                return PlanSet::conflicted(lock_reasons.into_map());
            }
        };

        let mut beam = vec![seed];
        for group in ordered_groups(&request.groups) {
            if group.is_required() && group.candidate_course_ids.is_empty() {
                warn!("required group {} has an empty candidate pool", group.id);
                beam.clear();
                break;
            }
            beam = search.expand_group(group, beam);
            debug!(
                "group {}: beam width {} after truncation",
                group.id,
                beam.len()
            );
            if beam.is_empty() {
                break;
            }
        }

        if beam.is_empty() {
            return PlanSet {
                lock_conflicts: lock_reasons.into_map(),
                ..PlanSet::default()
            };
        }

        // Keep the best node per distinct course combination so the
        // final plans are not section re-shuffles of one course set.
        // Insertion order is preserved; equal scores resolve to
        // discovery order.
        let mut ranked: Vec<BeamNode<'_>> = Vec::new();
        let mut index_by_courses: HashMap<String, usize> = HashMap::new();
        for mut node in beam {
            node.score = score_schedule(&node.sections, &search.score_inputs()).total();
            let signature = node.course_signature();
            match index_by_courses.get(&signature) {
                Some(&i) => {
                    if ranked[i].score < node.score {
                        ranked[i] = node;
                    }
                }
                None => {
                    index_by_courses.insert(signature, ranked.len());
                    ranked.push(node);
                }
            }
        }
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked.truncate(MAX_PLANS);

        let primary_node = &ranked[0];
        let explanations = build_explanations(
            &primary_node.sections,
            &request.groups,
            &search.score_inputs(),
        );

        let mut primary: Vec<Section> =
            primary_node.sections.iter().map(|&s| s.clone()).collect();
        primary.sort_by_key(first_meeting_order);

        let backups: Vec<Vec<Section>> = ranked
            .iter()
            .skip(1)
            .map(|node| node.sections.iter().map(|&s| s.clone()).collect())
            .collect();
        let scores: Vec<f64> = ranked.iter().map(|node| node.score).collect();

        PlanSet {
            primary,
            backups,
            scores,
            explanations,
            lock_conflicts: lock_reasons.into_map(),
        }
    }
}

/// One search invocation: borrowed request plus derived indexes and the
/// running node budget.
struct Search<'a> {
    request: &'a PlanRequest,
    section_index: HashMap<&'a str, &'a Section>,
    course_to_groups: HashMap<&'a str, Vec<&'a RequirementGroup>>,
    budget: SearchBudget,
}

impl<'a> Search<'a> {
    fn new(request: &'a PlanRequest) -> Self {
        let section_index: HashMap<&str, &Section> = request
            .sections_by_course
            .values()
            .flatten()
            .map(|s| (s.id.as_str(), s))
            .collect();

        let mut course_to_groups: HashMap<&str, Vec<&RequirementGroup>> = HashMap::new();
        for group in &request.groups {
            for course_id in &group.candidate_course_ids {
                course_to_groups
                    .entry(course_id.as_str())
                    .or_default()
                    .push(group);
            }
        }

        Self {
            request,
            section_index,
            course_to_groups,
            budget: SearchBudget::new(request.max_nodes),
        }
    }

    fn score_inputs(&self) -> ScoreInputs<'a> {
        ScoreInputs {
            prefs: &self.request.prefs,
            required_course_ids: &self.request.required_course_ids,
            interest_by_course: &self.request.interest_by_course,
            courses_by_id: &self.request.courses_by_id,
        }
    }

    fn course(&self, course_id: &str) -> Option<&'a Course> {
        self.request.courses_by_id.get(course_id)
    }

    fn display_label(&self, section: &Section) -> String {
        section.display_label(self.course(&section.course_id))
    }

    /// Seeds a root node from the locked sections.
    ///
    /// Each locked section pulls in its whole linked group; the first
    /// lock per course wins and unknown ids are skipped. All applicable
    /// conflict reasons are recorded per course whether or not seeding
    /// succeeds. Returns `None` when a locked unit cannot be added, at
    /// which point the whole search is abandoned.
    fn seed_locked(&self, reasons: &mut LockReasons) -> Option<BeamNode<'a>> {
        let mut units: Vec<(&str, Vec<&Section>)> = Vec::new();
        let mut processed_courses: HashSet<&str> = HashSet::new();
        let mut claimed_sections: HashSet<&str> = HashSet::new();

        for locked_id in &self.request.locked_section_ids {
            let Some(&section) = self.section_index.get(locked_id.as_str()) else {
                continue;
            };
            if !processed_courses.insert(section.course_id.as_str()) {
                continue;
            }
            let unit: Vec<&Section> = linked_group(section, &self.section_index)
                .into_iter()
                .filter(|linked| claimed_sections.insert(linked.id.as_str()))
                .collect();
            if unit.len() > 1 {
                for partner in &unit {
                    if partner.course_id != section.course_id {
                        reasons.add(
                            &section.course_id,
                            format!("Requires linked section {}", self.display_label(partner)),
                        );
                    }
                }
            }
            units.push((section.course_id.as_str(), unit));
        }

        let mut seed = BeamNode::empty(&self.request.groups);
        let credit_cap = self.request.target_credits + self.request.credit_buffer();

        for (course_id, unit) in &units {
            for reason in self.collect_lock_conflicts(unit, &seed.sections) {
                reasons.add(course_id, reason);
            }

            // Predicts the post-add credit total before attempting.
            let additional: f64 = unit
                .iter()
                .filter(|s| !seed.selected_courses.contains(s.course_id.as_str()))
                .map(|s| self.course(&s.course_id).map_or(0.0, |c| c.credits))
                .sum();
            if seed.credits + additional > credit_cap {
                reasons.add(course_id, "Exceeds target credit preference".to_string());
            }

            match self.add_sections(&seed, unit) {
                Some(next) => seed = next,
                None => {
                    if !reasons.has_any(course_id) {
                        reasons.add(
                            course_id,
                            "Locked section cannot be scheduled due to conflicts".to_string(),
                        );
                    }
                    return None;
                }
            }
        }

        Some(seed)
    }

    /// Every conflict reason a locked unit has against the preferences
    /// and the sections already seeded, plus overlaps inside the unit.
    fn collect_lock_conflicts(
        &self,
        unit: &[&Section],
        existing: &[&'a Section],
    ) -> Vec<String> {
        let prefs = &self.request.prefs;
        let mut reasons: Vec<String> = Vec::new();

        for &section in unit {
            if violates_protected_block(section, prefs) {
                push_unique(
                    &mut reasons,
                    "Conflicts with protected time block".to_string(),
                );
            }
            for meeting in &section.meetings {
                if let Some(earliest) = prefs.earliest {
                    if meeting.start < earliest {
                        push_unique(
                            &mut reasons,
                            format!("Starts before preferred time ({earliest})"),
                        );
                    }
                }
                if let Some(latest) = prefs.latest {
                    if meeting.end > latest {
                        push_unique(
                            &mut reasons,
                            format!("Ends after preferred time ({latest})"),
                        );
                    }
                }
                if prefs.days_off.contains(&meeting.day) {
                    push_unique(
                        &mut reasons,
                        format!("Falls on preferred day off ({})", meeting.day.full_name()),
                    );
                }
            }
            for &other in existing {
                if sections_overlap(other, section) {
                    push_unique(
                        &mut reasons,
                        format!("Overlaps with {}", self.display_label(other)),
                    );
                }
            }
        }

        for i in 0..unit.len() {
            for j in (i + 1)..unit.len() {
                if sections_overlap(unit[i], unit[j]) {
                    push_unique(
                        &mut reasons,
                        format!(
                            "Linked sections {} and {} overlap",
                            self.display_label(unit[i]),
                            self.display_label(unit[j])
                        ),
                    );
                }
            }
        }

        reasons
    }

    /// Clones the node and adds a linked unit atomically.
    ///
    /// Fails on a protected-block violation, an overlap with sections
    /// already in the node, or a credit total past the buffer. Sections
    /// the node already holds are skipped, and a course's credits and
    /// group progress are counted once however many of its sections the
    /// unit carries.
    fn add_sections(
        &self,
        node: &BeamNode<'a>,
        additions: &[&'a Section],
    ) -> Option<BeamNode<'a>> {
        let mut next = node.clone();

        for &section in additions {
            if next.sections.iter().any(|s| s.id == section.id) {
                continue;
            }
            if violates_protected_block(section, &self.request.prefs) {
                return None;
            }
            if conflicts_with_any(&next.sections, section) {
                return None;
            }
            next.sections.push(section);

            if next.selected_courses.insert(section.course_id.as_str()) {
                let credits = self.course(&section.course_id).map_or(0.0, |c| c.credits);
                next.credits += credits;
                if let Some(groups) = self.course_to_groups.get(section.course_id.as_str()) {
                    for group in groups {
                        let delta = match group.rule.metric() {
                            GroupMetric::Credits => credits,
                            GroupMetric::Count => 1.0,
                        };
                        *next.group_progress.entry(group.id.as_str()).or_insert(0.0) += delta;
                    }
                }
            }
        }

        if next.credits > self.request.target_credits + self.request.credit_buffer() {
            return None;
        }

        Some(next)
    }

    /// All feasible one-course extensions of a node.
    ///
    /// A course the node already holds extends to the unchanged node,
    /// so sibling candidates later in the pool still get explored.
    fn expand_with_course(&self, node: &BeamNode<'a>, course_id: &str) -> Vec<BeamNode<'a>> {
        if node.selected_courses.contains(course_id) {
            return vec![node.clone()];
        }
        let Some(sections) = self.request.sections_by_course.get(course_id) else {
            return Vec::new();
        };

        let mut results = Vec::new();
        for section in sections {
            let unit = linked_group(section, &self.section_index);
            if let Some(added) = self.add_sections(node, &unit) {
                results.push(added);
            }
        }
        results
    }

    /// Expands every beam node against one requirement group and keeps
    /// the top `beam_size` survivors by score.
    fn expand_group(
        &mut self,
        group: &'a RequirementGroup,
        beam: Vec<BeamNode<'a>>,
    ) -> Vec<BeamNode<'a>> {
        let mut survivors: Vec<BeamNode<'a>> = Vec::new();
        let mut seen_signatures: HashSet<String> = HashSet::new();

        for node in beam {
            let remaining = (group.needed - node.progress(&group.id)).max(0.0);
            if remaining <= 0.0 {
                let mut carried = node;
                carried.score =
                    score_schedule(&carried.sections, &self.score_inputs()).total();
                survivors.push(carried);
                continue;
            }
            self.fill_group(group, node, remaining, 0, &mut survivors, &mut seen_signatures);
        }

        survivors.sort_by(|a, b| b.score.total_cmp(&a.score));
        survivors.truncate(self.request.beam_size);
        survivors
    }

    /// Depth-first extension within one group.
    ///
    /// Accepts a node once its remaining need reaches zero or the
    /// candidate pool is exhausted (partial satisfaction is still a
    /// candidate schedule). Candidates are consumed left to right so
    /// each course combination is generated once.
    fn fill_group(
        &mut self,
        group: &'a RequirementGroup,
        base: BeamNode<'a>,
        remaining: f64,
        start: usize,
        out: &mut Vec<BeamNode<'a>>,
        seen: &mut HashSet<String>,
    ) {
        if self.budget.exhausted() {
            return;
        }
        if remaining <= 0.0 || start >= group.candidate_course_ids.len() {
            self.accept(base, out, seen);
            return;
        }

        for i in start..group.candidate_course_ids.len() {
            if self.budget.exhausted() {
                break;
            }
            let course_id = &group.candidate_course_ids[i];
            for addition in self.expand_with_course(&base, course_id) {
                let rest = (group.needed - addition.progress(&group.id)).max(0.0);
                self.fill_group(group, addition, rest, i + 1, out, seen);
            }
        }
    }

    fn accept(
        &mut self,
        mut node: BeamNode<'a>,
        out: &mut Vec<BeamNode<'a>>,
        seen: &mut HashSet<String>,
    ) {
        if !seen.insert(node.section_signature()) {
            return;
        }
        node.score = score_schedule(&node.sections, &self.score_inputs()).total();
        trace!(
            "accepted node with {} sections, score {:.3}",
            node.sections.len(),
            node.score
        );
        out.push(node);
        self.budget.record();
    }
}

/// Deterministic group priority: mandatory groups first, then smaller
/// candidate pools, then group id. Beam pruning makes results sensitive
/// to this order, so it never falls back to map iteration order.
fn ordered_groups(groups: &[RequirementGroup]) -> Vec<&RequirementGroup> {
    let mut ordered: Vec<&RequirementGroup> = groups.iter().collect();
    ordered.sort_by(|a, b| {
        b.is_required()
            .cmp(&a.is_required())
            .then(a.candidate_course_ids.len().cmp(&b.candidate_course_ids.len()))
            .then_with(|| a.id.cmp(&b.id))
    });
    ordered
}

/// Presentation order for the primary schedule: weekday, then start
/// time, of each section's first meeting.
fn first_meeting_order(section: &Section) -> u32 {
    section.meetings.first().map_or(0, |m| {
        m.day.index() as u32 * 1440 + u32::from(m.start.minutes())
    })
}

fn push_unique(reasons: &mut Vec<String>, reason: String) {
    if !reasons.contains(&reason) {
        reasons.push(reason);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Day, FridayPreference, Meeting, SatisfactionRule, TimeOfDay};

    fn t(s: &str) -> TimeOfDay {
        s.parse().unwrap()
    }

    fn make_section(id: &str, course_id: &str, meetings: &[(Day, &str, &str)]) -> Section {
        let mut section = Section::new(id, course_id, "T1").with_label(id);
        for (day, start, end) in meetings {
            section = section.with_meeting(Meeting::new(*day, t(start), t(end)));
        }
        section
    }

    fn sample_prefs() -> Preferences {
        Preferences::new()
            .with_earliest(t("08:00"))
            .with_latest(t("18:00"))
            .with_day_off(Day::Fri)
            .with_target_credits(15.0)
            .with_fridays(FridayPreference::Avoid)
    }

    fn catalog() -> HashMap<String, Course> {
        [
            ("BUS-201", "BUS 201", "Operations"),
            ("FIN-310", "FIN 310", "Finance"),
            ("MKT-220", "MKT 220", "Marketing"),
            ("LEAD-305", "LEAD 305", "Leadership"),
        ]
        .into_iter()
        .map(|(id, code, title)| {
            (
                id.to_string(),
                Course::new(id)
                    .with_code(code)
                    .with_title(title)
                    .with_credits(3.0),
            )
        })
        .collect()
    }

    fn sample_sections() -> HashMap<String, Vec<Section>> {
        HashMap::from([
            (
                "BUS-201".to_string(),
                vec![
                    make_section(
                        "BUS-201-A",
                        "BUS-201",
                        &[(Day::Mon, "09:00", "10:15"), (Day::Wed, "09:00", "10:15")],
                    ),
                    make_section(
                        "BUS-201-B",
                        "BUS-201",
                        &[(Day::Tue, "11:00", "12:15"), (Day::Thu, "11:00", "12:15")],
                    ),
                ],
            ),
            (
                "FIN-310".to_string(),
                vec![
                    make_section(
                        "FIN-310-A",
                        "FIN-310",
                        &[(Day::Mon, "13:00", "14:15"), (Day::Wed, "13:00", "14:15")],
                    ),
                    make_section(
                        "FIN-310-B",
                        "FIN-310",
                        &[(Day::Tue, "09:30", "10:45"), (Day::Thu, "09:30", "10:45")],
                    ),
                ],
            ),
            (
                "MKT-220".to_string(),
                vec![
                    make_section(
                        "MKT-220-A",
                        "MKT-220",
                        &[(Day::Tue, "14:00", "15:15"), (Day::Thu, "14:00", "15:15")],
                    ),
                    make_section(
                        "MKT-220-B",
                        "MKT-220",
                        &[(Day::Mon, "15:00", "16:15"), (Day::Wed, "15:00", "16:15")],
                    ),
                ],
            ),
            (
                "LEAD-305".to_string(),
                vec![
                    make_section("LEAD-305-A", "LEAD-305", &[(Day::Fri, "09:00", "11:00")]),
                    make_section(
                        "LEAD-305-B",
                        "LEAD-305",
                        &[(Day::Mon, "11:00", "12:15"), (Day::Wed, "11:00", "12:15")],
                    ),
                ],
            ),
        ])
    }

    fn sample_groups() -> Vec<RequirementGroup> {
        vec![
            RequirementGroup::new("core-ops", SatisfactionRule::AllOf, 1.0)
                .with_title("Operations Core")
                .with_candidate("BUS-201"),
            RequirementGroup::new("finance-choice", SatisfactionRule::ChooseN, 1.0)
                .with_title("Finance Choice")
                .with_candidate("FIN-310")
                .with_candidate("MKT-220"),
            RequirementGroup::new("leadership-overlay", SatisfactionRule::ChooseN, 1.0)
                .with_title("Leadership")
                .with_candidate("LEAD-305")
                .with_candidate("MKT-220"),
        ]
    }

    fn sample_request() -> PlanRequest {
        PlanRequest::new(
            sample_groups(),
            sample_sections(),
            catalog(),
            sample_prefs(),
            9.0,
        )
        .with_beam_size(6)
        .with_max_nodes(1500)
        .with_required_courses(["BUS-201".to_string(), "FIN-310".to_string()].into())
        .with_interest(
            [
                ("BUS-201".to_string(), 0.9),
                ("FIN-310".to_string(), 0.8),
                ("MKT-220".to_string(), 0.7),
                ("LEAD-305".to_string(), 0.6),
            ]
            .into(),
        )
    }

    fn course_ids(sections: &[Section]) -> Vec<&str> {
        let mut ids: Vec<&str> = sections.iter().map(|s| s.course_id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    fn assert_conflict_free(sections: &[Section]) {
        for i in 0..sections.len() {
            for j in (i + 1)..sections.len() {
                assert!(
                    !sections_overlap(&sections[i], &sections[j]),
                    "{} overlaps {}",
                    sections[i].id,
                    sections[j].id
                );
            }
        }
    }

    #[test]
    fn test_generates_primary_backups_and_explanations() {
        let plans = PlanGenerator::new().generate(&sample_request());

        assert!(!plans.primary.is_empty());
        assert!(plans.backups.len() <= 2);
        assert_eq!(plans.scores.len(), 1 + plans.backups.len());
        for pair in plans.scores.windows(2) {
            assert!(pair[0] >= pair[1], "scores not descending: {:?}", plans.scores);
        }

        assert!(!plans.explanations.is_empty());
        for rationale in plans.explanations.values() {
            assert!(rationale.contains("Fulfills"), "missing group: {rationale}");
        }
        assert!(plans.lock_conflicts.is_empty());
    }

    #[test]
    fn test_all_plans_are_conflict_free() {
        let plans = PlanGenerator::new().generate(&sample_request());

        assert_conflict_free(&plans.primary);
        for backup in &plans.backups {
            assert_conflict_free(backup);
        }
    }

    #[test]
    fn test_plans_have_distinct_course_combinations() {
        let plans = PlanGenerator::new().generate(&sample_request());

        let mut signatures = HashSet::new();
        let mut schedules: Vec<&[Section]> = vec![&plans.primary];
        schedules.extend(plans.backups.iter().map(Vec::as_slice));
        for schedule in schedules {
            let signature = course_ids(schedule).join("|");
            assert!(
                signatures.insert(signature.clone()),
                "duplicate course set {signature}"
            );
        }
    }

    #[test]
    fn test_credit_totals_stay_within_buffer() {
        let request = sample_request();
        let plans = PlanGenerator::new().generate(&request);
        let cap = request.target_credits + request.credit_buffer();

        let mut schedules: Vec<&[Section]> = vec![&plans.primary];
        schedules.extend(plans.backups.iter().map(Vec::as_slice));
        for schedule in schedules {
            let credits: f64 = course_ids(schedule)
                .iter()
                .map(|id| request.courses_by_id[*id].credits)
                .sum();
            assert!(credits <= cap, "{credits} credits exceeds cap {cap}");
        }
    }

    #[test]
    fn test_credit_buffer_floor_is_three() {
        let request = sample_request();
        assert_eq!(request.credit_buffer(), 3.0); // round(9 * 0.2) = 2 < 3
        let heavy = PlanRequest::new(
            Vec::new(),
            HashMap::new(),
            HashMap::new(),
            Preferences::new(),
            20.0,
        );
        assert_eq!(heavy.credit_buffer(), 4.0);
    }

    #[test]
    fn test_single_mandatory_group_yields_one_plan() {
        // Two non-overlapping sections of one course still collapse to
        // a single plan: backups must differ by course set.
        let request = PlanRequest::new(
            vec![RequirementGroup::new("core-ops", SatisfactionRule::AllOf, 1.0)
                .with_candidate("BUS-201")],
            sample_sections(),
            catalog(),
            Preferences::new().with_day_off(Day::Fri),
            9.0,
        );
        let plans = PlanGenerator::new().generate(&request);

        assert_eq!(plans.scores.len(), 1);
        assert!(plans.backups.is_empty());
        assert_eq!(course_ids(&plans.primary), vec!["BUS-201"]);
        assert_eq!(plans.primary.len(), 1);
        assert!(plans.lock_conflicts.is_empty());
    }

    #[test]
    fn test_primary_sections_sorted_by_day_then_start() {
        let plans = PlanGenerator::new().generate(&sample_request());

        let keys: Vec<u32> = plans.primary.iter().map(first_meeting_order).collect();
        let mut sorted = keys.clone();
        sorted.sort_unstable();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn test_lock_without_conflicts_pins_exact_section() {
        let request =
            sample_request().with_locked_sections(vec!["BUS-201-B".to_string()]);
        let plans = PlanGenerator::new().generate(&request);

        assert!(plans.lock_conflicts.is_empty());
        assert!(
            plans.primary.iter().any(|s| s.id == "BUS-201-B"),
            "locked section missing from primary"
        );
        assert!(!plans.primary.iter().any(|s| s.id == "BUS-201-A"));
    }

    #[test]
    fn test_first_lock_per_course_wins() {
        let request = sample_request().with_locked_sections(vec![
            "BUS-201-A".to_string(),
            "BUS-201-B".to_string(),
        ]);
        let plans = PlanGenerator::new().generate(&request);

        assert!(plans.primary.iter().any(|s| s.id == "BUS-201-A"));
        assert!(!plans.primary.iter().any(|s| s.id == "BUS-201-B"));
    }

    #[test]
    fn test_unknown_locked_id_is_ignored() {
        let request = sample_request().with_locked_sections(vec!["NO-SUCH".to_string()]);
        let plans = PlanGenerator::new().generate(&request);

        assert!(!plans.primary.is_empty());
        assert!(plans.lock_conflicts.is_empty());
    }

    #[test]
    fn test_lock_before_window_reports_conflict_but_continues() {
        let mut request =
            sample_request().with_locked_sections(vec!["BUS-201-A".to_string()]);
        request.prefs = request.prefs.with_earliest(t("10:00"));
        let plans = PlanGenerator::new().generate(&request);

        let reason = plans.lock_conflicts.get("BUS-201").expect("conflict entry");
        assert!(
            reason.contains("Starts before preferred time"),
            "unexpected reason: {reason}"
        );
        // The window is advisory, so the pinned section still schedules.
        assert!(plans.primary.iter().any(|s| s.id == "BUS-201-A"));
    }

    #[test]
    fn test_lock_on_day_off_reports_full_day_name() {
        let request =
            sample_request().with_locked_sections(vec!["LEAD-305-A".to_string()]);
        let plans = PlanGenerator::new().generate(&request);

        let reason = plans.lock_conflicts.get("LEAD-305").expect("conflict entry");
        assert!(
            reason.contains("Falls on preferred day off (Friday)"),
            "unexpected reason: {reason}"
        );
    }

    #[test]
    fn test_overlapping_locks_abort_generation() {
        let mut sections = sample_sections();
        sections.get_mut("FIN-310").unwrap().push(make_section(
            "FIN-310-Z",
            "FIN-310",
            &[(Day::Mon, "09:00", "10:15"), (Day::Wed, "09:00", "10:15")],
        ));
        let mut request = sample_request()
            .with_locked_sections(vec!["BUS-201-A".to_string(), "FIN-310-Z".to_string()]);
        request.sections_by_course = sections;

        let plans = PlanGenerator::new().generate(&request);

        assert!(plans.primary.is_empty());
        assert!(plans.backups.is_empty());
        assert!(plans.scores.is_empty());
        assert!(plans.explanations.is_empty());
        let reason = plans.lock_conflicts.get("FIN-310").expect("conflict entry");
        assert!(reason.contains("Overlaps with"), "unexpected reason: {reason}");
    }

    #[test]
    fn test_lock_in_protected_block_aborts_with_reason() {
        let mut request =
            sample_request().with_locked_sections(vec!["BUS-201-A".to_string()]);
        request.prefs = request.prefs.with_protected_block(
            crate::models::ProtectedBlock::new(Day::Mon, t("09:00"), t("12:00")),
        );
        let plans = PlanGenerator::new().generate(&request);

        assert!(plans.primary.is_empty());
        let reason = plans.lock_conflicts.get("BUS-201").expect("conflict entry");
        assert!(reason.contains("Conflicts with protected time block"));
    }

    #[test]
    fn test_linked_group_schedules_atomically() {
        let mut sections = sample_sections();
        sections.insert(
            "SCI-100".to_string(),
            vec![
                make_section(
                    "SCI-100-LECT",
                    "SCI-100",
                    &[(Day::Mon, "13:00", "14:15"), (Day::Wed, "13:00", "14:15")],
                )
                .with_linked("SCI-100-LAB"),
                make_section("SCI-100-LAB", "SCI-100", &[(Day::Thu, "14:00", "16:00")])
                    .with_linked("SCI-100-LECT"),
            ],
        );
        let mut courses = catalog();
        courses.insert(
            "SCI-100".to_string(),
            Course::new("SCI-100").with_code("SCI 100").with_credits(4.0),
        );

        let request = PlanRequest::new(
            vec![RequirementGroup::new("lab-science", SatisfactionRule::AllOf, 1.0)
                .with_candidate("SCI-100")],
            sections,
            courses,
            Preferences::new(),
            9.0,
        );
        let plans = PlanGenerator::new().generate(&request);

        let ids: Vec<&str> = plans.primary.iter().map(|s| s.id.as_str()).collect();
        assert!(ids.contains(&"SCI-100-LECT"));
        assert!(ids.contains(&"SCI-100-LAB"));
    }

    #[test]
    fn test_internally_overlapping_linked_lock_aborts() {
        let mut sections = sample_sections();
        sections.insert(
            "SCI-100".to_string(),
            vec![
                make_section("SCI-100-LECT", "SCI-100", &[(Day::Mon, "13:00", "14:15")])
                    .with_linked("SCI-100-LAB"),
                // Lab collides with its own lecture
                make_section("SCI-100-LAB", "SCI-100", &[(Day::Mon, "13:30", "15:30")])
                    .with_linked("SCI-100-LECT"),
            ],
        );
        let mut courses = catalog();
        courses.insert("SCI-100".to_string(), Course::new("SCI-100").with_code("SCI 100"));

        let mut request = sample_request()
            .with_locked_sections(vec!["SCI-100-LECT".to_string()]);
        request.sections_by_course = sections;
        request.courses_by_id = courses;

        let plans = PlanGenerator::new().generate(&request);

        assert!(plans.primary.is_empty());
        let reason = plans.lock_conflicts.get("SCI-100").expect("conflict entry");
        assert!(
            reason.contains("Linked sections") && reason.contains("overlap"),
            "unexpected reason: {reason}"
        );
    }

    #[test]
    fn test_no_feasible_combination_returns_empty_without_conflicts() {
        // The only candidate course has no sections at all.
        let request = PlanRequest::new(
            vec![RequirementGroup::new("ghost", SatisfactionRule::AllOf, 1.0)
                .with_candidate("GHOST-101")],
            HashMap::new(),
            catalog(),
            Preferences::new(),
            9.0,
        );
        let plans = PlanGenerator::new().generate(&request);

        assert!(plans.is_empty());
        assert!(plans.lock_conflicts.is_empty());
        assert!(plans.scores.is_empty());
    }

    #[test]
    fn test_required_group_with_empty_pool_fails_search() {
        let mut groups = sample_groups();
        groups.push(RequirementGroup::new("hollow", SatisfactionRule::AllOf, 1.0));
        let mut request = sample_request();
        request.groups = groups;

        let plans = PlanGenerator::new().generate(&request);

        assert!(plans.is_empty());
        assert!(plans.lock_conflicts.is_empty());
    }

    #[test]
    fn test_optional_group_with_empty_pool_is_skipped() {
        let mut groups = sample_groups();
        groups.push(RequirementGroup::new("electives", SatisfactionRule::AnyOf, 1.0));
        let mut request = sample_request();
        request.groups = groups;

        let plans = PlanGenerator::new().generate(&request);

        assert!(!plans.primary.is_empty());
    }

    #[test]
    fn test_node_budget_degrades_gracefully() {
        let request = sample_request().with_max_nodes(1);
        let plans = PlanGenerator::new().generate(&request);

        // Best-effort, never an error: invariants hold even when the
        // budget starves the search.
        assert_eq!(plans.scores.len(), if plans.primary.is_empty() { 0 } else { 1 + plans.backups.len() });
        assert!(plans.lock_conflicts.is_empty());
    }

    #[test]
    fn test_min_credits_group_counts_credits() {
        // needed=6 credits → two 3-credit courses from the pool.
        let request = PlanRequest::new(
            vec![RequirementGroup::new("breadth", SatisfactionRule::MinCredits, 6.0)
                .with_candidate("BUS-201")
                .with_candidate("FIN-310")
                .with_candidate("MKT-220")],
            sample_sections(),
            catalog(),
            Preferences::new(),
            9.0,
        );
        let plans = PlanGenerator::new().generate(&request);

        assert_eq!(course_ids(&plans.primary).len(), 2);
    }

    #[test]
    fn test_group_priority_order() {
        let groups = vec![
            RequirementGroup::new("z-wide", SatisfactionRule::AllOf, 1.0)
                .with_candidates(vec!["a".into(), "b".into(), "c".into()]),
            RequirementGroup::new("optional", SatisfactionRule::AnyOf, 1.0)
                .with_candidate("a"),
            RequirementGroup::new("b-narrow", SatisfactionRule::ChooseN, 1.0)
                .with_candidate("a"),
            RequirementGroup::new("a-narrow", SatisfactionRule::MinCount, 1.0)
                .with_candidate("b"),
        ];

        let ids: Vec<&str> = ordered_groups(&groups).iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["a-narrow", "b-narrow", "z-wide", "optional"]);
    }

    #[test]
    fn test_generate_from_json_catalog() {
        let sections: Vec<Section> = serde_json::from_str(
            r#"[
                {"id": "HIS-110-A", "courseId": "HIS-110", "label": "A",
                 "meetings": [{"day": "M", "start": "10:00", "end": "11:15"},
                              {"day": "W", "start": "10:00", "end": "11:15"}],
                 "termId": "2026-fall"},
                {"id": "HIS-110-B", "courseId": "HIS-110", "label": "B",
                 "meetings": [{"day": "F", "start": "09:00", "end": "11:30"}],
                 "termId": "2026-fall"}
            ]"#,
        )
        .unwrap();
        let group: RequirementGroup = serde_json::from_str(
            r#"{"id": "humanities", "title": "Humanities",
                "candidateCourseIds": ["HIS-110"], "rule": "allOf", "needed": 1}"#,
        )
        .unwrap();
        let prefs: Preferences =
            serde_json::from_str(r#"{"daysOff": ["F"], "fridays": "avoid"}"#).unwrap();

        let request = PlanRequest::new(
            vec![group],
            HashMap::from([("HIS-110".to_string(), sections)]),
            HashMap::from([(
                "HIS-110".to_string(),
                Course::new("HIS-110").with_code("HIS 110").with_credits(3.0),
            )]),
            prefs,
            9.0,
        );
        let plans = PlanGenerator::new().generate(&request);

        // The Friday-free section wins under the day-off preference.
        assert_eq!(plans.primary.len(), 1);
        assert_eq!(plans.primary[0].id, "HIS-110-A");
        assert!(plans.explanations["HIS-110"].contains("Fulfills Humanities"));
    }
}
