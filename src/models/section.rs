//! Section and meeting models.
//!
//! A section is a concrete offering of a course in a term: a label, an
//! optional instructor and room, and one or more weekly meetings.
//! Lecture/lab pairs reference each other through `linked_with` and are
//! always added to or removed from a schedule together.

use serde::{Deserialize, Serialize};

use super::course::Course;
use super::time::{Day, TimeOfDay, TimeRange};

/// A single weekly meeting: one day, one time range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Meeting {
    /// Weekday the meeting occurs on.
    pub day: Day,
    /// Meeting start (inclusive).
    pub start: TimeOfDay,
    /// Meeting end (exclusive).
    pub end: TimeOfDay,
}

impl Meeting {
    /// Creates a meeting.
    pub fn new(day: Day, start: TimeOfDay, end: TimeOfDay) -> Self {
        Self { day, start, end }
    }

    /// The meeting's time range within its day.
    #[inline]
    pub fn range(&self) -> TimeRange {
        TimeRange::new(self.start, self.end)
    }
}

/// A course section offered in a specific term. Immutable reference data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    /// Unique section identifier.
    pub id: String,
    /// Owning course id.
    pub course_id: String,
    /// Section label, e.g. `"001"` or `"A"`. May be empty.
    #[serde(default)]
    pub label: String,
    /// Instructor name or id, when the catalog carries one.
    #[serde(default)]
    pub instructor: Option<String>,
    /// Room or building, when the catalog carries one.
    #[serde(default)]
    pub location: Option<String>,
    /// Weekly meetings, in catalog order.
    pub meetings: Vec<Meeting>,
    /// Seat capacity.
    #[serde(default)]
    pub capacity: Option<u32>,
    /// Current enrollment.
    #[serde(default)]
    pub enrolled: Option<u32>,
    /// Term this section belongs to.
    pub term_id: String,
    /// Partner section id for lecture/lab pairing. Partners form a
    /// connected component that schedules atomically.
    #[serde(default)]
    pub linked_with: Option<String>,
}

impl Section {
    /// Creates a section for a course in a term.
    pub fn new(
        id: impl Into<String>,
        course_id: impl Into<String>,
        term_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            course_id: course_id.into(),
            label: String::new(),
            instructor: None,
            location: None,
            meetings: Vec::new(),
            capacity: None,
            enrolled: None,
            term_id: term_id.into(),
            linked_with: None,
        }
    }

    /// Sets the section label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Sets the instructor.
    pub fn with_instructor(mut self, instructor: impl Into<String>) -> Self {
        self.instructor = Some(instructor.into());
        self
    }

    /// Sets the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Adds a weekly meeting.
    pub fn with_meeting(mut self, meeting: Meeting) -> Self {
        self.meetings.push(meeting);
        self
    }

    /// Sets capacity and current enrollment.
    pub fn with_enrollment(mut self, capacity: u32, enrolled: u32) -> Self {
        self.capacity = Some(capacity);
        self.enrolled = Some(enrolled);
        self
    }

    /// Links this section to a partner section.
    pub fn with_linked(mut self, section_id: impl Into<String>) -> Self {
        self.linked_with = Some(section_id.into());
        self
    }

    /// Whether the section has no remaining seats.
    ///
    /// Unknown capacity or enrollment counts as not full.
    pub fn is_full(&self) -> bool {
        match (self.capacity, self.enrolled) {
            (Some(capacity), Some(enrolled)) => enrolled >= capacity,
            _ => false,
        }
    }

    /// Human-readable label: `"CODE · LABEL"`.
    ///
    /// Falls back to the course id when the course is unknown and to the
    /// bare code when the section label is empty.
    pub fn display_label(&self, course: Option<&Course>) -> String {
        let code = course.map_or(self.course_id.as_str(), |c| c.code.as_str());
        if self.label.is_empty() {
            code.to_string()
        } else {
            format!("{} · {}", code, self.label)
        }
    }
}
