//! Input validation for plan generation.
//!
//! Checks structural integrity of a course catalog and requirement
//! input before searching. Detects:
//! - Duplicate IDs
//! - Sections referencing unknown courses
//! - Dangling `linked_with` references
//! - Meetings that end at or before their start
//! - Requirement groups with empty or unknown candidates
//!
//! Validation is advisory: `generate` does not call it, and a caller
//! with trusted data may skip it entirely.

use crate::models::{Course, RequirementGroup, Section};
use std::collections::HashSet;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A section's owning course doesn't exist.
    UnknownCourse,
    /// A section's `linked_with` partner doesn't exist.
    UnknownLinkedSection,
    /// A meeting ends at or before its start.
    InvalidMeetingRange,
    /// A requirement group has no candidate courses.
    EmptyCandidatePool,
    /// A group candidate references a course that doesn't exist.
    UnknownCandidate,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a catalog and requirement input for plan generation.
///
/// Checks:
/// 1. No duplicate course IDs
/// 2. No duplicate section IDs
/// 3. All sections reference an existing course
/// 4. All `linked_with` references point to existing sections
/// 5. Every meeting ends after it starts
/// 6. All requirement groups have a non-empty candidate pool
/// 7. All group candidates reference an existing course
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(
    courses: &[Course],
    sections: &[Section],
    groups: &[RequirementGroup],
) -> ValidationResult {
    let mut errors = Vec::new();

    // Collect course IDs
    let mut course_ids = HashSet::new();
    for course in courses {
        if !course_ids.insert(course.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate course ID: {}", course.id),
            ));
        }
    }

    // Collect section IDs
    let mut section_ids = HashSet::new();
    for section in sections {
        if !section_ids.insert(section.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate section ID: {}", section.id),
            ));
        }
    }

    // Check course and link references, meeting ranges
    for section in sections {
        if !course_ids.contains(section.course_id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownCourse,
                format!(
                    "Section '{}' references unknown course '{}'",
                    section.id, section.course_id
                ),
            ));
        }
        if let Some(partner) = section.linked_with.as_deref() {
            if !section_ids.contains(partner) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownLinkedSection,
                    format!(
                        "Section '{}' is linked with unknown section '{partner}'",
                        section.id
                    ),
                ));
            }
        }
        for meeting in &section.meetings {
            if meeting.end <= meeting.start {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidMeetingRange,
                    format!(
                        "Section '{}' has a meeting ending at or before its start ({}-{})",
                        section.id, meeting.start, meeting.end
                    ),
                ));
            }
        }
    }

    // Check requirement groups
    for group in groups {
        if group.candidate_course_ids.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyCandidatePool,
                format!("Requirement group '{}' has no candidate courses", group.id),
            ));
        }
        for candidate in &group.candidate_course_ids {
            if !course_ids.contains(candidate.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownCandidate,
                    format!(
                        "Group '{}' references unknown course '{candidate}'",
                        group.id
                    ),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
