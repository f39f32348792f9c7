//! Course model.
//!
//! A course is the catalog-level unit a requirement group draws from.
//! Sections (concrete term offerings with meeting times) reference
//! their course by id.

use serde::{Deserialize, Serialize};

/// A catalog course. Immutable reference data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    /// Unique course identifier.
    pub id: String,
    /// Display code, e.g. `"BUS-201"`.
    pub code: String,
    /// Course title.
    pub title: String,
    /// Credit hours counted toward the target load.
    pub credits: f64,
    /// Course level, e.g. `200`. `None` when the catalog omits it.
    #[serde(default)]
    pub level: Option<u16>,
    /// Free-form catalog tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Prerequisite course ids.
    #[serde(default)]
    pub prereqs: Vec<String>,
    /// Ids of courses accepted as equivalent.
    #[serde(default)]
    pub equivalents: Vec<String>,
}

impl Course {
    /// Creates a course with the given id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            code: String::new(),
            title: String::new(),
            credits: 0.0,
            level: None,
            tags: Vec::new(),
            prereqs: Vec::new(),
            equivalents: Vec::new(),
        }
    }

    /// Sets the display code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    /// Sets the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the credit hours.
    pub fn with_credits(mut self, credits: f64) -> Self {
        self.credits = credits;
        self
    }

    /// Sets the course level.
    pub fn with_level(mut self, level: u16) -> Self {
        self.level = Some(level);
        self
    }

    /// Adds a catalog tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Adds a prerequisite course id.
    pub fn with_prereq(mut self, course_id: impl Into<String>) -> Self {
        self.prereqs.push(course_id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_builder() {
        let course = Course::new("c-bus-201")
            .with_code("BUS-201")
            .with_title("Principles of Management")
            .with_credits(3.0)
            .with_level(200)
            .with_tag("core")
            .with_prereq("c-bus-101");

        assert_eq!(course.id, "c-bus-201");
        assert_eq!(course.code, "BUS-201");
        assert_eq!(course.credits, 3.0);
        assert_eq!(course.level, Some(200));
        assert_eq!(course.tags, vec!["core"]);
        assert_eq!(course.prereqs, vec!["c-bus-101"]);
    }

    #[test]
    fn test_course_deserializes_with_sparse_fields() {
        let course: Course = serde_json::from_str(
            r#"{"id":"c1","code":"FIN-310","title":"Corporate Finance","credits":3}"#,
        )
        .unwrap();
        assert_eq!(course.credits, 3.0);
        assert_eq!(course.level, None);
        assert!(course.tags.is_empty());
        assert!(course.equivalents.is_empty());
    }
}
