//! Course domain model.
//!
//! # Responsibility
//! - Define the persisted course record and its create/update payloads.
//!
//! # Invariants
//! - `code` is the unique business key used by every lookup.
//! - Courses are never deleted; enrollment history depends on them.

use crate::model::validation::{check_length, ValidationError};
use serde::{Deserialize, Serialize};

/// Storage-assigned course identity.
pub type CourseId = i64;

pub const COURSE_NAME_MIN: usize = 3;
pub const COURSE_NAME_MAX: usize = 150;
pub const COURSE_CODE_MIN: usize = 3;
pub const COURSE_CODE_MAX: usize = 20;
pub const COURSE_DESCRIPTION_MIN: usize = 10;
pub const COURSE_DESCRIPTION_MAX: usize = 500;

/// Persisted course record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub name: String,
    /// Unique business key, e.g. `DW001`.
    pub code: String,
    pub description: String,
}

/// Create payload for a course; writes run [`NewCourse::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCourse {
    pub name: String,
    pub code: String,
    pub description: String,
}

impl NewCourse {
    pub fn new(
        name: impl Into<String>,
        code: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let course = Self {
            name: name.into(),
            code: code.into(),
            description: description.into(),
        };
        course.validate()?;
        Ok(course)
    }

    /// Checks name, code and description in that order.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name(&self.name)?;
        validate_code(&self.code)?;
        validate_description(&self.description)
    }
}

/// Partial update for a course; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoursePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CoursePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.code.is_none() && self.description.is_none()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(code) = &self.code {
            validate_code(code)?;
        }
        if let Some(description) = &self.description {
            validate_description(description)?;
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    check_length("name", name, COURSE_NAME_MIN, COURSE_NAME_MAX)
}

fn validate_code(code: &str) -> Result<(), ValidationError> {
    check_length("code", code, COURSE_CODE_MIN, COURSE_CODE_MAX)
}

fn validate_description(description: &str) -> Result<(), ValidationError> {
    check_length(
        "description",
        description,
        COURSE_DESCRIPTION_MIN,
        COURSE_DESCRIPTION_MAX,
    )
}
