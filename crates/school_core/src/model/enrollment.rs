//! Enrollment domain model.
//!
//! An enrollment links exactly one student to exactly one course. It carries
//! no fields of its own. Duplicate (student, course) pairs are allowed, so
//! re-enrolling creates a second record.

use crate::model::course::CourseId;
use crate::model::student::StudentId;
use crate::model::validation::{check_positive_id, ValidationError};
use serde::{Deserialize, Serialize};

/// Storage-assigned enrollment identity.
pub type EnrollmentId = i64;

/// Persisted enrollment record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: EnrollmentId,
    pub student_id: StudentId,
    pub course_id: CourseId,
}

/// Create payload for an enrollment.
///
/// Only id positivity is checked here; existence of both references is a
/// storage concern handled by the enrollment service before the write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEnrollment {
    pub student_id: StudentId,
    pub course_id: CourseId,
}

impl NewEnrollment {
    pub fn new(student_id: StudentId, course_id: CourseId) -> Result<Self, ValidationError> {
        let enrollment = Self {
            student_id,
            course_id,
        };
        enrollment.validate()?;
        Ok(enrollment)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        check_positive_id("student_id", self.student_id)?;
        check_positive_id("course_id", self.course_id)
    }
}
