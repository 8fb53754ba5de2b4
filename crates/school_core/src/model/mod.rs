//! Domain model for the school records core.
//!
//! # Responsibility
//! - Define persisted records (students, courses, enrollments).
//! - Define create payloads and partial-update patches with their
//!   field constraints.
//!
//! # Invariants
//! - Identity fields are assigned by storage and never change.
//! - Every payload is validated before it reaches a repository write.

pub mod course;
pub mod enrollment;
pub mod matches;
pub mod student;
pub mod validation;

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Entity types managed by the core, used to label errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Student,
    Course,
    Enrollment,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Course => "course",
            Self::Enrollment => "enrollment",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
