//! Service-level error taxonomy handed to boundary callers.
//!
//! # Invariants
//! - `NotFound` always names the entity and the lookup criterion.
//! - A failed enrollment reference check never says which reference was bad.

use crate::model::course::CourseId;
use crate::model::student::StudentId;
use crate::model::validation::ValidationError;
use crate::model::EntityKind;
use crate::repo::error::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// How a missing record was looked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Criterion {
    Id(i64),
    Email(String),
    Code(String),
    /// Partial-match name search found nothing.
    Name(String),
    /// Enrollment creation: student or course missing (not distinguished).
    References {
        student_id: StudentId,
        course_id: CourseId,
    },
    /// The student exists but no course is reachable through enrollments.
    EnrollmentsOfStudent { student: String },
    /// The course exists but nobody is enrolled.
    EnrollmentsOfCourse { course: String },
}

/// Typed absence: which entity, found by what.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotFound {
    pub entity: EntityKind,
    pub criterion: Criterion,
}

impl NotFound {
    pub fn new(entity: EntityKind, criterion: Criterion) -> Self {
        Self { entity, criterion }
    }
}

impl Display for NotFound {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let entity = self.entity;
        match &self.criterion {
            Criterion::Id(id) => write!(f, "{entity} not found: {id}"),
            Criterion::Email(email) => write!(f, "no {entity} found with email `{email}`"),
            Criterion::Code(code) => write!(f, "no {entity} found with code `{code}`"),
            Criterion::Name(name) => write!(f, "no {entity} found with name matching `{name}`"),
            Criterion::References { .. } => write!(f, "student or course not found"),
            Criterion::EnrollmentsOfStudent { student } => {
                write!(f, "student `{student}` has no enrollments")
            }
            Criterion::EnrollmentsOfCourse { course } => {
                write!(f, "no students enrolled in course `{course}`")
            }
        }
    }
}

/// Error returned by every service operation.
#[derive(Debug)]
pub enum ServiceError {
    /// Input violates a field constraint.
    Validation(ValidationError),
    /// A referenced record does not exist.
    NotFound(NotFound),
    /// A unique field value is already taken.
    Conflict {
        entity: EntityKind,
        field: &'static str,
    },
    /// Storage failure.
    Repo(RepoError),
}

impl ServiceError {
    pub(crate) fn not_found(entity: EntityKind, criterion: Criterion) -> Self {
        Self::NotFound(NotFound::new(entity, criterion))
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(not_found) => write!(f, "{not_found}"),
            Self::Conflict { entity, field } => {
                write!(f, "{entity} with this {field} already exists")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::NotFound { entity, id } => Self::not_found(entity, Criterion::Id(id)),
            RepoError::Conflict { entity, field } => Self::Conflict { entity, field },
            RepoError::MissingReference {
                student_id,
                course_id,
            } => Self::not_found(
                EntityKind::Enrollment,
                Criterion::References {
                    student_id,
                    course_id,
                },
            ),
            other => Self::Repo(other),
        }
    }
}
