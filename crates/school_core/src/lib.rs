//! Core domain logic for the school records service.
//! This crate is the single source of truth for record invariants:
//! field constraints, unique emails and course codes, and enrollment
//! reference checks.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, init_logging_from_env, logging_status};
pub use model::course::{Course, CourseId, CoursePatch, NewCourse};
pub use model::enrollment::{Enrollment, EnrollmentId, NewEnrollment};
pub use model::matches::Matches;
pub use model::student::{NewStudent, Student, StudentId, StudentPatch};
pub use model::validation::{Constraint, ValidationError};
pub use model::EntityKind;
pub use repo::course_repo::{CourseRepository, SqliteCourseRepository};
pub use repo::enrollment_repo::{EnrollmentRepository, SqliteEnrollmentRepository};
pub use repo::error::{RepoError, RepoResult};
pub use repo::student_repo::{SqliteStudentRepository, StudentRepository};
pub use service::course_service::CourseService;
pub use service::enrollment_service::{CourseRoster, EnrollmentService, StudentCourses};
pub use service::error::{Criterion, NotFound, ServiceError, ServiceResult};
pub use service::student_service::StudentService;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
