//! Course use-case service.
//!
//! # Responsibility
//! - Provide create/list/lookup/update entry points for courses.
//! - Address courses by their unique code; ids stay internal.
//!
//! # Invariants
//! - Courses cannot be deleted through any service API.

use crate::model::course::{Course, CoursePatch, NewCourse};
use crate::model::EntityKind;
use crate::repo::course_repo::CourseRepository;
use crate::service::error::{Criterion, ServiceError, ServiceResult};
use log::info;

/// Use-case service wrapper for course operations.
pub struct CourseService<R: CourseRepository> {
    repo: R,
}

impl<R: CourseRepository> CourseService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates and persists a new course.
    ///
    /// Fails with `Conflict` when the code is already taken.
    pub fn create_course(&self, course: &NewCourse) -> ServiceResult<Course> {
        course.validate()?;
        let created = self.repo.insert_course(course)?;
        info!(
            "event=course_create module=service status=ok course_id={}",
            created.id
        );
        Ok(created)
    }

    pub fn list_courses(&self) -> ServiceResult<Vec<Course>> {
        Ok(self.repo.list_courses()?)
    }

    /// Exact code lookup.
    pub fn find_course_by_code(&self, code: &str) -> ServiceResult<Course> {
        self.repo
            .get_course_by_code(code)?
            .ok_or_else(|| missing_code(code))
    }

    /// Case-insensitive partial name search; empty when nothing matches.
    pub fn search_courses_by_name(&self, fragment: &str) -> ServiceResult<Vec<Course>> {
        Ok(self.repo.search_courses_by_name(fragment)?)
    }

    /// Applies a partial update to the course identified by `code`.
    ///
    /// The patch may itself change the code; the new code must be unique.
    pub fn update_course_by_code(&self, code: &str, patch: &CoursePatch) -> ServiceResult<Course> {
        patch.validate()?;
        let current = self.find_course_by_code(code)?;
        let updated = self.repo.update_course(current.id, patch)?;
        info!(
            "event=course_update module=service status=ok course_id={} empty_patch={}",
            updated.id,
            patch.is_empty()
        );
        Ok(updated)
    }
}

fn missing_code(code: &str) -> ServiceError {
    ServiceError::not_found(EntityKind::Course, Criterion::Code(code.to_string()))
}
