//! Student use-case service.
//!
//! # Responsibility
//! - Provide create/read/update/delete and lookup entry points for students.
//! - Turn repository absence into typed `NotFound` errors.
//! - Collapse name-search results into `Matches::One` or `Matches::Many`.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Name search keeps storage order.

use crate::model::matches::Matches;
use crate::model::student::{NewStudent, Student, StudentId, StudentPatch};
use crate::model::EntityKind;
use crate::repo::student_repo::StudentRepository;
use crate::service::error::{Criterion, ServiceError, ServiceResult};
use log::{debug, info};

/// Use-case service wrapper for student operations.
pub struct StudentService<R: StudentRepository> {
    repo: R,
}

impl<R: StudentRepository> StudentService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates and persists a new student.
    ///
    /// Fails with `Conflict` when the email is already registered.
    pub fn create_student(&self, student: &NewStudent) -> ServiceResult<Student> {
        student.validate()?;
        let created = self.repo.insert_student(student)?;
        info!(
            "event=student_create module=service status=ok student_id={}",
            created.id
        );
        Ok(created)
    }

    pub fn get_student(&self, id: StudentId) -> ServiceResult<Student> {
        self.repo
            .get_student(id)?
            .ok_or_else(|| ServiceError::not_found(EntityKind::Student, Criterion::Id(id)))
    }

    pub fn list_students(&self) -> ServiceResult<Vec<Student>> {
        Ok(self.repo.list_students()?)
    }

    /// Applies a partial update; omitted fields keep their stored values.
    pub fn update_student(&self, id: StudentId, patch: &StudentPatch) -> ServiceResult<Student> {
        patch.validate()?;
        let updated = self.repo.update_student(id, patch)?;
        info!(
            "event=student_update module=service status=ok student_id={} empty_patch={}",
            id,
            patch.is_empty()
        );
        Ok(updated)
    }

    /// Deletes a student together with its enrollments.
    ///
    /// Returns the removed record.
    pub fn delete_student(&self, id: StudentId) -> ServiceResult<Student> {
        let removed = self.repo.delete_student(id)?;
        info!("event=student_delete module=service status=ok student_id={id}");
        Ok(removed)
    }

    /// Case-insensitive partial name search.
    ///
    /// # Contract
    /// - No match: `NotFound`.
    /// - Exactly one match: `Matches::One`.
    /// - Several matches: `Matches::Many`, in storage order.
    pub fn find_students_by_name(&self, fragment: &str) -> ServiceResult<Matches<Student>> {
        let found = self.repo.search_students_by_name(fragment)?;
        debug!(
            "event=student_search module=service status=ok matches={}",
            found.len()
        );
        Matches::from_vec(found).ok_or_else(|| {
            ServiceError::not_found(EntityKind::Student, Criterion::Name(fragment.to_string()))
        })
    }

    /// Exact email lookup.
    pub fn find_student_by_email(&self, email: &str) -> ServiceResult<Student> {
        self.repo.get_student_by_email(email)?.ok_or_else(|| {
            ServiceError::not_found(EntityKind::Student, Criterion::Email(email.to_string()))
        })
    }
}
