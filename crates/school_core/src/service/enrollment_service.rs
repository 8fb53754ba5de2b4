//! Enrollment use-case service.
//!
//! # Responsibility
//! - Create enrollments after checking both references exist.
//! - Answer "which courses does this student take" and "who is enrolled in
//!   this course" by composing student, course and enrollment repositories.
//!
//! # Invariants
//! - Reference checks complete before any write is issued.
//! - A missing student and a missing course produce the same error.
//! - Student-side lookups use the first partial-name match only.

use crate::model::course::CourseId;
use crate::model::enrollment::{Enrollment, NewEnrollment};
use crate::model::student::StudentId;
use crate::model::EntityKind;
use crate::repo::course_repo::CourseRepository;
use crate::repo::enrollment_repo::EnrollmentRepository;
use crate::repo::student_repo::StudentRepository;
use crate::service::error::{Criterion, ServiceError, ServiceResult};
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Course names reachable from one student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentCourses {
    /// Full name of the resolved student.
    pub student: String,
    /// Course names in enrollment order; repeats when re-enrolled.
    pub courses: Vec<String>,
}

/// Student names enrolled in one course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseRoster {
    pub course: String,
    /// Student names in enrollment order.
    pub students: Vec<String>,
}

/// Enrollment service facade over the three entity repositories.
pub struct EnrollmentService<S, C, E>
where
    S: StudentRepository,
    C: CourseRepository,
    E: EnrollmentRepository,
{
    students: S,
    courses: C,
    enrollments: E,
}

impl<S, C, E> EnrollmentService<S, C, E>
where
    S: StudentRepository,
    C: CourseRepository,
    E: EnrollmentRepository,
{
    pub fn new(students: S, courses: C, enrollments: E) -> Self {
        Self {
            students,
            courses,
            enrollments,
        }
    }

    /// Links a student to a course.
    ///
    /// # Contract
    /// - Ids must be positive (`Validation` otherwise).
    /// - Both records must exist; otherwise one combined `NotFound` is
    ///   returned and nothing is written.
    /// - Duplicate pairs are accepted and stored as separate records.
    pub fn create_enrollment(
        &self,
        student_id: StudentId,
        course_id: CourseId,
    ) -> ServiceResult<Enrollment> {
        let request = NewEnrollment::new(student_id, course_id)?;

        let student = self.students.get_student(student_id)?;
        let course = self.courses.get_course(course_id)?;
        if student.is_none() || course.is_none() {
            debug!(
                "event=enrollment_create module=service status=rejected reason=missing_reference"
            );
            return Err(ServiceError::not_found(
                EntityKind::Enrollment,
                Criterion::References {
                    student_id,
                    course_id,
                },
            ));
        }

        let created = self.enrollments.insert_enrollment(&request)?;
        info!(
            "event=enrollment_create module=service status=ok enrollment_id={} student_id={} course_id={}",
            created.id, student_id, course_id
        );
        Ok(created)
    }

    pub fn list_enrollments(&self) -> ServiceResult<Vec<Enrollment>> {
        Ok(self.enrollments.list_enrollments()?)
    }

    /// Lists the course names of the first student whose name contains
    /// `fragment`.
    ///
    /// # Contract
    /// - No matching student: `NotFound` by name.
    /// - Student found but no resolvable course: `NotFound` for the
    ///   student's enrollments.
    pub fn list_courses_of_student_by_name(&self, fragment: &str) -> ServiceResult<StudentCourses> {
        let student = self
            .students
            .search_students_by_name(fragment)?
            .into_iter()
            .next()
            .ok_or_else(|| {
                ServiceError::not_found(EntityKind::Student, Criterion::Name(fragment.to_string()))
            })?;

        let mut courses = Vec::new();
        for enrollment in self.enrollments.list_enrollments_of_student(student.id)? {
            if let Some(course) = self.courses.get_course(enrollment.course_id)? {
                courses.push(course.name);
            }
        }

        if courses.is_empty() {
            return Err(ServiceError::not_found(
                EntityKind::Enrollment,
                Criterion::EnrollmentsOfStudent {
                    student: student.name,
                },
            ));
        }

        Ok(StudentCourses {
            student: student.name,
            courses,
        })
    }

    /// Lists the names of every student enrolled in the course with `code`.
    ///
    /// # Contract
    /// - Unknown code: `NotFound` by code.
    /// - Course without enrolled students: `NotFound` for the course's
    ///   enrollments.
    pub fn list_students_of_course_by_code(&self, code: &str) -> ServiceResult<CourseRoster> {
        let course = self.courses.get_course_by_code(code)?.ok_or_else(|| {
            ServiceError::not_found(EntityKind::Course, Criterion::Code(code.to_string()))
        })?;

        let mut students = Vec::new();
        for enrollment in self.enrollments.list_enrollments_of_course(course.id)? {
            if let Some(student) = self.students.get_student(enrollment.student_id)? {
                students.push(student.name);
            }
        }

        if students.is_empty() {
            return Err(ServiceError::not_found(
                EntityKind::Enrollment,
                Criterion::EnrollmentsOfCourse {
                    course: course.name,
                },
            ));
        }

        Ok(CourseRoster {
            course: course.name,
            students,
        })
    }
}
