//! Enrollment repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist student/course links and traverse them from either side.
//!
//! # Invariants
//! - Inserts are rejected by foreign keys when either reference is missing.
//! - No uniqueness on (student_id, course_id); duplicates are stored as-is.
//! - Results are ordered by `id ASC`.

use crate::model::course::CourseId;
use crate::model::enrollment::{Enrollment, EnrollmentId, NewEnrollment};
use crate::model::student::StudentId;
use crate::repo::error::{is_foreign_key_violation, RepoError, RepoResult};
use crate::repo::schema::{ensure_connection_ready, TableShape};
use rusqlite::{params, Connection, OptionalExtension, Row};

const ENROLLMENT_COLUMNS: &str = "id, student_id, course_id";
const ENROLLMENTS_TABLE: TableShape = ("enrollments", &["id", "student_id", "course_id"]);

/// Repository interface for enrollment operations.
pub trait EnrollmentRepository {
    fn insert_enrollment(&self, enrollment: &NewEnrollment) -> RepoResult<Enrollment>;
    fn get_enrollment(&self, id: EnrollmentId) -> RepoResult<Option<Enrollment>>;
    fn list_enrollments(&self) -> RepoResult<Vec<Enrollment>>;
    fn list_enrollments_of_student(&self, student_id: StudentId) -> RepoResult<Vec<Enrollment>>;
    fn list_enrollments_of_course(&self, course_id: CourseId) -> RepoResult<Vec<Enrollment>>;
}

/// SQLite-backed enrollment repository.
pub struct SqliteEnrollmentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEnrollmentRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &[ENROLLMENTS_TABLE])?;
        Ok(Self { conn })
    }

    fn list_where(&self, filter: &str, value: i64) -> RepoResult<Vec<Enrollment>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ENROLLMENT_COLUMNS} FROM enrollments WHERE {filter} = ?1 ORDER BY id ASC;"
        ))?;
        let enrollments = stmt
            .query_map([value], parse_enrollment_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(enrollments)
    }
}

impl EnrollmentRepository for SqliteEnrollmentRepository<'_> {
    fn insert_enrollment(&self, enrollment: &NewEnrollment) -> RepoResult<Enrollment> {
        enrollment.validate()?;

        self.conn
            .query_row(
                &format!(
                    "INSERT INTO enrollments (student_id, course_id)
                     VALUES (?1, ?2)
                     RETURNING {ENROLLMENT_COLUMNS};"
                ),
                params![enrollment.student_id, enrollment.course_id],
                parse_enrollment_row,
            )
            .map_err(|err| {
                if is_foreign_key_violation(&err) {
                    RepoError::MissingReference {
                        student_id: enrollment.student_id,
                        course_id: enrollment.course_id,
                    }
                } else {
                    err.into()
                }
            })
    }

    fn get_enrollment(&self, id: EnrollmentId) -> RepoResult<Option<Enrollment>> {
        let enrollment = self
            .conn
            .query_row(
                &format!("SELECT {ENROLLMENT_COLUMNS} FROM enrollments WHERE id = ?1;"),
                [id],
                parse_enrollment_row,
            )
            .optional()?;
        Ok(enrollment)
    }

    fn list_enrollments(&self) -> RepoResult<Vec<Enrollment>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ENROLLMENT_COLUMNS} FROM enrollments ORDER BY id ASC;"
        ))?;
        let enrollments = stmt
            .query_map([], parse_enrollment_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(enrollments)
    }

    fn list_enrollments_of_student(&self, student_id: StudentId) -> RepoResult<Vec<Enrollment>> {
        self.list_where("student_id", student_id)
    }

    fn list_enrollments_of_course(&self, course_id: CourseId) -> RepoResult<Vec<Enrollment>> {
        self.list_where("course_id", course_id)
    }
}

fn parse_enrollment_row(row: &Row<'_>) -> rusqlite::Result<Enrollment> {
    Ok(Enrollment {
        id: row.get("id")?,
        student_id: row.get("student_id")?,
        course_id: row.get("course_id")?,
    })
}
