//! Student repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and lookup APIs over the `students` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths validate payloads before SQL mutations.
//! - Email uniqueness is enforced by the store, not by check-then-insert.
//! - Emails are written and looked up with their domain lowercased.
//! - Deleting a student cascades to its enrollments in the same statement.
//! - Listing and search results are ordered by `id ASC` (storage order).

use crate::db::CASEFOLD_SQL_FN;
use crate::model::student::{NewStudent, Student, StudentId, StudentPatch};
use crate::model::validation::normalize_email;
use crate::model::EntityKind;
use crate::repo::error::{map_unique_violation, RepoError, RepoResult};
use crate::repo::schema::{ensure_connection_ready, TableShape};
use rusqlite::{params, Connection, OptionalExtension, Row};

const STUDENT_COLUMNS: &str = "id, name, email, phone";
const STUDENTS_TABLE: TableShape = ("students", &["id", "name", "email", "phone", "updated_at"]);

/// Repository interface for student operations.
pub trait StudentRepository {
    /// Inserts one student and returns it with its assigned id.
    fn insert_student(&self, student: &NewStudent) -> RepoResult<Student>;
    fn get_student(&self, id: StudentId) -> RepoResult<Option<Student>>;
    /// Exact match on the unique email column.
    fn get_student_by_email(&self, email: &str) -> RepoResult<Option<Student>>;
    /// Case-insensitive substring match on `name`.
    fn search_students_by_name(&self, fragment: &str) -> RepoResult<Vec<Student>>;
    fn list_students(&self) -> RepoResult<Vec<Student>>;
    /// Applies only the fields present in `patch`.
    fn update_student(&self, id: StudentId, patch: &StudentPatch) -> RepoResult<Student>;
    /// Removes the student (and its enrollments) and returns the removed row.
    fn delete_student(&self, id: StudentId) -> RepoResult<Student>;
}

/// SQLite-backed student repository.
pub struct SqliteStudentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStudentRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &[STUDENTS_TABLE])?;
        Ok(Self { conn })
    }
}

impl StudentRepository for SqliteStudentRepository<'_> {
    fn insert_student(&self, student: &NewStudent) -> RepoResult<Student> {
        student.validate()?;

        self.conn
            .query_row(
                &format!(
                    "INSERT INTO students (name, email, phone)
                     VALUES (?1, ?2, ?3)
                     RETURNING {STUDENT_COLUMNS};"
                ),
                params![
                    student.name.as_str(),
                    normalize_email(&student.email),
                    student.phone.as_str()
                ],
                parse_student_row,
            )
            .map_err(|err| map_unique_violation(err, EntityKind::Student, "email"))
    }

    fn get_student(&self, id: StudentId) -> RepoResult<Option<Student>> {
        let student = self
            .conn
            .query_row(
                &format!("SELECT {STUDENT_COLUMNS} FROM students WHERE id = ?1;"),
                [id],
                parse_student_row,
            )
            .optional()?;
        Ok(student)
    }

    fn get_student_by_email(&self, email: &str) -> RepoResult<Option<Student>> {
        let student = self
            .conn
            .query_row(
                &format!("SELECT {STUDENT_COLUMNS} FROM students WHERE email = ?1;"),
                [normalize_email(email)],
                parse_student_row,
            )
            .optional()?;
        Ok(student)
    }

    fn search_students_by_name(&self, fragment: &str) -> RepoResult<Vec<Student>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {STUDENT_COLUMNS}
             FROM students
             WHERE instr({CASEFOLD_SQL_FN}(name), {CASEFOLD_SQL_FN}(?1)) > 0
             ORDER BY id ASC;"
        ))?;
        let students = stmt
            .query_map([fragment], parse_student_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(students)
    }

    fn list_students(&self) -> RepoResult<Vec<Student>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students ORDER BY id ASC;"
        ))?;
        let students = stmt
            .query_map([], parse_student_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(students)
    }

    fn update_student(&self, id: StudentId, patch: &StudentPatch) -> RepoResult<Student> {
        patch.validate()?;

        let updated = self
            .conn
            .query_row(
                &format!(
                    "UPDATE students
                     SET
                        name = COALESCE(?2, name),
                        email = COALESCE(?3, email),
                        phone = COALESCE(?4, phone),
                        updated_at = (strftime('%s', 'now') * 1000)
                     WHERE id = ?1
                     RETURNING {STUDENT_COLUMNS};"
                ),
                params![
                    id,
                    patch.name.as_deref(),
                    patch.email.as_deref().map(normalize_email),
                    patch.phone.as_deref()
                ],
                parse_student_row,
            )
            .optional()
            .map_err(|err| map_unique_violation(err, EntityKind::Student, "email"))?;

        updated.ok_or(RepoError::NotFound {
            entity: EntityKind::Student,
            id,
        })
    }

    fn delete_student(&self, id: StudentId) -> RepoResult<Student> {
        let removed = self
            .conn
            .query_row(
                &format!("DELETE FROM students WHERE id = ?1 RETURNING {STUDENT_COLUMNS};"),
                [id],
                parse_student_row,
            )
            .optional()?;

        removed.ok_or(RepoError::NotFound {
            entity: EntityKind::Student,
            id,
        })
    }
}

fn parse_student_row(row: &Row<'_>) -> rusqlite::Result<Student> {
    Ok(Student {
        id: row.get("id")?,
        name: row.get("name")?,
        email: row.get("email")?,
        phone: row.get("phone")?,
    })
}
