//! Course repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/read/update and lookup APIs over the `courses` table.
//!
//! # Invariants
//! - There is no delete path; enrollment history keeps referencing courses.
//! - Code uniqueness is enforced by the store.

use crate::db::CASEFOLD_SQL_FN;
use crate::model::course::{Course, CourseId, CoursePatch, NewCourse};
use crate::model::EntityKind;
use crate::repo::error::{map_unique_violation, RepoError, RepoResult};
use crate::repo::schema::{ensure_connection_ready, TableShape};
use rusqlite::{params, Connection, OptionalExtension, Row};

const COURSE_COLUMNS: &str = "id, name, code, description";
const COURSES_TABLE: TableShape = (
    "courses",
    &["id", "name", "code", "description", "updated_at"],
);

/// Repository interface for course operations.
pub trait CourseRepository {
    fn insert_course(&self, course: &NewCourse) -> RepoResult<Course>;
    fn get_course(&self, id: CourseId) -> RepoResult<Option<Course>>;
    /// Exact match on the unique code column.
    fn get_course_by_code(&self, code: &str) -> RepoResult<Option<Course>>;
    /// Case-insensitive substring match on `name`.
    fn search_courses_by_name(&self, fragment: &str) -> RepoResult<Vec<Course>>;
    fn list_courses(&self) -> RepoResult<Vec<Course>>;
    fn update_course(&self, id: CourseId, patch: &CoursePatch) -> RepoResult<Course>;
}

/// SQLite-backed course repository.
pub struct SqliteCourseRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCourseRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &[COURSES_TABLE])?;
        Ok(Self { conn })
    }

    fn find_one(&self, filter: &str, value: &dyn rusqlite::ToSql) -> RepoResult<Option<Course>> {
        let course = self
            .conn
            .query_row(
                &format!("SELECT {COURSE_COLUMNS} FROM courses WHERE {filter} = ?1;"),
                [value],
                parse_course_row,
            )
            .optional()?;
        Ok(course)
    }
}

impl CourseRepository for SqliteCourseRepository<'_> {
    fn insert_course(&self, course: &NewCourse) -> RepoResult<Course> {
        course.validate()?;

        self.conn
            .query_row(
                &format!(
                    "INSERT INTO courses (name, code, description)
                     VALUES (?1, ?2, ?3)
                     RETURNING {COURSE_COLUMNS};"
                ),
                params![
                    course.name.as_str(),
                    course.code.as_str(),
                    course.description.as_str()
                ],
                parse_course_row,
            )
            .map_err(|err| map_unique_violation(err, EntityKind::Course, "code"))
    }

    fn get_course(&self, id: CourseId) -> RepoResult<Option<Course>> {
        self.find_one("id", &id)
    }

    fn get_course_by_code(&self, code: &str) -> RepoResult<Option<Course>> {
        self.find_one("code", &code)
    }

    fn search_courses_by_name(&self, fragment: &str) -> RepoResult<Vec<Course>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {COURSE_COLUMNS}
             FROM courses
             WHERE instr({CASEFOLD_SQL_FN}(name), {CASEFOLD_SQL_FN}(?1)) > 0
             ORDER BY id ASC;"
        ))?;
        let courses = stmt
            .query_map([fragment], parse_course_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(courses)
    }

    fn list_courses(&self) -> RepoResult<Vec<Course>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses ORDER BY id ASC;"
        ))?;
        let courses = stmt
            .query_map([], parse_course_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(courses)
    }

    fn update_course(&self, id: CourseId, patch: &CoursePatch) -> RepoResult<Course> {
        patch.validate()?;

        let updated = self
            .conn
            .query_row(
                &format!(
                    "UPDATE courses
                     SET
                        name = COALESCE(?2, name),
                        code = COALESCE(?3, code),
                        description = COALESCE(?4, description),
                        updated_at = (strftime('%s', 'now') * 1000)
                     WHERE id = ?1
                     RETURNING {COURSE_COLUMNS};"
                ),
                params![
                    id,
                    patch.name.as_deref(),
                    patch.code.as_deref(),
                    patch.description.as_deref()
                ],
                parse_course_row,
            )
            .optional()
            .map_err(|err| map_unique_violation(err, EntityKind::Course, "code"))?;

        updated.ok_or(RepoError::NotFound {
            entity: EntityKind::Course,
            id,
        })
    }
}

fn parse_course_row(row: &Row<'_>) -> rusqlite::Result<Course> {
    Ok(Course {
        id: row.get("id")?,
        name: row.get("name")?,
        code: row.get("code")?,
        description: row.get("description")?,
    })
}
