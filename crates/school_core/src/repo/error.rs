//! Repository error type shared by all entity repositories.

use crate::db::DbError;
use crate::model::course::CourseId;
use crate::model::student::StudentId;
use crate::model::validation::ValidationError;
use crate::model::EntityKind;
use rusqlite::ffi;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Payload failed field validation; nothing was written.
    Validation(ValidationError),
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Target row of an update/delete does not exist.
    NotFound { entity: EntityKind, id: i64 },
    /// Store-level unique constraint rejected the write.
    Conflict {
        entity: EntityKind,
        field: &'static str,
    },
    /// Enrollment insert referenced a student or course that does not exist.
    MissingReference {
        student_id: StudentId,
        course_id: CourseId,
    },
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::Conflict { entity, field } => {
                write!(f, "{entity} with this {field} already exists")
            }
            Self::MissingReference {
                student_id,
                course_id,
            } => write!(
                f,
                "enrollment references missing student {student_id} or course {course_id}"
            ),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "repository requires column `{column}` in table `{table}`"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Maps a unique-constraint failure on `field` to [`RepoError::Conflict`].
///
/// Each table carries exactly one `UNIQUE` column, so the extended code alone
/// identifies the field. Other errors pass through unchanged.
pub(crate) fn map_unique_violation(
    err: rusqlite::Error,
    entity: EntityKind,
    field: &'static str,
) -> RepoError {
    if has_extended_code(&err, ffi::SQLITE_CONSTRAINT_UNIQUE) {
        return RepoError::Conflict { entity, field };
    }
    err.into()
}

pub(crate) fn is_foreign_key_violation(err: &rusqlite::Error) -> bool {
    has_extended_code(err, ffi::SQLITE_CONSTRAINT_FOREIGNKEY)
}

fn has_extended_code(err: &rusqlite::Error, code: std::os::raw::c_int) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _) if failure.extended_code == code
    )
}
