//! Use-case boundary API for hosts that speak JSON envelopes.
//!
//! # Responsibility
//! - Expose one function per school-records use case.
//! - Map core results and errors to a status code plus JSON body.
//! - Own database path resolution and request-scoped connections.
//!
//! # Invariants
//! - Boundary functions never panic; every failure becomes an envelope.
//! - Each call opens its own connection and drops it before returning.
//! - Error bodies always carry a `detail` message; field-level validation
//!   failures also carry `field` and `constraint`.
//! - Payloads are parsed into core payload types for shape only; field
//!   constraints are checked by the core services.

use log::{debug, warn};
use rusqlite::Connection;
use school_core::db::open_db;
use school_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    CoursePatch, CourseService, EnrollmentService, NewCourse, NewEnrollment, NewStudent,
    ServiceError, ServiceResult, SqliteCourseRepository, SqliteEnrollmentRepository,
    SqliteStudentRepository, StudentPatch, StudentService,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};

/// Environment variable holding the database file path.
pub const DB_PATH_ENV: &str = "SCHOOL_DB_PATH";

const DEFAULT_DB_FILE_NAME: &str = "school_records.sqlite3";

const STATUS_OK: u16 = 200;
const STATUS_CREATED: u16 = 201;
const STATUS_NOT_FOUND: u16 = 404;
const STATUS_CONFLICT: u16 = 409;
const STATUS_UNPROCESSABLE: u16 = 422;
const STATUS_INTERNAL_ERROR: u16 = 500;

/// Minimal health-check call.
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Core crate version.
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes core logging once per process.
///
/// Returns an empty string on success and the error message on failure.
/// Repeating the same `level + log_dir` is accepted.
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Response envelope returned by every use-case call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse {
    /// HTTP-style status code.
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    fn detail(status: u16, detail: impl Into<String>) -> Self {
        Self::new(status, json!({ "detail": detail.into() }))
    }

    /// Returns `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

type StudentApiService<'conn> = StudentService<SqliteStudentRepository<'conn>>;
type CourseApiService<'conn> = CourseService<SqliteCourseRepository<'conn>>;
type EnrollmentApiService<'conn> = EnrollmentService<
    SqliteStudentRepository<'conn>,
    SqliteCourseRepository<'conn>,
    SqliteEnrollmentRepository<'conn>,
>;

/// Boundary facade bound to one database file.
#[derive(Debug, Clone)]
pub struct SchoolApi {
    db_path: PathBuf,
}

impl SchoolApi {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    /// Resolves the database path from `SCHOOL_DB_PATH`.
    ///
    /// Falls back to `school_records.sqlite3` in the system temp directory
    /// when the variable is unset or blank.
    pub fn from_env() -> Self {
        if let Ok(raw) = std::env::var(DB_PATH_ENV) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                return Self::new(trimmed);
            }
        }
        Self::new(std::env::temp_dir().join(DEFAULT_DB_FILE_NAME))
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn list_students(&self) -> ApiResponse {
        self.respond("list_students", STATUS_OK, |conn| {
            student_service(conn)?.list_students()
        })
    }

    pub fn get_student(&self, id: i64) -> ApiResponse {
        self.respond("get_student", STATUS_OK, |conn| {
            student_service(conn)?.get_student(id)
        })
    }

    /// Creates a student from `{"name", "email", "phone"}`.
    pub fn create_student(&self, payload: Value) -> ApiResponse {
        let student: NewStudent = match parse_payload("create_student", payload) {
            Ok(student) => student,
            Err(response) => return response,
        };
        self.respond("create_student", STATUS_CREATED, |conn| {
            student_service(conn)?.create_student(&student)
        })
    }

    /// Partially updates a student; absent keys keep stored values.
    pub fn update_student(&self, id: i64, payload: Value) -> ApiResponse {
        let patch: StudentPatch = match parse_payload("update_student", payload) {
            Ok(patch) => patch,
            Err(response) => return response,
        };
        self.respond("update_student", STATUS_OK, |conn| {
            student_service(conn)?.update_student(id, &patch)
        })
    }

    /// Deletes a student and its enrollments; the body is the removed record.
    pub fn delete_student(&self, id: i64) -> ApiResponse {
        self.respond("delete_student", STATUS_OK, |conn| {
            student_service(conn)?.delete_student(id)
        })
    }

    /// Partial name search: an object for one match, an array for several.
    pub fn find_students_by_name(&self, name: &str) -> ApiResponse {
        self.respond("find_students_by_name", STATUS_OK, |conn| {
            student_service(conn)?.find_students_by_name(name)
        })
    }

    pub fn find_student_by_email(&self, email: &str) -> ApiResponse {
        self.respond("find_student_by_email", STATUS_OK, |conn| {
            student_service(conn)?.find_student_by_email(email)
        })
    }

    pub fn list_courses(&self) -> ApiResponse {
        self.respond("list_courses", STATUS_OK, |conn| {
            course_service(conn)?.list_courses()
        })
    }

    /// Creates a course from `{"name", "code", "description"}`.
    pub fn create_course(&self, payload: Value) -> ApiResponse {
        let course: NewCourse = match parse_payload("create_course", payload) {
            Ok(course) => course,
            Err(response) => return response,
        };
        self.respond("create_course", STATUS_CREATED, |conn| {
            course_service(conn)?.create_course(&course)
        })
    }

    /// Partially updates the course currently holding `code`.
    pub fn update_course(&self, code: &str, payload: Value) -> ApiResponse {
        let patch: CoursePatch = match parse_payload("update_course", payload) {
            Ok(patch) => patch,
            Err(response) => return response,
        };
        self.respond("update_course", STATUS_OK, |conn| {
            course_service(conn)?.update_course_by_code(code, &patch)
        })
    }

    /// Partial name search over courses; an empty array when nothing matches.
    pub fn search_courses_by_name(&self, name: &str) -> ApiResponse {
        self.respond("search_courses_by_name", STATUS_OK, |conn| {
            course_service(conn)?.search_courses_by_name(name)
        })
    }

    pub fn get_course_by_code(&self, code: &str) -> ApiResponse {
        self.respond("get_course_by_code", STATUS_OK, |conn| {
            course_service(conn)?.find_course_by_code(code)
        })
    }

    /// Enrolls a student from `{"student_id", "course_id"}`.
    pub fn create_enrollment(&self, payload: Value) -> ApiResponse {
        let request: NewEnrollment = match parse_payload("create_enrollment", payload) {
            Ok(request) => request,
            Err(response) => return response,
        };
        self.respond("create_enrollment", STATUS_CREATED, |conn| {
            enrollment_service(conn)?.create_enrollment(request.student_id, request.course_id)
        })
    }

    /// Course names of the first student whose name contains `name`.
    pub fn list_courses_of_student(&self, name: &str) -> ApiResponse {
        self.respond("list_courses_of_student", STATUS_OK, |conn| {
            enrollment_service(conn)?.list_courses_of_student_by_name(name)
        })
    }

    /// Student names enrolled in the course with `code`.
    pub fn list_students_of_course(&self, code: &str) -> ApiResponse {
        self.respond("list_students_of_course", STATUS_OK, |conn| {
            enrollment_service(conn)?.list_students_of_course_by_code(code)
        })
    }

    fn respond<T: Serialize>(
        &self,
        operation: &'static str,
        success_status: u16,
        f: impl FnOnce(&Connection) -> ServiceResult<T>,
    ) -> ApiResponse {
        let outcome = match self.with_connection(operation, f) {
            Ok(outcome) => outcome,
            Err(response) => return response,
        };
        let value = match outcome {
            Ok(value) => value,
            Err(err) => return error_response(operation, &err),
        };
        match serde_json::to_value(&value) {
            Ok(body) => {
                debug!("event=api_call module=api status=ok op={operation} code={success_status}");
                ApiResponse::new(success_status, body)
            }
            Err(err) => {
                warn!("event=api_call module=api status=error op={operation} reason=encode");
                ApiResponse::detail(
                    STATUS_INTERNAL_ERROR,
                    format!("{operation} failed to encode response: {err}"),
                )
            }
        }
    }

    fn with_connection<R>(
        &self,
        operation: &'static str,
        f: impl FnOnce(&Connection) -> R,
    ) -> Result<R, ApiResponse> {
        let conn = open_db(&self.db_path).map_err(|err| {
            warn!("event=api_call module=api status=error op={operation} reason=db_open");
            ApiResponse::detail(
                STATUS_INTERNAL_ERROR,
                format!("{operation} failed: database open failed: {err}"),
            )
        })?;
        Ok(f(&conn))
    }
}

fn student_service(conn: &Connection) -> ServiceResult<StudentApiService<'_>> {
    Ok(StudentService::new(SqliteStudentRepository::try_new(conn)?))
}

fn course_service(conn: &Connection) -> ServiceResult<CourseApiService<'_>> {
    Ok(CourseService::new(SqliteCourseRepository::try_new(conn)?))
}

fn enrollment_service(conn: &Connection) -> ServiceResult<EnrollmentApiService<'_>> {
    Ok(EnrollmentService::new(
        SqliteStudentRepository::try_new(conn)?,
        SqliteCourseRepository::try_new(conn)?,
        SqliteEnrollmentRepository::try_new(conn)?,
    ))
}

fn parse_payload<T: for<'de> Deserialize<'de>>(
    operation: &'static str,
    payload: Value,
) -> Result<T, ApiResponse> {
    serde_json::from_value(payload).map_err(|err| {
        debug!("event=api_call module=api status=rejected op={operation} reason=malformed_payload");
        ApiResponse::detail(STATUS_UNPROCESSABLE, format!("invalid payload: {err}"))
    })
}

fn error_response(operation: &'static str, err: &ServiceError) -> ApiResponse {
    match err {
        ServiceError::Validation(validation) => {
            debug!(
                "event=api_call module=api status=rejected op={operation} field={} constraint={}",
                validation.field,
                validation.constraint.code()
            );
            ApiResponse::new(
                STATUS_UNPROCESSABLE,
                json!({
                    "detail": validation.to_string(),
                    "field": validation.field,
                    "constraint": validation.constraint.code(),
                }),
            )
        }
        ServiceError::NotFound(not_found) => {
            debug!(
                "event=api_call module=api status=not_found op={operation} entity={}",
                not_found.entity
            );
            ApiResponse::detail(STATUS_NOT_FOUND, not_found.to_string())
        }
        ServiceError::Conflict { entity, field } => {
            debug!(
                "event=api_call module=api status=conflict op={operation} entity={entity} field={field}"
            );
            ApiResponse::detail(STATUS_CONFLICT, err.to_string())
        }
        ServiceError::Repo(_) => {
            warn!("event=api_call module=api status=error op={operation} reason=storage");
            ApiResponse::detail(STATUS_INTERNAL_ERROR, format!("{operation} failed: {err}"))
        }
    }
}
