//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `school_core` linkage.
//! - Optionally open a database file and print record counts.
//! - Start file logging when `SCHOOL_LOG_DIR` is set.
//! - Keep output deterministic for quick local sanity checks.

use school_core::db::open_db;
use school_core::logging::LOG_DIR_ENV;
use school_core::{
    CourseRepository, EnrollmentRepository, RepoError, SqliteCourseRepository,
    SqliteEnrollmentRepository, SqliteStudentRepository, StudentRepository,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("school_core ping={}", school_core::ping());
    println!("school_core version={}", school_core::core_version());

    if std::env::var_os(LOG_DIR_ENV).is_some() {
        if let Err(err) = school_core::init_logging_from_env() {
            eprintln!("logging disabled: {err}");
        }
    }

    let Some(db_path) = std::env::args().nth(1) else {
        return ExitCode::SUCCESS;
    };

    let conn = match open_db(&db_path) {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("failed to open `{db_path}`: {err}");
            return ExitCode::FAILURE;
        }
    };

    match record_counts(&conn) {
        Ok((students, courses, enrollments)) => {
            println!("db={db_path} students={students} courses={courses} enrollments={enrollments}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("failed to read `{db_path}`: {err}");
            ExitCode::FAILURE
        }
    }
}

fn record_counts(conn: &rusqlite::Connection) -> Result<(usize, usize, usize), RepoError> {
    let students = SqliteStudentRepository::try_new(conn)?.list_students()?.len();
    let courses = SqliteCourseRepository::try_new(conn)?.list_courses()?.len();
    let enrollments = SqliteEnrollmentRepository::try_new(conn)?
        .list_enrollments()?
        .len();
    Ok((students, courses, enrollments))
}
