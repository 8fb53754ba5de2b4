use rusqlite::Connection;
use school_core::db::open_db_in_memory;
use school_core::{
    CourseRepository, CourseRoster, Criterion, EnrollmentRepository, EnrollmentService,
    EntityKind, NewCourse, NewStudent, ServiceError, SqliteCourseRepository,
    SqliteEnrollmentRepository, SqliteStudentRepository, StudentCourses, StudentRepository,
};

type SqliteEnrollmentService<'conn> = EnrollmentService<
    SqliteStudentRepository<'conn>,
    SqliteCourseRepository<'conn>,
    SqliteEnrollmentRepository<'conn>,
>;

fn service(conn: &Connection) -> SqliteEnrollmentService<'_> {
    EnrollmentService::new(
        SqliteStudentRepository::try_new(conn).unwrap(),
        SqliteCourseRepository::try_new(conn).unwrap(),
        SqliteEnrollmentRepository::try_new(conn).unwrap(),
    )
}

fn add_student(conn: &Connection, name: &str, email: &str) -> i64 {
    SqliteStudentRepository::try_new(conn)
        .unwrap()
        .insert_student(&NewStudent::new(name, email, "1234567890").unwrap())
        .unwrap()
        .id
}

fn add_course(conn: &Connection, name: &str, code: &str) -> i64 {
    SqliteCourseRepository::try_new(conn)
        .unwrap()
        .insert_course(&NewCourse::new(name, code, "x".repeat(10)).unwrap())
        .unwrap()
        .id
}

#[test]
fn end_to_end_roster_lists_enrolled_student() {
    let conn = open_db_in_memory().unwrap();
    let course_id = add_course(&conn, "Intro", "INT001");
    let student_id = add_student(&conn, "Bob Lee", "bob@x.com");
    let service = service(&conn);

    let enrollment = service.create_enrollment(student_id, course_id).unwrap();
    assert_eq!(enrollment.student_id, student_id);
    assert_eq!(enrollment.course_id, course_id);

    let roster = service.list_students_of_course_by_code("INT001").unwrap();
    assert_eq!(
        roster,
        CourseRoster {
            course: "Intro".to_string(),
            students: vec!["Bob Lee".to_string()],
        }
    );
    assert_eq!(
        serde_json::to_value(&roster).unwrap(),
        serde_json::json!({ "course": "Intro", "students": ["Bob Lee"] })
    );
}

#[test]
fn create_enrollment_with_missing_reference_writes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let course_id = add_course(&conn, "Intro", "INT001");
    let student_id = add_student(&conn, "Bob Lee", "bob@x.com");
    let service = service(&conn);

    let missing_student = service.create_enrollment(student_id + 100, course_id).unwrap_err();
    let missing_course = service.create_enrollment(student_id, course_id + 100).unwrap_err();

    for err in [missing_student, missing_course] {
        match err {
            ServiceError::NotFound(not_found) => {
                assert_eq!(not_found.entity, EntityKind::Enrollment);
                assert!(matches!(not_found.criterion, Criterion::References { .. }));
                assert_eq!(not_found.to_string(), "student or course not found");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
    assert!(service.list_enrollments().unwrap().is_empty());
}

#[test]
fn create_enrollment_rejects_non_positive_ids() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let err = service.create_enrollment(0, 1).unwrap_err();
    assert!(matches!(err, ServiceError::Validation(ref v) if v.field == "student_id"));
}

#[test]
fn duplicate_enrollments_are_permitted() {
    let conn = open_db_in_memory().unwrap();
    let course_id = add_course(&conn, "Intro", "INT001");
    let student_id = add_student(&conn, "Bob Lee", "bob@x.com");
    let service = service(&conn);

    let first = service.create_enrollment(student_id, course_id).unwrap();
    let second = service.create_enrollment(student_id, course_id).unwrap();
    assert_ne!(first.id, second.id);

    let courses = service.list_courses_of_student_by_name("bob").unwrap();
    assert_eq!(courses.courses, vec!["Intro".to_string(), "Intro".to_string()]);
}

#[test]
fn courses_of_student_uses_first_name_match_only() {
    let conn = open_db_in_memory().unwrap();
    let intro = add_course(&conn, "Intro", "INT001");
    let web = add_course(&conn, "Web", "WEB001");
    let ana = add_student(&conn, "Ana Souza", "ana@x.com");
    let mariana = add_student(&conn, "Mariana Lima", "mariana@x.com");
    let service = service(&conn);
    service.create_enrollment(ana, intro).unwrap();
    service.create_enrollment(mariana, web).unwrap();
    service.create_enrollment(ana, web).unwrap();

    let courses = service.list_courses_of_student_by_name("ana").unwrap();
    assert_eq!(
        courses,
        StudentCourses {
            student: "Ana Souza".to_string(),
            courses: vec!["Intro".to_string(), "Web".to_string()],
        }
    );
}

#[test]
fn student_without_enrollments_differs_from_unknown_student() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let unknown = service.list_courses_of_student_by_name("Ana").unwrap_err();
    match unknown {
        ServiceError::NotFound(not_found) => {
            assert_eq!(not_found.entity, EntityKind::Student);
            assert_eq!(not_found.criterion, Criterion::Name("Ana".to_string()));
        }
        other => panic!("unexpected error: {other}"),
    }

    add_student(&conn, "Ana Souza", "ana@x.com");
    let no_enrollments = service.list_courses_of_student_by_name("Ana").unwrap_err();
    match no_enrollments {
        ServiceError::NotFound(not_found) => {
            assert_eq!(not_found.entity, EntityKind::Enrollment);
            assert_eq!(
                not_found.criterion,
                Criterion::EnrollmentsOfStudent {
                    student: "Ana Souza".to_string()
                }
            );
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn course_without_students_differs_from_unknown_course() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let unknown = service.list_students_of_course_by_code("INT001").unwrap_err();
    assert!(matches!(
        unknown,
        ServiceError::NotFound(ref nf) if nf.criterion == Criterion::Code("INT001".to_string())
    ));

    add_course(&conn, "Intro", "INT001");
    let empty = service.list_students_of_course_by_code("INT001").unwrap_err();
    assert!(matches!(
        empty,
        ServiceError::NotFound(ref nf)
            if nf.criterion == Criterion::EnrollmentsOfCourse { course: "Intro".to_string() }
    ));
}

#[test]
fn deleting_student_cascades_to_enrollments() {
    let conn = open_db_in_memory().unwrap();
    let course_id = add_course(&conn, "Intro", "INT001");
    let bob = add_student(&conn, "Bob Lee", "bob@x.com");
    let ana = add_student(&conn, "Ana Souza", "ana@x.com");
    let service = service(&conn);
    service.create_enrollment(bob, course_id).unwrap();
    service.create_enrollment(ana, course_id).unwrap();

    let students = SqliteStudentRepository::try_new(&conn).unwrap();
    students.delete_student(bob).unwrap();

    let enrollments = SqliteEnrollmentRepository::try_new(&conn).unwrap();
    assert!(enrollments.list_enrollments_of_student(bob).unwrap().is_empty());
    assert_eq!(enrollments.list_enrollments_of_course(course_id).unwrap().len(), 1);

    let roster = service.list_students_of_course_by_code("INT001").unwrap();
    assert_eq!(roster.students, vec!["Ana Souza".to_string()]);
}

#[test]
fn repository_maps_foreign_key_failure_to_missing_reference() {
    let conn = open_db_in_memory().unwrap();
    let course_id = add_course(&conn, "Intro", "INT001");
    let repo = SqliteEnrollmentRepository::try_new(&conn).unwrap();

    let request = school_core::NewEnrollment::new(77, course_id).unwrap();
    let err = repo.insert_enrollment(&request).unwrap_err();
    assert!(matches!(
        err,
        school_core::RepoError::MissingReference { student_id: 77, .. }
    ));
    assert!(repo.list_enrollments().unwrap().is_empty());

    let courses = SqliteCourseRepository::try_new(&conn).unwrap();
    assert!(courses.get_course(course_id).unwrap().is_some());
}

#[test]
fn get_enrollment_by_id() {
    let conn = open_db_in_memory().unwrap();
    let course_id = add_course(&conn, "Intro", "INT001");
    let student_id = add_student(&conn, "Bob Lee", "bob@x.com");
    let created = service(&conn).create_enrollment(student_id, course_id).unwrap();

    let repo = SqliteEnrollmentRepository::try_new(&conn).unwrap();
    assert_eq!(repo.get_enrollment(created.id).unwrap(), Some(created));
    assert_eq!(repo.get_enrollment(created.id + 1).unwrap(), None);
}
