use rusqlite::Connection;
use school_core::db::migrations::latest_version;
use school_core::db::open_db_in_memory;
use school_core::{
    Criterion, EntityKind, Matches, NewStudent, RepoError, ServiceError, SqliteStudentRepository,
    StudentPatch, StudentRepository, StudentService,
};

fn bob() -> NewStudent {
    NewStudent::new("Bob Lee", "bob@x.com", "1234567890").unwrap()
}

#[test]
fn insert_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStudentRepository::try_new(&conn).unwrap();

    let input = bob();
    let created = repo.insert_student(&input).unwrap();
    assert!(created.id > 0);

    let loaded = repo.get_student(created.id).unwrap().unwrap();
    assert_eq!(loaded, created);
    assert_eq!(loaded.name, input.name);
    assert_eq!(loaded.email, input.email);
    assert_eq!(loaded.phone, input.phone);
}

#[test]
fn insert_assigns_increasing_ids() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStudentRepository::try_new(&conn).unwrap();

    let first = repo.insert_student(&bob()).unwrap();
    let second = repo
        .insert_student(&NewStudent::new("Ana Souza", "ana@x.com", "1234567890").unwrap())
        .unwrap();
    assert!(second.id > first.id);
}

#[test]
fn duplicate_email_is_rejected_by_store() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStudentRepository::try_new(&conn).unwrap();

    repo.insert_student(&bob()).unwrap();
    let duplicate = NewStudent::new("Robert Lee", "bob@x.com", "0987654321").unwrap();
    let err = repo.insert_student(&duplicate).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Conflict {
            entity: EntityKind::Student,
            field: "email"
        }
    ));
    assert_eq!(repo.list_students().unwrap().len(), 1);
}

#[test]
fn email_domain_case_does_not_bypass_uniqueness() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStudentRepository::try_new(&conn).unwrap();
    let bob = repo.insert_student(&bob()).unwrap();

    let shouted = NewStudent::new("Bob Two", "bob@X.COM", "0987654321").unwrap();
    let err = repo.insert_student(&shouted).unwrap_err();
    assert!(matches!(err, RepoError::Conflict { field: "email", .. }));

    let ana = repo
        .insert_student(&NewStudent::new("Ana Souza", "ana@Escola.COM.br", "1234567890").unwrap())
        .unwrap();
    assert_eq!(ana.email, "ana@escola.com.br");

    let patch = StudentPatch {
        email: Some("bob@X.com".to_string()),
        ..StudentPatch::default()
    };
    let err = repo.update_student(ana.id, &patch).unwrap_err();
    assert!(matches!(err, RepoError::Conflict { field: "email", .. }));

    assert_eq!(repo.get_student_by_email("bob@X.COM").unwrap(), Some(bob));
    assert_eq!(repo.list_students().unwrap().len(), 2);
}

#[test]
fn partial_update_changes_only_supplied_fields() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStudentRepository::try_new(&conn).unwrap();
    let created = repo.insert_student(&bob()).unwrap();

    let patch = StudentPatch {
        phone: Some("(11) 99999-9999".to_string()),
        ..StudentPatch::default()
    };
    let updated = repo.update_student(created.id, &patch).unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name, created.name);
    assert_eq!(updated.email, created.email);
    assert_eq!(updated.phone, "(11) 99999-9999");
    assert_eq!(repo.get_student(created.id).unwrap().unwrap(), updated);
}

#[test]
fn update_to_taken_email_conflicts_and_keeps_row() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStudentRepository::try_new(&conn).unwrap();
    repo.insert_student(&bob()).unwrap();
    let ana = repo
        .insert_student(&NewStudent::new("Ana Souza", "ana@x.com", "1234567890").unwrap())
        .unwrap();

    let patch = StudentPatch {
        name: Some("Ana Lee".to_string()),
        email: Some("bob@x.com".to_string()),
        ..StudentPatch::default()
    };
    let err = repo.update_student(ana.id, &patch).unwrap_err();
    assert!(matches!(err, RepoError::Conflict { field: "email", .. }));
    assert_eq!(repo.get_student(ana.id).unwrap().unwrap(), ana);
}

#[test]
fn update_and_delete_missing_student_return_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStudentRepository::try_new(&conn).unwrap();

    let err = repo
        .update_student(99, &StudentPatch::default())
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound {
            entity: EntityKind::Student,
            id: 99
        }
    ));

    let err = repo.delete_student(99).unwrap_err();
    assert!(matches!(err, RepoError::NotFound { id: 99, .. }));
}

#[test]
fn invalid_patch_blocks_update() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStudentRepository::try_new(&conn).unwrap();
    let created = repo.insert_student(&bob()).unwrap();

    let patch = StudentPatch {
        email: Some("nope".to_string()),
        ..StudentPatch::default()
    };
    let err = repo.update_student(created.id, &patch).unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
    assert_eq!(repo.get_student(created.id).unwrap().unwrap(), created);
}

#[test]
fn delete_returns_removed_record() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStudentRepository::try_new(&conn).unwrap();
    let created = repo.insert_student(&bob()).unwrap();

    let removed = repo.delete_student(created.id).unwrap();
    assert_eq!(removed, created);
    assert!(repo.get_student(created.id).unwrap().is_none());
}

#[test]
fn search_is_case_insensitive_and_ordered_by_id() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStudentRepository::try_new(&conn).unwrap();
    let joao = repo
        .insert_student(&NewStudent::new("João Silva", "joao@x.com", "1234567890").unwrap())
        .unwrap();
    repo.insert_student(&bob()).unwrap();
    let joana = repo
        .insert_student(&NewStudent::new("Joana Souza", "joana@x.com", "1234567890").unwrap())
        .unwrap();

    let ids: Vec<_> = repo
        .search_students_by_name("JO")
        .unwrap()
        .into_iter()
        .map(|student| student.id)
        .collect();
    assert_eq!(ids, vec![joao.id, joana.id]);

    let accented = repo.search_students_by_name("JOÃO").unwrap();
    assert_eq!(accented.len(), 1);
    assert_eq!(accented[0].id, joao.id);

    assert!(repo.search_students_by_name("zzz").unwrap().is_empty());
}

#[test]
fn search_treats_like_wildcards_literally() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStudentRepository::try_new(&conn).unwrap();
    repo.insert_student(&bob()).unwrap();

    assert!(repo.search_students_by_name("%").unwrap().is_empty());
    assert!(repo.search_students_by_name("B_b").unwrap().is_empty());
}

#[test]
fn service_find_by_name_collapses_single_match() {
    let conn = open_db_in_memory().unwrap();
    let service = StudentService::new(SqliteStudentRepository::try_new(&conn).unwrap());
    let joao = service
        .create_student(&NewStudent::new("João Silva", "joao@x.com", "1234567890").unwrap())
        .unwrap();

    let found = service.find_students_by_name("jo").unwrap();
    assert_eq!(found, Matches::One(joao.clone()));

    let joana = service
        .create_student(&NewStudent::new("Joana Souza", "joana@x.com", "1234567890").unwrap())
        .unwrap();
    let found = service.find_students_by_name("jo").unwrap();
    assert_eq!(found, Matches::Many(vec![joao, joana]));
}

#[test]
fn service_find_by_name_without_match_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = StudentService::new(SqliteStudentRepository::try_new(&conn).unwrap());

    let err = service.find_students_by_name("Ana").unwrap_err();
    match err {
        ServiceError::NotFound(not_found) => {
            assert_eq!(not_found.entity, EntityKind::Student);
            assert_eq!(not_found.criterion, Criterion::Name("Ana".to_string()));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn service_find_by_email_is_exact() {
    let conn = open_db_in_memory().unwrap();
    let service = StudentService::new(SqliteStudentRepository::try_new(&conn).unwrap());
    let created = service.create_student(&bob()).unwrap();

    assert_eq!(service.find_student_by_email("bob@x.com").unwrap(), created);

    let err = service.find_student_by_email("BOB@x.com").unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
    assert_eq!(err.to_string(), "no student found with email `BOB@x.com`");
}

#[test]
fn service_maps_repository_errors() {
    let conn = open_db_in_memory().unwrap();
    let service = StudentService::new(SqliteStudentRepository::try_new(&conn).unwrap());
    service.create_student(&bob()).unwrap();

    let err = service.create_student(&bob()).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Conflict {
            entity: EntityKind::Student,
            field: "email"
        }
    ));

    let err = service.get_student(404).unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(ref nf) if nf.criterion == Criterion::Id(404)));

    let err = service.delete_student(404).unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let result = SqliteStudentRepository::try_new(&conn);
    match result {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_students_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteStudentRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredTable("students"))
    ));
}

#[test]
fn repository_rejects_students_table_missing_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE students (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            updated_at INTEGER
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteStudentRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "students",
            column: "phone"
        })
    ));
}
