use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

use timetable_backend::db::repository;
use timetable_backend::models::{CourseFilter, RoomPayload, TeacherPayload};
use timetable_backend::services::ImportOutcome;
use timetable_backend::services::import;

async fn setup_test_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test db");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

async fn seed_teacher(pool: &SqlitePool, name: &str) {
    let payload = TeacherPayload {
        name: name.to_string(),
        department: None,
        email: None,
        phone: None,
    };
    repository::insert_teacher(pool, &payload)
        .await
        .expect("Failed to insert teacher");
}

async fn seed_room(pool: &SqlitePool, name: &str) {
    let payload = RoomPayload {
        name: name.to_string(),
        building: None,
        capacity: None,
        room_type: None,
    };
    repository::insert_room(pool, &payload)
        .await
        .expect("Failed to insert room");
}

#[tokio::test]
async fn teacher_import_creates_and_updates_by_name() {
    let pool = setup_test_db().await;
    seed_teacher(&pool, "Dr. Smith").await;

    let csv = "name,department,email,phone\n\
               Dr. Smith,Computer Science,smith@university.edu,555-1234\n\
               Prof. Doe,Mathematics,doe@university.edu,\n";

    let outcome = import::import_teachers(&pool, csv)
        .await
        .expect("Import should run");
    let report = match outcome {
        ImportOutcome::Completed(report) => report,
        other => panic!("Expected completed import, got {other:?}"),
    };
    assert_eq!(report.processed, 2);
    assert_eq!(report.updated, 1);
    assert_eq!(report.created, 1);
    assert!(report.errors.is_empty());

    let teachers = repository::list_teachers(&pool)
        .await
        .expect("Failed to list teachers");
    assert_eq!(teachers.len(), 2);
    let smith = teachers.iter().find(|t| t.name == "Dr. Smith").unwrap();
    assert_eq!(smith.department.as_deref(), Some("Computer Science"));
    let doe = teachers.iter().find(|t| t.name == "Prof. Doe").unwrap();
    assert_eq!(doe.phone, None);
}

#[tokio::test]
async fn teacher_import_rejects_batch_with_missing_name() {
    let pool = setup_test_db().await;

    let csv = "name,department,email,phone\n\
               Dr. Smith,Computer Science,,\n\
               ,Mathematics,,\n";

    let outcome = import::import_teachers(&pool, csv)
        .await
        .expect("Import should run");
    let rejection = match outcome {
        ImportOutcome::Rejected(rejection) => rejection,
        other => panic!("Expected rejected import, got {other:?}"),
    };
    assert_eq!(rejection.error, "Validation errors found");
    assert_eq!(rejection.errors.len(), 1);
    assert_eq!(rejection.errors[0].line, 2);

    // Nothing was written, not even the valid first row.
    let teachers = repository::list_teachers(&pool)
        .await
        .expect("Failed to list teachers");
    assert!(teachers.is_empty());
}

#[tokio::test]
async fn course_import_resolves_names_and_gates_rows() {
    let pool = setup_test_db().await;
    seed_teacher(&pool, "Dr. Smith").await;
    seed_room(&pool, "A101").await;

    let csv = "name,teacher_name,room_name,day,start_time,end_time,year,trimester\n\
               Algorithms,Dr. Smith,A101,Monday,09:00,10:00,2025,1\n\
               Databases,Dr. Smith,A101,Monday,09:30,10:30,2025,1\n\
               Networks,Dr. Smith,A101,Monday,10:00,11:00,2025,1\n\
               Compilers,Dr. Who,A101,Monday,12:00,13:00,2025,1\n\
               Graphics,Dr. Smith,Z999,Monday,13:00,14:00,2025,1\n";

    let outcome = import::import_courses(&pool, csv)
        .await
        .expect("Import should run");
    let report = match outcome {
        ImportOutcome::Completed(report) => report,
        other => panic!("Expected completed import, got {other:?}"),
    };

    // Algorithms and Networks land (back-to-back is allowed); Databases hits
    // the gate; Compilers and Graphics fail name resolution.
    assert_eq!(report.created, 2);
    assert_eq!(report.updated, 0);
    assert_eq!(report.processed, 2);
    assert_eq!(report.errors.len(), 3);
    assert_eq!(report.errors[0].line, 2);
    assert_eq!(report.errors[0].error, "Time slot conflict detected");
    assert_eq!(report.errors[1].error, "Teacher not found: Dr. Who");
    assert_eq!(report.errors[2].error, "Room not found: Z999");

    let stored = repository::list_courses(&pool, &CourseFilter::default())
        .await
        .expect("Failed to list courses");
    assert_eq!(stored.len(), 2);
}

#[tokio::test]
async fn course_import_updates_existing_course_by_key() {
    let pool = setup_test_db().await;
    seed_teacher(&pool, "Dr. Smith").await;
    seed_room(&pool, "A101").await;

    let first = "name,teacher_name,room_name,day,start_time,end_time,year,trimester\n\
                 Algorithms,Dr. Smith,A101,Monday,09:00,10:00,2025,1\n";
    import::import_courses(&pool, first)
        .await
        .expect("Import should run");

    // Re-import the same course key with a new slot; it updates in place and
    // does not conflict with its own stored row.
    let second = "name,teacher_name,room_name,day,start_time,end_time,year,trimester\n\
                  Algorithms,Dr. Smith,A101,Monday,09:30,10:30,2025,1\n";
    let outcome = import::import_courses(&pool, second)
        .await
        .expect("Import should run");
    let report = match outcome {
        ImportOutcome::Completed(report) => report,
        other => panic!("Expected completed import, got {other:?}"),
    };
    assert_eq!(report.updated, 1);
    assert_eq!(report.created, 0);
    assert!(report.errors.is_empty());

    let stored = repository::list_courses(&pool, &CourseFilter::default())
        .await
        .expect("Failed to list courses");
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].start_time.to_string(), "09:30");
}

#[tokio::test]
async fn course_import_rejects_batch_on_malformed_rows() {
    let pool = setup_test_db().await;
    seed_teacher(&pool, "Dr. Smith").await;
    seed_room(&pool, "A101").await;

    let csv = "name,teacher_name,room_name,day,start_time,end_time,year,trimester\n\
               Algorithms,Dr. Smith,A101,Funday,09:00,10:00,2025,1\n\
               Databases,Dr. Smith,A101,Monday,9am,10:00,2025,1\n\
               Networks,Dr. Smith,A101,Monday,09:00,10:00,1800,1\n\
               Compilers,Dr. Smith,A101,Monday,09:00,10:00,2025,9\n\
               Graphics,Dr. Smith,A101,Monday,10:00,09:00,2025,1\n";

    let outcome = import::import_courses(&pool, csv)
        .await
        .expect("Import should run");
    let rejection = match outcome {
        ImportOutcome::Rejected(rejection) => rejection,
        other => panic!("Expected rejected import, got {other:?}"),
    };
    assert_eq!(rejection.errors.len(), 5);
    assert!(rejection.errors[0].error.starts_with("Invalid day: Funday"));
    assert_eq!(rejection.errors[1].error, "Invalid time format. Use HH:MM format");
    assert_eq!(rejection.errors[2].error, "Invalid year. Must be between 2000 and 2100");
    assert_eq!(rejection.errors[3].error, "Invalid trimester. Must be between 1 and 4");
    assert_eq!(rejection.errors[4].error, "Start time must be before end time");

    let stored = repository::list_courses(&pool, &CourseFilter::default())
        .await
        .expect("Failed to list courses");
    assert!(stored.is_empty());
}
