//! Parameterized queries against the SQLite store, plus the single mapping
//! layer that turns raw rows into the canonical in-memory models.

use chrono::Utc;
use serde::Serialize;
use sqlx::sqlite::Sqlite;
use sqlx::{Executor, FromRow, QueryBuilder, SqlitePool};

use crate::error::AppError;
use crate::models::{
    Course, CourseFilter, Day, Room, RoomPayload, Teacher, TeacherPayload, TimeOfDay,
};

const COURSE_SELECT: &str = r#"
    SELECT
        c.id, c.name, c.teacher_id, c.room_id, c.day, c.start_time, c.end_time,
        c.year, c.trimester, c.created_at, c.updated_at,
        t.name AS teacher_name, r.name AS room_name, r.building AS room_building
    FROM courses c
    LEFT JOIN teachers t ON c.teacher_id = t.id
    LEFT JOIN rooms r ON c.room_id = r.id
"#;

const TEACHER_SELECT: &str = r#"
    SELECT
        t.id, t.name, t.department, t.email, t.phone,
        COUNT(c.id) AS course_count,
        t.created_at, t.updated_at
    FROM teachers t
    LEFT JOIN courses c ON t.id = c.teacher_id
"#;

const ROOM_SELECT: &str = r#"
    SELECT
        r.id, r.name, r.building, r.capacity, r.room_type,
        COUNT(c.id) AS course_count,
        r.created_at, r.updated_at
    FROM rooms r
    LEFT JOIN courses c ON r.id = c.room_id
"#;

/// A course row as stored, before conversion to the canonical model.
#[derive(Debug, FromRow)]
pub struct CourseRow {
    pub id: i64,
    pub name: String,
    pub teacher_id: Option<i64>,
    pub room_id: Option<i64>,
    pub day: String,
    pub start_time: String,
    pub end_time: String,
    pub year: i64,
    pub trimester: i64,
    pub created_at: String,
    pub updated_at: String,
    pub teacher_name: Option<String>,
    pub room_name: Option<String>,
    pub room_building: Option<String>,
}

impl TryFrom<CourseRow> for Course {
    type Error = AppError;

    fn try_from(row: CourseRow) -> Result<Course, AppError> {
        let day = Day::parse(&row.day).ok_or_else(|| {
            AppError::Internal(format!("course {} has invalid day {:?}", row.id, row.day))
        })?;
        let start_time = TimeOfDay::parse(&row.start_time).ok_or_else(|| {
            AppError::Internal(format!(
                "course {} has invalid start time {:?}",
                row.id, row.start_time
            ))
        })?;
        let end_time = TimeOfDay::parse(&row.end_time).ok_or_else(|| {
            AppError::Internal(format!(
                "course {} has invalid end time {:?}",
                row.id, row.end_time
            ))
        })?;

        Ok(Course {
            id: row.id,
            name: row.name,
            teacher_id: row.teacher_id,
            room_id: row.room_id,
            day,
            start_time,
            end_time,
            year: row.year,
            trimester: row.trimester,
            teacher_name: row.teacher_name,
            room_name: row.room_name,
            room_building: row.room_building,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn into_courses(rows: Vec<CourseRow>) -> Result<Vec<Course>, AppError> {
    rows.into_iter().map(Course::try_from).collect()
}

pub async fn list_courses(
    db: &SqlitePool,
    filter: &CourseFilter,
) -> Result<Vec<Course>, AppError> {
    let mut builder = QueryBuilder::<Sqlite>::new(COURSE_SELECT);
    builder.push(" WHERE 1=1");
    if let Some(year) = filter.year {
        builder.push(" AND c.year = ").push_bind(year);
    }
    if let Some(trimester) = filter.trimester {
        builder.push(" AND c.trimester = ").push_bind(trimester);
    }
    if let Some(teacher_id) = filter.teacher_id {
        builder.push(" AND c.teacher_id = ").push_bind(teacher_id);
    }
    if let Some(room_id) = filter.room_id {
        builder.push(" AND c.room_id = ").push_bind(room_id);
    }
    if let Some(day) = filter.day {
        builder.push(" AND c.day = ").push_bind(day.as_str());
    }
    builder.push(" ORDER BY c.day, c.start_time");

    let rows: Vec<CourseRow> = builder.build_query_as().fetch_all(db).await?;
    into_courses(rows)
}

pub async fn fetch_course<'e, E>(executor: E, id: i64) -> Result<Option<Course>, AppError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!("{COURSE_SELECT} WHERE c.id = ?");
    let row: Option<CourseRow> = sqlx::query_as(&sql).bind(id).fetch_optional(executor).await?;
    row.map(Course::try_from).transpose()
}

/// Courses already booked into a (room, day, year, trimester) slot; the
/// snapshot the scheduling gate checks a candidate against.
pub async fn room_slot_courses<'e, E>(
    executor: E,
    room_id: i64,
    day: Day,
    year: i64,
    trimester: i64,
) -> Result<Vec<Course>, AppError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!(
        "{COURSE_SELECT} WHERE c.room_id = ? AND c.day = ? AND c.year = ? AND c.trimester = ? ORDER BY c.id"
    );
    let rows: Vec<CourseRow> = sqlx::query_as(&sql)
        .bind(room_id)
        .bind(day.as_str())
        .bind(year)
        .bind(trimester)
        .fetch_all(executor)
        .await?;
    into_courses(rows)
}

pub async fn delete_course(db: &SqlitePool, id: i64) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM courses WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}

pub async fn find_course_id_by_key<'e, E>(
    executor: E,
    name: &str,
    year: i64,
    trimester: i64,
) -> Result<Option<i64>, AppError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let id = sqlx::query_scalar("SELECT id FROM courses WHERE name = ? AND year = ? AND trimester = ?")
        .bind(name)
        .bind(year)
        .bind(trimester)
        .fetch_optional(executor)
        .await?;
    Ok(id)
}

pub async fn list_teachers(db: &SqlitePool) -> Result<Vec<Teacher>, AppError> {
    let sql = format!("{TEACHER_SELECT} GROUP BY t.id ORDER BY t.name");
    let teachers = sqlx::query_as::<_, Teacher>(&sql).fetch_all(db).await?;
    Ok(teachers)
}

pub async fn fetch_teacher(db: &SqlitePool, id: i64) -> Result<Option<Teacher>, AppError> {
    let sql = format!("{TEACHER_SELECT} WHERE t.id = ? GROUP BY t.id");
    let teacher = sqlx::query_as::<_, Teacher>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(teacher)
}

pub async fn find_teacher_id_by_name(db: &SqlitePool, name: &str) -> Result<Option<i64>, AppError> {
    let id = sqlx::query_scalar("SELECT id FROM teachers WHERE name = ?")
        .bind(name)
        .fetch_optional(db)
        .await?;
    Ok(id)
}

pub async fn insert_teacher(db: &SqlitePool, payload: &TeacherPayload) -> Result<Teacher, AppError> {
    let now = Utc::now().to_rfc3339();
    let result = sqlx::query(
        "INSERT INTO teachers (name, department, email, phone, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&payload.name)
    .bind(&payload.department)
    .bind(&payload.email)
    .bind(&payload.phone)
    .bind(&now)
    .bind(&now)
    .execute(db)
    .await?;

    fetch_teacher(db, result.last_insert_rowid())
        .await?
        .ok_or(AppError::NotFound)
}

pub async fn update_teacher(
    db: &SqlitePool,
    id: i64,
    payload: &TeacherPayload,
) -> Result<Teacher, AppError> {
    let now = Utc::now().to_rfc3339();
    let result = sqlx::query(
        "UPDATE teachers SET name = ?, department = ?, email = ?, phone = ?, updated_at = ? WHERE id = ?",
    )
    .bind(&payload.name)
    .bind(&payload.department)
    .bind(&payload.email)
    .bind(&payload.phone)
    .bind(&now)
    .bind(id)
    .execute(db)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }
    fetch_teacher(db, id).await?.ok_or(AppError::NotFound)
}

pub async fn delete_teacher(db: &SqlitePool, id: i64) -> Result<(), AppError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM courses WHERE teacher_id = ?")
        .bind(id)
        .fetch_one(db)
        .await?;
    if count > 0 {
        return Err(AppError::ReferencedBy(
            "Cannot delete teacher with assigned courses".to_string(),
        ));
    }

    let result = sqlx::query("DELETE FROM teachers WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}

pub async fn list_rooms(db: &SqlitePool) -> Result<Vec<Room>, AppError> {
    let sql = format!("{ROOM_SELECT} GROUP BY r.id ORDER BY r.name");
    let rooms = sqlx::query_as::<_, Room>(&sql).fetch_all(db).await?;
    Ok(rooms)
}

pub async fn fetch_room(db: &SqlitePool, id: i64) -> Result<Option<Room>, AppError> {
    let sql = format!("{ROOM_SELECT} WHERE r.id = ? GROUP BY r.id");
    let room = sqlx::query_as::<_, Room>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(room)
}

pub async fn find_room_id_by_name(db: &SqlitePool, name: &str) -> Result<Option<i64>, AppError> {
    let id = sqlx::query_scalar("SELECT id FROM rooms WHERE name = ?")
        .bind(name)
        .fetch_optional(db)
        .await?;
    Ok(id)
}

pub async fn insert_room(db: &SqlitePool, payload: &RoomPayload) -> Result<Room, AppError> {
    let now = Utc::now().to_rfc3339();
    let result = sqlx::query(
        "INSERT INTO rooms (name, building, capacity, room_type, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&payload.name)
    .bind(&payload.building)
    .bind(payload.capacity)
    .bind(&payload.room_type)
    .bind(&now)
    .bind(&now)
    .execute(db)
    .await?;

    fetch_room(db, result.last_insert_rowid())
        .await?
        .ok_or(AppError::NotFound)
}

pub async fn update_room(db: &SqlitePool, id: i64, payload: &RoomPayload) -> Result<Room, AppError> {
    let now = Utc::now().to_rfc3339();
    let result = sqlx::query(
        "UPDATE rooms SET name = ?, building = ?, capacity = ?, room_type = ?, updated_at = ? WHERE id = ?",
    )
    .bind(&payload.name)
    .bind(&payload.building)
    .bind(payload.capacity)
    .bind(&payload.room_type)
    .bind(&now)
    .bind(id)
    .execute(db)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }
    fetch_room(db, id).await?.ok_or(AppError::NotFound)
}

pub async fn delete_room(db: &SqlitePool, id: i64) -> Result<(), AppError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM courses WHERE room_id = ?")
        .bind(id)
        .fetch_one(db)
        .await?;
    if count > 0 {
        return Err(AppError::ReferencedBy(
            "Cannot delete room with scheduled courses".to_string(),
        ));
    }

    let result = sqlx::query("DELETE FROM rooms WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct Stats {
    pub total_courses: i64,
    pub total_teachers: i64,
    pub total_rooms: i64,
}

pub async fn stats(db: &SqlitePool, scope: Option<(i64, i64)>) -> Result<Stats, AppError> {
    let total_courses: i64 = match scope {
        Some((year, trimester)) => {
            sqlx::query_scalar("SELECT COUNT(*) FROM courses WHERE year = ? AND trimester = ?")
                .bind(year)
                .bind(trimester)
                .fetch_one(db)
                .await?
        }
        None => {
            sqlx::query_scalar("SELECT COUNT(*) FROM courses")
                .fetch_one(db)
                .await?
        }
    };
    let total_teachers: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM teachers")
        .fetch_one(db)
        .await?;
    let total_rooms: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM rooms")
        .fetch_one(db)
        .await?;

    Ok(Stats {
        total_courses,
        total_teachers,
        total_rooms,
    })
}
