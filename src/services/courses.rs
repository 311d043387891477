//! Course write paths. Every create/update runs the scheduling gate inside
//! the same transaction as the insert/update, so a concurrent writer cannot
//! commit an overlapping booking between the check and this commit.

use chrono::Utc;
use sqlx::SqlitePool;

use crate::db::repository;
use crate::error::AppError;
use crate::models::{Course, CourseDraft};
use crate::scheduling::{self, Admission};

pub async fn create_course(db: &SqlitePool, draft: CourseDraft) -> Result<Course, AppError> {
    let mut tx = db.begin().await?;

    let existing = match draft.room_id {
        Some(room_id) => {
            repository::room_slot_courses(&mut *tx, room_id, draft.day, draft.year, draft.trimester)
                .await?
        }
        None => Vec::new(),
    };
    if let Admission::Rejected { reason } = scheduling::admit(&draft, &existing, None) {
        return Err(AppError::SlotConflict(reason));
    }

    let now = Utc::now().to_rfc3339();
    let result = sqlx::query(
        "INSERT INTO courses (name, teacher_id, room_id, day, start_time, end_time, year, trimester, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&draft.name)
    .bind(draft.teacher_id)
    .bind(draft.room_id)
    .bind(draft.day.as_str())
    .bind(draft.start_time.to_string())
    .bind(draft.end_time.to_string())
    .bind(draft.year)
    .bind(draft.trimester)
    .bind(&now)
    .bind(&now)
    .execute(&mut *tx)
    .await?;

    let course = repository::fetch_course(&mut *tx, result.last_insert_rowid())
        .await?
        .ok_or(AppError::NotFound)?;
    tx.commit().await?;
    Ok(course)
}

pub async fn update_course(
    db: &SqlitePool,
    id: i64,
    draft: CourseDraft,
) -> Result<Course, AppError> {
    let mut tx = db.begin().await?;

    if repository::fetch_course(&mut *tx, id).await?.is_none() {
        return Err(AppError::NotFound);
    }

    let existing = match draft.room_id {
        Some(room_id) => {
            repository::room_slot_courses(&mut *tx, room_id, draft.day, draft.year, draft.trimester)
                .await?
        }
        None => Vec::new(),
    };
    if let Admission::Rejected { reason } = scheduling::admit(&draft, &existing, Some(id)) {
        return Err(AppError::SlotConflict(reason));
    }

    let now = Utc::now().to_rfc3339();
    sqlx::query(
        "UPDATE courses SET name = ?, teacher_id = ?, room_id = ?, day = ?, start_time = ?, end_time = ?, year = ?, trimester = ?, updated_at = ?
         WHERE id = ?",
    )
    .bind(&draft.name)
    .bind(draft.teacher_id)
    .bind(draft.room_id)
    .bind(draft.day.as_str())
    .bind(draft.start_time.to_string())
    .bind(draft.end_time.to_string())
    .bind(draft.year)
    .bind(draft.trimester)
    .bind(&now)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    let course = repository::fetch_course(&mut *tx, id)
        .await?
        .ok_or(AppError::NotFound)?;
    tx.commit().await?;
    Ok(course)
}
