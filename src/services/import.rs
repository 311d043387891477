//! CSV bulk import for teachers and courses.
//!
//! Import runs in two phases: first every row is validated (nothing is
//! written if any row is malformed), then valid rows are processed in order.
//! Row-level failures during processing (unknown teacher/room, gate
//! rejection) are recorded in the report and do not stop the rest of the
//! batch.

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::info;

use crate::db::repository;
use crate::error::AppError;
use crate::models::course::{TRIMESTER_RANGE, YEAR_RANGE};
use crate::models::teacher::trim_to_none;
use crate::models::{CourseDraft, Day, TeacherPayload, TimeOfDay};
use crate::services::courses;

#[derive(Debug, Clone, Serialize)]
pub struct ImportRowError {
    pub line: usize,
    pub error: String,
}

/// Summary of a completed import run.
#[derive(Debug, Serialize)]
pub struct ImportReport {
    pub message: String,
    pub processed: usize,
    pub created: usize,
    pub updated: usize,
    pub errors: Vec<ImportRowError>,
    pub total: usize,
}

/// The whole batch was refused during validation; nothing was written.
#[derive(Debug, Serialize)]
pub struct ImportRejection {
    pub error: String,
    pub errors: Vec<ImportRowError>,
    pub processed: usize,
    pub total: usize,
}

#[derive(Debug)]
pub enum ImportOutcome {
    Rejected(ImportRejection),
    Completed(ImportReport),
}

#[derive(Debug, Deserialize)]
struct TeacherCsvRow {
    name: String,
    #[serde(default)]
    department: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    phone: Option<String>,
}

pub async fn import_teachers(db: &SqlitePool, csv_text: &str) -> Result<ImportOutcome, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(csv_text.as_bytes());

    let mut rows = Vec::new();
    let mut errors = Vec::new();
    let mut total = 0;
    for (index, result) in reader.deserialize::<TeacherCsvRow>().enumerate() {
        let line = index + 1;
        total = line;
        match result {
            Err(e) => errors.push(ImportRowError {
                line,
                error: format!("Malformed CSV row: {e}"),
            }),
            Ok(row) => {
                if row.name.is_empty() {
                    errors.push(ImportRowError {
                        line,
                        error: "Name is required".to_string(),
                    });
                    continue;
                }
                rows.push(TeacherPayload {
                    name: row.name,
                    department: trim_to_none(row.department),
                    email: trim_to_none(row.email),
                    phone: trim_to_none(row.phone),
                });
            }
        }
    }

    if !errors.is_empty() {
        return Ok(ImportOutcome::Rejected(ImportRejection {
            error: "Validation errors found".to_string(),
            errors,
            processed: 0,
            total,
        }));
    }

    let mut processed = 0;
    let mut created = 0;
    let mut updated = 0;
    for payload in &rows {
        match repository::find_teacher_id_by_name(db, &payload.name).await? {
            Some(id) => {
                repository::update_teacher(db, id, payload).await?;
                updated += 1;
            }
            None => {
                repository::insert_teacher(db, payload).await?;
                created += 1;
            }
        }
        processed += 1;
    }

    info!(
        "teacher import completed: {} created, {} updated of {} rows",
        created, updated, total
    );
    Ok(ImportOutcome::Completed(ImportReport {
        message: "Import completed".to_string(),
        processed,
        created,
        updated,
        errors: Vec::new(),
        total,
    }))
}

#[derive(Debug, Deserialize)]
struct CourseCsvRow {
    name: String,
    teacher_name: String,
    room_name: String,
    day: String,
    start_time: String,
    end_time: String,
    year: String,
    trimester: String,
}

struct ValidCourseRow {
    line: usize,
    name: String,
    teacher_name: String,
    room_name: String,
    day: Day,
    start_time: TimeOfDay,
    end_time: TimeOfDay,
    year: i64,
    trimester: i64,
}

fn validate_course_row(row: &CourseCsvRow) -> Result<(Day, TimeOfDay, TimeOfDay, i64, i64), String> {
    let required = [
        ("name", &row.name),
        ("teacher_name", &row.teacher_name),
        ("room_name", &row.room_name),
        ("day", &row.day),
        ("start_time", &row.start_time),
        ("end_time", &row.end_time),
        ("year", &row.year),
        ("trimester", &row.trimester),
    ];
    let missing: Vec<&str> = required
        .iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(field, _)| *field)
        .collect();
    if !missing.is_empty() {
        return Err(format!("Missing required fields: {}", missing.join(", ")));
    }

    let day = Day::parse(&row.day).ok_or_else(|| {
        let names: Vec<&str> = Day::ALL.iter().map(|d| d.as_str()).collect();
        format!(
            "Invalid day: {}. Must be one of: {}",
            row.day,
            names.join(", ")
        )
    })?;

    let start_time = TimeOfDay::parse(&row.start_time)
        .ok_or_else(|| "Invalid time format. Use HH:MM format".to_string())?;
    let end_time = TimeOfDay::parse(&row.end_time)
        .ok_or_else(|| "Invalid time format. Use HH:MM format".to_string())?;
    if start_time >= end_time {
        return Err("Start time must be before end time".to_string());
    }

    let year: i64 = row
        .year
        .parse()
        .ok()
        .filter(|y| YEAR_RANGE.contains(y))
        .ok_or_else(|| "Invalid year. Must be between 2000 and 2100".to_string())?;
    let trimester: i64 = row
        .trimester
        .parse()
        .ok()
        .filter(|t| TRIMESTER_RANGE.contains(t))
        .ok_or_else(|| "Invalid trimester. Must be between 1 and 4".to_string())?;

    Ok((day, start_time, end_time, year, trimester))
}

pub async fn import_courses(db: &SqlitePool, csv_text: &str) -> Result<ImportOutcome, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(csv_text.as_bytes());

    let mut rows = Vec::new();
    let mut errors = Vec::new();
    let mut total = 0;
    for (index, result) in reader.deserialize::<CourseCsvRow>().enumerate() {
        let line = index + 1;
        total = line;
        match result {
            Err(e) => errors.push(ImportRowError {
                line,
                error: format!("Malformed CSV row: {e}"),
            }),
            Ok(row) => match validate_course_row(&row) {
                Err(error) => errors.push(ImportRowError { line, error }),
                Ok((day, start_time, end_time, year, trimester)) => rows.push(ValidCourseRow {
                    line,
                    name: row.name,
                    teacher_name: row.teacher_name,
                    room_name: row.room_name,
                    day,
                    start_time,
                    end_time,
                    year,
                    trimester,
                }),
            },
        }
    }

    if !errors.is_empty() {
        return Ok(ImportOutcome::Rejected(ImportRejection {
            error: "Validation errors found".to_string(),
            errors,
            processed: 0,
            total,
        }));
    }

    let mut processed = 0;
    let mut created = 0;
    let mut updated = 0;
    let mut row_errors = Vec::new();
    for row in rows {
        let Some(teacher_id) = repository::find_teacher_id_by_name(db, &row.teacher_name).await?
        else {
            row_errors.push(ImportRowError {
                line: row.line,
                error: format!("Teacher not found: {}", row.teacher_name),
            });
            continue;
        };
        let Some(room_id) = repository::find_room_id_by_name(db, &row.room_name).await? else {
            row_errors.push(ImportRowError {
                line: row.line,
                error: format!("Room not found: {}", row.room_name),
            });
            continue;
        };

        let existing_id =
            repository::find_course_id_by_key(db, &row.name, row.year, row.trimester).await?;
        let draft = CourseDraft {
            name: row.name,
            teacher_id: Some(teacher_id),
            room_id: Some(room_id),
            day: row.day,
            start_time: row.start_time,
            end_time: row.end_time,
            year: row.year,
            trimester: row.trimester,
        };

        let outcome = match existing_id {
            Some(id) => courses::update_course(db, id, draft).await,
            None => courses::create_course(db, draft).await,
        };
        match outcome {
            Ok(_) => {
                if existing_id.is_some() {
                    updated += 1;
                } else {
                    created += 1;
                }
                processed += 1;
            }
            Err(AppError::SlotConflict(reason)) => row_errors.push(ImportRowError {
                line: row.line,
                error: reason,
            }),
            Err(e) => return Err(e),
        }
    }

    info!(
        "course import completed: {} created, {} updated, {} row errors of {} rows",
        created,
        updated,
        row_errors.len(),
        total
    );
    Ok(ImportOutcome::Completed(ImportReport {
        message: "Import completed".to_string(),
        processed,
        created,
        updated,
        errors: row_errors,
        total,
    }))
}
