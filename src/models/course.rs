use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::{Day, TimeOfDay};

/// Canonical in-memory course record. The repository maps database rows into
/// this shape; the scheduling core never sees raw rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Course {
    pub id: i64,
    pub name: String,
    pub teacher_id: Option<i64>,
    pub room_id: Option<i64>,
    pub day: Day,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub year: i64,
    pub trimester: i64,
    pub teacher_name: Option<String>,
    pub room_name: Option<String>,
    pub room_building: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Raw course create/update request body, exactly as received on the wire.
/// Must pass through [`CoursePayload::validate`] before any scheduling logic
/// runs.
#[derive(Debug, Clone, Deserialize)]
pub struct CoursePayload {
    pub name: String,
    pub teacher_id: Option<i64>,
    pub room_id: Option<i64>,
    pub day: String,
    pub start_time: String,
    pub end_time: String,
    pub year: i64,
    pub trimester: i64,
}

/// A validated course candidate, ready for the scheduling gate and the
/// repository write path.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseDraft {
    pub name: String,
    pub teacher_id: Option<i64>,
    pub room_id: Option<i64>,
    pub day: Day,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub year: i64,
    pub trimester: i64,
}

pub const YEAR_RANGE: std::ops::RangeInclusive<i64> = 2000..=2100;
pub const TRIMESTER_RANGE: std::ops::RangeInclusive<i64> = 1..=4;

impl CoursePayload {
    pub fn validate(self) -> Result<CourseDraft, AppError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::Validation("Course name is required".to_string()));
        }

        let day = Day::parse(self.day.trim())
            .ok_or_else(|| AppError::Validation("Valid day is required".to_string()))?;

        let start_time = TimeOfDay::parse(self.start_time.trim())
            .ok_or_else(|| AppError::Validation("Valid start time is required".to_string()))?;
        let end_time = TimeOfDay::parse(self.end_time.trim())
            .ok_or_else(|| AppError::Validation("Valid end time is required".to_string()))?;
        if start_time >= end_time {
            return Err(AppError::Validation(
                "Start time must be before end time".to_string(),
            ));
        }

        if !YEAR_RANGE.contains(&self.year) {
            return Err(AppError::Validation("Valid year is required".to_string()));
        }
        if !TRIMESTER_RANGE.contains(&self.trimester) {
            return Err(AppError::Validation(
                "Valid trimester is required".to_string(),
            ));
        }

        Ok(CourseDraft {
            name,
            teacher_id: self.teacher_id,
            room_id: self.room_id,
            day,
            start_time,
            end_time,
            year: self.year,
            trimester: self.trimester,
        })
    }
}

/// Exact-match filters for course listings.
#[derive(Debug, Clone, Default)]
pub struct CourseFilter {
    pub year: Option<i64>,
    pub trimester: Option<i64>,
    pub teacher_id: Option<i64>,
    pub room_id: Option<i64>,
    pub day: Option<Day>,
}
