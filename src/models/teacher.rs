use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Teacher {
    pub id: i64,
    pub name: String,
    pub department: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub course_count: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeacherPayload {
    pub name: String,
    pub department: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl TeacherPayload {
    /// Trims all fields, turns empty optionals into NULLs, and rejects
    /// payloads without a usable name or with an implausible email.
    pub fn validate(self) -> Result<TeacherPayload, AppError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::Validation("Teacher name is required".to_string()));
        }

        let email = trim_to_none(self.email);
        if let Some(email) = &email {
            if !email.contains('@') {
                return Err(AppError::Validation("Valid email is required".to_string()));
            }
        }

        Ok(TeacherPayload {
            name,
            department: trim_to_none(self.department),
            email,
            phone: trim_to_none(self.phone),
        })
    }
}

pub(crate) fn trim_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
