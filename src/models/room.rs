use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;
use crate::models::teacher::trim_to_none;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Room {
    pub id: i64,
    pub name: String,
    pub building: Option<String>,
    pub capacity: Option<i64>,
    pub room_type: Option<String>,
    pub course_count: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomPayload {
    pub name: String,
    pub building: Option<String>,
    pub capacity: Option<i64>,
    pub room_type: Option<String>,
}

impl RoomPayload {
    pub fn validate(self) -> Result<RoomPayload, AppError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::Validation("Room name is required".to_string()));
        }

        if let Some(capacity) = self.capacity {
            if capacity < 1 {
                return Err(AppError::Validation(
                    "Capacity must be a positive integer".to_string(),
                ));
            }
        }

        Ok(RoomPayload {
            name,
            building: trim_to_none(self.building),
            capacity: self.capacity,
            room_type: trim_to_none(self.room_type),
        })
    }
}
