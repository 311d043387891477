use serde::{Deserialize, Serialize};

use crate::models::Course;

/// Which shared resource two overlapping courses are fighting over. A pair
/// sharing both a teacher and a room yields one conflict of each kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictKind {
    Teacher,
    Room,
}

/// A detected double-booking. Derived on demand from a scope snapshot and
/// never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conflict {
    pub kind: ConflictKind,
    pub course_a: Course,
    pub course_b: Course,
    pub message: String,
}
