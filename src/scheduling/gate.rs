use crate::models::{Course, CourseDraft};
use crate::scheduling::interval::Interval;

/// Outcome of the pre-commit admission check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    Accepted,
    Rejected { reason: String },
}

/// Decides whether a candidate course may occupy its slot.
///
/// Only room double-booking blocks admission. A teacher booked twice in the
/// same slot is deliberately NOT gated here; the conflict detector reports it
/// afterward on the conflicts view. `exclude` carries the id of the course
/// being updated so it cannot conflict with its own stored row.
///
/// Stops at the first overlap found; this is an existence check, not an
/// enumeration.
pub fn admit(candidate: &CourseDraft, existing: &[Course], exclude: Option<i64>) -> Admission {
    let Some(room_id) = candidate.room_id else {
        return Admission::Accepted;
    };

    let candidate_interval = Interval::from(candidate);
    for course in existing {
        if exclude == Some(course.id) {
            continue;
        }
        if course.room_id != Some(room_id) {
            continue;
        }
        if course.year != candidate.year || course.trimester != candidate.trimester {
            continue;
        }
        if candidate_interval.overlaps(&Interval::from(course)) {
            return Admission::Rejected {
                reason: "Time slot conflict detected".to_string(),
            };
        }
    }

    Admission::Accepted
}
