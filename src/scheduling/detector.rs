use crate::models::{Conflict, ConflictKind, Course};
use crate::scheduling::interval::Interval;

/// Finds every pair of courses that overlap in time and share a teacher or a
/// room. The input is one scope's snapshot; courses from different
/// (year, trimester) scopes never conflict even if handed in together.
///
/// Pure and O(n²) over the snapshot. The input is re-ordered by id before
/// the pairwise sweep so the output is deterministic regardless of the order
/// the repository returned the rows in.
pub fn detect_conflicts(courses: &[Course]) -> Vec<Conflict> {
    let mut ordered: Vec<&Course> = courses.iter().collect();
    ordered.sort_by_key(|course| course.id);

    let mut conflicts = Vec::new();
    for (i, a) in ordered.iter().enumerate() {
        for b in &ordered[i + 1..] {
            if a.year != b.year || a.trimester != b.trimester {
                continue;
            }
            if !Interval::from(*a).overlaps(&Interval::from(*b)) {
                continue;
            }

            if let (Some(ta), Some(tb)) = (a.teacher_id, b.teacher_id) {
                if ta == tb {
                    conflicts.push(Conflict {
                        kind: ConflictKind::Teacher,
                        message: format!(
                            "Teacher conflict: {} and {} at the same time",
                            a.name, b.name
                        ),
                        course_a: (*a).clone(),
                        course_b: (*b).clone(),
                    });
                }
            }
            if let (Some(ra), Some(rb)) = (a.room_id, b.room_id) {
                if ra == rb {
                    conflicts.push(Conflict {
                        kind: ConflictKind::Room,
                        message: format!(
                            "Room conflict: {} and {} in the same room",
                            a.name, b.name
                        ),
                        course_a: (*a).clone(),
                        course_b: (*b).clone(),
                    });
                }
            }
        }
    }

    conflicts
}
