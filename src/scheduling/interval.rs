use crate::models::{Course, CourseDraft, Day, TimeOfDay};

/// A course's placement in the week: a day plus the half-open time range
/// `[start, end)`. Assumes `start < end`, which validation guarantees before
/// anything reaches the scheduling core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub day: Day,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl Interval {
    pub fn new(day: Day, start: TimeOfDay, end: TimeOfDay) -> Interval {
        Interval { day, start, end }
    }

    /// Half-open overlap test. Two placements overlap iff they fall on the
    /// same day and their time ranges intersect; a course ending exactly when
    /// another starts (back-to-back periods) does NOT overlap.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.day == other.day && self.start < other.end && other.start < self.end
    }
}

impl From<&Course> for Interval {
    fn from(course: &Course) -> Interval {
        Interval::new(course.day, course.start_time, course.end_time)
    }
}

impl From<&CourseDraft> for Interval {
    fn from(draft: &CourseDraft) -> Interval {
        Interval::new(draft.day, draft.start_time, draft.end_time)
    }
}
