pub mod conflict;
pub mod course;
pub mod day;
pub mod room;
pub mod teacher;
pub mod time;

pub use conflict::{Conflict, ConflictKind};
pub use course::{Course, CourseDraft, CourseFilter, CoursePayload};
pub use day::Day;
pub use room::{Room, RoomPayload};
pub use teacher::{Teacher, TeacherPayload};
pub use time::TimeOfDay;
