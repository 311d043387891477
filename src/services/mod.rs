pub mod courses;
pub mod import;

pub use import::{ImportOutcome, ImportReport, ImportRowError};
