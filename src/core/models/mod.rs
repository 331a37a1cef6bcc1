//! Data models for `gradpath`

pub mod catalog;
pub mod course;
pub mod grade;
pub mod graph;
pub mod program;
pub mod student;

pub use catalog::Catalog;
pub use course::{Course, CourseCategory};
pub use grade::{Grade, GradePolicy};
pub use graph::PrerequisiteGraph;
pub use program::{MandatoryCourse, Program, ProgramTier};
pub use student::{CompletedSubject, CompletionSet, StudentProfile, SubjectStatus};
