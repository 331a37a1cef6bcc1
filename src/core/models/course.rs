//! Course model

use super::Program;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of course categories used by the curriculum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CourseCategory {
    /// Must be completed for the programs the course is tagged with
    Compulsory,
    /// Credit-bearing but optional
    Elective,
    /// Industrial placement
    #[serde(rename = "Industrial Training")]
    IndustrialTraining,
    /// Continuing education units
    #[serde(rename = "Continuing Education")]
    ContinuingEducation,
    /// Special mandatory courses outside the regular credit bookkeeping
    Mandatory,
}

impl fmt::Display for CourseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Compulsory => "Compulsory",
            Self::Elective => "Elective",
            Self::IndustrialTraining => "Industrial Training",
            Self::ContinuingEducation => "Continuing Education",
            Self::Mandatory => "Mandatory",
        };
        f.write_str(label)
    }
}

const fn default_true() -> bool {
    true
}

/// Represents a course in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// Course code, unique within a catalog (e.g., "EEI3346")
    pub code: String,

    /// Course name (e.g., "Programming Fundamentals")
    pub name: String,

    /// Credit weight
    pub credits: u32,

    /// Curriculum level (3-6)
    pub level: u8,

    /// Semester offered (1 or 2), if fixed
    #[serde(default)]
    pub semester: Option<u8>,

    /// Course category
    pub category: CourseCategory,

    /// Prerequisite course codes
    #[serde(default)]
    pub prerequisites: Vec<String>,

    /// Co-requisite course codes (concurrent registration, advisory only)
    #[serde(default)]
    pub corequisites: Vec<String>,

    /// Programs this course counts toward, by program id or code
    #[serde(default)]
    pub program_ids: Vec<String>,

    /// Whether the course counts toward GPA (otherwise pass/fail)
    #[serde(default = "default_true")]
    pub is_gpa: bool,

    /// Whether the course is visible and usable
    #[serde(default = "default_true")]
    pub active: bool,

    /// Free-form description
    #[serde(default)]
    pub description: Option<String>,
}

impl Course {
    /// Create a new active, GPA-bearing course with no requisites
    ///
    /// # Arguments
    /// * `code` - Course code
    /// * `name` - Course name
    /// * `credits` - Credit weight
    /// * `level` - Curriculum level
    /// * `category` - Course category
    #[must_use]
    pub fn new(code: &str, name: &str, credits: u32, level: u8, category: CourseCategory) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            credits,
            level,
            semester: None,
            category,
            prerequisites: Vec::new(),
            corequisites: Vec::new(),
            program_ids: Vec::new(),
            is_gpa: true,
            active: true,
            description: None,
        }
    }

    /// Add a prerequisite by course code
    pub fn add_prerequisite(&mut self, code: &str) {
        if !self.prerequisites.iter().any(|p| p == code) {
            self.prerequisites.push(code.to_string());
        }
    }

    /// Add a co-requisite by course code
    pub fn add_corequisite(&mut self, code: &str) {
        if !self.corequisites.iter().any(|c| c == code) {
            self.corequisites.push(code.to_string());
        }
    }

    /// Tag the course as counting toward a program
    pub fn add_program(&mut self, program_id: &str) {
        if !self.program_ids.iter().any(|p| p == program_id) {
            self.program_ids.push(program_id.to_string());
        }
    }

    /// Builder-style variant of [`add_prerequisite`](Self::add_prerequisite)
    #[must_use]
    pub fn with_prerequisite(mut self, code: &str) -> Self {
        self.add_prerequisite(code);
        self
    }

    /// Builder-style variant of [`add_program`](Self::add_program)
    #[must_use]
    pub fn with_program(mut self, program_id: &str) -> Self {
        self.add_program(program_id);
        self
    }

    /// Whether the course is tagged for the program, by id or by program code
    #[must_use]
    pub fn belongs_to(&self, program: &Program) -> bool {
        self.program_ids
            .iter()
            .any(|p| *p == program.id || *p == program.code)
    }

    /// Whether the course is a compulsory course of the program
    #[must_use]
    pub fn is_compulsory_for(&self, program: &Program) -> bool {
        self.category == CourseCategory::Compulsory && self.belongs_to(program)
    }
}
