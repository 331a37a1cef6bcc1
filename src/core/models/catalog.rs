//! Catalog model: the course and program lists supplied by the administrator

use super::{Course, PrerequisiteGraph, Program, ProgramTier};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// Immutable snapshot of the course and program catalogs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    /// Catalog name (e.g., "OUSL Bachelor of Software Engineering")
    #[serde(default)]
    pub name: String,

    /// Qualification programs
    #[serde(default)]
    pub programs: Vec<Program>,

    /// Courses
    #[serde(default)]
    pub courses: Vec<Course>,
}

impl Catalog {
    /// Create an empty catalog
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            programs: Vec::new(),
            courses: Vec::new(),
        }
    }

    /// Add a course
    ///
    /// # Returns
    /// `true` if the course was added, `false` if a course with that code already exists
    pub fn add_course(&mut self, course: Course) -> bool {
        if self.courses.iter().any(|c| c.code == course.code) {
            return false;
        }
        self.courses.push(course);
        true
    }

    /// Add a program
    ///
    /// # Returns
    /// `true` if the program was added, `false` if a program with that id already exists
    pub fn add_program(&mut self, program: Program) -> bool {
        if self.programs.iter().any(|p| p.id == program.id) {
            return false;
        }
        self.programs.push(program);
        true
    }

    /// Courses with `active = true`, in catalog order
    pub fn active_courses(&self) -> impl Iterator<Item = &Course> {
        self.courses.iter().filter(|c| c.active)
    }

    /// Programs with `active = true`, in catalog order
    pub fn active_programs(&self) -> impl Iterator<Item = &Program> {
        self.programs.iter().filter(|p| p.active)
    }

    /// Look up an active course by code
    #[must_use]
    pub fn course(&self, code: &str) -> Option<&Course> {
        self.active_courses().find(|c| c.code == code)
    }

    /// Look up an active program by id
    #[must_use]
    pub fn program(&self, id: &str) -> Option<&Program> {
        self.active_programs().find(|p| p.id == id)
    }

    /// Tier of a program: the explicit tier, otherwise inferred from the
    /// distinct levels of the active programs (lowest is entry, highest is
    /// top, anything between is mid).
    #[must_use]
    pub fn tier_of(&self, program: &Program) -> ProgramTier {
        if let Some(tier) = program.tier {
            return tier;
        }

        let levels: BTreeSet<u8> = self.active_programs().map(|p| p.level).collect();
        let lowest = levels.first().copied().unwrap_or(program.level);
        let highest = levels.last().copied().unwrap_or(program.level);

        if program.level <= lowest {
            ProgramTier::Entry
        } else if program.level >= highest {
            ProgramTier::Top
        } else {
            ProgramTier::Mid
        }
    }

    /// The first active entry-tier program, if any
    #[must_use]
    pub fn entry_program(&self) -> Option<&Program> {
        self.active_programs()
            .find(|p| self.tier_of(p) == ProgramTier::Entry)
    }

    /// Active compulsory courses tagged for the program
    pub fn compulsory_courses<'a>(
        &'a self,
        program: &'a Program,
    ) -> impl Iterator<Item = &'a Course> + 'a {
        self.active_courses()
            .filter(move |c| c.is_compulsory_for(program))
    }

    /// Build the prerequisite graph of the active courses
    #[must_use]
    pub fn build_graph(&self) -> PrerequisiteGraph {
        let mut graph = PrerequisiteGraph::new();

        for course in self.active_courses() {
            graph.add_course(&course.code);
        }

        for course in self.active_courses() {
            for prereq in &course.prerequisites {
                graph.add_prerequisite(&course.code, prereq);
            }
        }

        graph
    }

    /// Data-quality warnings. None of these stop evaluation.
    ///
    /// Checks for duplicate course codes and program ids, prerequisites that
    /// do not resolve, courses tagged for unknown programs, and credit
    /// thresholds that decrease as the program level increases.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        let mut seen = HashSet::new();
        for course in &self.courses {
            if !seen.insert(course.code.as_str()) {
                warnings.push(format!("Duplicate course code '{}'", course.code));
            }
        }

        let mut seen = HashSet::new();
        for program in &self.programs {
            if !seen.insert(program.id.as_str()) {
                warnings.push(format!("Duplicate program id '{}'", program.id));
            }
        }

        for (code, prereq) in self.build_graph().dangling() {
            warnings.push(format!("Course '{code}': prerequisite '{prereq}' not found"));
        }

        for course in self.active_courses() {
            for tag in &course.program_ids {
                if !self.programs.iter().any(|p| p.id == *tag || p.code == *tag) {
                    warnings.push(format!(
                        "Course '{}': program '{tag}' not found",
                        course.code
                    ));
                }
            }
        }

        let mut ladder: Vec<&Program> = self.active_programs().collect();
        ladder.sort_by_key(|p| p.level);
        for pair in ladder.windows(2) {
            let (lower, higher) = (pair[0], pair[1]);
            if lower.level < higher.level && lower.min_credits > higher.min_credits {
                warnings.push(format!(
                    "Program '{}' (level {}) requires fewer credits than '{}' (level {})",
                    higher.id, higher.level, lower.id, lower.level
                ));
            }
        }

        warnings
    }
}
