//! Credit and category aggregation
//!
//! Sums earned credits overall and per category and reports the deficiency
//! against the fixed requirement table. Courses are grouped by code prefix,
//! not by their catalog category.

use crate::core::models::{Catalog, CompletionSet, ProgramTier};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Credits required for graduation when the catalog has no top-tier program
pub const GLOBAL_REQUIRED_CREDITS: u32 = 125;

/// Assumed average credits per subject, used only for the "subjects still
/// needed" display estimate
pub const AVERAGE_CREDITS_PER_SUBJECT: u32 = 3;

/// Closed set of credit categories, decided by course-code prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryGroup {
    /// EEI, EEX, ECX, ECI
    Engineering,
    /// EEY
    Projects,
    /// MHZ, CPU
    Mathematics,
    /// MHJ, MEZ
    Management,
    /// FDE
    Foundation,
    /// LTE
    Language,
    /// Anything else
    Other,
}

impl CategoryGroup {
    /// Every category, in display order
    pub const ALL: [Self; 7] = [
        Self::Engineering,
        Self::Projects,
        Self::Mathematics,
        Self::Management,
        Self::Foundation,
        Self::Language,
        Self::Other,
    ];

    /// Category for a course code, from its three-letter prefix
    #[must_use]
    pub fn for_code(code: &str) -> Self {
        let prefix = code.get(..3).unwrap_or("").to_ascii_uppercase();
        match prefix.as_str() {
            "EEI" | "EEX" | "ECX" | "ECI" => Self::Engineering,
            "EEY" => Self::Projects,
            "MHZ" | "CPU" => Self::Mathematics,
            "MHJ" | "MEZ" => Self::Management,
            "FDE" => Self::Foundation,
            "LTE" => Self::Language,
            _ => Self::Other,
        }
    }

    /// Credits required in this category
    #[must_use]
    pub const fn required_credits(self) -> u32 {
        match self {
            Self::Engineering => 90,
            Self::Projects => 9,
            Self::Mathematics => 12,
            Self::Management => 6,
            Self::Foundation => 3,
            Self::Language => 2,
            Self::Other => 0,
        }
    }

    /// Human-readable label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Engineering => "Engineering & ICT",
            Self::Projects => "Projects & Training",
            Self::Mathematics => "Mathematics",
            Self::Management => "Management",
            Self::Foundation => "Foundation English",
            Self::Language => "Academic Language",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for CategoryGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Credit standing in one category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryProgress {
    /// Credits earned
    pub completed: u32,
    /// Credits required
    pub required: u32,
    /// Deficiency, `max(0, required - completed)`
    pub remaining: u32,
}

impl CategoryProgress {
    fn new(completed: u32, required: u32) -> Self {
        Self {
            completed,
            required,
            remaining: required.saturating_sub(completed),
        }
    }

    /// Display estimate of subjects still needed (remaining credits divided
    /// by the average subject weight, rounded up). Not a requirement.
    #[must_use]
    pub const fn subjects_needed_estimate(&self) -> u32 {
        self.remaining.div_ceil(AVERAGE_CREDITS_PER_SUBJECT)
    }
}

/// Per-category progress with one slot per [`CategoryGroup`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    /// Engineering & ICT courses
    pub engineering: CategoryProgress,
    /// Projects and training
    pub projects: CategoryProgress,
    /// Mathematics
    pub mathematics: CategoryProgress,
    /// Management
    pub management: CategoryProgress,
    /// Foundation English
    pub foundation: CategoryProgress,
    /// Academic language
    pub language: CategoryProgress,
    /// Unmapped prefixes
    pub other: CategoryProgress,
}

impl CategoryBreakdown {
    /// Progress for one category
    #[must_use]
    pub const fn get(&self, group: CategoryGroup) -> &CategoryProgress {
        match group {
            CategoryGroup::Engineering => &self.engineering,
            CategoryGroup::Projects => &self.projects,
            CategoryGroup::Mathematics => &self.mathematics,
            CategoryGroup::Management => &self.management,
            CategoryGroup::Foundation => &self.foundation,
            CategoryGroup::Language => &self.language,
            CategoryGroup::Other => &self.other,
        }
    }

    fn get_mut(&mut self, group: CategoryGroup) -> &mut CategoryProgress {
        match group {
            CategoryGroup::Engineering => &mut self.engineering,
            CategoryGroup::Projects => &mut self.projects,
            CategoryGroup::Mathematics => &mut self.mathematics,
            CategoryGroup::Management => &mut self.management,
            CategoryGroup::Foundation => &mut self.foundation,
            CategoryGroup::Language => &mut self.language,
            CategoryGroup::Other => &mut self.other,
        }
    }

    /// All categories with their progress, in display order
    pub fn iter(&self) -> impl Iterator<Item = (CategoryGroup, &CategoryProgress)> {
        CategoryGroup::ALL.into_iter().map(|g| (g, self.get(g)))
    }
}

/// Result of one aggregation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreditSummary {
    /// Credits of catalog courses present in the completion set
    pub total_earned: u32,
    /// Global graduation requirement
    pub required: u32,
    /// `max(0, required - total_earned)`
    pub deficiency: u32,
    /// Per-category standing
    pub categories: CategoryBreakdown,
}

/// Cached credit standing stored on the student profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcademicProgress {
    /// Credits earned
    pub earned_credits: u32,
    /// Credits still required for graduation
    pub remaining_credits: u32,
    /// Per-category standing
    pub category_progress: CategoryBreakdown,
    /// When this cache was computed
    pub last_updated: DateTime<Utc>,
}

/// Graduation requirement of a catalog: the largest non-zero threshold of
/// its active top-tier programs, or [`GLOBAL_REQUIRED_CREDITS`] if it has none
#[must_use]
pub fn graduation_credits(catalog: &Catalog) -> u32 {
    catalog
        .active_programs()
        .filter(|p| p.min_credits > 0 && catalog.tier_of(p) == ProgramTier::Top)
        .map(|p| p.min_credits)
        .max()
        .unwrap_or(GLOBAL_REQUIRED_CREDITS)
}

/// Aggregate earned credits against the catalog's graduation requirement.
///
/// Only active catalog courses whose code is in the completion set count;
/// completed codes missing from the catalog contribute nothing.
#[must_use]
pub fn aggregate(catalog: &Catalog, completed: &CompletionSet) -> CreditSummary {
    aggregate_against(catalog, completed, graduation_credits(catalog))
}

/// [`aggregate`] with an explicit global requirement
#[must_use]
pub fn aggregate_against(catalog: &Catalog, completed: &CompletionSet, required: u32) -> CreditSummary {
    let mut earned_by_group = [0u32; CategoryGroup::ALL.len()];
    let mut total_earned = 0u32;

    let mut counted = HashSet::new();
    for course in catalog.active_courses().filter(|c| completed.contains(&c.code)) {
        // A duplicated catalog code is counted once
        if !counted.insert(course.code.as_str()) {
            continue;
        }
        let group = CategoryGroup::for_code(&course.code);
        let slot = &mut earned_by_group[group as usize];
        *slot = slot.saturating_add(course.credits);
        total_earned = total_earned.saturating_add(course.credits);
    }

    let mut categories = CategoryBreakdown::default();
    for group in CategoryGroup::ALL {
        *categories.get_mut(group) =
            CategoryProgress::new(earned_by_group[group as usize], group.required_credits());
    }

    CreditSummary {
        total_earned,
        required,
        deficiency: required.saturating_sub(total_earned),
        categories,
    }
}

/// Turn a summary into the cache stored on the profile
#[must_use]
pub fn academic_progress(summary: &CreditSummary, now: DateTime<Utc>) -> AcademicProgress {
    AcademicProgress {
        earned_credits: summary.total_earned,
        remaining_credits: summary.deficiency,
        category_progress: summary.categories,
        last_updated: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{Course, CourseCategory, Program};

    fn catalog() -> Catalog {
        let mut catalog = Catalog::new("Test");
        catalog.add_course(Course::new("EEI3346", "PF", 3, 3, CourseCategory::Compulsory));
        catalog.add_course(Course::new("EEY4189", "Project", 6, 4, CourseCategory::Compulsory));
        catalog.add_course(Course::new("MHZ3459", "Maths", 4, 3, CourseCategory::Compulsory));
        catalog.add_course(Course::new("FDE3023", "EfIL", 3, 3, CourseCategory::Mandatory));
        catalog.add_course(Course::new("XYZ1000", "Misc", 2, 3, CourseCategory::Elective));
        catalog
    }

    #[test]
    fn test_prefix_mapping() {
        assert_eq!(CategoryGroup::for_code("EEX4465"), CategoryGroup::Engineering);
        assert_eq!(CategoryGroup::for_code("eci3001"), CategoryGroup::Engineering);
        assert_eq!(CategoryGroup::for_code("EEY4189"), CategoryGroup::Projects);
        assert_eq!(CategoryGroup::for_code("CPU4001"), CategoryGroup::Mathematics);
        assert_eq!(CategoryGroup::for_code("MEZ4001"), CategoryGroup::Management);
        assert_eq!(CategoryGroup::for_code("LTE34SI"), CategoryGroup::Language);
        assert_eq!(CategoryGroup::for_code("X1"), CategoryGroup::Other);
        assert_eq!(CategoryGroup::for_code(""), CategoryGroup::Other);
    }

    #[test]
    fn test_aggregate_sums_by_category() {
        let completed: CompletionSet = ["EEI3346", "EEY4189", "MHZ3459", "XYZ1000"].into_iter().collect();
        let summary = aggregate(&catalog(), &completed);

        assert_eq!(summary.total_earned, 15);
        assert_eq!(summary.deficiency, GLOBAL_REQUIRED_CREDITS - 15);
        assert_eq!(summary.categories.engineering.completed, 3);
        assert_eq!(summary.categories.projects.completed, 6);
        assert_eq!(summary.categories.projects.remaining, 3);
        assert_eq!(summary.categories.mathematics.remaining, 8);
        assert_eq!(summary.categories.other.completed, 2);
        assert_eq!(summary.categories.other.remaining, 0);
        assert_eq!(summary.categories.foundation.remaining, 3);
    }

    #[test]
    fn test_requirement_follows_top_program() {
        let mut catalog = catalog();
        assert_eq!(graduation_credits(&catalog), GLOBAL_REQUIRED_CREDITS);

        catalog.add_program(Program::new("diploma", "Diploma", "DSE", 3, 30));
        catalog.add_program(Program::new("degree", "Degree", "BSE", 6, 130));
        assert_eq!(graduation_credits(&catalog), 130);

        let completed: CompletionSet = ["EEI3346"].into_iter().collect();
        let summary = aggregate(&catalog, &completed);
        assert_eq!(summary.required, 130);
        assert_eq!(summary.deficiency, 127);
    }

    #[test]
    fn test_huge_credits_saturate() {
        let mut catalog = Catalog::new("Huge");
        catalog.add_course(Course::new("EEI1", "A", u32::MAX, 3, CourseCategory::Elective));
        catalog.add_course(Course::new("EEI2", "B", u32::MAX, 3, CourseCategory::Elective));

        let completed: CompletionSet = ["EEI1", "EEI2"].into_iter().collect();
        let summary = aggregate(&catalog, &completed);
        assert_eq!(summary.total_earned, u32::MAX);
        assert_eq!(summary.categories.engineering.completed, u32::MAX);
        assert_eq!(summary.deficiency, 0);
    }

    #[test]
    fn test_stale_codes_contribute_nothing() {
        let completed: CompletionSet = ["EEI3346", "GONE9999"].into_iter().collect();
        let summary = aggregate(&catalog(), &completed);
        assert_eq!(summary.total_earned, 3);
    }

    #[test]
    fn test_deficiency_clamps_at_zero() {
        let completed: CompletionSet = ["EEI3346", "EEY4189"].into_iter().collect();
        let summary = aggregate_against(&catalog(), &completed, 5);
        assert_eq!(summary.deficiency, 0);
    }

    #[test]
    fn test_subjects_needed_rounds_up() {
        let progress = CategoryProgress::new(3, 12);
        assert_eq!(progress.remaining, 9);
        assert_eq!(progress.subjects_needed_estimate(), 3);

        let progress = CategoryProgress::new(0, 2);
        assert_eq!(progress.subjects_needed_estimate(), 1);

        let progress = CategoryProgress::new(5, 2);
        assert_eq!(progress.subjects_needed_estimate(), 0);
    }

    #[test]
    fn test_breakdown_iter_covers_all_groups() {
        let breakdown = CategoryBreakdown::default();
        assert_eq!(breakdown.iter().count(), CategoryGroup::ALL.len());
    }

    #[test]
    fn test_academic_progress_copies_summary() {
        let completed: CompletionSet = ["EEI3346"].into_iter().collect();
        let summary = aggregate(&catalog(), &completed);
        let now = Utc::now();
        let progress = academic_progress(&summary, now);

        assert_eq!(progress.earned_credits, 3);
        assert_eq!(progress.remaining_credits, 122);
        assert_eq!(progress.last_updated, now);
    }
}
