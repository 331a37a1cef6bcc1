//! Report generation module for student progress
//!
//! Renders one student's eligibility verdicts, credit breakdown and blocked
//! courses as Markdown or HTML.

pub mod formats;
pub mod view;

use crate::core::aggregator::{self, CreditSummary};
use crate::core::eligibility::{self, EligibilityResult};
use crate::core::models::{Catalog, GradePolicy, StudentProfile};
use crate::core::{gpa, prerequisites};
use chrono::{DateTime, Utc};
use std::error::Error;
use std::path::Path;

pub use formats::{HtmlReporter, MarkdownReporter, ReportFormat};
pub use view::ReportView;

/// Everything a report shows, computed once up front
#[derive(Debug, Clone)]
pub struct ReportContext<'a> {
    /// Catalog the student was evaluated against
    pub catalog: &'a Catalog,
    /// Student being reported
    pub profile: &'a StudentProfile,
    /// Verdict per program
    pub results: Vec<EligibilityResult>,
    /// Credit and category totals
    pub summary: CreditSummary,
    /// Courses blocked by unmet prerequisites
    pub blocked: Vec<String>,
    /// Credit-weighted GPA
    pub gpa: Option<f64>,
    /// Report timestamp
    pub generated_at: DateTime<Utc>,
    /// Grade policy the student was evaluated under
    pub policy: GradePolicy,
}

impl<'a> ReportContext<'a> {
    /// Evaluate a student for reporting
    #[must_use]
    pub fn new(
        catalog: &'a Catalog,
        profile: &'a StudentProfile,
        policy: &GradePolicy,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let completed = profile.completion_set(policy);
        Self {
            catalog,
            profile,
            results: eligibility::evaluate(profile, catalog, policy),
            summary: aggregator::aggregate(catalog, &completed),
            blocked: prerequisites::blocked_courses(catalog, &completed),
            gpa: gpa::profile_gpa(profile),
            generated_at,
            policy: *policy,
        }
    }

    /// Name of the enrolled program, or its raw id if the catalog lacks it
    #[must_use]
    pub fn program_name(&self) -> &str {
        let id = self.profile.enrolled_program_id.as_str();
        self.catalog.program(id).map_or(id, |p| p.name.as_str())
    }

    /// Number of programs the student is eligible for
    #[must_use]
    pub fn eligible_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_eligible).count()
    }
}

/// Trait for report generators
pub trait ReportGenerator {
    /// Generate a report to a file
    ///
    /// # Errors
    /// Returns an error if report generation or file writing fails
    fn generate(&self, ctx: &ReportContext, output_path: &Path) -> Result<(), Box<dyn Error>>;

    /// Generate report content as a string
    ///
    /// # Errors
    /// Returns an error if report generation fails
    fn render(&self, ctx: &ReportContext) -> Result<String, Box<dyn Error>>;
}
