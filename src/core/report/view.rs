//! Pre-formatted values handed to the templates

use super::ReportContext;
use crate::core::gpa::format_gpa;
use crate::core::prerequisites::unmet_prerequisites;

/// One row of the eligibility table
#[derive(Debug, Clone)]
pub struct ProgramRow {
    /// Program name
    pub name: String,
    /// Whether the student is eligible
    pub eligible: bool,
    /// "Eligible" or "Not eligible"
    pub status: &'static str,
    /// Percentage toward the threshold
    pub progress: u8,
    /// Credits earned
    pub earned: u32,
    /// Program threshold
    pub required: u32,
    /// Missing requirements
    pub reasons: Vec<String>,
}

/// One row of the category table
#[derive(Debug, Clone)]
pub struct CategoryRow {
    /// Category label
    pub label: &'static str,
    /// Credits earned
    pub completed: u32,
    /// Credits required
    pub required: u32,
    /// Deficiency
    pub remaining: u32,
    /// Display estimate
    pub subjects_needed: u32,
}

/// A blocked course and what it waits for
#[derive(Debug, Clone)]
pub struct BlockedRow {
    /// Course code
    pub code: String,
    /// Course name
    pub name: String,
    /// Unmet prerequisite codes, comma separated
    pub missing: String,
}

/// Flat, template-friendly form of a [`ReportContext`]
#[derive(Debug, Clone)]
pub struct ReportView {
    /// Student id
    pub student: String,
    /// Catalog name
    pub catalog: String,
    /// Enrolled program name
    pub program: String,
    /// Timestamp, `YYYY-MM-DD HH:MM UTC`
    pub generated_at: String,
    /// GPA with two decimals
    pub gpa: String,
    /// Credits earned
    pub earned: u32,
    /// Global requirement
    pub required: u32,
    /// Global deficiency
    pub deficiency: u32,
    /// Eligibility rows in catalog order
    pub programs: Vec<ProgramRow>,
    /// Category rows in display order
    pub categories: Vec<CategoryRow>,
    /// Blocked courses, sorted by code
    pub blocked: Vec<BlockedRow>,
}

impl ReportView {
    /// Flatten a context
    #[must_use]
    pub fn from_context(ctx: &ReportContext) -> Self {
        let completed = ctx.profile.completion_set(&ctx.policy);

        let programs = ctx
            .results
            .iter()
            .map(|r| ProgramRow {
                name: r.program_name.clone(),
                eligible: r.is_eligible,
                status: if r.is_eligible { "Eligible" } else { "Not eligible" },
                progress: r.progress,
                earned: r.credits_earned,
                required: r.credits_required,
                reasons: r.missing_requirements.clone(),
            })
            .collect();

        let categories = ctx
            .summary
            .categories
            .iter()
            .map(|(group, progress)| CategoryRow {
                label: group.label(),
                completed: progress.completed,
                required: progress.required,
                remaining: progress.remaining,
                subjects_needed: progress.subjects_needed_estimate(),
            })
            .collect();

        let blocked = ctx
            .blocked
            .iter()
            .map(|code| BlockedRow {
                code: code.clone(),
                name: ctx.catalog.course(code).map_or_else(String::new, |c| c.name.clone()),
                missing: unmet_prerequisites(ctx.catalog, &completed, code).join(", "),
            })
            .collect();

        Self {
            student: ctx.profile.uid.clone(),
            catalog: ctx.catalog.name.clone(),
            program: ctx.program_name().to_string(),
            generated_at: ctx.generated_at.format("%Y-%m-%d %H:%M UTC").to_string(),
            gpa: format_gpa(ctx.gpa),
            earned: ctx.summary.total_earned,
            required: ctx.summary.required,
            deficiency: ctx.summary.deficiency,
            programs,
            categories,
            blocked,
        }
    }
}
