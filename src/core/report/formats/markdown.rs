//! Markdown report generator
//!
//! Plain Markdown tables; renders well in GitHub, GitLab and VS Code.

use crate::core::report::{ReportContext, ReportGenerator, ReportView};
use askama::Template;
use std::error::Error;
use std::fs;
use std::path::Path;

#[derive(Template)]
#[template(path = "eligibility.md", escape = "none")]
struct MarkdownTemplate<'a> {
    view: &'a ReportView,
}

/// Markdown report generator
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// Create a new Markdown reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for MarkdownReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for MarkdownReporter {
    fn generate(&self, ctx: &ReportContext, output_path: &Path) -> Result<(), Box<dyn Error>> {
        let report_content = self.render(ctx)?;
        fs::write(output_path, report_content)?;
        Ok(())
    }

    fn render(&self, ctx: &ReportContext) -> Result<String, Box<dyn Error>> {
        let view = ReportView::from_context(ctx);
        Ok(MarkdownTemplate { view: &view }.render()?)
    }
}
