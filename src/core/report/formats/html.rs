//! HTML report generator
//!
//! The page is self-contained with embedded CSS. Values are HTML-escaped.

use crate::core::report::{ReportContext, ReportGenerator, ReportView};
use askama::Template;
use std::error::Error;
use std::fs;
use std::path::Path;

#[derive(Template)]
#[template(path = "eligibility.html")]
struct HtmlTemplate<'a> {
    view: &'a ReportView,
}

/// HTML report generator
pub struct HtmlReporter;

impl HtmlReporter {
    /// Create a new HTML reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for HtmlReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for HtmlReporter {
    fn generate(&self, ctx: &ReportContext, output_path: &Path) -> Result<(), Box<dyn Error>> {
        let report_content = self.render(ctx)?;
        fs::write(output_path, report_content)?;
        Ok(())
    }

    fn render(&self, ctx: &ReportContext) -> Result<String, Box<dyn Error>> {
        let view = ReportView::from_context(ctx);
        Ok(HtmlTemplate { view: &view }.render()?)
    }
}
