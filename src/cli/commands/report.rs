//! Report command handler
//!
//! Renders a student's progress report as Markdown or HTML.

use super::load_inputs;
use chrono::Utc;
use gradpath::config::Config;
use gradpath::core::report::{ReportContext, ReportFormat};
use gradpath::core::store::uid_file_stem;
use logger::{error, info};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Run the report command.
///
/// # Arguments
/// * `student_path` - Student record file
/// * `output_file` - Optional output path
/// * `format_str` - Report format (markdown, html)
/// * `config` - Configuration containing the default reports directory
pub fn run(student_path: &Path, output_file: Option<&Path>, format_str: &str, config: &Config) {
    match generate_report(student_path, output_file, format_str, config) {
        Ok(path) => println!("✓ Report generated: {}", path.display()),
        Err(err) => {
            error!("Report generation failed for {}: {err}", student_path.display());
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}

fn generate_report(
    student_path: &Path,
    output_file: Option<&Path>,
    format_str: &str,
    config: &Config,
) -> Result<PathBuf, String> {
    let format = ReportFormat::from_str(format_str).map_err(|e| format!("✗ {e}"))?;
    let (catalog, profile) = load_inputs(config, student_path)?;

    let output_path = match output_file {
        Some(path) => path.to_path_buf(),
        None => default_output_path(&config.paths.reports_dir, &profile.uid, format),
    };
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("✗ Failed to create directory {}: {e}", parent.display()))?;
    }

    let ctx = ReportContext::new(&catalog, &profile, &config.grade_policy(), Utc::now());
    format
        .reporter()
        .generate(&ctx, &output_path)
        .map_err(|e| format!("✗ Failed to write {format} report: {e}"))?;

    info!("{format} report written to {}", output_path.display());
    Ok(output_path)
}

fn default_output_path(reports_dir: &str, uid: &str, format: ReportFormat) -> PathBuf {
    let dir = if reports_dir.is_empty() { "." } else { reports_dir };
    let stem = uid_file_stem(uid).unwrap_or_else(|| "report".to_string());
    PathBuf::from(dir).join(format!("{stem}.{}", format.extension()))
}
