//! CLI command handlers for `gradpath`.
//!
//! Each command is implemented in its own submodule. Handlers print `✓`/`✗`
//! lines for the user and log the details.

pub mod blocked;
pub mod check;
pub mod config;
pub mod progress;
pub mod report;

use gradpath::config::Config;
use gradpath::core::loader;
use gradpath::core::models::{Catalog, StudentProfile};
use logger::{error, info};
use std::path::Path;

/// Load the configured catalog and a student record resolved against it
///
/// # Errors
/// Returns a user-facing message if either file cannot be loaded
pub fn load_inputs(config: &Config, student_path: &Path) -> Result<(Catalog, StudentProfile), String> {
    if config.paths.catalog.is_empty() {
        return Err("✗ No catalog configured; pass --catalog or run `gradpath config set catalog <PATH>`".to_string());
    }

    let catalog = loader::load_catalog(&config.paths.catalog).map_err(|e| {
        error!("Failed to load catalog {}: {e}", config.paths.catalog);
        format!("✗ Failed to load catalog: {e}")
    })?;
    info!("Catalog loaded: {}", config.paths.catalog);

    let profile = loader::load_student(student_path, &catalog).map_err(|e| {
        error!("Failed to load student {}: {e}", student_path.display());
        format!("✗ Failed to load student record: {e}")
    })?;
    info!("Student record loaded: {}", student_path.display());

    Ok((catalog, profile))
}
