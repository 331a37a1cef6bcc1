//! Check command handler
//!
//! Evaluates eligibility for every program and optionally stores the
//! refreshed caches.

use super::load_inputs;
use chrono::Utc;
use gradpath::config::Config;
use gradpath::core::eligibility::{self, EligibilityResult};
use gradpath::core::store::{JsonFileStore, ProgressStore};
use logger::{error, verbose};
use std::path::Path;

/// Run the check command.
///
/// # Arguments
/// * `student_path` - Student record file
/// * `record` - Persist the caches to the configured store
/// * `json` - Print JSON instead of text
/// * `config` - Effective configuration
pub fn run(student_path: &Path, record: bool, json: bool, config: &Config) {
    let (catalog, mut profile) = match load_inputs(config, student_path) {
        Ok(inputs) => inputs,
        Err(msg) => {
            eprintln!("{msg}");
            std::process::exit(1);
        }
    };
    let policy = config.grade_policy();

    let results = if record {
        let mut store = JsonFileStore::new(&config.paths.store_dir);
        if let Ok(Some(previous)) = store.load(&profile.uid) {
            if let Some(snapshot) = previous.eligibility_snapshot {
                verbose!("Previous check: {}", snapshot.checked_at.to_rfc3339());
            }
        }
        let results = eligibility::evaluate_and_record(&mut profile, &catalog, &policy, &mut store, Utc::now());
        if let Ok(path) = store.path_for(&profile.uid) {
            verbose!("Progress record: {}", path.display());
        }
        results
    } else {
        eligibility::evaluate(&profile, &catalog, &policy)
    };

    if json {
        match serde_json::to_string_pretty(&results) {
            Ok(out) => println!("{out}"),
            Err(e) => {
                error!("Failed to serialize results: {e}");
                eprintln!("✗ Failed to serialize results: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    println!("\n=== Eligibility: {} ===\n", profile.uid);
    if results.is_empty() {
        println!("No active programs in catalog '{}'", catalog.name);
        return;
    }
    for result in &results {
        print_result(result);
    }
}

fn print_result(result: &EligibilityResult) {
    let (mark, status) = if result.is_eligible {
        ("✓", "Eligible")
    } else {
        ("✗", "Not eligible")
    };
    println!(
        "{mark} {} ({}): {status}, {}/{} credits ({}%)",
        result.program_name, result.program_id, result.credits_earned, result.credits_required, result.progress
    );
    for reason in &result.missing_requirements {
        println!("    - {reason}");
    }
}
