//! Progress command handler

use super::load_inputs;
use gradpath::config::Config;
use gradpath::core::{aggregator, gpa};
use std::path::Path;

/// Print the credit breakdown and GPA of a student
pub fn run(student_path: &Path, config: &Config) {
    let (catalog, profile) = match load_inputs(config, student_path) {
        Ok(inputs) => inputs,
        Err(msg) => {
            eprintln!("{msg}");
            std::process::exit(1);
        }
    };

    let completed = profile.completion_set(&config.grade_policy());
    let summary = aggregator::aggregate(&catalog, &completed);

    println!("\n=== Progress: {} ===\n", profile.uid);
    println!(
        "Credits: {} earned / {} required ({} remaining)",
        summary.total_earned, summary.required, summary.deficiency
    );
    println!("GPA:     {}\n", gpa::format_gpa(gpa::profile_gpa(&profile)));

    println!(
        "{:<22} {:>9} {:>9} {:>10} {:>14}",
        "Category", "Completed", "Required", "Remaining", "Subjects (est)"
    );
    for (group, progress) in summary.categories.iter() {
        println!(
            "{:<22} {:>9} {:>9} {:>10} {:>14}",
            group.label(),
            progress.completed,
            progress.required,
            progress.remaining,
            progress.subjects_needed_estimate()
        );
    }
}
