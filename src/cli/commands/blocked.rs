//! Blocked command handler

use super::load_inputs;
use gradpath::config::Config;
use gradpath::core::prerequisites;
use std::path::Path;

/// List blocked courses, or the courses a single completion would unblock
pub fn run(student_path: &Path, unlocks: Option<&str>, config: &Config) {
    let (catalog, profile) = match load_inputs(config, student_path) {
        Ok(inputs) => inputs,
        Err(msg) => {
            eprintln!("{msg}");
            std::process::exit(1);
        }
    };
    let completed = profile.completion_set(&config.grade_policy());

    if let Some(code) = unlocks {
        let unlocked = prerequisites::unlocked_by(&catalog, &completed, code);
        if unlocked.is_empty() {
            println!("Completing {code} would not unblock any course");
        } else {
            println!("Completing {code} would unblock:");
            for course in unlocked {
                println!("  {course}");
            }
        }
        return;
    }

    let blocked = prerequisites::blocked_courses(&catalog, &completed);
    if blocked.is_empty() {
        println!("✓ No course is blocked by a missing prerequisite");
        return;
    }

    println!("{} blocked course(s):", blocked.len());
    for code in &blocked {
        let missing = prerequisites::unmet_prerequisites(&catalog, &completed, code);
        println!("  {code} needs {}", missing.join(", "));
    }
}
