//! Prerequisite gatekeeper
//!
//! Advisory only: reports which courses a student cannot take yet. Nothing
//! else in the crate consults these answers.

use crate::core::models::{Catalog, CompletionSet, PrerequisiteGraph};
use std::collections::BTreeSet;

fn unmet<'a>(graph: &'a PrerequisiteGraph, completed: &CompletionSet, code: &str) -> Vec<&'a str> {
    graph
        .prerequisites_of(code)
        .iter()
        .map(String::as_str)
        .filter(|p| !completed.contains(p))
        .collect()
}

/// Codes of active courses that are not completed and have at least one
/// prerequisite missing from the completion record, sorted.
///
/// A prerequisite that resolves to no catalog course can only be satisfied
/// by appearing in the completion record.
#[must_use]
pub fn blocked_courses(catalog: &Catalog, completed: &CompletionSet) -> Vec<String> {
    let graph = catalog.build_graph();
    let blocked: BTreeSet<&str> = catalog
        .active_courses()
        .filter(|c| !completed.contains(&c.code))
        .filter(|c| !unmet(&graph, completed, &c.code).is_empty())
        .map(|c| c.code.as_str())
        .collect();

    blocked.into_iter().map(str::to_string).collect()
}

/// Prerequisites of `code` that are not completed, in declaration order.
/// Empty for unknown codes and for courses without prerequisites.
#[must_use]
pub fn unmet_prerequisites(catalog: &Catalog, completed: &CompletionSet, code: &str) -> Vec<String> {
    let graph = catalog.build_graph();
    unmet(&graph, completed, code)
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Blocked courses that would become unblocked if `code` were completed, sorted
#[must_use]
pub fn unlocked_by(catalog: &Catalog, completed: &CompletionSet, code: &str) -> Vec<String> {
    if completed.contains(code) {
        return Vec::new();
    }

    let graph = catalog.build_graph();
    let mut with_code = completed.clone();
    with_code.insert(code);

    let unlocked: BTreeSet<&str> = graph
        .dependents_of(code)
        .iter()
        .map(String::as_str)
        .filter(|d| graph.is_known(d) && !completed.contains(d))
        .filter(|d| unmet(&graph, &with_code, d).is_empty())
        .collect();

    unlocked.into_iter().map(str::to_string).collect()
}
