//! Core library: data model, credit aggregation, eligibility evaluation,
//! the prerequisite gatekeeper and their supporting layers

pub mod aggregator;
pub mod config;
pub mod eligibility;
pub mod gpa;
pub mod loader;
pub mod models;
pub mod prerequisites;
pub mod report;
pub mod store;

/// Returns the current version of the `gradpath` crate
#[must_use]
pub const fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
