//! Prerequisite graph over a course catalog

use std::collections::{BTreeMap, BTreeSet};

/// Directed graph of course prerequisites
///
/// Two association lists keep both directions cheap to walk:
/// - `prerequisites`: course -> codes it requires
/// - `dependents`: code -> courses that require it
///
/// Codes referenced as prerequisites but missing from the catalog are kept
/// as nodes so that they can be reported, but they are never `known`.
#[derive(Debug, Clone, Default)]
pub struct PrerequisiteGraph {
    /// Maps course code -> prerequisite codes
    pub prerequisites: BTreeMap<String, Vec<String>>,

    /// Maps course code -> codes of courses that require it
    pub dependents: BTreeMap<String, Vec<String>>,

    known: BTreeSet<String>,
}

impl PrerequisiteGraph {
    /// Create an empty graph
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a catalog course
    pub fn add_course(&mut self, code: &str) {
        self.known.insert(code.to_string());
        self.add_node(code);
    }

    fn add_node(&mut self, code: &str) {
        self.prerequisites.entry(code.to_string()).or_default();
        self.dependents.entry(code.to_string()).or_default();
    }

    /// Add a prerequisite relationship
    ///
    /// # Arguments
    /// * `code` - Course that requires the prerequisite
    /// * `prerequisite` - Course that must be completed first
    pub fn add_prerequisite(&mut self, code: &str, prerequisite: &str) {
        self.add_node(code);
        self.add_node(prerequisite);

        if let Some(prereqs) = self.prerequisites.get_mut(code) {
            if !prereqs.iter().any(|p| p == prerequisite) {
                prereqs.push(prerequisite.to_string());
            }
        }

        if let Some(deps) = self.dependents.get_mut(prerequisite) {
            if !deps.iter().any(|d| d == code) {
                deps.push(code.to_string());
            }
        }
    }

    /// Prerequisites declared for a course (empty if none or unknown)
    #[must_use]
    pub fn prerequisites_of(&self, code: &str) -> &[String] {
        self.prerequisites.get(code).map_or(&[], Vec::as_slice)
    }

    /// Courses that list `code` as a prerequisite
    #[must_use]
    pub fn dependents_of(&self, code: &str) -> &[String] {
        self.dependents.get(code).map_or(&[], Vec::as_slice)
    }

    /// Whether the code belongs to a catalog course
    #[must_use]
    pub fn is_known(&self, code: &str) -> bool {
        self.known.contains(code)
    }

    /// Prerequisite codes that do not resolve to a catalog course
    #[must_use]
    pub fn dangling(&self) -> Vec<(&str, &str)> {
        self.prerequisites
            .iter()
            .flat_map(|(code, prereqs)| prereqs.iter().map(move |p| (code.as_str(), p.as_str())))
            .filter(|(_, p)| !self.is_known(p))
            .collect()
    }

    /// Number of catalog courses in the graph
    #[must_use]
    pub fn course_count(&self) -> usize {
        self.known.len()
    }
}

impl std::fmt::Display for PrerequisiteGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Prerequisite graph ({} courses):", self.course_count())?;
        writeln!(f)?;

        for code in &self.known {
            let prereqs = self.prerequisites_of(code);
            if prereqs.is_empty() {
                writeln!(f, "  {code} → (no prerequisites)")?;
            } else {
                writeln!(f, "  {code} → {}", prereqs.join(", "))?;
            }
        }

        Ok(())
    }
}
