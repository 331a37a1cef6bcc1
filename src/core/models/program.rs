//! Program (qualification tier) model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a program in the qualification ladder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgramTier {
    /// Lowest tier (e.g., Diploma)
    Entry,
    /// Intermediate tier (e.g., HND); sequenced after the entry tier
    Mid,
    /// Highest tier (e.g., Degree)
    Top,
}

impl fmt::Display for ProgramTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entry => write!(f, "entry"),
            Self::Mid => write!(f, "mid"),
            Self::Top => write!(f, "top"),
        }
    }
}

/// A course that must be completed regardless of credit bookkeeping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MandatoryCourse {
    /// Course code (e.g., "FDE3023")
    pub code: String,

    /// Short label used in reasons (e.g., "EfIL")
    #[serde(default)]
    pub label: Option<String>,
}

impl MandatoryCourse {
    /// Create a mandatory gate with a display label
    #[must_use]
    pub fn new(code: &str, label: &str) -> Self {
        Self {
            code: code.to_string(),
            label: Some(label.to_string()),
        }
    }
}

const fn default_true() -> bool {
    true
}

/// Represents a qualification program (Diploma, HND, Degree)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    /// Unique program identifier (e.g., "diploma")
    pub id: String,

    /// Program name (e.g., "Diploma in Software Engineering")
    pub name: String,

    /// Program code (e.g., "DSE")
    pub code: String,

    /// Level ordinal (3 = Diploma, 4 = HND, 6 = Degree)
    pub level: u8,

    /// Minimum credits required for the award
    pub min_credits: u32,

    /// Explicit tier; inferred from level ordering when absent
    #[serde(default)]
    pub tier: Option<ProgramTier>,

    /// Courses that must be completed for this award
    #[serde(default)]
    pub mandatory_courses: Vec<MandatoryCourse>,

    /// Free-form description
    #[serde(default)]
    pub description: Option<String>,

    /// Whether the program is offered
    #[serde(default = "default_true")]
    pub active: bool,
}

impl Program {
    /// Create a new active program without an explicit tier
    ///
    /// # Arguments
    /// * `id` - Program identifier
    /// * `name` - Program name
    /// * `code` - Program code
    /// * `level` - Level ordinal
    /// * `min_credits` - Credit threshold
    #[must_use]
    pub fn new(id: &str, name: &str, code: &str, level: u8, min_credits: u32) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            code: code.to_string(),
            level,
            min_credits,
            tier: None,
            mandatory_courses: Vec::new(),
            description: None,
            active: true,
        }
    }

    /// Builder-style explicit tier
    #[must_use]
    pub const fn with_tier(mut self, tier: ProgramTier) -> Self {
        self.tier = Some(tier);
        self
    }

    /// Builder-style mandatory course gate
    #[must_use]
    pub fn with_mandatory(mut self, code: &str, label: &str) -> Self {
        self.mandatory_courses.push(MandatoryCourse::new(code, label));
        self
    }
}
