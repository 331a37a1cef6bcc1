//! Eligibility evaluation
//!
//! Maps a student's completion record and the catalogs to one verdict per
//! active program. Every rule can only take eligibility away; a failed rule
//! appends a human-readable reason. The evaluation itself never fails:
//! anomalies in the inputs degrade to the conservative answer.

use crate::core::aggregator::{self, AcademicProgress};
use crate::core::models::{Catalog, CompletionSet, GradePolicy, Program, ProgramTier, StudentProfile};
use crate::core::store::ProgressStore;
use chrono::{DateTime, Utc};
use logger::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// A requirement the student has not met yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    /// Total credits below the program threshold
    CreditGap {
        /// Credits still needed
        needed: u32,
    },
    /// A compulsory course of the program is not completed
    MissingCompulsory {
        /// Course code
        code: String,
    },
    /// The entry tier's threshold is not met by entry-level credits
    LevelPending {
        /// Level of the entry program
        level: u8,
        /// Entry program threshold
        credits: u32,
    },
    /// A mandatory gate course is not completed
    MissingMandatory {
        /// Course code
        code: String,
        /// Display label
        label: Option<String>,
    },
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreditGap { needed } => write!(f, "Credit Gap: Need {needed} more credits"),
            Self::MissingCompulsory { code } => write!(f, "Missing Compulsory: {code}"),
            Self::LevelPending { level, credits } => {
                write!(f, "Level Pending: Must complete Level {level} ({credits} credits)")
            }
            Self::MissingMandatory { code, label: Some(label) } => {
                write!(f, "Missing Mandatory: {label} ({code})")
            }
            Self::MissingMandatory { code, label: None } => write!(f, "Missing Mandatory: {code}"),
        }
    }
}

/// Verdict for one program
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityResult {
    /// Program identifier
    pub program_id: String,
    /// Program name
    pub program_name: String,
    /// Whether every rule passed
    pub is_eligible: bool,
    /// Reasons, in rule order
    pub missing_requirements: Vec<String>,
    /// `round(100 * earned / required)`, capped at 100
    pub progress: u8,
    /// Whether no compulsory course is missing
    pub has_compulsory: bool,
    /// Credits earned
    pub credits_earned: u32,
    /// Program threshold
    pub credits_required: u32,
}

/// Cached verdict for one program
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramVerdict {
    /// Whether the student was eligible
    pub eligible: bool,
    /// Reasons given
    pub reasons: Vec<String>,
}

/// Last computed verdicts, keyed by program id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilitySnapshot {
    /// When the verdicts were computed
    pub checked_at: DateTime<Utc>,
    /// Verdict per program id
    pub verdicts: BTreeMap<String, ProgramVerdict>,
}

/// Progress percentage with round-half-up, capped at 100. A zero threshold yields 0.
#[must_use]
pub fn progress_percent(earned: u32, required: u32) -> u8 {
    if required == 0 {
        return 0;
    }
    let (earned, required) = (u64::from(earned), u64::from(required));
    let pct = (200 * earned + required) / (2 * required);
    u8::try_from(pct.min(100)).unwrap_or(100)
}

/// Inputs shared by every program's evaluation
struct Standing {
    completed: CompletionSet,
    earned: u32,
    entry: Option<(u8, u32, u32)>,
}

impl Standing {
    fn new(profile: &StudentProfile, catalog: &Catalog, policy: &GradePolicy) -> Self {
        let completed = profile.completion_set(policy);
        let earned = profile.earned_credits(policy);

        // (entry level, entry threshold, credits earned at that level)
        let entry = catalog.entry_program().map(|entry| {
            let mut counted = HashSet::new();
            let level_credits = catalog
                .active_courses()
                .filter(|c| c.level == entry.level && completed.contains(&c.code))
                .filter(|c| counted.insert(c.code.as_str()))
                .fold(0u32, |total, c| total.saturating_add(c.credits));
            (entry.level, entry.min_credits, level_credits)
        });

        Self {
            completed,
            earned,
            entry,
        }
    }
}

fn missing_compulsory(catalog: &Catalog, program: &Program, completed: &CompletionSet) -> Vec<Requirement> {
    let mut seen = HashSet::new();
    catalog
        .compulsory_courses(program)
        .filter(|c| !completed.contains(&c.code))
        .filter(|c| seen.insert(c.code.as_str()))
        .map(|c| Requirement::MissingCompulsory {
            code: c.code.clone(),
        })
        .collect()
}

/// Unmet requirements of one program, in rule order
fn unmet_requirements(catalog: &Catalog, program: &Program, standing: &Standing) -> Vec<Requirement> {
    let mut unmet = Vec::new();

    if standing.earned < program.min_credits {
        unmet.push(Requirement::CreditGap {
            needed: program.min_credits - standing.earned,
        });
    }

    match catalog.tier_of(program) {
        ProgramTier::Entry => {
            unmet.extend(missing_compulsory(catalog, program, &standing.completed));
        }
        ProgramTier::Mid => {
            if let Some((level, credits, level_credits)) = standing.entry {
                if level_credits < credits {
                    unmet.push(Requirement::LevelPending { level, credits });
                }
            }
            unmet.extend(missing_compulsory(catalog, program, &standing.completed));
        }
        ProgramTier::Top => {}
    }

    for gate in &program.mandatory_courses {
        if !standing.completed.contains(&gate.code) {
            unmet.push(Requirement::MissingMandatory {
                code: gate.code.clone(),
                label: gate.label.clone(),
            });
        }
    }

    unmet
}

/// Evaluate eligibility for every active program with a non-zero threshold.
///
/// Results follow catalog order. Earned credits come from the completion
/// snapshots on the profile, filtered by the grade policy.
#[must_use]
pub fn evaluate(profile: &StudentProfile, catalog: &Catalog, policy: &GradePolicy) -> Vec<EligibilityResult> {
    let standing = Standing::new(profile, catalog, policy);
    let mut results = Vec::new();

    for program in catalog.active_programs() {
        if program.min_credits == 0 {
            debug!("Skipping program '{}' with a zero credit threshold", program.id);
            continue;
        }

        let unmet = unmet_requirements(catalog, program, &standing);
        let has_compulsory = !unmet
            .iter()
            .any(|r| matches!(r, Requirement::MissingCompulsory { .. }));

        results.push(EligibilityResult {
            program_id: program.id.clone(),
            program_name: program.name.clone(),
            is_eligible: unmet.is_empty(),
            missing_requirements: unmet.iter().map(ToString::to_string).collect(),
            progress: progress_percent(standing.earned, program.min_credits),
            has_compulsory,
            credits_earned: standing.earned,
            credits_required: program.min_credits,
        });
    }

    debug!(
        "Evaluated {} programs for '{}' ({} credits earned)",
        results.len(),
        profile.uid,
        standing.earned
    );

    results
}

/// Build the cached snapshot of a set of results
#[must_use]
pub fn snapshot(results: &[EligibilityResult], now: DateTime<Utc>) -> EligibilitySnapshot {
    EligibilitySnapshot {
        checked_at: now,
        verdicts: results
            .iter()
            .map(|r| {
                (
                    r.program_id.clone(),
                    ProgramVerdict {
                        eligible: r.is_eligible,
                        reasons: r.missing_requirements.clone(),
                    },
                )
            })
            .collect(),
    }
}

/// Recompute the credit cache for a profile
#[must_use]
pub fn progress_for(profile: &StudentProfile, catalog: &Catalog, policy: &GradePolicy, now: DateTime<Utc>) -> AcademicProgress {
    let summary = aggregator::aggregate(catalog, &profile.completion_set(policy));
    aggregator::academic_progress(&summary, now)
}

/// Evaluate, overwrite the profile's caches and hand them to the store.
///
/// Store failures are logged and otherwise ignored: the returned results
/// are the same whether or not persistence succeeded.
pub fn evaluate_and_record(
    profile: &mut StudentProfile,
    catalog: &Catalog,
    policy: &GradePolicy,
    store: &mut dyn ProgressStore,
    now: DateTime<Utc>,
) -> Vec<EligibilityResult> {
    let results = evaluate(profile, catalog, policy);
    let progress = progress_for(profile, catalog, policy, now);
    let snapshot = snapshot(&results, now);

    if let Err(e) = store.save_progress(&profile.uid, &progress) {
        warn!("Failed to store academic progress for '{}': {e}", profile.uid);
    }
    if let Err(e) = store.save_snapshot(&profile.uid, &snapshot) {
        warn!("Failed to store eligibility snapshot for '{}': {e}", profile.uid);
    }

    profile.academic_progress = Some(progress);
    profile.eligibility_snapshot = Some(snapshot);

    results
}
