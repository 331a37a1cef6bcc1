//! Student completion record and cached progress

use super::{Course, CourseCategory, Grade, GradePolicy};
use crate::core::aggregator::AcademicProgress;
use crate::core::eligibility::EligibilitySnapshot;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Status of a recorded subject; only completions are recorded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubjectStatus {
    /// The subject has been completed
    #[default]
    Completed,
}

const fn default_true() -> bool {
    true
}

/// Snapshot of a course's attributes at the time it was completed.
///
/// Later catalog edits do not touch these values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedSubject {
    /// Course code
    pub code: String,
    /// Course name at completion time
    pub name: String,
    /// Credits at completion time
    pub credits: u32,
    /// Level at completion time
    pub level: u8,
    /// Category at completion time
    pub category: CourseCategory,
    /// Recorded grade, if any
    #[serde(default)]
    pub grade: Option<Grade>,
    /// Whether the subject counts toward GPA
    #[serde(default = "default_true")]
    pub is_gpa: bool,
    /// Always `Completed`
    #[serde(default)]
    pub status: SubjectStatus,
}

impl CompletedSubject {
    /// Freeze a catalog course into a completion snapshot
    #[must_use]
    pub fn from_course(course: &Course, grade: Option<Grade>) -> Self {
        Self {
            code: course.code.clone(),
            name: course.name.clone(),
            credits: course.credits,
            level: course.level,
            category: course.category,
            grade,
            is_gpa: course.is_gpa,
            status: SubjectStatus::Completed,
        }
    }
}

/// Set of completed course codes, the authoritative input of every check
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionSet(BTreeSet<String>);

impl CompletionSet {
    /// Empty set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the code has been completed
    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.0.contains(code)
    }

    /// Record a code; returns false if it was already present
    pub fn insert(&mut self, code: &str) -> bool {
        self.0.insert(code.to_string())
    }

    /// Number of distinct completed codes
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing has been completed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Completed codes in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for CompletionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// A student's profile: completion record plus derived caches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentProfile {
    /// Student identifier
    pub uid: String,

    /// Program the student is enrolled in
    #[serde(default)]
    pub enrolled_program_id: String,

    /// Completed subjects, unique by code
    #[serde(default)]
    completed_subjects: Vec<CompletedSubject>,

    /// Derived credit cache, overwritten on every refresh
    #[serde(default)]
    pub academic_progress: Option<AcademicProgress>,

    /// Derived eligibility cache, overwritten on every refresh
    #[serde(default)]
    pub eligibility_snapshot: Option<EligibilitySnapshot>,
}

impl StudentProfile {
    /// Create a profile with an empty completion record
    #[must_use]
    pub fn new(uid: &str, enrolled_program_id: &str) -> Self {
        Self {
            uid: uid.to_string(),
            enrolled_program_id: enrolled_program_id.to_string(),
            completed_subjects: Vec::new(),
            academic_progress: None,
            eligibility_snapshot: None,
        }
    }

    /// Record a completion; an existing entry with the same code is replaced
    pub fn record_completion(&mut self, subject: CompletedSubject) {
        if let Some(existing) = self
            .completed_subjects
            .iter_mut()
            .find(|s| s.code == subject.code)
        {
            *existing = subject;
        } else {
            self.completed_subjects.push(subject);
        }
    }

    /// Builder-style variant of [`record_completion`](Self::record_completion)
    #[must_use]
    pub fn with_completion(mut self, subject: CompletedSubject) -> Self {
        self.record_completion(subject);
        self
    }

    /// Remove a completion by code. Returns true if something was removed
    pub fn remove_completion(&mut self, code: &str) -> bool {
        let before = self.completed_subjects.len();
        self.completed_subjects.retain(|s| s.code != code);
        self.completed_subjects.len() != before
    }

    /// Recorded subjects, unique by code, in recording order
    #[must_use]
    pub fn completed_subjects(&self) -> &[CompletedSubject] {
        &self.completed_subjects
    }

    /// Subjects that count under the policy, one per code (last entry wins)
    #[must_use]
    pub fn counted_subjects(&self, policy: &GradePolicy) -> Vec<&CompletedSubject> {
        let by_code: BTreeMap<&str, &CompletedSubject> = self
            .completed_subjects
            .iter()
            .map(|s| (s.code.as_str(), s))
            .collect();
        by_code
            .into_values()
            .filter(|s| policy.counts(s.grade))
            .collect()
    }

    /// Codes that count as completed under the policy
    #[must_use]
    pub fn completion_set(&self, policy: &GradePolicy) -> CompletionSet {
        self.counted_subjects(policy)
            .into_iter()
            .map(|s| s.code.as_str())
            .collect()
    }

    /// Credits summed over the completion snapshots that count under the policy,
    /// clamped at `u32::MAX`
    #[must_use]
    pub fn earned_credits(&self, policy: &GradePolicy) -> u32 {
        self.counted_subjects(policy)
            .into_iter()
            .fold(0u32, |total, s| total.saturating_add(s.credits))
    }
}
