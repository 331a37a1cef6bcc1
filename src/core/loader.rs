//! Loading catalogs and student records from TOML files
//!
//! Catalog files hold `[[programs]]` and `[[courses]]` tables. Student files
//! hold a `uid`, the enrolled `program` and `[[completed]]` entries that only
//! need a course code; everything else is filled from the catalog.

use crate::core::models::{Catalog, CompletedSubject, CourseCategory, Grade, StudentProfile, SubjectStatus};
use logger::{debug, warn};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while reading input files
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The contents are not valid TOML for the expected shape
    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    /// The student record has no identifier
    #[error("Student record is missing a uid")]
    MissingUid,
}

fn read(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse a catalog from TOML text. Data-quality problems are logged as
/// warnings and never fail the parse.
///
/// # Errors
/// Returns an error if the text is not a valid catalog document
pub fn parse_catalog(contents: &str) -> Result<Catalog, LoadError> {
    let catalog: Catalog = toml::from_str(contents)?;
    for warning in catalog.validate() {
        warn!("Catalog '{}': {warning}", catalog.name);
    }
    debug!(
        "Parsed catalog '{}' ({} programs, {} courses)",
        catalog.name,
        catalog.programs.len(),
        catalog.courses.len()
    );
    Ok(catalog)
}

/// Read and parse a catalog file
///
/// # Errors
/// Returns an error if the file cannot be read or parsed
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Catalog, LoadError> {
    parse_catalog(&read(path.as_ref())?)
}

#[derive(Debug, Deserialize)]
struct StudentFile {
    #[serde(default)]
    uid: String,
    #[serde(default, alias = "enrolled_program_id")]
    program: String,
    #[serde(default)]
    completed: Vec<CompletedEntry>,
}

/// One `[[completed]]` entry; explicit fields override the catalog
#[derive(Debug, Deserialize)]
struct CompletedEntry {
    code: String,
    #[serde(default)]
    grade: Option<Grade>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    credits: Option<u32>,
    #[serde(default)]
    level: Option<u8>,
    #[serde(default)]
    category: Option<CourseCategory>,
    #[serde(default)]
    is_gpa: Option<bool>,
}

impl CompletedEntry {
    fn into_subject(self, catalog: &Catalog) -> CompletedSubject {
        let mut subject = if let Some(course) = catalog.course(&self.code) {
            CompletedSubject::from_course(course, self.grade)
        } else {
            warn!("Completed course '{}' is not in the catalog", self.code);
            CompletedSubject {
                code: self.code.clone(),
                name: self.code.clone(),
                credits: 0,
                level: 0,
                category: CourseCategory::Elective,
                grade: self.grade,
                is_gpa: true,
                status: SubjectStatus::Completed,
            }
        };

        if let Some(name) = self.name {
            subject.name = name;
        }
        if let Some(credits) = self.credits {
            subject.credits = credits;
        }
        if let Some(level) = self.level {
            subject.level = level;
        }
        if let Some(category) = self.category {
            subject.category = category;
        }
        if let Some(is_gpa) = self.is_gpa {
            subject.is_gpa = is_gpa;
        }
        subject
    }
}

/// Parse a student record from TOML text, resolving codes against the catalog.
///
/// A code listed twice is merged; the later entry wins.
///
/// # Errors
/// Returns an error if the text is not valid TOML or the uid is missing
pub fn parse_student(contents: &str, catalog: &Catalog) -> Result<StudentProfile, LoadError> {
    let file: StudentFile = toml::from_str(contents)?;
    if file.uid.trim().is_empty() {
        return Err(LoadError::MissingUid);
    }

    if !file.program.is_empty() && catalog.program(&file.program).is_none() {
        warn!("Student '{}' is enrolled in unknown program '{}'", file.uid, file.program);
    }

    let mut profile = StudentProfile::new(&file.uid, &file.program);
    for entry in file.completed {
        let subject = entry.into_subject(catalog);
        if profile.completed_subjects().iter().any(|s| s.code == subject.code) {
            warn!("Course '{}' listed twice for '{}'; keeping the later entry", subject.code, file.uid);
        }
        profile.record_completion(subject);
    }

    debug!(
        "Loaded student '{}' with {} completed subjects",
        profile.uid,
        profile.completed_subjects().len()
    );
    Ok(profile)
}

/// Read and parse a student file
///
/// # Errors
/// Returns an error if the file cannot be read or parsed
pub fn load_student<P: AsRef<Path>>(path: P, catalog: &Catalog) -> Result<StudentProfile, LoadError> {
    parse_student(&read(path.as_ref())?, catalog)
}
