//! End-to-end eligibility scenarios and evaluator properties

use chrono::{TimeZone, Utc};
use gradpath::core::aggregator::{self, AcademicProgress};
use gradpath::core::eligibility::{self, EligibilityResult, EligibilitySnapshot};
use gradpath::core::models::{
    Catalog, CompletedSubject, CompletionSet, Course, CourseCategory, GradePolicy, Program, ProgramTier,
    StudentProfile,
};
use gradpath::core::prerequisites::blocked_courses;
use gradpath::core::store::{MemoryStore, ProgressStore, StoreError, StoredRecord};

fn student_with(catalog: &Catalog, codes: &[&str]) -> StudentProfile {
    let mut profile = StudentProfile::new("s1", "diploma");
    for code in codes {
        let course = catalog.course(code).expect("course in catalog");
        profile.record_completion(CompletedSubject::from_course(course, None));
    }
    profile
}

fn single_course_catalog() -> Catalog {
    let mut catalog = Catalog::new("Scenario");
    catalog.add_program(Program::new("diploma", "Diploma", "DSE", 3, 3));
    catalog.add_course(Course::new("X101", "Intro", 3, 3, CourseCategory::Compulsory).with_program("diploma"));
    catalog
}

/// Degree needing 125 credits and two gates, with 130 credits of other courses
fn degree_catalog() -> Catalog {
    let mut catalog = Catalog::new("Scenario");
    catalog.add_program(
        Program::new("degree", "Degree", "BSE", 6, 125)
            .with_tier(ProgramTier::Top)
            .with_mandatory("M1", "Gate one")
            .with_mandatory("M2", "Gate two"),
    );
    for i in 0..26 {
        catalog.add_course(Course::new(&format!("EEI{:04}", 5000 + i), "Course", 5, 5, CourseCategory::Elective));
    }
    catalog.add_course(Course::new("M1", "Gate one", 0, 3, CourseCategory::Mandatory));
    catalog.add_course(Course::new("M2", "Gate two", 0, 3, CourseCategory::Mandatory));
    catalog
}

fn evaluate(profile: &StudentProfile, catalog: &Catalog) -> Vec<EligibilityResult> {
    eligibility::evaluate(profile, catalog, &GradePolicy::default())
}

#[test]
fn scenario_nothing_completed() {
    let catalog = single_course_catalog();
    let results = evaluate(&student_with(&catalog, &[]), &catalog);

    assert_eq!(results.len(), 1);
    let diploma = &results[0];
    assert!(!diploma.is_eligible);
    assert_eq!(diploma.progress, 0);
    assert!(diploma
        .missing_requirements
        .contains(&"Credit Gap: Need 3 more credits".to_string()));
    assert!(diploma
        .missing_requirements
        .contains(&"Missing Compulsory: X101".to_string()));
}

#[test]
fn scenario_compulsory_completed() {
    let catalog = single_course_catalog();
    let results = evaluate(&student_with(&catalog, &["X101"]), &catalog);

    let diploma = &results[0];
    assert!(diploma.is_eligible);
    assert!(diploma.missing_requirements.is_empty());
    assert_eq!(diploma.progress, 100);
    assert_eq!(diploma.credits_earned, 3);
}

#[test]
fn scenario_missing_one_mandatory_gate() {
    let catalog = degree_catalog();
    let mut codes: Vec<String> = (0..26).map(|i| format!("EEI{:04}", 5000 + i)).collect();
    codes.push("M2".to_string());
    let codes: Vec<&str> = codes.iter().map(String::as_str).collect();
    let profile = student_with(&catalog, &codes);

    let results = evaluate(&profile, &catalog);
    let degree = &results[0];
    assert_eq!(degree.credits_earned, 130);
    assert!(!degree.is_eligible);
    assert_eq!(degree.missing_requirements, vec!["Missing Mandatory: Gate one (M1)".to_string()]);
    assert_eq!(degree.progress, 100);
}

#[test]
fn scenario_prerequisite_blocks_until_completed() {
    let mut catalog = Catalog::new("Scenario");
    catalog.add_course(Course::new("Y", "Follow-up", 3, 4, CourseCategory::Elective).with_prerequisite("X101"));

    let empty = CompletionSet::new();
    assert!(blocked_courses(&catalog, &empty).contains(&"Y".to_string()));

    let done: CompletionSet = ["X101"].into_iter().collect();
    assert!(!blocked_courses(&catalog, &done).contains(&"Y".to_string()));
}

#[test]
fn scenario_empty_program_catalog() {
    let mut catalog = single_course_catalog();
    catalog.programs.clear();
    assert!(evaluate(&student_with(&catalog, &["X101"]), &catalog).is_empty());

    let empty = Catalog::new("Empty");
    assert!(evaluate(&StudentProfile::new("s1", ""), &empty).is_empty());
}

#[test]
fn evaluation_is_idempotent() {
    let catalog = degree_catalog();
    let profile = student_with(&catalog, &["EEI5000", "M1"]);

    assert_eq!(evaluate(&profile, &catalog), evaluate(&profile, &catalog));
}

#[test]
fn adding_a_completion_never_revokes_eligibility() {
    let mut catalog = Catalog::new("Ladder");
    catalog.add_program(Program::new("diploma", "Diploma", "DSE", 3, 6));
    catalog.add_program(Program::new("hnd", "HND", "HND", 4, 9));
    catalog.add_program(Program::new("degree", "Degree", "BSE", 6, 12).with_mandatory("M1", "Gate"));
    catalog.add_course(Course::new("A3", "A", 3, 3, CourseCategory::Compulsory).with_program("diploma"));
    catalog.add_course(Course::new("B3", "B", 3, 3, CourseCategory::Elective));
    catalog.add_course(Course::new("C4", "C", 3, 4, CourseCategory::Compulsory).with_program("HND"));
    catalog.add_course(Course::new("D5", "D", 3, 5, CourseCategory::Elective));
    catalog.add_course(Course::new("M1", "Gate", 0, 3, CourseCategory::Mandatory));

    let order = ["B3", "D5", "C4", "A3", "M1"];
    let mut profile = StudentProfile::new("s1", "degree");
    let mut previous = evaluate(&profile, &catalog);

    for code in order {
        let course = catalog.course(code).unwrap();
        profile.record_completion(CompletedSubject::from_course(course, None));
        let current = evaluate(&profile, &catalog);

        for (before, after) in previous.iter().zip(&current) {
            assert_eq!(before.program_id, after.program_id);
            assert!(!before.is_eligible || after.is_eligible, "{} revoked by {code}", after.program_id);
            assert!(after.missing_requirements.len() <= before.missing_requirements.len());
        }
        previous = current;
    }

    assert!(previous.iter().all(|r| r.is_eligible));
}

#[test]
fn duplicate_completion_is_counted_once() {
    let catalog = single_course_catalog();
    let course = catalog.course("X101").unwrap();
    let profile = StudentProfile::new("s1", "diploma")
        .with_completion(CompletedSubject::from_course(course, None))
        .with_completion(CompletedSubject::from_course(course, None));

    assert_eq!(evaluate(&profile, &catalog)[0].credits_earned, 3);

    let completed: CompletionSet = ["X101", "X101"].into_iter().collect();
    assert_eq!(aggregator::aggregate(&catalog, &completed).total_earned, 3);
}

#[test]
fn record_overwrites_caches_and_store() {
    let catalog = single_course_catalog();
    let mut profile = student_with(&catalog, &[]);
    let mut store = MemoryStore::new();

    let first = Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap();
    eligibility::evaluate_and_record(&mut profile, &catalog, &GradePolicy::default(), &mut store, first);
    assert!(!profile.eligibility_snapshot.as_ref().unwrap().verdicts["diploma"].eligible);

    let course = catalog.course("X101").unwrap();
    profile.record_completion(CompletedSubject::from_course(course, None));
    let second = Utc.with_ymd_and_hms(2026, 2, 5, 9, 0, 0).unwrap();
    let results = eligibility::evaluate_and_record(&mut profile, &catalog, &GradePolicy::default(), &mut store, second);

    assert!(results[0].is_eligible);
    let snapshot = profile.eligibility_snapshot.as_ref().unwrap();
    assert_eq!(snapshot.checked_at, second);
    assert_eq!(snapshot.verdicts.len(), 1);
    assert!(snapshot.verdicts["diploma"].eligible);
    assert_eq!(profile.academic_progress.as_ref().unwrap().earned_credits, 3);

    let stored = store.load("s1").unwrap().unwrap();
    assert_eq!(stored.eligibility_snapshot.as_ref(), Some(snapshot));
    assert_eq!(store.writes, 4);
}

/// Store whose every write fails
struct BrokenStore;

impl ProgressStore for BrokenStore {
    fn save_progress(&mut self, uid: &str, _: &AcademicProgress) -> Result<(), StoreError> {
        Err(StoreError::InvalidUid(uid.to_string()))
    }

    fn save_snapshot(&mut self, uid: &str, _: &EligibilitySnapshot) -> Result<(), StoreError> {
        Err(StoreError::InvalidUid(uid.to_string()))
    }

    fn load(&self, _: &str) -> Result<Option<StoredRecord>, StoreError> {
        Ok(None)
    }
}

#[test]
fn store_failure_does_not_change_results() {
    let catalog = single_course_catalog();
    let mut profile = student_with(&catalog, &["X101"]);
    let expected = evaluate(&profile, &catalog);

    let results = eligibility::evaluate_and_record(
        &mut profile,
        &catalog,
        &GradePolicy::default(),
        &mut BrokenStore,
        Utc::now(),
    );

    assert_eq!(results, expected);
    assert!(profile.eligibility_snapshot.is_some());
}

#[test]
fn oversized_credit_snapshots_clamp_instead_of_overflowing() {
    let catalog = single_course_catalog();
    let huge = Course::new("ZZZ9001", "Transfer", u32::MAX, 3, CourseCategory::Elective);
    let profile = StudentProfile::new("s1", "diploma")
        .with_completion(CompletedSubject::from_course(&huge, None))
        .with_completion(CompletedSubject::from_course(
            &Course::new("ZZZ9002", "Transfer", u32::MAX, 3, CourseCategory::Elective),
            None,
        ));

    let diploma = &evaluate(&profile, &catalog)[0];
    assert_eq!(diploma.credits_earned, u32::MAX);
    assert_eq!(diploma.progress, 100);
    assert_eq!(diploma.missing_requirements, vec!["Missing Compulsory: X101".to_string()]);
}
