//! Grade point average

use crate::core::models::{CompletedSubject, StudentProfile};

/// Credit-weighted GPA over subjects that count toward GPA and carry a grade.
///
/// Failing grades count with zero points. Returns `None` when no graded
/// credits exist.
#[must_use]
pub fn calculate_gpa<'a>(subjects: impl IntoIterator<Item = &'a CompletedSubject>) -> Option<f64> {
    let (points, credits) = subjects
        .into_iter()
        .filter(|s| s.is_gpa)
        .filter_map(|s| s.grade.map(|g| (g.points(), s.credits)))
        .fold((0.0, 0u32), |(points, credits), (p, c)| {
            (points + p * f64::from(c), credits.saturating_add(c))
        });

    if credits == 0 {
        None
    } else {
        Some(points / f64::from(credits))
    }
}

/// GPA of every recorded subject of a profile
#[must_use]
pub fn profile_gpa(profile: &StudentProfile) -> Option<f64> {
    calculate_gpa(profile.completed_subjects())
}

/// Two-decimal rendering; `0.00` when there is no GPA
#[must_use]
pub fn format_gpa(gpa: Option<f64>) -> String {
    format!("{:.2}", gpa.unwrap_or(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{Course, CourseCategory, Grade};

    fn subject(code: &str, credits: u32, grade: Option<Grade>) -> CompletedSubject {
        let course = Course::new(code, code, credits, 3, CourseCategory::Compulsory);
        CompletedSubject::from_course(&course, grade)
    }

    #[test]
    fn test_weighted_by_credits() {
        let subjects = [
            subject("A", 3, Some(Grade::A)),
            subject("B", 1, Some(Grade::C)),
        ];
        let gpa = calculate_gpa(&subjects).unwrap();
        assert!((gpa - 3.5).abs() < 1e-9);
        assert_eq!(format_gpa(Some(gpa)), "3.50");
    }

    #[test]
    fn test_skips_ungraded_and_non_gpa() {
        let mut pass_fail = subject("P", 3, Some(Grade::E));
        pass_fail.is_gpa = false;
        let subjects = [
            subject("A", 3, Some(Grade::BPlus)),
            subject("U", 3, None),
            pass_fail,
        ];
        let gpa = calculate_gpa(&subjects).unwrap();
        assert!((gpa - 3.3).abs() < 1e-9);
    }

    #[test]
    fn test_failing_grade_counts_zero() {
        let subjects = [subject("A", 2, Some(Grade::A)), subject("F", 2, Some(Grade::E))];
        assert!((calculate_gpa(&subjects).unwrap() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_nothing_graded() {
        assert_eq!(calculate_gpa(&[subject("U", 3, None)]), None);
        assert_eq!(format_gpa(None), "0.00");
    }
}
