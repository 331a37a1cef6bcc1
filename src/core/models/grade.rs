//! Letter grades and the pass policy applied to them

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Letter grade on the university's plus/minus scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Grade {
    /// A+
    APlus,
    /// A
    A,
    /// A-
    AMinus,
    /// B+
    BPlus,
    /// B
    B,
    /// B-
    BMinus,
    /// C+
    CPlus,
    /// C
    C,
    /// C-
    CMinus,
    /// D+
    DPlus,
    /// D
    D,
    /// E (fail); "F" is accepted as an alias
    E,
}

impl Grade {
    /// Grade points on the 4.0 scale
    #[must_use]
    pub const fn points(self) -> f64 {
        match self {
            Self::APlus | Self::A => 4.0,
            Self::AMinus => 3.7,
            Self::BPlus => 3.3,
            Self::B => 3.0,
            Self::BMinus => 2.7,
            Self::CPlus => 2.3,
            Self::C => 2.0,
            Self::CMinus => 1.7,
            Self::DPlus => 1.3,
            Self::D => 1.0,
            Self::E => 0.0,
        }
    }

    /// Whether this is one of the D band grades
    #[must_use]
    pub const fn is_d_band(self) -> bool {
        matches!(self, Self::DPlus | Self::D)
    }

    /// Display form (e.g., "B+")
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::APlus => "A+",
            Self::A => "A",
            Self::AMinus => "A-",
            Self::BPlus => "B+",
            Self::B => "B",
            Self::BMinus => "B-",
            Self::CPlus => "C+",
            Self::C => "C",
            Self::CMinus => "C-",
            Self::DPlus => "D+",
            Self::D => "D",
            Self::E => "E",
        }
    }
}

impl FromStr for Grade {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A+" => Ok(Self::APlus),
            "A" => Ok(Self::A),
            "A-" => Ok(Self::AMinus),
            "B+" => Ok(Self::BPlus),
            "B" => Ok(Self::B),
            "B-" => Ok(Self::BMinus),
            "C+" => Ok(Self::CPlus),
            "C" => Ok(Self::C),
            "C-" => Ok(Self::CMinus),
            "D+" => Ok(Self::DPlus),
            "D" => Ok(Self::D),
            "E" | "F" => Ok(Self::E),
            _ => Err(format!("Unknown grade: '{s}'")),
        }
    }
}

impl TryFrom<String> for Grade {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Grade> for String {
    fn from(grade: Grade) -> Self {
        grade.as_str().to_string()
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decides which recorded grades count as a credit-bearing completion.
///
/// Ungraded completions always count. E never counts, C- and above
/// always count; the D band is configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradePolicy {
    /// Whether D+ and D are passes
    pub d_grades_pass: bool,
}

impl Default for GradePolicy {
    fn default() -> Self {
        Self {
            d_grades_pass: true,
        }
    }
}

impl GradePolicy {
    /// Policy that only accepts C- and above
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            d_grades_pass: false,
        }
    }

    /// Whether a completion with this grade (or no grade) counts
    #[must_use]
    pub const fn counts(&self, grade: Option<Grade>) -> bool {
        match grade {
            None => true,
            Some(Grade::E) => false,
            Some(g) if g.is_d_band() => self.d_grades_pass,
            Some(_) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_f_alias() {
        assert_eq!("F".parse::<Grade>(), Ok(Grade::E));
        assert_eq!("b+".parse::<Grade>(), Ok(Grade::BPlus));
        assert!("Z".parse::<Grade>().is_err());
    }

    #[test]
    fn test_points_scale() {
        assert!((Grade::APlus.points() - 4.0).abs() < f64::EPSILON);
        assert!((Grade::CMinus.points() - 1.7).abs() < f64::EPSILON);
        assert!(Grade::E.points().abs() < f64::EPSILON);
    }

    #[test]
    fn test_policy_d_band() {
        let lenient = GradePolicy::default();
        let strict = GradePolicy::strict();

        assert!(lenient.counts(Some(Grade::D)));
        assert!(!strict.counts(Some(Grade::D)));
        assert!(!strict.counts(Some(Grade::DPlus)));
        assert!(strict.counts(Some(Grade::CMinus)));
        assert!(!lenient.counts(Some(Grade::E)));
        assert!(strict.counts(None));
    }

    #[test]
    fn test_serde_uses_display_form() {
        #[derive(Serialize, Deserialize)]
        struct Wrapper {
            grade: Grade,
        }
        let parsed: Wrapper = toml::from_str("grade = \"A-\"").unwrap();
        assert_eq!(parsed.grade, Grade::AMinus);
        let out = toml::to_string(&parsed).unwrap();
        assert!(out.contains("\"A-\""));
    }
}
