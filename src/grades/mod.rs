pub mod profile;
pub mod subjects;

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

pub use profile::{ProfileInput, StudentProfile, SubjectGrade};
pub use subjects::canonical_subject;

/// KCSE letter grade. Variants are declared best first, so the derived
/// ordering runs from `A` (smallest) to `E`; compare with [`Grade::points`]
/// when "better than" is meant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Grade {
    A,
    AMinus,
    BPlus,
    B,
    BMinus,
    CPlus,
    C,
    CMinus,
    DPlus,
    D,
    DMinus,
    E,
}

impl Grade {
    pub const ALL: [Grade; 12] = [
        Grade::A,
        Grade::AMinus,
        Grade::BPlus,
        Grade::B,
        Grade::BMinus,
        Grade::CPlus,
        Grade::C,
        Grade::CMinus,
        Grade::DPlus,
        Grade::D,
        Grade::DMinus,
        Grade::E,
    ];

    pub const MAX_POINTS: u32 = 12;

    pub fn points(self) -> u32 {
        match self {
            Self::A => 12,
            Self::AMinus => 11,
            Self::BPlus => 10,
            Self::B => 9,
            Self::BMinus => 8,
            Self::CPlus => 7,
            Self::C => 6,
            Self::CMinus => 5,
            Self::DPlus => 4,
            Self::D => 3,
            Self::DMinus => 2,
            Self::E => 1,
        }
    }

    pub fn from_points(points: u32) -> Option<Self> {
        Self::ALL.iter().copied().find(|g| g.points() == points)
    }

    pub fn as_str(self) -> &'static str {
        match self {
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
            Self::DMinus => "D-",
            Self::E => "E",
        }
    }

    pub fn meets(self, minimum: Grade) -> bool {
        self.points() >= minimum.points()
    }
}

impl Display for Grade {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid grade: {0:?}")]
pub struct InvalidGradeError(pub String);

impl FromStr for Grade {
    type Err = InvalidGradeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s
            .trim()
            .to_ascii_uppercase()
            .replace(['\u{2212}', '\u{2013}'], "-")
            .replace(' ', "");
        let grade = match normalized.as_str() {
            "A" => Self::A,
            "A-" => Self::AMinus,
            "B+" => Self::BPlus,
            "B" => Self::B,
            "B-" => Self::BMinus,
            "C+" => Self::CPlus,
            "C" => Self::C,
            "C-" => Self::CMinus,
            "D+" => Self::DPlus,
            "D" => Self::D,
            "D-" => Self::DMinus,
            "E" => Self::E,
            _ => return Err(InvalidGradeError(s.to_string())),
        };
        Ok(grade)
    }
}

impl Serialize for Grade {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Grade {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Grade::from_str(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::{Grade, InvalidGradeError};

    #[test]
    fn point_table_is_strictly_descending_without_gaps() {
        let points: Vec<u32> = Grade::ALL.iter().map(|g| g.points()).collect();
        assert_eq!(points, (1..=12).rev().collect::<Vec<_>>());
        for pair in Grade::ALL.windows(2) {
            assert!(pair[0].points() > pair[1].points());
        }
    }

    #[test]
    fn parses_every_symbol_and_round_trips_display() {
        for grade in Grade::ALL {
            assert_eq!(Grade::from_str(grade.as_str()), Ok(grade));
            assert_eq!(Grade::from_points(grade.points()), Some(grade));
        }
        assert_eq!(Grade::from_str(" b+ "), Ok(Grade::BPlus));
        assert_eq!(Grade::from_str("A\u{2212}"), Ok(Grade::AMinus));
    }

    #[test]
    fn rejects_unknown_symbols() {
        for raw in ["", "F", "A+", "E-", "12", "B++"] {
            assert_eq!(
                Grade::from_str(raw),
                Err(InvalidGradeError(raw.to_string()))
            );
        }
        assert_eq!(Grade::from_points(0), None);
        assert_eq!(Grade::from_points(13), None);
    }

    #[test]
    fn serde_uses_kcse_symbols() {
        let json = serde_json::to_string(&Grade::CMinus).expect("serialize grade");
        assert_eq!(json, "\"C-\"");
        let parsed: Grade = serde_json::from_str("\"D+\"").expect("deserialize grade");
        assert_eq!(parsed, Grade::DPlus);
        assert!(serde_json::from_str::<Grade>("\"Z\"").is_err());
    }

    #[test]
    fn meets_compares_on_points() {
        assert!(Grade::B.meets(Grade::CPlus));
        assert!(Grade::CPlus.meets(Grade::CPlus));
        assert!(!Grade::C.meets(Grade::CPlus));
    }
}
