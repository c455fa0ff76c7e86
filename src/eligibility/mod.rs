pub mod evaluator;
pub mod matcher;

use serde::{Deserialize, Serialize};

use crate::catalog::{CourseCategory, CourseRequirement, MalformedCourseRecord};
use crate::grades::Grade;

pub use evaluator::{evaluate_course, group_satisfied};
pub use matcher::{evaluate_catalog, match_courses};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchFilters {
    #[serde(default)]
    pub counties: Vec<String>,
    #[serde(default)]
    pub institution_types: Vec<String>,
}

impl MatchFilters {
    pub fn new(counties: Vec<String>, institution_types: Vec<String>) -> Self {
        Self {
            counties: clean(counties),
            institution_types: clean(institution_types),
        }
    }

    pub fn allows_county(&self, county: Option<&str>) -> bool {
        allows(&self.counties, county)
    }

    pub fn allows_institution_type(&self, institution_type: Option<&str>) -> bool {
        allows(&self.institution_types, institution_type)
    }
}

fn clean(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

fn allows(filter: &[String], value: Option<&str>) -> bool {
    if filter.is_empty() {
        return true;
    }
    let Some(value) = value else {
        return false;
    };
    let value = value.trim();
    filter.iter().any(|f| f.eq_ignore_ascii_case(value))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rejection {
    MeanGrade {
        required: Grade,
        actual: Grade,
    },
    Subject {
        subjects: Vec<String>,
        min_grade: Grade,
        best: Option<Grade>,
    },
    County {
        county: Option<String>,
    },
    InstitutionType {
        institution_type: Option<String>,
    },
}

impl Rejection {
    pub fn describe(&self) -> String {
        match self {
            Rejection::MeanGrade { required, actual } => {
                format!("mean grade {actual} below required {required}")
            }
            Rejection::Subject {
                subjects,
                min_grade,
                best,
            } => match best {
                Some(best) => format!("{} needs {min_grade}, best is {best}", subjects.join("/")),
                None => format!("{} needs {min_grade}, not taken", subjects.join("/")),
            },
            Rejection::County { county } => format!(
                "county {} not selected",
                county.as_deref().unwrap_or("unknown")
            ),
            Rejection::InstitutionType { institution_type } => format!(
                "institution type {} not selected",
                institution_type.as_deref().unwrap_or("unknown")
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityDecision {
    pub course_id: String,
    pub course_name: String,
    pub qualified: bool,
    pub rejection: Option<Rejection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub category: CourseCategory,
    pub evaluated: usize,
    pub qualified: Vec<CourseRequirement>,
    pub skipped: Vec<MalformedCourseRecord>,
}

impl MatchOutcome {
    pub fn empty(category: CourseCategory) -> Self {
        Self {
            category,
            evaluated: 0,
            qualified: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub fn qualified_count(&self) -> usize {
        self.qualified.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filters_accept_missing_values() {
        let filters = MatchFilters::default();
        assert!(filters.allows_county(None));
        assert!(filters.allows_institution_type(Some("Private")));
    }

    #[test]
    fn filters_are_case_insensitive_and_reject_unknown_values() {
        let filters = MatchFilters::new(
            vec![" Nairobi ".to_string(), String::new()],
            vec!["public".to_string()],
        );
        assert_eq!(filters.counties, vec!["Nairobi"]);
        assert!(filters.allows_county(Some("NAIROBI")));
        assert!(!filters.allows_county(None));
        assert!(filters.allows_institution_type(Some("Public")));
        assert!(!filters.allows_institution_type(Some("Private")));
    }

    #[test]
    fn rejection_descriptions_read_naturally() {
        let reason = Rejection::Subject {
            subjects: vec!["Biology".to_string(), "Chemistry".to_string()],
            min_grade: Grade::CPlus,
            best: Some(Grade::C),
        };
        assert_eq!(reason.describe(), "Biology/Chemistry needs C+, best is C");
    }
}
