use tracing::{debug, warn};

use crate::catalog::Catalog;
use crate::eligibility::evaluator::evaluate_course;
use crate::eligibility::{EligibilityDecision, MatchFilters, MatchOutcome};
use crate::grades::StudentProfile;

/// Qualified courses in catalog order. A profile with no subjects matches
/// nothing and skips evaluation entirely; malformed records are logged and
/// left out without stopping the pass.
pub fn match_courses(
    profile: &StudentProfile,
    catalog: &Catalog,
    filters: &MatchFilters,
) -> MatchOutcome {
    if !profile.has_subjects() {
        debug!("no subjects entered, skipping {} catalog", catalog.category);
        return MatchOutcome::empty(catalog.category);
    }

    let mut outcome = MatchOutcome::empty(catalog.category);
    for entry in &catalog.entries {
        match entry {
            Ok(course) => {
                outcome.evaluated += 1;
                if evaluate_course(profile, course, filters).qualified {
                    outcome.qualified.push(course.clone());
                }
            }
            Err(malformed) => {
                warn!("skipping {} course: {malformed}", catalog.category);
                outcome.skipped.push(malformed.clone());
            }
        }
    }
    debug!(
        "{} catalog: {}/{} courses qualified",
        catalog.category,
        outcome.qualified.len(),
        outcome.evaluated
    );
    outcome
}

pub fn evaluate_catalog(
    profile: &StudentProfile,
    catalog: &Catalog,
    filters: &MatchFilters,
) -> Vec<EligibilityDecision> {
    catalog
        .courses()
        .map(|course| evaluate_course(profile, course, filters))
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;
    use crate::catalog::CourseCategory;
    use crate::grades::Grade;

    fn diploma_records() -> Vec<Value> {
        vec![
            json!({
                "id": "DIP-ICT", "name": "Diploma in Information Technology",
                "min_mean_grade": "C-", "county": "Nairobi", "institution_type": "Public",
                "requirements": {"Mathematics": "D+", "English/Kiswahili": "C-"}
            }),
            json!({
                "id": "DIP-NUR", "name": "Diploma in Nursing",
                "min_mean_grade": "C", "county": "Kisumu", "institution_type": "Public",
                "requirements": {"Biology": "C", "Chemistry/Physics": "C-", "English": "C"}
            }),
            json!({"id": "DIP-BAD", "name": "Diploma in Nothing"}),
            json!({
                "id": "DIP-ACC", "name": "Diploma in Accountancy",
                "min_mean_grade": "C-", "county": "Nairobi", "institution_type": "Private",
                "requirements": {"Mathematics": "C-"}
            }),
            json!({
                "id": "DIP-ENG", "name": "Diploma in Electrical Engineering",
                "min_mean_grade": "C", "county": "Mombasa", "institution_type": "Public",
                "requirements": {"Mathematics": "C", "Physics": "C"}
            }),
        ]
    }

    fn catalog() -> Catalog {
        Catalog::from_records(CourseCategory::Diploma, "test", &diploma_records())
    }

    fn profile(mean: Grade, grades: &[(&str, Grade)]) -> StudentProfile {
        StudentProfile::new(mean, grades.iter().copied()).expect("valid profile")
    }

    fn ids(outcome: &MatchOutcome) -> Vec<&str> {
        outcome.qualified.iter().map(|c| c.course_id.as_str()).collect()
    }

    #[test]
    fn keeps_catalog_order_and_skips_malformed_records() {
        let student = profile(
            Grade::C,
            &[
                ("Mathematics", Grade::C),
                ("English", Grade::C),
                ("Biology", Grade::C),
                ("Chemistry", Grade::D),
            ],
        );
        let outcome = match_courses(&student, &catalog(), &MatchFilters::default());
        assert_eq!(ids(&outcome), vec!["DIP-ICT", "DIP-ACC"]);
        assert_eq!(outcome.evaluated, 4);
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].course_id.as_deref(), Some("DIP-BAD"));
    }

    #[test]
    fn zero_subjects_yields_an_empty_outcome() {
        let records: Vec<Value> = (0..50)
            .map(|i| {
                json!({
                    "id": format!("DIP-{i:03}"),
                    "name": format!("Diploma Course {i}"),
                    "min_mean_grade": "C-",
                })
            })
            .collect();
        let catalog = Catalog::from_records(CourseCategory::Diploma, "test", &records);
        let student = profile(Grade::C, &[]);
        let outcome = match_courses(&student, &catalog, &MatchFilters::default());
        assert!(outcome.qualified.is_empty());
        assert_eq!(outcome.evaluated, 0);
        assert_eq!(outcome.category, CourseCategory::Diploma);
    }

    #[test]
    fn repeated_runs_are_identical() {
        let student = profile(
            Grade::B,
            &[
                ("Mathematics", Grade::B),
                ("English", Grade::B),
                ("Physics", Grade::B),
            ],
        );
        let catalog = catalog();
        let first = match_courses(&student, &catalog, &MatchFilters::default());
        let second = match_courses(&student, &catalog, &MatchFilters::default());
        assert_eq!(first, second);
    }

    #[test]
    fn better_grades_never_lose_a_course() {
        let weaker = profile(
            Grade::CMinus,
            &[
                ("Mathematics", Grade::DPlus),
                ("English", Grade::CMinus),
                ("Biology", Grade::D),
                ("Physics", Grade::D),
            ],
        );
        let stronger = profile(
            Grade::C,
            &[
                ("Mathematics", Grade::C),
                ("English", Grade::C),
                ("Biology", Grade::C),
                ("Physics", Grade::C),
            ],
        );
        let catalog = catalog();
        let weak = match_courses(&weaker, &catalog, &MatchFilters::default());
        let strong = match_courses(&stronger, &catalog, &MatchFilters::default());
        for course in &weak.qualified {
            assert!(
                strong.qualified.iter().any(|c| c.course_id == course.course_id),
                "{} lost with better grades",
                course.course_id
            );
        }
        assert!(strong.qualified.len() > weak.qualified.len());
    }

    #[test]
    fn filters_narrow_the_qualified_set() {
        let student = profile(
            Grade::B,
            &[
                ("Mathematics", Grade::B),
                ("English", Grade::B),
                ("Physics", Grade::B),
            ],
        );
        let filters = MatchFilters::new(vec!["Nairobi".to_string()], vec!["public".to_string()]);
        let outcome = match_courses(&student, &catalog(), &filters);
        assert_eq!(ids(&outcome), vec!["DIP-ICT"]);
    }

    #[test]
    fn evaluate_catalog_explains_every_course() {
        let student = profile(Grade::C, &[("Mathematics", Grade::C)]);
        let decisions = evaluate_catalog(&student, &catalog(), &MatchFilters::default());
        assert_eq!(decisions.len(), 4);
        assert!(decisions
            .iter()
            .filter(|d| !d.qualified)
            .all(|d| d.rejection.is_some()));
    }
}
