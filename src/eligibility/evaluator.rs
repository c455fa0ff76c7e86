use crate::catalog::{CourseRequirement, RequirementGroup};
use crate::eligibility::{EligibilityDecision, MatchFilters, Rejection};
use crate::grades::{Grade, StudentProfile};

/// Runs the gates in order (mean grade, subject groups, county, institution
/// type) and stops at the first rejection.
pub fn evaluate_course(
    profile: &StudentProfile,
    course: &CourseRequirement,
    filters: &MatchFilters,
) -> EligibilityDecision {
    let rejection = first_rejection(profile, course, filters);
    EligibilityDecision {
        course_id: course.course_id.clone(),
        course_name: course.course_name.clone(),
        qualified: rejection.is_none(),
        rejection,
    }
}

fn first_rejection(
    profile: &StudentProfile,
    course: &CourseRequirement,
    filters: &MatchFilters,
) -> Option<Rejection> {
    let mean = profile.mean_grade();
    if !mean.meets(course.min_mean_grade) {
        return Some(Rejection::MeanGrade {
            required: course.min_mean_grade,
            actual: mean,
        });
    }

    for group in &course.subject_requirements {
        if !group_satisfied(profile, group) {
            return Some(Rejection::Subject {
                subjects: group.subjects.clone(),
                min_grade: group.min_grade,
                best: best_in_group(profile, group),
            });
        }
    }

    if !filters.allows_county(course.county.as_deref()) {
        return Some(Rejection::County {
            county: course.county.clone(),
        });
    }
    if !filters.allows_institution_type(course.institution_type.as_deref()) {
        return Some(Rejection::InstitutionType {
            institution_type: course.institution_type.clone(),
        });
    }
    None
}

pub fn group_satisfied(profile: &StudentProfile, group: &RequirementGroup) -> bool {
    group
        .subjects
        .iter()
        .filter_map(|subject| profile.grade_of(subject))
        .any(|grade| grade.meets(group.min_grade))
}

fn best_in_group(profile: &StudentProfile, group: &RequirementGroup) -> Option<Grade> {
    group
        .subjects
        .iter()
        .filter_map(|subject| profile.grade_of(subject))
        .max_by_key(|grade| grade.points())
}
