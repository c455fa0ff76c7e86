use serde::{Deserialize, Serialize};

use crate::aggregate::{
    summarize_clusters, summarize_courses, ClusterSummary, CourseSummary, GroupKey,
};
use crate::catalog::{CourseCategory, CourseRequirement, MalformedCourseRecord};
use crate::clusters::{ClusterCalculator, ClusterResult};
use crate::eligibility::MatchOutcome;
use crate::error::EngineResult;
use crate::grades::StudentProfile;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterReport {
    pub mean_grade: String,
    pub results: Vec<ClusterResult>,
    pub summary: ClusterSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseReport {
    pub category: CourseCategory,
    pub evaluated: usize,
    pub qualified_count: usize,
    pub qualified: Vec<CourseRequirement>,
    pub skipped: Vec<MalformedCourseRecord>,
    pub summary: CourseSummary,
}

pub fn build_cluster_report(
    calculator: &ClusterCalculator,
    profile: &StudentProfile,
    top_n: usize,
) -> EngineResult<ClusterReport> {
    let results = calculator.calculate(profile)?;
    let summary = summarize_clusters(&results, top_n);
    Ok(ClusterReport {
        mean_grade: profile.mean_grade().to_string(),
        results,
        summary,
    })
}

/// The summary covers every qualified course; `top` only trims the listing.
pub fn build_course_report(
    outcome: MatchOutcome,
    top: Option<usize>,
    top_n: usize,
) -> CourseReport {
    let summary = summarize_courses(
        &outcome.qualified,
        &GroupKey::defaults_for(outcome.category),
        top_n,
    );
    let qualified_count = outcome.qualified_count();
    let mut qualified = outcome.qualified;
    if let Some(limit) = top {
        qualified.truncate(limit);
    }
    CourseReport {
        category: outcome.category,
        evaluated: outcome.evaluated,
        qualified_count,
        qualified,
        skipped: outcome.skipped,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::catalog::Catalog;
    use crate::eligibility::{match_courses, MatchFilters};
    use crate::grades::Grade;

    fn strong_profile() -> StudentProfile {
        StudentProfile::new(
            Grade::AMinus,
            [
                ("Mathematics", Grade::A),
                ("English", Grade::AMinus),
                ("Kiswahili", Grade::BPlus),
                ("Physics", Grade::A),
                ("Chemistry", Grade::AMinus),
                ("Biology", Grade::BPlus),
                ("Geography", Grade::B),
                ("Computer Studies", Grade::A),
            ],
        )
        .expect("valid profile")
    }

    #[test]
    fn cluster_report_covers_all_categories() {
        let report = build_cluster_report(&ClusterCalculator::default(), &strong_profile(), 3)
            .expect("report");
        assert_eq!(report.results.len(), 20);
        assert_eq!(report.summary.evaluated, 20);
        assert_eq!(report.summary.top.len(), 3);
        assert_eq!(report.mean_grade, "A-");
    }

    #[test]
    fn course_report_truncates_listing_but_not_counts() {
        let records: Vec<_> = (0..6)
            .map(|i| {
                let county = if i % 2 == 0 { "Nairobi" } else { "Kiambu" };
                json!({
                    "id": format!("ART-{i}"),
                    "name": format!("Artisan Course {i}"),
                    "min_mean_grade": "D",
                    "county": county,
                    "institution": "Kabete National Polytechnic",
                })
            })
            .collect();
        let catalog = Catalog::from_records(CourseCategory::Artisan, "test", &records);
        let outcome = match_courses(&strong_profile(), &catalog, &MatchFilters::default());
        let report = build_course_report(outcome, Some(2), 5);
        assert_eq!(report.qualified_count, 6);
        assert_eq!(report.qualified.len(), 2);
        assert_eq!(report.summary.total, 6);
        assert_eq!(report.summary.groups[0].top[0].value, "Nairobi");
    }
}
