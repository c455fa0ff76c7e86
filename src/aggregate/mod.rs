use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::catalog::{CourseCategory, CourseRequirement};
use crate::clusters::{ClusterResult, Tier};

pub const DEFAULT_TOP_N: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKey {
    County,
    Institution,
    InstitutionType,
    Cluster,
    Category,
}

impl GroupKey {
    pub fn defaults_for(category: CourseCategory) -> Vec<GroupKey> {
        match category {
            CourseCategory::Degree => vec![GroupKey::Institution, GroupKey::Cluster],
            CourseCategory::Diploma
            | CourseCategory::Certificate
            | CourseCategory::Kmtc
            | CourseCategory::Artisan => vec![GroupKey::County, GroupKey::Institution],
        }
    }

    fn value_of(self, course: &CourseRequirement) -> Option<String> {
        match self {
            GroupKey::County => course.county.clone(),
            GroupKey::Institution => course.institution.clone(),
            GroupKey::InstitutionType => course.institution_type.clone(),
            GroupKey::Cluster => course.cluster.clone(),
            GroupKey::Category => Some(course.category.to_string()),
        }
    }
}

impl Display for GroupKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            GroupKey::County => "county",
            GroupKey::Institution => "institution",
            GroupKey::InstitutionType => "institution_type",
            GroupKey::Cluster => "cluster",
            GroupKey::Category => "category",
        };
        write!(f, "{label}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupCount {
    pub value: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub key: GroupKey,
    pub distinct: usize,
    pub top: Vec<GroupCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseSummary {
    pub total: usize,
    pub groups: Vec<GroupSummary>,
}

pub fn summarize_courses(
    courses: &[CourseRequirement],
    keys: &[GroupKey],
    top_n: usize,
) -> CourseSummary {
    let groups = keys
        .iter()
        .map(|key| {
            let counts = count_by(courses, *key);
            GroupSummary {
                key: *key,
                distinct: counts.len(),
                top: top_counts(counts, top_n),
            }
        })
        .collect();
    CourseSummary {
        total: courses.len(),
        groups,
    }
}

/// Counts in first-seen order. Courses without a value for `key` are left
/// out of that grouping.
pub fn count_by(courses: &[CourseRequirement], key: GroupKey) -> Vec<GroupCount> {
    let mut counts: Vec<GroupCount> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for course in courses {
        let Some(value) = key.value_of(course) else {
            continue;
        };
        match index.get(&value) {
            Some(&pos) => counts[pos].count += 1,
            None => {
                index.insert(value.clone(), counts.len());
                counts.push(GroupCount { value, count: 1 });
            }
        }
    }
    counts
}

fn top_counts(mut counts: Vec<GroupCount>, top_n: usize) -> Vec<GroupCount> {
    // sort_by is stable, so equal counts stay in first-seen order
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(top_n);
    counts
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterSummary {
    pub evaluated: usize,
    pub qualified: usize,
    pub tier_a: usize,
    pub tier_b: usize,
    pub tier_c: usize,
    pub top: Vec<ClusterResult>,
}

pub fn rank_clusters(results: &[ClusterResult], top_n: usize) -> Vec<&ClusterResult> {
    let mut ranked: Vec<&ClusterResult> = results
        .iter()
        .filter(|r| r.qualified && r.cluster_weight.is_some())
        .collect();
    ranked.sort_by(|a, b| {
        let a = a.cluster_weight.unwrap_or_default();
        let b = b.cluster_weight.unwrap_or_default();
        b.total_cmp(&a)
    });
    ranked.truncate(top_n);
    ranked
}

pub fn summarize_clusters(results: &[ClusterResult], top_n: usize) -> ClusterSummary {
    let tier_count = |tier: Tier| results.iter().filter(|r| r.tier == Some(tier)).count();
    ClusterSummary {
        evaluated: results.len(),
        qualified: results.iter().filter(|r| r.qualified).count(),
        tier_a: tier_count(Tier::A),
        tier_b: tier_count(Tier::B),
        tier_c: tier_count(Tier::C),
        top: rank_clusters(results, top_n).into_iter().cloned().collect(),
    }
}
