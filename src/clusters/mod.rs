pub mod calculator;
pub mod registry;

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::grades::{Grade, SubjectGrade};

pub use calculator::{
    calculate_all_clusters, calculate_cluster, cluster_weight, resolve_slot, total_points,
    ClusterCalculator, TierThresholds, TIER_A_MIN_WEIGHT, TIER_B_MIN_WEIGHT,
};
pub use registry::{normalize_cluster_id, ClusterRegistry};

pub const SLOTS_PER_CLUSTER: usize = 4;

/// One subject position in a cluster formula. Alternatives are ordered and
/// the order decides ties during resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectSlot {
    pub alternatives: Vec<String>,
}

impl SubjectSlot {
    pub fn new(alternatives: &[&str]) -> Self {
        Self {
            alternatives: alternatives.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn label(&self) -> String {
        self.alternatives.join("/")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterCategory {
    pub id: String,
    pub name: String,
    pub description: String,
    pub slots: [SubjectSlot; SLOTS_PER_CLUSTER],
    #[serde(default)]
    pub min_mean_grade: Option<Grade>,
}

impl ClusterCategory {
    pub fn new(
        id: &str,
        name: &str,
        description: &str,
        slots: [&[&str]; SLOTS_PER_CLUSTER],
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            slots: slots.map(SubjectSlot::new),
            min_mean_grade: None,
        }
    }

    pub fn with_min_mean_grade(mut self, grade: Grade) -> Self {
        self.min_mean_grade = Some(grade);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    A,
    B,
    C,
}

impl Tier {
    pub fn label(self) -> &'static str {
        match self {
            Self::A => "strong",
            Self::B => "competitive",
            Self::C => "low",
        }
    }
}

impl Display for Tier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
        };
        write!(f, "{symbol}")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterResult {
    pub category_id: String,
    pub category_name: String,
    pub qualified: bool,
    pub cluster_weight: Option<f64>,
    pub tier: Option<Tier>,
    pub cluster_points: Option<u32>,
    pub resolved_subjects: Vec<SubjectGrade>,
}

impl ClusterResult {
    pub fn unqualified(category: &ClusterCategory) -> Self {
        Self {
            category_id: category.id.clone(),
            category_name: category.name.clone(),
            qualified: false,
            cluster_weight: None,
            tier: None,
            cluster_points: None,
            resolved_subjects: Vec::new(),
        }
    }
}
