use serde::{Deserialize, Serialize};

use crate::clusters::{ClusterCategory, ClusterRegistry, ClusterResult, SubjectSlot, Tier};
use crate::error::{EngineError, EngineResult};
use crate::grades::{Grade, StudentProfile, SubjectGrade};

pub const BEST_SUBJECT_COUNT: usize = 7;
pub const MAX_CLUSTER_POINTS: u32 = 4 * Grade::MAX_POINTS;
pub const MAX_TOTAL_POINTS: u32 = BEST_SUBJECT_COUNT as u32 * Grade::MAX_POINTS;
pub const MAX_CLUSTER_WEIGHT: f64 = 48.0;

pub const TIER_A_MIN_WEIGHT: f64 = 40.0;
pub const TIER_B_MIN_WEIGHT: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierThresholds {
    pub a_min: f64,
    pub b_min: f64,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            a_min: TIER_A_MIN_WEIGHT,
            b_min: TIER_B_MIN_WEIGHT,
        }
    }
}

impl TierThresholds {
    pub fn classify(&self, weight: f64) -> Tier {
        if weight >= self.a_min {
            Tier::A
        } else if weight >= self.b_min {
            Tier::B
        } else {
            Tier::C
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClusterCalculator {
    registry: ClusterRegistry,
    thresholds: TierThresholds,
}

impl ClusterCalculator {
    pub fn new(registry: ClusterRegistry, thresholds: TierThresholds) -> Self {
        Self {
            registry,
            thresholds,
        }
    }

    pub fn registry(&self) -> &ClusterRegistry {
        &self.registry
    }

    pub fn thresholds(&self) -> TierThresholds {
        self.thresholds
    }

    pub fn calculate(&self, profile: &StudentProfile) -> EngineResult<Vec<ClusterResult>> {
        calculate_with_thresholds(self.registry.list_categories(), profile, self.thresholds)
    }
}

impl Default for ClusterCalculator {
    fn default() -> Self {
        Self::new(ClusterRegistry::with_defaults(), TierThresholds::default())
    }
}

pub fn calculate_all_clusters(
    categories: &[ClusterCategory],
    profile: &StudentProfile,
) -> EngineResult<Vec<ClusterResult>> {
    calculate_with_thresholds(categories, profile, TierThresholds::default())
}

fn calculate_with_thresholds(
    categories: &[ClusterCategory],
    profile: &StudentProfile,
    thresholds: TierThresholds,
) -> EngineResult<Vec<ClusterResult>> {
    let total = total_points(profile)?;
    Ok(categories
        .iter()
        .map(|category| calculate_cluster(category, profile, total, &thresholds))
        .collect())
}

pub fn total_points(profile: &StudentProfile) -> EngineResult<u32> {
    if profile.subject_count() < BEST_SUBJECT_COUNT {
        return Err(EngineError::IncompleteProfile {
            entered: profile.subject_count(),
            required: BEST_SUBJECT_COUNT,
        });
    }
    Ok(profile
        .best_subjects(BEST_SUBJECT_COUNT)
        .iter()
        .map(|s| s.points())
        .sum())
}

/// Picks the highest-graded alternative the student sat. On equal points the
/// alternative listed first in the slot wins, independent of entry order.
pub fn resolve_slot<'p>(slot: &SubjectSlot, profile: &'p StudentProfile) -> Option<&'p SubjectGrade> {
    let mut best: Option<&SubjectGrade> = None;
    for alternative in &slot.alternatives {
        let Some(entry) = profile
            .subjects()
            .iter()
            .find(|s| &s.subject == alternative)
        else {
            continue;
        };
        match best {
            Some(current) if current.points() >= entry.points() => {}
            _ => best = Some(entry),
        }
    }
    best
}

pub fn calculate_cluster(
    category: &ClusterCategory,
    profile: &StudentProfile,
    total: u32,
    thresholds: &TierThresholds,
) -> ClusterResult {
    if let Some(minimum) = category.min_mean_grade {
        if !profile.mean_grade().meets(minimum) {
            return ClusterResult::unqualified(category);
        }
    }

    let mut resolved = Vec::with_capacity(category.slots.len());
    for slot in &category.slots {
        match resolve_slot(slot, profile) {
            Some(entry) => resolved.push(entry.clone()),
            None => return ClusterResult::unqualified(category),
        }
    }

    let cluster_points: u32 = resolved.iter().map(|s| s.points()).sum();
    let weight = cluster_weight(cluster_points, total);
    ClusterResult {
        category_id: category.id.clone(),
        category_name: category.name.clone(),
        qualified: true,
        cluster_weight: Some(weight),
        tier: Some(thresholds.classify(weight)),
        cluster_points: Some(cluster_points),
        resolved_subjects: resolved,
    }
}

/// `sqrt((r / 48) * (t / 84)) * 48`, rounded to three decimals.
pub fn cluster_weight(cluster_points: u32, total_points: u32) -> f64 {
    let r = f64::from(cluster_points) / f64::from(MAX_CLUSTER_POINTS);
    let t = f64::from(total_points) / f64::from(MAX_TOTAL_POINTS);
    round_weight((r * t).sqrt() * MAX_CLUSTER_WEIGHT)
}

fn round_weight(weight: f64) -> f64 {
    (weight * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grades::subjects::*;

    fn profile(mean: Grade, subjects: &[(&str, Grade)]) -> StudentProfile {
        StudentProfile::new(mean, subjects.iter().copied()).expect("valid profile")
    }

    fn worked_example() -> StudentProfile {
        profile(
            Grade::BPlus,
            &[
                (MATHEMATICS, Grade::A),
                (ENGLISH, Grade::BPlus),
                (KISWAHILI, Grade::B),
                (PHYSICS, Grade::AMinus),
                (CHEMISTRY, Grade::BPlus),
                (BIOLOGY, Grade::B),
                (GEOGRAPHY, Grade::CPlus),
            ],
        )
    }

    #[test]
    fn engineering_worked_example() {
        let student = worked_example();
        let registry = ClusterRegistry::with_defaults();
        let engineering = registry.get_category("CL05").expect("CL05");
        let total = total_points(&student).expect("seven subjects");
        assert_eq!(total, 12 + 10 + 9 + 11 + 10 + 9 + 7);

        let result = calculate_cluster(engineering, &student, total, &TierThresholds::default());
        assert!(result.qualified);
        assert_eq!(result.cluster_points, Some(12 + 11 + 10 + 10));
        let english = &result.resolved_subjects[3];
        assert_eq!(english.subject, ENGLISH);
        assert_eq!(english.grade, Grade::BPlus);

        let expected = ((43.0 / 48.0) * (68.0 / 84.0_f64)).sqrt() * 48.0;
        let weight = result.cluster_weight.expect("weight");
        assert!((weight - expected).abs() < 0.0005);
        assert_eq!(weight, (expected * 1000.0).round() / 1000.0);
        assert_eq!(result.tier, Some(Tier::A));
    }

    #[test]
    fn always_returns_one_result_per_category() {
        let sparse = profile(
            Grade::C,
            &[
                (MUSIC, Grade::C),
                (FRENCH, Grade::C),
                ("Woodwork", Grade::B),
                ("Aviation", Grade::C),
                ("Drawing and Design", Grade::D),
                ("Power Mechanics", Grade::C),
                ("Electricity", Grade::CPlus),
            ],
        );
        let registry = ClusterRegistry::with_defaults();
        let results =
            calculate_all_clusters(registry.list_categories(), &sparse).expect("seven subjects");
        assert_eq!(results.len(), 20);
        for (result, category) in results.iter().zip(registry.list_categories()) {
            assert_eq!(result.category_id, category.id);
            assert!(!result.qualified);
            assert!(result.cluster_weight.is_none());
            assert!(result.tier.is_none());
        }
    }

    #[test]
    fn straight_a_student_scores_the_maximum() {
        let student = profile(
            Grade::A,
            &[
                (MATHEMATICS, Grade::A),
                (ENGLISH, Grade::A),
                (KISWAHILI, Grade::A),
                (PHYSICS, Grade::A),
                (CHEMISTRY, Grade::A),
                (BIOLOGY, Grade::A),
                (GEOGRAPHY, Grade::A),
                (HISTORY, Grade::A),
            ],
        );
        let results = ClusterCalculator::default()
            .calculate(&student)
            .expect("eight subjects");
        let engineering = results
            .iter()
            .find(|r| r.category_id == "CL05")
            .expect("CL05");
        assert_eq!(engineering.cluster_weight, Some(48.0));
        assert_eq!(format!("{:.3}", engineering.cluster_weight.unwrap_or_default()), "48.000");
        for result in results.iter().filter(|r| r.qualified) {
            let weight = result.cluster_weight.expect("qualified has weight");
            assert!((0.0..=MAX_CLUSTER_WEIGHT).contains(&weight));
        }
    }

    #[test]
    fn missing_slot_subject_disqualifies_the_cluster() {
        let student = profile(
            Grade::B,
            &[
                (MATHEMATICS, Grade::A),
                (ENGLISH, Grade::B),
                (KISWAHILI, Grade::B),
                (BIOLOGY, Grade::B),
                (CHEMISTRY, Grade::B),
                (GEOGRAPHY, Grade::B),
                (HISTORY, Grade::B),
            ],
        );
        let registry = ClusterRegistry::with_defaults();
        let engineering = registry.get_category("CL05").expect("CL05");
        let total = total_points(&student).expect("seven subjects");
        let result = calculate_cluster(engineering, &student, total, &TierThresholds::default());
        assert!(!result.qualified);
        assert_eq!(result.cluster_weight, None);
        assert_eq!(result.tier, None);
        assert!(result.resolved_subjects.is_empty());
    }

    #[test]
    fn tied_alternatives_resolve_to_the_first_listed() {
        let slot = SubjectSlot::new(&[ENGLISH, KISWAHILI]);
        let kiswahili_first = profile(
            Grade::B,
            &[(KISWAHILI, Grade::B), (ENGLISH, Grade::B)],
        );
        for _ in 0..5 {
            let picked = resolve_slot(&slot, &kiswahili_first).expect("slot satisfied");
            assert_eq!(picked.subject, ENGLISH);
        }

        let better_second = profile(Grade::B, &[(ENGLISH, Grade::C), (KISWAHILI, Grade::B)]);
        let picked = resolve_slot(&slot, &better_second).expect("slot satisfied");
        assert_eq!(picked.subject, KISWAHILI);
    }

    #[test]
    fn fewer_than_seven_subjects_is_reported() {
        let student = profile(Grade::B, &[(MATHEMATICS, Grade::A), (ENGLISH, Grade::B)]);
        let err = calculate_all_clusters(ClusterRegistry::with_defaults().list_categories(), &student)
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::IncompleteProfile {
                entered: 2,
                required: 7
            }
        );
    }

    #[test]
    fn best_seven_ignores_the_weakest_extra_subjects() {
        let mut subjects = vec![
            (MATHEMATICS, Grade::A),
            (ENGLISH, Grade::A),
            (KISWAHILI, Grade::A),
            (PHYSICS, Grade::A),
            (CHEMISTRY, Grade::A),
            (BIOLOGY, Grade::A),
            (GEOGRAPHY, Grade::A),
        ];
        subjects.push((HISTORY, Grade::E));
        subjects.push((CRE, Grade::D));
        let student = profile(Grade::A, &subjects);
        assert_eq!(total_points(&student), Ok(MAX_TOTAL_POINTS));
    }

    #[test]
    fn mean_grade_gate_comes_from_category_metadata() {
        let gated = ClusterCategory::new(
            "CL90",
            "Gated",
            "test category",
            [&[MATHEMATICS], &[PHYSICS], &[CHEMISTRY], &[ENGLISH, KISWAHILI]],
        )
        .with_min_mean_grade(Grade::A);
        let student = worked_example();
        let results = calculate_all_clusters(std::slice::from_ref(&gated), &student)
            .expect("seven subjects");
        assert!(!results[0].qualified);
    }

    #[test]
    fn tiers_follow_named_thresholds() {
        let thresholds = TierThresholds::default();
        assert_eq!(thresholds.classify(TIER_A_MIN_WEIGHT), Tier::A);
        assert_eq!(thresholds.classify(TIER_A_MIN_WEIGHT - 0.001), Tier::B);
        assert_eq!(thresholds.classify(TIER_B_MIN_WEIGHT), Tier::B);
        assert_eq!(thresholds.classify(TIER_B_MIN_WEIGHT - 0.001), Tier::C);
        assert_eq!(thresholds.classify(0.0), Tier::C);
    }

    #[test]
    fn weight_formula_bounds() {
        assert_eq!(cluster_weight(MAX_CLUSTER_POINTS, MAX_TOTAL_POINTS), 48.0);
        assert_eq!(cluster_weight(0, MAX_TOTAL_POINTS), 0.0);
        let low = cluster_weight(4, 7);
        assert!(low > 0.0 && low < 5.0);
    }
}
