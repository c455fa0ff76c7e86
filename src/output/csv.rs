use anyhow::Result;

use crate::catalog::CourseRequirement;
use crate::clusters::ClusterResult;

pub fn clusters_to_csv(results: &[ClusterResult]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "cluster",
        "name",
        "qualified",
        "cluster_points",
        "cluster_weight",
        "tier",
        "subjects",
    ])?;
    for result in results {
        writer.write_record([
            result.category_id.clone(),
            result.category_name.clone(),
            result.qualified.to_string(),
            result
                .cluster_points
                .map(|p| p.to_string())
                .unwrap_or_default(),
            result
                .cluster_weight
                .map(|w| format!("{w:.3}"))
                .unwrap_or_default(),
            result.tier.map(|t| t.to_string()).unwrap_or_default(),
            result
                .resolved_subjects
                .iter()
                .map(|s| format!("{}:{}", s.subject, s.grade))
                .collect::<Vec<_>>()
                .join(";"),
        ])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

pub fn courses_to_csv(courses: &[CourseRequirement]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "course_id",
        "course_name",
        "category",
        "institution",
        "county",
        "institution_type",
        "cluster",
        "min_mean_grade",
        "requirements",
    ])?;
    for course in courses {
        writer.write_record([
            course.course_id.clone(),
            course.course_name.clone(),
            course.category.as_slug().to_string(),
            course.institution.clone().unwrap_or_default(),
            course.county.clone().unwrap_or_default(),
            course.institution_type.clone().unwrap_or_default(),
            course.cluster.clone().unwrap_or_default(),
            course.min_mean_grade.to_string(),
            course
                .subject_requirements
                .iter()
                .map(|g| g.label())
                .collect::<Vec<_>>()
                .join(";"),
        ])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}
