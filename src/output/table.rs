use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Row, Table};

use crate::aggregate::{ClusterSummary, CourseSummary};
use crate::catalog::{CourseRequirement, MalformedCourseRecord};
use crate::clusters::{ClusterCategory, ClusterResult, Tier};
use crate::results::StoredResult;

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn tier_cell(tier: Option<Tier>) -> Cell {
    match tier {
        Some(Tier::A) => Cell::new("A").fg(Color::Green),
        Some(Tier::B) => Cell::new("B").fg(Color::Yellow),
        Some(Tier::C) => Cell::new("C").fg(Color::Red),
        None => Cell::new("-"),
    }
}

pub fn render_clusters_table(results: &[ClusterResult]) -> String {
    let mut table = new_table();
    table.set_header(vec![
        "Cluster",
        "Name",
        "Qualified",
        "Points",
        "Weight",
        "Tier",
        "Subjects Used",
    ]);

    for r in results {
        let qualified = if r.qualified {
            Cell::new("YES").fg(Color::Green)
        } else {
            Cell::new("NO").fg(Color::Red)
        };
        let subjects = r
            .resolved_subjects
            .iter()
            .map(|s| format!("{} {}", s.subject, s.grade))
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(Row::from(vec![
            Cell::new(&r.category_id),
            Cell::new(&r.category_name),
            qualified,
            Cell::new(
                r.cluster_points
                    .map(|p| p.to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ),
            Cell::new(
                r.cluster_weight
                    .map(|w| format!("{w:.3}"))
                    .unwrap_or_else(|| "-".to_string()),
            ),
            tier_cell(r.tier),
            Cell::new(subjects),
        ]));
    }
    table.to_string()
}

pub fn render_cluster_summary(summary: &ClusterSummary) -> String {
    let mut out = format!(
        "Qualified clusters: {}/{} (tier A: {}, tier B: {}, tier C: {})",
        summary.qualified, summary.evaluated, summary.tier_a, summary.tier_b, summary.tier_c
    );
    if !summary.top.is_empty() {
        let top = summary
            .top
            .iter()
            .map(|r| {
                format!(
                    "{} {} ({:.3})",
                    r.category_id,
                    r.category_name,
                    r.cluster_weight.unwrap_or_default()
                )
            })
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&format!("\nStrongest: {top}"));
    }
    out
}

pub fn render_courses_table(courses: &[CourseRequirement]) -> String {
    let mut table = new_table();
    table.set_header(vec![
        "#",
        "Code",
        "Course",
        "Institution",
        "County",
        "Type",
        "Cluster",
        "Min Mean",
    ]);
    let dash = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
    for (idx, course) in courses.iter().enumerate() {
        table.add_row(vec![
            (idx + 1).to_string(),
            course.course_id.clone(),
            course.course_name.clone(),
            dash(&course.institution),
            dash(&course.county),
            dash(&course.institution_type),
            dash(&course.cluster),
            course.min_mean_grade.to_string(),
        ]);
    }
    table.to_string()
}

pub fn render_course_summary_table(summary: &CourseSummary) -> String {
    let mut table = new_table();
    table.set_header(vec!["Group", "Distinct", "Top Values"]);
    for group in &summary.groups {
        let top = group
            .top
            .iter()
            .map(|g| format!("{} ({})", g.value, g.count))
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            group.key.to_string(),
            group.distinct.to_string(),
            top,
        ]);
    }
    format!("Qualified courses: {}\n{}", summary.total, table)
}

pub fn render_skipped_table(skipped: &[MalformedCourseRecord]) -> String {
    let mut table = new_table();
    table.set_header(vec!["Record", "Code", "Reason"]);
    for item in skipped {
        table.add_row(vec![
            item.index.to_string(),
            item.course_id.clone().unwrap_or_else(|| "-".to_string()),
            item.reason.clone(),
        ]);
    }
    table.to_string()
}

pub fn render_categories_table(categories: &[ClusterCategory]) -> String {
    let mut table = new_table();
    table.set_header(vec![
        "Cluster", "Name", "Subject 1", "Subject 2", "Subject 3", "Subject 4", "Min Mean",
    ]);
    for category in categories {
        let mut row = vec![category.id.clone(), category.name.clone()];
        row.extend(category.slots.iter().map(|slot| slot.label()));
        row.push(
            category
                .min_mean_grade
                .map(|g| g.to_string())
                .unwrap_or_else(|| "-".to_string()),
        );
        table.add_row(row);
    }
    table.to_string()
}

pub fn render_stored_result_header(stored: &StoredResult) -> String {
    let mut table = new_table();
    table.set_header(vec!["Result", "Kind", "Saved At"]);
    table.add_row(vec![
        stored.id.clone(),
        stored.kind.to_string(),
        stored.created_at.to_rfc3339(),
    ]);
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clusters::ClusterRegistry;

    #[test]
    fn categories_table_lists_every_slot() {
        let registry = ClusterRegistry::with_defaults();
        let rendered = render_categories_table(registry.list_categories());
        assert!(rendered.contains("CL05"));
        assert!(rendered.contains("English/Kiswahili"));
        assert!(rendered.contains("CL20"));
    }

    #[test]
    fn unqualified_clusters_render_dashes() {
        let registry = ClusterRegistry::with_defaults();
        let category = registry.get_category("CL01").expect("CL01");
        let rendered = render_clusters_table(&[ClusterResult::unqualified(category)]);
        assert!(rendered.contains("NO"));
        assert!(rendered.contains('-'));
    }
}
