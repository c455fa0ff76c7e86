use std::str::FromStr;

use anyhow::bail;
use serde_json::{Map, Value};

use crate::catalog::{CourseCategory, CourseRequirement, MalformedCourseRecord, RequirementGroup};
use crate::clusters::normalize_cluster_id;
use crate::grades::subjects::split_alternatives;
use crate::grades::{canonical_subject, Grade};

const ID_PATHS: &[&str] = &["id", "course_id", "code", "course_code", "programme_code"];
const NAME_PATHS: &[&str] = &[
    "name",
    "title",
    "programme_name",
    "program_name",
    "course_name",
    "programme",
    "course",
];
const MEAN_GRADE_PATHS: &[&str] = &[
    "min_mean_grade",
    "minimum_mean_grade",
    "minimum_grade",
    "mean_grade",
    "min_grade",
    "requirements.mean_grade",
];
const REQUIREMENT_PATHS: &[&str] = &[
    "subject_requirements",
    "requirements.subjects",
    "requirements",
    "subjects",
];
const COUNTY_PATHS: &[&str] = &["county", "location", "region"];
const INSTITUTION_PATHS: &[&str] = &[
    "institution",
    "institution_name",
    "university",
    "college",
    "campus",
];
const INSTITUTION_TYPE_PATHS: &[&str] = &["institution_type", "type", "ownership"];
const CLUSTER_PATHS: &[&str] = &["cluster", "cluster_group", "cluster_id"];
const GROUP_SUBJECT_PATHS: &[&str] = &["subjects", "subject", "alternatives", "name"];
const GROUP_GRADE_PATHS: &[&str] = &["min_grade", "minimum_grade", "grade", "minimum"];

pub fn normalize_record(
    index: usize,
    category: CourseCategory,
    value: &Value,
) -> Result<CourseRequirement, MalformedCourseRecord> {
    let Some(object) = value.as_object() else {
        return Err(malformed(index, None, "record is not a JSON object"));
    };

    let explicit_id = string_from_paths(object, ID_PATHS);
    let fail = |reason: String| malformed(index, explicit_id.clone(), reason);

    let course_name =
        string_from_paths(object, NAME_PATHS).ok_or_else(|| fail("missing course name".into()))?;
    let raw_mean = string_from_paths(object, MEAN_GRADE_PATHS)
        .ok_or_else(|| fail("missing minimum mean grade".into()))?;
    let min_mean_grade = Grade::from_str(&raw_mean)
        .map_err(|error| fail(format!("minimum mean grade: {error}")))?;

    let subject_requirements = match first_present(object, REQUIREMENT_PATHS) {
        Some(value) => parse_requirement_groups(value).map_err(fail)?,
        None => Vec::new(),
    };

    let cluster = string_from_paths(object, CLUSTER_PATHS)
        .map(|raw| normalize_cluster_id(&raw).unwrap_or(raw));

    Ok(CourseRequirement {
        course_id: explicit_id
            .clone()
            .unwrap_or_else(|| format!("{}-{:04}", category.as_slug(), index + 1)),
        course_name,
        category,
        min_mean_grade,
        subject_requirements,
        county: string_from_paths(object, COUNTY_PATHS),
        institution: string_from_paths(object, INSTITUTION_PATHS),
        institution_type: string_from_paths(object, INSTITUTION_TYPE_PATHS),
        cluster,
        record: object.clone(),
    })
}

fn parse_requirement_groups(value: &Value) -> Result<Vec<RequirementGroup>, String> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items.iter().map(parse_group_entry).collect(),
        Value::Object(map) => {
            let mut groups = Vec::with_capacity(map.len());
            // `requirements` may also carry the mean grade
            for (label, grade) in map.iter().filter(|(label, _)| !is_mean_grade_key(label)) {
                let subjects = split_alternatives(label);
                if subjects.is_empty() {
                    return Err(format!("requirement {label:?} names no subject"));
                }
                let Some(raw_grade) = grade.as_str() else {
                    return Err(format!("requirement {label:?} has a non-text grade"));
                };
                let min_grade = Grade::from_str(raw_grade)
                    .map_err(|error| format!("requirement {label:?}: {error}"))?;
                groups.push(RequirementGroup {
                    subjects,
                    min_grade,
                });
            }
            Ok(groups)
        }
        other => Err(format!("unsupported requirement shape: {other}")),
    }
}

fn is_mean_grade_key(label: &str) -> bool {
    MEAN_GRADE_PATHS
        .iter()
        .any(|path| !path.contains('.') && path.eq_ignore_ascii_case(label.trim()))
}

fn parse_group_entry(entry: &Value) -> Result<RequirementGroup, String> {
    let Some(object) = entry.as_object() else {
        return Err(format!("requirement entry is not an object: {entry}"));
    };
    let subjects = match first_present(object, GROUP_SUBJECT_PATHS) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(canonical_subject)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>(),
        Some(Value::String(label)) => split_alternatives(label),
        _ => Vec::new(),
    };
    if subjects.is_empty() {
        return Err("requirement entry names no subject".to_string());
    }
    let raw_grade = string_from_paths(object, GROUP_GRADE_PATHS)
        .ok_or_else(|| format!("requirement {} has no minimum grade", subjects.join("/")))?;
    let min_grade = Grade::from_str(&raw_grade)
        .map_err(|error| format!("requirement {}: {error}", subjects.join("/")))?;
    Ok(RequirementGroup {
        subjects,
        min_grade,
    })
}

const RECORD_WRAPPER_KEYS: &[&str] = &[
    "courses",
    "programmes",
    "programs",
    "data",
    "items",
    "results",
    "records",
];

/// Bare array or an array under a known wrapper key; anything else is an error.
pub fn records_from_payload(value: &Value) -> anyhow::Result<Vec<Value>> {
    match find_records(value) {
        Some(items) => Ok(items.clone()),
        None => {
            let preview: String = value.to_string().chars().take(120).collect();
            bail!("catalog payload holds no course list: {preview}")
        }
    }
}

fn find_records(value: &Value) -> Option<&Vec<Value>> {
    if let Some(items) = value.as_array() {
        return Some(items);
    }
    let object = value.as_object()?;
    RECORD_WRAPPER_KEYS
        .iter()
        .filter_map(|key| object_get_case_insensitive(object, key))
        .find_map(|inner| match inner {
            Value::Array(items) => Some(items),
            Value::Object(_) => find_records(inner),
            _ => None,
        })
}

fn malformed(index: usize, course_id: Option<String>, reason: impl Into<String>) -> MalformedCourseRecord {
    MalformedCourseRecord {
        index,
        course_id,
        reason: reason.into(),
    }
}

fn first_present<'a>(object: &'a Map<String, Value>, paths: &[&str]) -> Option<&'a Value> {
    paths
        .iter()
        .filter_map(|path| object_path_value(object, path))
        .find(|value| !value.is_null())
}

fn string_from_paths(object: &Map<String, Value>, paths: &[&str]) -> Option<String> {
    for path in paths {
        let Some(value) = object_path_value(object, path) else {
            continue;
        };
        match value {
            Value::String(s) => {
                if !s.trim().is_empty() {
                    return Some(s.trim().to_string());
                }
            }
            Value::Number(n) => return Some(n.to_string()),
            _ => {}
        }
    }
    None
}

fn object_path_value<'a>(object: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let first = segments.next()?;
    let mut current = object_get_case_insensitive(object, first)?;
    for segment in segments {
        let nested = current.as_object()?;
        current = object_get_case_insensitive(nested, segment)?;
    }
    Some(current)
}

fn object_get_case_insensitive<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    object.get(key).or_else(|| {
        object
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    })
}
