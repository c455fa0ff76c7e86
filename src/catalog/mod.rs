pub mod http;
pub mod normalize;
pub mod registry;
pub mod sources;

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::error::EngineError;
use crate::grades::Grade;

pub use normalize::{normalize_record, records_from_payload};
pub use registry::CourseRegistry;
pub use sources::{BuiltinCatalog, DirectoryCatalog, HttpCatalog, MemoryCatalog};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum CourseCategory {
    Degree,
    Diploma,
    Certificate,
    Kmtc,
    Artisan,
}

impl CourseCategory {
    pub const ALL: [CourseCategory; 5] = [
        CourseCategory::Degree,
        CourseCategory::Diploma,
        CourseCategory::Certificate,
        CourseCategory::Kmtc,
        CourseCategory::Artisan,
    ];

    pub fn as_slug(&self) -> &'static str {
        match self {
            Self::Degree => "degree",
            Self::Diploma => "diploma",
            Self::Certificate => "certificate",
            Self::Kmtc => "kmtc",
            Self::Artisan => "artisan",
        }
    }
}

impl Display for CourseCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let display = match self {
            Self::Degree => "Degree",
            Self::Diploma => "Diploma",
            Self::Certificate => "Certificate",
            Self::Kmtc => "KMTC",
            Self::Artisan => "Artisan",
        };
        write!(f, "{display}")
    }
}

#[derive(Debug, Error)]
#[error("unknown course category: {0}")]
pub struct CategoryParseError(pub String);

impl From<CategoryParseError> for EngineError {
    fn from(value: CategoryParseError) -> Self {
        EngineError::UnknownCategory(value.0)
    }
}

impl FromStr for CourseCategory {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "degree" | "degrees" | "bachelor" | "university" => Ok(Self::Degree),
            "diploma" | "diplomas" => Ok(Self::Diploma),
            "certificate" | "certificates" | "cert" => Ok(Self::Certificate),
            "kmtc" | "medical" | "kenya_medical_training_college" => Ok(Self::Kmtc),
            "artisan" | "artisans" => Ok(Self::Artisan),
            _ => Err(CategoryParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementGroup {
    pub subjects: Vec<String>,
    pub min_grade: Grade,
}

impl RequirementGroup {
    pub fn label(&self) -> String {
        format!("{} {}", self.subjects.join("/"), self.min_grade)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseRequirement {
    pub course_id: String,
    pub course_name: String,
    pub category: CourseCategory,
    pub min_mean_grade: Grade,
    pub subject_requirements: Vec<RequirementGroup>,
    pub county: Option<String>,
    pub institution: Option<String>,
    pub institution_type: Option<String>,
    pub cluster: Option<String>,
    #[serde(default)]
    pub record: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("malformed course record #{index}: {reason}")]
pub struct MalformedCourseRecord {
    pub index: usize,
    pub course_id: Option<String>,
    pub reason: String,
}

pub type CatalogEntry = std::result::Result<CourseRequirement, MalformedCourseRecord>;

#[derive(Debug, Clone)]
pub struct Catalog {
    pub category: CourseCategory,
    pub source: String,
    pub fetched_at: DateTime<Utc>,
    pub raw_hash: String,
    pub entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn from_records(
        category: CourseCategory,
        source: impl Into<String>,
        records: &[Value],
    ) -> Self {
        let canonical = serde_json::to_string(records).unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(canonical.as_bytes());
        let raw_hash = format!("{:x}", hasher.finalize());
        let entries = records
            .iter()
            .enumerate()
            .map(|(index, record)| normalize_record(index, category, record))
            .collect();
        Self {
            category,
            source: source.into(),
            fetched_at: Utc::now(),
            raw_hash,
            entries,
        }
    }

    pub fn from_courses(category: CourseCategory, courses: Vec<CourseRequirement>) -> Self {
        Self {
            category,
            source: "memory".to_string(),
            fetched_at: Utc::now(),
            raw_hash: String::new(),
            entries: courses.into_iter().map(Ok).collect(),
        }
    }

    pub fn courses(&self) -> impl Iterator<Item = &CourseRequirement> {
        self.entries.iter().filter_map(|e| e.as_ref().ok())
    }

    pub fn malformed(&self) -> impl Iterator<Item = &MalformedCourseRecord> {
        self.entries.iter().filter_map(|e| e.as_ref().err())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
pub trait CatalogSource: Send + Sync {
    fn name(&self) -> &str;
    async fn fetch_records(&self, category: CourseCategory) -> Result<Vec<Value>>;
}
