pub mod migrations;
pub mod store;

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

pub use store::ResultStore;

const RESULT_ID_LEN: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultKind {
    Clusters,
    Courses,
}

impl ResultKind {
    pub fn as_slug(&self) -> &'static str {
        match self {
            ResultKind::Clusters => "clusters",
            ResultKind::Courses => "courses",
        }
    }
}

impl Display for ResultKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_slug())
    }
}

impl FromStr for ResultKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clusters" => Ok(ResultKind::Clusters),
            "courses" => Ok(ResultKind::Courses),
            other => Err(format!("unknown result kind: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredResult {
    pub id: String,
    pub kind: ResultKind,
    pub created_at: DateTime<Utc>,
    pub payload: Value,
}

pub fn result_id(payload: &Value) -> String {
    let canonical = serde_json::to_string(payload).unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let mut digest = format!("{:x}", hasher.finalize());
    digest.truncate(RESULT_ID_LEN);
    digest
}
