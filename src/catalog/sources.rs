use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::catalog::http::{catalog_url, fetch_json};
use crate::catalog::{records_from_payload, CatalogSource, CourseCategory};

const BUILTIN_DEGREE: &str = include_str!("../../data/catalog/degree.json");
const BUILTIN_DIPLOMA: &str = include_str!("../../data/catalog/diploma.json");
const BUILTIN_CERTIFICATE: &str = include_str!("../../data/catalog/certificate.json");
const BUILTIN_KMTC: &str = include_str!("../../data/catalog/kmtc.json");
const BUILTIN_ARTISAN: &str = include_str!("../../data/catalog/artisan.json");

#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCatalog;

#[async_trait]
impl CatalogSource for BuiltinCatalog {
    fn name(&self) -> &str {
        "builtin"
    }

    async fn fetch_records(&self, category: CourseCategory) -> Result<Vec<Value>> {
        let raw = match category {
            CourseCategory::Degree => BUILTIN_DEGREE,
            CourseCategory::Diploma => BUILTIN_DIPLOMA,
            CourseCategory::Certificate => BUILTIN_CERTIFICATE,
            CourseCategory::Kmtc => BUILTIN_KMTC,
            CourseCategory::Artisan => BUILTIN_ARTISAN,
        };
        let payload: Value = serde_json::from_str(raw)
            .with_context(|| format!("builtin {category} catalog is not valid JSON"))?;
        records_from_payload(&payload)
    }
}

#[derive(Debug, Clone)]
pub struct DirectoryCatalog {
    root: PathBuf,
}

impl DirectoryCatalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl CatalogSource for DirectoryCatalog {
    fn name(&self) -> &str {
        "directory"
    }

    async fn fetch_records(&self, category: CourseCategory) -> Result<Vec<Value>> {
        let path = self.root.join(format!("{}.json", category.as_slug()));
        debug!("reading {category} catalog from {}", path.display());
        let data = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("failed reading catalog: {}", path.display()))?;
        let payload: Value = serde_json::from_str(&data)
            .with_context(|| format!("failed parsing catalog JSON: {}", path.display()))?;
        records_from_payload(&payload)
    }
}

#[derive(Debug, Clone)]
pub struct HttpCatalog {
    base_url: String,
}

impl HttpCatalog {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl CatalogSource for HttpCatalog {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch_records(&self, category: CourseCategory) -> Result<Vec<Value>> {
        let url = catalog_url(&self.base_url, category.as_slug());
        let payload = fetch_json(&url).await?;
        records_from_payload(&payload)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    records: BTreeMap<CourseCategory, Vec<Value>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(mut self, category: CourseCategory, records: Vec<Value>) -> Self {
        self.records.insert(category, records);
        self
    }
}

#[async_trait]
impl CatalogSource for MemoryCatalog {
    fn name(&self) -> &str {
        "memory"
    }

    async fn fetch_records(&self, category: CourseCategory) -> Result<Vec<Value>> {
        Ok(self.records.get(&category).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    #[tokio::test]
    async fn builtin_catalogs_parse_without_malformed_records() {
        for category in CourseCategory::ALL {
            let records = BuiltinCatalog
                .fetch_records(category)
                .await
                .expect("builtin catalog parses");
            assert!(!records.is_empty(), "{category} catalog is empty");
            let catalog = Catalog::from_records(category, "builtin", &records);
            assert_eq!(catalog.malformed().count(), 0, "{category} has malformed records");
        }
    }

    #[tokio::test]
    async fn missing_directory_file_is_an_error() {
        let source = DirectoryCatalog::new("/nonexistent/kcse-catalog");
        let result = source.fetch_records(CourseCategory::Artisan).await;
        assert!(result.is_err());
    }

    #[test]
    fn memory_catalog_returns_empty_for_unknown_category() {
        let source = MemoryCatalog::new()
            .with_records(CourseCategory::Degree, vec![serde_json::json!({"name": "x"})]);
        let degree = tokio_test::block_on(source.fetch_records(CourseCategory::Degree))
            .expect("memory fetch");
        let kmtc = tokio_test::block_on(source.fetch_records(CourseCategory::Kmtc))
            .expect("memory fetch");
        assert_eq!(degree.len(), 1);
        assert!(kmtc.is_empty());
    }
}
