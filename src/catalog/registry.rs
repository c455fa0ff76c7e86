use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use tracing::{info, warn};

use crate::catalog::{
    BuiltinCatalog, Catalog, CatalogSource, CourseCategory, DirectoryCatalog, HttpCatalog,
};
use crate::config::{expand_tilde, CatalogConfig};
use crate::error::{EngineError, EngineResult};

#[derive(Clone)]
pub struct CourseRegistry {
    source: Arc<dyn CatalogSource>,
    timeout: Duration,
}

impl CourseRegistry {
    pub fn new(source: Arc<dyn CatalogSource>, timeout: Duration) -> Self {
        Self { source, timeout }
    }

    pub fn builtin() -> Self {
        Self::new(
            Arc::new(BuiltinCatalog),
            Duration::from_secs(crate::config::DEFAULT_CATALOG_TIMEOUT_SECS),
        )
    }

    pub fn from_config(config: &CatalogConfig) -> Result<Self> {
        let source: Arc<dyn CatalogSource> = match config.source.trim().to_ascii_lowercase().as_str()
        {
            "builtin" | "" => Arc::new(BuiltinCatalog),
            "directory" | "dir" => {
                if config.directory.trim().is_empty() {
                    return Err(anyhow!("catalog.directory must be set for a directory source"));
                }
                Arc::new(DirectoryCatalog::new(expand_tilde(&config.directory)))
            }
            "http" => {
                if config.base_url.trim().is_empty() {
                    return Err(anyhow!("catalog.base_url must be set for an http source"));
                }
                Arc::new(HttpCatalog::new(config.base_url.clone()))
            }
            other => return Err(anyhow!("unknown catalog source: {other}")),
        };
        Ok(Self::new(
            source,
            Duration::from_secs(config.timeout_secs.max(1)),
        ))
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    pub async fn courses_for_category(&self, category: CourseCategory) -> EngineResult<Catalog> {
        let fetch = self.source.fetch_records(category);
        match tokio::time::timeout(self.timeout, fetch).await {
            Ok(Ok(records)) => {
                let catalog = Catalog::from_records(category, self.source.name(), &records);
                info!(
                    "loaded {category} catalog from {}: {} records ({} malformed)",
                    self.source.name(),
                    catalog.len(),
                    catalog.malformed().count()
                );
                Ok(catalog)
            }
            Ok(Err(error)) => {
                warn!("{category} catalog fetch from {} failed: {error:#}", self.source.name());
                Err(EngineError::CatalogUnavailable {
                    category: category.to_string(),
                    reason: format!("{error:#}"),
                })
            }
            Err(_) => {
                warn!(
                    "{category} catalog fetch from {} timed out after {:?}",
                    self.source.name(),
                    self.timeout
                );
                Err(EngineError::CatalogUnavailable {
                    category: category.to_string(),
                    reason: format!("timed out after {:?}", self.timeout),
                })
            }
        }
    }
}
