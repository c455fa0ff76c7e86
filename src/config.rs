use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::aggregate::DEFAULT_TOP_N;
use crate::clusters::{TierThresholds, TIER_A_MIN_WEIGHT, TIER_B_MIN_WEIGHT};

pub const DEFAULT_CATALOG_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub calculator: CalculatorConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_catalog_source")]
    pub source: String,
    #[serde(default)]
    pub directory: String,
    #[serde(default)]
    pub base_url: String,
    #[serde(default = "default_catalog_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculatorConfig {
    #[serde(default = "default_tier_a_min_weight")]
    pub tier_a_min_weight: f64,
    #[serde(default = "default_tier_b_min_weight")]
    pub tier_b_min_weight: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub catalog_dir: Option<String>,
    pub catalog_url: Option<String>,
}

impl Config {
    pub fn default_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".config/kcse-course-checker/config.toml")
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(|p| p.to_path_buf())
            .unwrap_or_else(Self::default_path);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(&path)
            .with_context(|| format!("failed reading config: {}", path.display()))?;
        let parsed: Self = toml::from_str(&data)
            .with_context(|| format!("failed parsing TOML config: {}", path.display()))?;
        Ok(parsed)
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(dir) = overrides.catalog_dir {
            self.catalog.source = "directory".to_string();
            self.catalog.directory = dir;
        }
        if let Some(url) = overrides.catalog_url {
            self.catalog.source = "http".to_string();
            self.catalog.base_url = url;
        }
    }

    pub fn write_template(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed creating config directory: {}", parent.display())
            })?;
        }
        fs::write(path, Self::default_template())
            .with_context(|| format!("failed writing config template: {}", path.display()))
    }

    pub fn resolved_db_path(&self) -> PathBuf {
        expand_tilde(&self.storage.db_path)
    }

    pub fn thresholds(&self) -> TierThresholds {
        TierThresholds {
            a_min: self.calculator.tier_a_min_weight,
            b_min: self.calculator.tier_b_min_weight,
        }
    }

    pub fn default_template() -> String {
        let template = r#"[catalog]
# builtin, directory or http
source = "builtin"
directory = ""
base_url = ""
timeout_secs = 10

[storage]
db_path = "~/.local/share/kcse-course-checker/results.db"

[calculator]
tier_a_min_weight = 40.0
tier_b_min_weight = 30.0

[report]
top_n = 5
"#;
        template.to_string()
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            source: default_catalog_source(),
            directory: String::new(),
            base_url: String::new(),
            timeout_secs: default_catalog_timeout_secs(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            tier_a_min_weight: default_tier_a_min_weight(),
            tier_b_min_weight: default_tier_b_min_weight(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
        }
    }
}

fn default_catalog_source() -> String {
    "builtin".to_string()
}

fn default_catalog_timeout_secs() -> u64 {
    DEFAULT_CATALOG_TIMEOUT_SECS
}

fn default_db_path() -> String {
    "~/.local/share/kcse-course-checker/results.db".to_string()
}

fn default_tier_a_min_weight() -> f64 {
    TIER_A_MIN_WEIGHT
}

fn default_tier_b_min_weight() -> f64 {
    TIER_B_MIN_WEIGHT
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_parses_to_the_defaults() {
        let parsed: Config = toml::from_str(&Config::default_template()).expect("template");
        let defaults = Config::default();
        assert_eq!(parsed.catalog.source, defaults.catalog.source);
        assert_eq!(parsed.catalog.timeout_secs, defaults.catalog.timeout_secs);
        assert_eq!(parsed.storage.db_path, defaults.storage.db_path);
        assert_eq!(parsed.thresholds(), defaults.thresholds());
        assert_eq!(parsed.report.top_n, defaults.report.top_n);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let parsed: Config = toml::from_str(
            r#"
[calculator]
tier_a_min_weight = 42.5
"#,
        )
        .expect("partial config");
        assert_eq!(parsed.calculator.tier_a_min_weight, 42.5);
        assert_eq!(parsed.calculator.tier_b_min_weight, TIER_B_MIN_WEIGHT);
        assert_eq!(parsed.catalog.source, "builtin");
    }

    #[test]
    fn overrides_switch_the_catalog_source() {
        let mut config = Config::default();
        config.apply_overrides(ConfigOverrides {
            catalog_dir: Some("/srv/catalog".to_string()),
            catalog_url: None,
        });
        assert_eq!(config.catalog.source, "directory");
        assert_eq!(config.catalog.directory, "/srv/catalog");

        config.apply_overrides(ConfigOverrides {
            catalog_dir: None,
            catalog_url: Some("https://courses.example.ke/api".to_string()),
        });
        assert_eq!(config.catalog.source, "http");
    }

    #[test]
    fn missing_file_loads_defaults() {
        let path = std::env::temp_dir().join("kcse-course-checker-missing/config.toml");
        let config = Config::load(Some(&path)).expect("defaults");
        assert_eq!(config.report.top_n, DEFAULT_TOP_N);
    }

    #[test]
    fn expand_tilde_leaves_absolute_paths_alone() {
        assert_eq!(expand_tilde("/var/lib/x.db"), PathBuf::from("/var/lib/x.db"));
    }
}
