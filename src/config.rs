//! Adapter configuration.
//!
//! ```toml
//! introspection_concurrency = 5
//!
//! [json_columns]
//! "analytics.events" = ["payload", "tags"]
//! "app.users" = ["metadata"]
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{BqError, BqResult};

/// Main adapter configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Qualified table name to JSON-bearing column names.
    #[serde(default)]
    pub json_columns: BTreeMap<String, Vec<String>>,

    /// Metadata queries in flight at once during introspection.
    #[serde(default = "default_concurrency")]
    pub introspection_concurrency: usize,
}

fn default_concurrency() -> usize {
    5
}

impl Default for Config {
    fn default() -> Self {
        Self {
            json_columns: BTreeMap::new(),
            introspection_concurrency: default_concurrency(),
        }
    }
}

impl Config {
    pub fn from_toml_str(content: &str) -> BqResult<Self> {
        let config: Config = toml::from_str(content)?;
        if config.introspection_concurrency == 0 {
            return Err(BqError::Config(
                "introspection_concurrency must be at least 1".to_string(),
            ));
        }
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> BqResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(
            path = %path.display(),
            tables = config.json_columns.len(),
            "loaded configuration"
        );
        Ok(config)
    }

    /// Load from [`Config::default_path`] if it exists, otherwise defaults.
    pub fn load_or_default() -> BqResult<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(path),
            _ => Ok(Self::default()),
        }
    }

    /// `<config dir>/bqsql/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("bqsql").join("config.toml"))
    }

    /// Add JSON columns for a table.
    pub fn json_table<S: Into<String>>(
        mut self,
        table: impl Into<String>,
        columns: impl IntoIterator<Item = S>,
    ) -> Self {
        self.json_columns
            .insert(table.into(), columns.into_iter().map(Into::into).collect());
        self
    }
}
