//! Configuration file
//!
//! ```json
//! { "schema_path": "posts.schema.json", "log_level": "info", "default_limit": 50 }
//! ```
//!
//! A relative `schema_path` resolves against the config file's directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::errors::{CliError, CliResult};
use crate::observability::{log_event, Event, Logger, Severity};
use crate::schema::{SchemaLoader, TableSchema};

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Schema definition file (required)
    pub schema_path: String,

    /// Minimum log severity (optional, default "warn")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Page size for requests without a limit (optional)
    #[serde(default)]
    pub default_limit: Option<u64>,

    #[serde(skip)]
    base_dir: PathBuf,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let mut config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;
        config.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.schema_path.trim().is_empty() {
            return Err(CliError::config_error("schema_path must not be empty"));
        }
        self.severity()?;
        if self.default_limit == Some(0) {
            return Err(CliError::config_error("default_limit must be > 0"));
        }
        Ok(())
    }

    /// Parsed log level
    pub fn severity(&self) -> CliResult<Severity> {
        Severity::parse(&self.log_level).ok_or_else(|| {
            CliError::config_error(format!(
                "Unknown log_level '{}': expected trace, info, warn, error or fatal",
                self.log_level
            ))
        })
    }

    /// Applies the configured log level process-wide
    pub fn apply_logging(&self) -> CliResult<()> {
        Logger::set_min_severity(self.severity()?);
        log_event(Event::ConfigLoaded, &[("log_level", self.log_level.as_str())]);
        Ok(())
    }

    /// Schema path resolved against the config file's directory
    pub fn schema_file(&self) -> PathBuf {
        let path = Path::new(&self.schema_path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Loads and validates the configured schema
    pub fn load_schema(&self) -> CliResult<TableSchema> {
        Ok(SchemaLoader::load_file(&self.schema_file())?)
    }
}
