//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use folio_numbers::CollectorConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Relational stores
    #[serde(default)]
    pub sources: Sources,

    /// Document stores
    #[serde(default)]
    pub couch: CouchSettings,

    /// Metric selection
    #[serde(default)]
    pub collector: CollectorConfig,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,
}

/// SQLite database files, opened read-only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sources {
    /// Things and transactions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thingdb: Option<PathBuf>,

    /// Covers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coverdb: Option<PathBuf>,
}

/// CouchDB server and database names.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CouchSettings {
    /// Server URL; without it no document store is opened
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Editions database
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editions_db: Option<String>,

    /// Works database
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub works_db: Option<String>,

    /// Seeds database
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seeds_db: Option<String>,

    /// Database holding the daily counts snapshots
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_db: Option<String>,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,

    /// Log filter used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".folio").join("config.toml"))
    }

    /// Load configuration from the default path, or defaults if there is no file.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;

        if path.exists() {
            Self::from_file(&path)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit file, which must exist.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| CliError::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Render the configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
            log_level: default_log_level(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

fn default_log_level() -> String {
    "info".to_string()
}
