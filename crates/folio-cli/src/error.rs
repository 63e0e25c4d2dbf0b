//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A configured store could not be opened
    #[error("Store error: {0}")]
    Store(#[from] folio_store::StoreError),

    /// The run could not start
    #[error("Metric error: {0}")]
    Metric(#[from] folio_domain::MetricError),

    /// Some metrics failed for reasons other than a missing input
    #[error("{0} metric(s) failed")]
    MetricsFailed(usize),
}
