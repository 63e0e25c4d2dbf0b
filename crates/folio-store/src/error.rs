//! Error types for the storage adapters

use folio_domain::DbError;
use thiserror::Error;

/// Errors that can occur while opening or seeding a store
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Base URL of a document store could not be used
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Fixture file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Fixture file is not valid JSON
    #[error("Invalid fixture: {0}")]
    Fixture(#[from] serde_json::Error),
}

impl From<StoreError> for DbError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Database(e) => sqlite_to_db_error(e),
            StoreError::Http(e) => DbError::Unavailable(e.to_string()),
            StoreError::InvalidUrl(msg) => DbError::Unavailable(msg),
            StoreError::Io(e) => DbError::Unavailable(e.to_string()),
            StoreError::Fixture(e) => DbError::InvalidData(e.to_string()),
        }
    }
}

/// Split SQLite failures into "store unreachable" and "query rejected"
pub(crate) fn sqlite_to_db_error(e: rusqlite::Error) -> DbError {
    use rusqlite::ErrorCode;

    match &e {
        rusqlite::Error::SqliteFailure(failure, _)
            if matches!(
                failure.code,
                ErrorCode::CannotOpen
                    | ErrorCode::DatabaseBusy
                    | ErrorCode::DatabaseLocked
                    | ErrorCode::NotADatabase
                    | ErrorCode::SystemIoFailure
            ) =>
        {
            DbError::Unavailable(e.to_string())
        }
        _ => DbError::Query(e.to_string()),
    }
}
