//! Error types for store access and metric evaluation

use thiserror::Error;

/// Errors raised by a data store adapter
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DbError {
    /// The requested document or key does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// The store could not be reached or refused the request
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// The store rejected the query
    #[error("Query failed: {0}")]
    Query(String),

    /// The store answered with data that could not be decoded
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Errors that end the evaluation of a single metric
///
/// None of these are retried; the caller decides whether to carry on with
/// the remaining metrics.
#[derive(Error, Debug)]
pub enum MetricError {
    /// A required input was not supplied; raised before any query runs
    #[error("{field} is a required argument for {metric}")]
    MissingArgument {
        /// Name of the absent input (e.g. `thingdb`)
        field: &'static str,
        /// Metric that needed it
        metric: String,
    },

    /// A type key has no identifier in the things table
    #[error("No id for type '{0}' in the database")]
    InvalidType(String),

    /// A row or column the computation depends on was absent
    #[error("Not found: {0}")]
    NotFound(String),

    /// A value was present but had the wrong shape
    #[error("Unexpected value for {what}: {detail}")]
    UnexpectedValue {
        /// What was being read
        what: String,
        /// What was wrong with it
        detail: String,
    },

    /// The catalog has no metric under this name
    #[error("Unknown metric: {0}")]
    UnknownMetric(String),

    /// The backing store failed
    #[error("Upstream error: {0}")]
    Upstream(#[from] DbError),
}

impl MetricError {
    /// Whether this error was raised before any store was touched
    pub fn is_missing_argument(&self) -> bool {
        matches!(self, MetricError::MissingArgument { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_argument_message() {
        let err = MetricError::MissingArgument {
            field: "thingdb",
            metric: "human_edits".to_string(),
        };
        assert_eq!(err.to_string(), "thingdb is a required argument for human_edits");
        assert!(err.is_missing_argument());
    }

    #[test]
    fn test_upstream_from_db_error() {
        let err: MetricError = DbError::Unavailable("connection refused".to_string()).into();
        assert!(matches!(err, MetricError::Upstream(DbError::Unavailable(_))));
        assert!(!err.is_missing_argument());
    }
}
