//! Trait definitions for the data stores metrics read from
//!
//! These traits define the boundary between metric logic and infrastructure.
//! Implementations live in `folio-store`. Every operation is read-only and
//! blocking; failures are returned, never retried.

use crate::error::DbError;
use crate::values::{DbInfo, Document, Row, SqlParam, ViewOptions, ViewResult};

/// Relational store answering parameterized SQL
///
/// Implemented by the infrastructure layer (folio-store)
pub trait RelationalDb {
    /// Run a query and return every row
    ///
    /// Placeholders are positional (`?1`, `?2`, ...) and bound from `params`.
    fn query(&self, sql: &str, params: &[SqlParam]) -> Result<Vec<Row>, DbError>;
}

/// Document store with sorted views
///
/// Implemented by the infrastructure layer (folio-store)
pub trait DocumentDb {
    /// Read a view; `_all_docs` is the primary key index
    fn view(&self, name: &str, options: &ViewOptions) -> Result<ViewResult, DbError>;

    /// Fetch a document by key; an absent key is `DbError::NotFound`
    fn get(&self, key: &str) -> Result<Document, DbError>;

    /// Store-level metadata
    fn info(&self) -> Result<DbInfo, DbError>;
}
