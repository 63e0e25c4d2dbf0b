//! Folio Domain Layer
//!
//! Core types shared by every Folio crate: the inputs a metric is evaluated
//! against, the kinds of metric the catalog knows about, the error taxonomy,
//! and the trait interfaces of the data stores metrics read from.
//!
//! ## Key Concepts
//!
//! - **MetricContext**: the named inputs of one evaluation (date range plus store handles)
//! - **MetricKind**: range, delta or total; decides the storage key of a result
//! - **RelationalDb / DocumentDb**: read-only capabilities implemented by `folio-store`
//! - **Snapshot**: yesterday's persisted counts record, keyed `counts-YYYY-MM-DD`
//!
//! ## Architecture
//!
//! This crate holds no infrastructure. Store adapters live in `folio-store`,
//! the metric catalog in `folio-numbers`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod context;
pub mod error;
pub mod metric;
pub mod traits;
pub mod values;

// Re-exports for convenience
pub use context::{Field, MetricContext};
pub use error::{DbError, MetricError};
pub use metric::{snapshot_key, MetricKind, DATE_FORMAT};
pub use traits::{DocumentDb, RelationalDb};
pub use values::{DbInfo, Document, Row, SqlParam, SqlValue, ViewOptions, ViewResult, ViewRow};
