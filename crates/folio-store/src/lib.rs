//! Folio Storage Layer
//!
//! Implements the `RelationalDb` and `DocumentDb` traits from `folio-domain`.
//!
//! # Adapters
//!
//! - [`SqliteDb`]: things, transactions and covers in SQLite, queried with bound parameters
//! - [`CouchDb`]: CouchDB-compatible document stores over HTTP (editions, works, seeds, admin)
//! - [`MemoryDocumentDb`]: sorted in-memory document store, loadable from JSON fixtures
//!
//! # Examples
//!
//! ```no_run
//! use folio_domain::{RelationalDb, SqlParam};
//! use folio_store::SqliteDb;
//!
//! let db = SqliteDb::open_in_memory().unwrap();
//! let rows = db
//!     .query("SELECT count(*) AS count FROM thing WHERE type = ?1", &[SqlParam::Int(1)])
//!     .unwrap();
//! assert_eq!(rows[0].get_i64("count"), Some(0));
//! ```

#![warn(missing_docs)]

mod couch;
mod error;
mod memory;
mod sqlite;

pub use couch::CouchDb;
pub use error::StoreError;
pub use memory::MemoryDocumentDb;
pub use sqlite::SqliteDb;
