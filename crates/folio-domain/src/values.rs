//! Values exchanged with data stores

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A document from a document store (schemaless JSON)
pub type Document = serde_json::Value;

/// A bound query parameter
///
/// Parameters are always bound by the store adapter, never spliced into SQL text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    /// Integer parameter (identifiers)
    Int(i64),

    /// Text parameter (keys, `YYYY-MM-DD` dates)
    Text(String),
}

impl From<i64> for SqlParam {
    fn from(value: i64) -> Self {
        SqlParam::Int(value)
    }
}

impl From<&str> for SqlParam {
    fn from(value: &str) -> Self {
        SqlParam::Text(value.to_string())
    }
}

impl From<String> for SqlParam {
    fn from(value: String) -> Self {
        SqlParam::Text(value)
    }
}

impl From<NaiveDate> for SqlParam {
    fn from(value: NaiveDate) -> Self {
        SqlParam::Text(crate::metric::format_date(value))
    }
}

/// A single column value in a result row
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// SQL NULL
    Null,
    /// Integer column
    Int(i64),
    /// Floating point column
    Real(f64),
    /// Text column
    Text(String),
    /// Binary column
    Blob(Vec<u8>),
}

/// A result row with named columns
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<(String, SqlValue)>,
}

impl Row {
    /// Create an empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column (builder style)
    pub fn with(mut self, name: impl Into<String>, value: SqlValue) -> Self {
        self.push(name, value);
        self
    }

    /// Append a column
    pub fn push(&mut self, name: impl Into<String>, value: SqlValue) {
        self.columns.push((name.into(), value));
    }

    /// Look up a column by name
    pub fn get(&self, name: &str) -> Option<&SqlValue> {
        self.columns.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Look up an integer column by name
    ///
    /// Returns `None` when the column is absent or not an integer.
    pub fn get_i64(&self, name: &str) -> Option<i64> {
        match self.get(name)? {
            SqlValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Column names in result order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }
}

/// Options for a view lookup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewOptions {
    /// Start at the first key greater than or equal to this one
    pub startkey: Option<String>,

    /// Maximum rows to return; `Some(0)` asks only for `offset`/`total_rows`
    pub limit: Option<usize>,

    /// Accept a possibly out-of-date index instead of waiting for a rebuild
    pub stale_ok: bool,
}

impl ViewOptions {
    /// Options with nothing set
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the start key
    pub fn startkey(mut self, key: impl Into<String>) -> Self {
        self.startkey = Some(key.into());
        self
    }

    /// Set the row limit
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Allow stale index reads
    pub fn stale_ok(mut self) -> Self {
        self.stale_ok = true;
        self
    }
}

/// A row of a view result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewRow {
    /// Source document id (absent for reduced rows)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Row key
    #[serde(default)]
    pub key: serde_json::Value,

    /// Row value
    #[serde(default)]
    pub value: serde_json::Value,
}

/// Result of a view lookup
///
/// For the `_all_docs` index, `offset` is the number of keys sorting before
/// the start key and `total_rows` the number of documents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewResult {
    /// Number of rows in the whole index
    #[serde(default)]
    pub total_rows: u64,

    /// Position of the first returned row within the index
    #[serde(default)]
    pub offset: u64,

    /// Returned rows
    #[serde(default)]
    pub rows: Vec<ViewRow>,
}

/// Store-level metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbInfo {
    /// Database name
    #[serde(default)]
    pub db_name: String,

    /// Number of live documents
    pub doc_count: u64,
}
