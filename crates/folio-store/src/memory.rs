//! In-memory document store with sorted keys

use crate::error::StoreError;
use folio_domain::{DbError, DbInfo, Document, DocumentDb, ViewOptions, ViewResult, ViewRow};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;
use std::path::Path;

/// Name of the primary key index
const ALL_DOCS: &str = "_all_docs";

/// Document store held in memory
///
/// Keys are kept in byte order, so `_all_docs` offsets behave like a sorted
/// key index. Named views are precomputed rows supplied by the caller.
///
/// # Examples
///
/// ```
/// use folio_domain::{DocumentDb, ViewOptions};
/// use folio_store::MemoryDocumentDb;
/// use serde_json::json;
///
/// let db = MemoryDocumentDb::new("seeds")
///     .with_doc("/authors/OL1A", json!({}))
///     .with_doc("/subjects/love", json!({}))
///     .with_doc("love", json!({}));
///
/// let head = db.view("_all_docs", &ViewOptions::new().startkey("a").limit(0)).unwrap();
/// assert_eq!(head.total_rows - head.offset, 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentDb {
    name: String,
    docs: BTreeMap<String, Document>,
    views: HashMap<String, Vec<ViewRow>>,
}

/// On-disk fixture layout
#[derive(Debug, Deserialize)]
struct Fixture {
    #[serde(default)]
    db_name: String,
    #[serde(default)]
    docs: BTreeMap<String, Document>,
    #[serde(default)]
    views: HashMap<String, Vec<ViewRow>>,
}

impl MemoryDocumentDb {
    /// Create an empty store
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Load a store from a JSON fixture
    ///
    /// ```json
    /// { "db_name": "editions",
    ///   "docs": { "/books/OL1M": { "title": "..." } },
    ///   "views": { "admin/ebooks": [ { "key": null, "value": 12 } ] } }
    /// ```
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let fixture: Fixture = serde_json::from_str(json)?;
        Ok(Self {
            name: fixture.db_name,
            docs: fixture.docs,
            views: fixture.views,
        })
    }

    /// Load a store from a JSON fixture file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Insert or replace a document
    pub fn insert(&mut self, key: impl Into<String>, doc: Document) {
        self.docs.insert(key.into(), doc);
    }

    /// Insert a document (builder style)
    pub fn with_doc(mut self, key: impl Into<String>, doc: Document) -> Self {
        self.insert(key, doc);
        self
    }

    /// Replace the rows of a named view
    pub fn set_view(&mut self, name: impl Into<String>, rows: Vec<ViewRow>) {
        self.views.insert(name.into(), rows);
    }

    /// Define a reduced view holding a single value (builder style)
    pub fn with_view_value(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.set_view(
            name,
            vec![ViewRow {
                id: None,
                key: serde_json::Value::Null,
                value,
            }],
        );
        self
    }

    fn all_docs(&self, options: &ViewOptions) -> ViewResult {
        let limit = options.limit.unwrap_or(usize::MAX);
        let (offset, lower) = match options.startkey.as_deref() {
            Some(start) => (
                self.docs.range::<str, _>((Bound::Unbounded, Bound::Excluded(start))).count(),
                Bound::Included(start),
            ),
            None => (0, Bound::Unbounded),
        };
        let tail = self.docs.range::<str, _>((lower, Bound::Unbounded));

        let rows = tail
            .take(limit)
            .map(|(key, doc)| ViewRow {
                id: Some(key.clone()),
                key: serde_json::Value::String(key.clone()),
                value: serde_json::json!({ "rev": doc.get("_rev").cloned().unwrap_or(serde_json::Value::Null) }),
            })
            .collect();

        ViewResult {
            total_rows: self.docs.len() as u64,
            offset: offset as u64,
            rows,
        }
    }
}

impl DocumentDb for MemoryDocumentDb {
    fn view(&self, name: &str, options: &ViewOptions) -> Result<ViewResult, DbError> {
        if name == ALL_DOCS {
            return Ok(self.all_docs(options));
        }

        let rows = self
            .views
            .get(name)
            .ok_or_else(|| DbError::NotFound(format!("view '{}' in {}", name, self.name)))?;
        let limit = options.limit.unwrap_or(usize::MAX);

        Ok(ViewResult {
            total_rows: rows.len() as u64,
            offset: 0,
            rows: rows.iter().take(limit).cloned().collect(),
        })
    }

    fn get(&self, key: &str) -> Result<Document, DbError> {
        self.docs
            .get(key)
            .cloned()
            .ok_or_else(|| DbError::NotFound(format!("document '{}' in {}", key, self.name)))
    }

    fn info(&self) -> Result<DbInfo, DbError> {
        Ok(DbInfo {
            db_name: self.name.clone(),
            doc_count: self.docs.len() as u64,
        })
    }
}
