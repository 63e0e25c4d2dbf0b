//! Scripted stores and log capture for unit tests

use folio_domain::{
    DbError, DbInfo, Document, DocumentDb, RelationalDb, Row, SqlParam, SqlValue, ViewOptions, ViewResult,
    ViewRow,
};
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub fn count_row(n: i64) -> Row {
    Row::new().with("count", SqlValue::Int(n))
}

pub fn id_row(id: i64) -> Row {
    Row::new().with("id", SqlValue::Int(id))
}

/// Relational store answering by SQL fragment and recording every call
#[derive(Default)]
pub struct ScriptedRelationalDb {
    responses: Vec<(String, Vec<Row>)>,
    calls: RefCell<Vec<(String, Vec<SqlParam>)>>,
}

impl ScriptedRelationalDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer any statement containing `fragment`; first match wins
    pub fn respond(mut self, fragment: &str, rows: Vec<Row>) -> Self {
        self.responses.push((fragment.to_string(), rows));
        self
    }

    pub fn calls(&self) -> Vec<(String, Vec<SqlParam>)> {
        self.calls.borrow().clone()
    }
}

impl RelationalDb for ScriptedRelationalDb {
    fn query(&self, sql: &str, params: &[SqlParam]) -> Result<Vec<Row>, DbError> {
        self.calls.borrow_mut().push((sql.to_string(), params.to_vec()));
        self.responses
            .iter()
            .find(|(fragment, _)| sql.contains(fragment.as_str()))
            .map(|(_, rows)| rows.clone())
            .ok_or_else(|| DbError::Query(format!("unscripted statement: {}", sql)))
    }
}

/// Document store with canned views, documents and info
#[derive(Default)]
pub struct ScriptedDocumentDb {
    views: HashMap<(String, Option<String>), ViewResult>,
    docs: HashMap<String, Document>,
    info: Option<DbInfo>,
    failure: Option<DbError>,
    calls: RefCell<Vec<String>>,
}

impl ScriptedDocumentDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer a zero-row `_all_docs` read at `startkey`
    pub fn all_docs_at(mut self, startkey: &str, total_rows: u64, offset: u64) -> Self {
        self.views.insert(
            ("_all_docs".to_string(), Some(startkey.to_string())),
            ViewResult {
                total_rows,
                offset,
                rows: Vec::new(),
            },
        );
        self
    }

    /// A reduced view with one row holding `value`
    pub fn reduced(self, view: &str, value: serde_json::Value) -> Self {
        self.view_rows(
            view,
            vec![ViewRow {
                id: None,
                key: serde_json::Value::Null,
                value,
            }],
        )
    }

    pub fn view_rows(mut self, view: &str, rows: Vec<ViewRow>) -> Self {
        let result = ViewResult {
            total_rows: rows.len() as u64,
            offset: 0,
            rows,
        };
        self.views.insert((view.to_string(), None), result);
        self
    }

    pub fn with_doc(mut self, key: &str, doc: Document) -> Self {
        self.docs.insert(key.to_string(), doc);
        self
    }

    pub fn with_info(mut self, info: DbInfo) -> Self {
        self.info = Some(info);
        self
    }

    /// Fail every operation with `error`
    pub fn failing(mut self, error: DbError) -> Self {
        self.failure = Some(error);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: String) -> Result<(), DbError> {
        self.calls.borrow_mut().push(call);
        match &self.failure {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }
}

impl DocumentDb for ScriptedDocumentDb {
    fn view(&self, name: &str, options: &ViewOptions) -> Result<ViewResult, DbError> {
        match &options.startkey {
            Some(key) => self.record(format!("view {} {}", name, key))?,
            None => self.record(format!("view {}", name))?,
        }
        self.views
            .get(&(name.to_string(), options.startkey.clone()))
            .cloned()
            .ok_or_else(|| DbError::NotFound(format!("view {}", name)))
    }

    fn get(&self, key: &str) -> Result<Document, DbError> {
        self.record(format!("get {}", key))?;
        self.docs
            .get(key)
            .cloned()
            .ok_or_else(|| DbError::NotFound(key.to_string()))
    }

    fn info(&self) -> Result<DbInfo, DbError> {
        self.record("info".to_string())?;
        self.info
            .clone()
            .ok_or_else(|| DbError::Query("no info scripted".to_string()))
    }
}

/// In-memory sink for formatted log lines
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a subscriber that records everything at DEBUG and above
pub fn with_captured_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();

    let out = tracing::subscriber::with_default(subscriber, f);
    let text = String::from_utf8_lossy(&logs.0.lock().unwrap()).into_owned();
    (out, text)
}
