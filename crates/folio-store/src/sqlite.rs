//! SQLite-backed relational store

use crate::error::{sqlite_to_db_error, StoreError};
use folio_domain::{DbError, RelationalDb, Row, SqlParam, SqlValue};
use rusqlite::types::{Value, ValueRef};
use rusqlite::{params_from_iter, Connection, OpenFlags};
use std::path::Path;

/// SQLite implementation of `RelationalDb`
///
/// Statements are always prepared and every parameter is bound; SQL text is
/// never assembled from values.
///
/// # Thread Safety
///
/// SQLite connections are not `Sync`. Each thread should open its own SqliteDb.
pub struct SqliteDb {
    conn: Connection,
}

impl SqliteDb {
    /// Open an existing database read-only
    ///
    /// This is how the metrics are meant to reach production data.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_URI | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self { conn })
    }

    /// Open (or create) a writable database and make sure the schema exists
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use folio_store::SqliteDb;
    ///
    /// let db = SqliteDb::create("things.sqlite").unwrap();
    /// ```
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.initialize_schema()?;
        Ok(db)
    }

    /// Create an in-memory database with the schema (useful for testing)
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.initialize_schema()?;
        Ok(db)
    }

    /// Create the `thing`, `transaction` and `cover` tables if missing
    pub fn initialize_schema(&self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    /// Execute a write statement with bound parameters, returning affected rows
    ///
    /// Used to seed fixtures; the metrics themselves only read.
    pub fn execute(&self, sql: &str, params: &[SqlParam]) -> Result<usize, StoreError> {
        let bound: Vec<Value> = params.iter().map(to_sql_value).collect();
        let changed = self.conn.execute(sql, params_from_iter(bound.iter()))?;
        Ok(changed)
    }
}

fn to_sql_value(param: &SqlParam) -> Value {
    match param {
        SqlParam::Int(v) => Value::Integer(*v),
        SqlParam::Text(s) => Value::Text(s.clone()),
    }
}

fn from_value_ref(value: ValueRef<'_>) -> SqlValue {
    match value {
        ValueRef::Null => SqlValue::Null,
        ValueRef::Integer(v) => SqlValue::Int(v),
        ValueRef::Real(v) => SqlValue::Real(v),
        ValueRef::Text(t) => SqlValue::Text(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => SqlValue::Blob(b.to_vec()),
    }
}

impl RelationalDb for SqliteDb {
    fn query(&self, sql: &str, params: &[SqlParam]) -> Result<Vec<Row>, DbError> {
        let mut stmt = self.conn.prepare(sql).map_err(sqlite_to_db_error)?;
        let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let bound: Vec<Value> = params.iter().map(to_sql_value).collect();

        let rows = stmt
            .query_map(params_from_iter(bound.iter()), |row| {
                let mut out = Row::new();
                for (idx, name) in names.iter().enumerate() {
                    out.push(name.clone(), from_value_ref(row.get_ref(idx)?));
                }
                Ok(out)
            })
            .map_err(sqlite_to_db_error)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(sqlite_to_db_error)?;

        tracing::trace!(rows = rows.len(), "sqlite query returned");
        Ok(rows)
    }
}
