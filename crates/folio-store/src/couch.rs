//! CouchDB-compatible document store over HTTP

use crate::error::StoreError;
use folio_domain::{DbError, DbInfo, Document, DocumentDb, ViewOptions, ViewResult};
use reqwest::blocking::Client;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Default per-request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A single database on a CouchDB server
///
/// View names follow the `design/view` convention (`admin/ebooks` reads
/// `/_design/admin/_view/ebooks`); names starting with `_` such as
/// `_all_docs` address built-in endpoints.
///
/// # Examples
///
/// ```no_run
/// use folio_domain::DocumentDb;
/// use folio_store::CouchDb;
///
/// let works = CouchDb::new("http://localhost:5984", "works").unwrap();
/// println!("{} works", works.info().unwrap().doc_count);
/// ```
pub struct CouchDb {
    client: Client,
    base: Url,
    db: String,
}

impl CouchDb {
    /// Connect to database `db` on the server at `base_url`
    pub fn new(base_url: &str, db: impl Into<String>) -> Result<Self, StoreError> {
        let base = Url::parse(base_url).map_err(|e| StoreError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(StoreError::InvalidUrl(format!("{} cannot be a base URL", base_url)));
        }

        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            base,
            db: db.into(),
        })
    }

    /// Name of the database
    pub fn name(&self) -> &str {
        &self.db
    }

    /// URL with the database and the given path segments appended (each percent-encoded)
    fn url(&self, segments: &[&str]) -> Result<Url, DbError> {
        let mut url = self.base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| DbError::Unavailable(format!("{} cannot be a base URL", self.base)))?;
            path.pop_if_empty().push(&self.db);
            path.extend(segments);
        }
        Ok(url)
    }

    /// Endpoint of a view
    pub fn view_url(&self, name: &str) -> Result<Url, DbError> {
        if name.starts_with('_') {
            return self.url(&[name]);
        }
        match name.split_once('/') {
            Some((design, view)) => self.url(&["_design", design, "_view", view]),
            None => Err(DbError::Query(format!("view name '{}' is not of the form design/view", name))),
        }
    }

    /// Endpoint of a document
    pub fn doc_url(&self, key: &str) -> Result<Url, DbError> {
        self.url(&[key])
    }

    /// Query string for view options; keys are JSON encoded as CouchDB expects
    pub fn view_query(options: &ViewOptions) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(key) = &options.startkey {
            query.push(("startkey", serde_json::Value::String(key.clone()).to_string()));
        }
        if let Some(limit) = options.limit {
            query.push(("limit", limit.to_string()));
        }
        if options.stale_ok {
            query.push(("stale", "ok".to_string()));
        }
        query
    }

    fn get_json<T: DeserializeOwned>(&self, url: Url, query: &[(&'static str, String)]) -> Result<T, DbError> {
        tracing::debug!(%url, "couch request");

        let response = self
            .client
            .get(url.clone())
            .query(query)
            .send()
            .map_err(|e| DbError::Unavailable(e.to_string()))?;

        match response.status() {
            status if status.is_success() => response
                .json::<T>()
                .map_err(|e| DbError::InvalidData(format!("{}: {}", url, e))),
            StatusCode::NOT_FOUND => Err(DbError::NotFound(url.to_string())),
            status if status.is_server_error() => Err(DbError::Unavailable(format!("{} returned {}", url, status))),
            status => Err(DbError::Query(format!("{} returned {}", url, status))),
        }
    }
}

impl DocumentDb for CouchDb {
    fn view(&self, name: &str, options: &ViewOptions) -> Result<ViewResult, DbError> {
        let url = self.view_url(name)?;
        self.get_json(url, &Self::view_query(options))
    }

    fn get(&self, key: &str) -> Result<Document, DbError> {
        let url = self.doc_url(key)?;
        self.get_json(url, &[])
    }

    fn info(&self) -> Result<DbInfo, DbError> {
        let url = self.url(&[])?;
        self.get_json(url, &[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editions() -> CouchDb {
        CouchDb::new("http://couch.local:5984/", "editions").unwrap()
    }

    #[test]
    fn test_design_view_url() {
        let url = editions().view_url("admin/ebooks").unwrap();
        assert_eq!(url.as_str(), "http://couch.local:5984/editions/_design/admin/_view/ebooks");
    }

    #[test]
    fn test_builtin_view_url() {
        let url = editions().view_url("_all_docs").unwrap();
        assert_eq!(url.as_str(), "http://couch.local:5984/editions/_all_docs");
    }

    #[test]
    fn test_undesigned_view_is_rejected() {
        assert!(matches!(editions().view_url("ebooks"), Err(DbError::Query(_))));
    }

    #[test]
    fn test_doc_url_encodes_slashes() {
        let url = editions().doc_url("/authors/OL1A").unwrap();
        assert_eq!(url.as_str(), "http://couch.local:5984/editions/%2Fauthors%2FOL1A");
    }

    #[test]
    fn test_info_url_without_trailing_slash() {
        let db = CouchDb::new("http://couch.local:5984", "works").unwrap();
        assert_eq!(db.url(&[]).unwrap().as_str(), "http://couch.local:5984/works");
    }

    #[test]
    fn test_view_query_encodes_startkey_as_json() {
        let query = CouchDb::view_query(&ViewOptions::new().startkey("/authors").limit(0).stale_ok());
        assert_eq!(
            query,
            vec![
                ("startkey", "\"/authors\"".to_string()),
                ("limit", "0".to_string()),
                ("stale", "ok".to_string()),
            ]
        );
    }

    #[test]
    fn test_rejects_relative_base() {
        assert!(matches!(CouchDb::new("not a url", "x"), Err(StoreError::InvalidUrl(_))));
        assert!(matches!(CouchDb::new("mailto:a@b", "x"), Err(StoreError::InvalidUrl(_))));
    }
}
