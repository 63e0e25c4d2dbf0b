//! The metric functions
//!
//! Each function takes a [`MetricContext`], fetches every input it needs
//! before touching a store, and returns a single count. Range bounds are
//! bound as `YYYY-MM-DD` text and applied as `created >= start AND created < end`.

use chrono::NaiveDate;
use folio_domain::{
    snapshot_key, DbError, DocumentDb, MetricContext, MetricError, RelationalDb, Row, SqlParam, ViewOptions,
};

/// Primary key index of a document store
const ALL_DOCS: &str = "_all_docs";

/// Reduced view counting editions that have an ebook
const EBOOKS_VIEW: &str = "admin/ebooks";

/// Reduced view counting editions that have a cover
const COVERS_VIEW: &str = "admin/editions_with_covers";

/// Author seeds sort between these two keys
const AUTHORS_START: &str = "/authors";
const AUTHORS_END: &str = "/authors/Z";

/// Subject seeds are the keys from here to the end of the index
const SUBJECTS_START: &str = "a";

const TYPE_ID_SQL: &str = "SELECT id AS id FROM thing WHERE key = ?1";
const THINGS_CREATED_SQL: &str =
    "SELECT count(*) AS count FROM thing WHERE type = ?1 AND created >= ?2 AND created < ?3";
const THINGS_OF_TYPE_SQL: &str = "SELECT count(*) AS count FROM thing WHERE type = ?1";
const EDITS_SQL: &str = "SELECT count(*) AS count FROM \"transaction\" WHERE created >= ?1 AND created < ?2";
const COVERS_SQL: &str = "SELECT count(*) AS count FROM cover WHERE created >= ?1 AND created < ?2";

/// Read the `count` column of the first row
fn count_of(rows: &[Row], what: &str) -> Result<i64, MetricError> {
    rows.first()
        .and_then(|row| row.get_i64("count"))
        .ok_or_else(|| MetricError::NotFound(format!("count for {}", what)))
}

fn to_i64(n: u64, what: &str) -> Result<i64, MetricError> {
    i64::try_from(n).map_err(|_| MetricError::UnexpectedValue {
        what: what.to_string(),
        detail: format!("{} does not fit in a signed count", n),
    })
}

/// Resolve the row id of `/type/<type_name>` in the things table
pub fn resolve_type_id(db: &dyn RelationalDb, type_name: &str) -> Result<i64, MetricError> {
    let key = format!("/type/{}", type_name);
    let rows = db.query(TYPE_ID_SQL, &[SqlParam::from(key.as_str())])?;
    rows.first()
        .and_then(|row| row.get_i64("id"))
        .ok_or(MetricError::InvalidType(key))
}

/// Number of edits made by humans in `[start, end)`
pub fn human_edits(ctx: &MetricContext<'_>) -> Result<i64, MetricError> {
    const METRIC: &str = "range_human_edits";
    let start = ctx.start(METRIC)?;
    let end = ctx.end(METRIC)?;
    let db = ctx.thingdb(METRIC)?;

    let rows = db.query(EDITS_SQL, &[start.into(), end.into()])?;
    count_of(&rows, METRIC)
}

/// Number of covers added in `[start, end)`
pub fn cover(ctx: &MetricContext<'_>) -> Result<i64, MetricError> {
    const METRIC: &str = "range_cover";
    let start = ctx.start(METRIC)?;
    let end = ctx.end(METRIC)?;
    let db = ctx.coverdb(METRIC)?;

    let rows = db.query(COVERS_SQL, &[start.into(), end.into()])?;
    count_of(&rows, METRIC)
}

/// Number of things of `type_name` created in `[start, end)`
///
/// Shared by the work, edition, user, author and list range metrics.
pub fn things_created(ctx: &MetricContext<'_>, type_name: &str) -> Result<i64, MetricError> {
    let metric = format!("range_{}", type_name);
    let start = ctx.start(&metric)?;
    let end = ctx.end(&metric)?;
    let db = ctx.thingdb(&metric)?;

    let type_id = resolve_type_id(db, type_name)?;
    let rows = db.query(THINGS_CREATED_SQL, &[type_id.into(), start.into(), end.into()])?;
    count_of(&rows, &metric)
}

/// Offset of the first key greater than or equal to `startkey`
fn key_offset(db: &dyn DocumentDb, startkey: &str) -> Result<u64, MetricError> {
    let head = db.view(ALL_DOCS, &ViewOptions::new().startkey(startkey).limit(0).stale_ok())?;
    Ok(head.offset)
}

/// Number of author seeds
///
/// Counts the keys between `/authors` and `/authors/Z` with two zero-row
/// reads of the key index. Only as exact as the store's key ordering is stable.
pub fn total_author(ctx: &MetricContext<'_>) -> Result<i64, MetricError> {
    const METRIC: &str = "total_author";
    let db = ctx.seeds_db(METRIC)?;

    let first = to_i64(key_offset(db, AUTHORS_START)?, METRIC)?;
    let past = to_i64(key_offset(db, AUTHORS_END)?, METRIC)?;
    Ok(past - first)
}

/// Subject seeds: every key from `a` to the end of the index
fn subject_count(db: &dyn DocumentDb, metric: &str) -> Result<i64, MetricError> {
    let head = db.view(ALL_DOCS, &ViewOptions::new().startkey(SUBJECTS_START).limit(0).stale_ok())?;
    Ok(to_i64(head.total_rows, metric)? - to_i64(head.offset, metric)?)
}

/// Number of subject seeds
pub fn total_subject(ctx: &MetricContext<'_>) -> Result<i64, MetricError> {
    const METRIC: &str = "total_subject";
    let db = ctx.seeds_db(METRIC)?;
    subject_count(db, METRIC)
}

/// Number of lists ever created
pub fn total_list(ctx: &MetricContext<'_>) -> Result<i64, MetricError> {
    const METRIC: &str = "total_list";
    let db = ctx.thingdb(METRIC)?;

    let type_id = resolve_type_id(db, "list")?;
    let rows = db.query(THINGS_OF_TYPE_SQL, &[type_id.into()])?;
    count_of(&rows, METRIC)
}

/// Value of the single row of a reduced view
///
/// A reduce over no documents yields no rows, which reads as zero.
fn reduced_value(db: &dyn DocumentDb, view: &str) -> Result<i64, MetricError> {
    let result = db.view(view, &ViewOptions::new().stale_ok())?;
    match result.rows.first() {
        Some(row) => row.value.as_i64().ok_or_else(|| MetricError::UnexpectedValue {
            what: view.to_string(),
            detail: format!("expected an integer, got {}", row.value),
        }),
        None => {
            tracing::debug!("View {} returned no rows, reading as 0", view);
            Ok(0)
        }
    }
}

/// Number of editions with a cover
pub fn total_cover(ctx: &MetricContext<'_>) -> Result<i64, MetricError> {
    let db = ctx.editions_db("total_cover")?;
    reduced_value(db, COVERS_VIEW)
}

/// Number of works
pub fn total_work(ctx: &MetricContext<'_>) -> Result<i64, MetricError> {
    const METRIC: &str = "total_work";
    let db = ctx.works_db(METRIC)?;
    to_i64(db.info()?.doc_count, METRIC)
}

/// Number of editions
pub fn total_edition(ctx: &MetricContext<'_>) -> Result<i64, MetricError> {
    const METRIC: &str = "total_edition";
    let db = ctx.editions_db(METRIC)?;
    to_i64(db.info()?.doc_count, METRIC)
}

/// Number of editions with an ebook
pub fn total_ebook(ctx: &MetricContext<'_>) -> Result<i64, MetricError> {
    let db = ctx.editions_db("total_ebook")?;
    reduced_value(db, EBOOKS_VIEW)
}

/// Total stored under `field` in the snapshot of `day`
///
/// A missing snapshot, or a snapshot without the field, counts as zero.
fn previous_total(admin_db: &dyn DocumentDb, day: NaiveDate, field: &str) -> Result<i64, MetricError> {
    let key = snapshot_key(day);
    let snapshot = match admin_db.get(&key) {
        Ok(doc) => doc,
        Err(DbError::NotFound(_)) => {
            tracing::warn!("No {} found for {}. Using 0", field, key);
            return Ok(0);
        }
        Err(e) => return Err(e.into()),
    };

    match snapshot.get(field) {
        None | Some(serde_json::Value::Null) => {
            tracing::warn!("No {} found for {}. Using 0", field, key);
            Ok(0)
        }
        Some(value) => {
            let total = value.as_i64().ok_or_else(|| MetricError::UnexpectedValue {
                what: format!("{}.{}", key, field),
                detail: format!("expected an integer, got {}", value),
            })?;
            tracing::debug!("Yesterday's count for {} {}", field, total);
            Ok(total)
        }
    }
}

/// Ebooks added since yesterday's snapshot
///
/// `start` is yesterday; the snapshot read is `counts-<start>`.
pub fn delta_ebook(ctx: &MetricContext<'_>) -> Result<i64, MetricError> {
    const METRIC: &str = "delta_ebook";
    let yesterday = ctx.start(METRIC)?;
    let editions_db = ctx.editions_db(METRIC)?;
    let admin_db = ctx.admin_db(METRIC)?;

    let current = reduced_value(editions_db, EBOOKS_VIEW)?;
    let previous = previous_total(admin_db, yesterday, "total_ebook")?;
    Ok(current - previous)
}

/// Subjects added since yesterday's snapshot
pub fn delta_subject(ctx: &MetricContext<'_>) -> Result<i64, MetricError> {
    const METRIC: &str = "delta_subject";
    let yesterday = ctx.start(METRIC)?;
    let seeds_db = ctx.seeds_db(METRIC)?;
    let admin_db = ctx.admin_db(METRIC)?;

    let current = subject_count(seeds_db, METRIC)?;
    let previous = previous_total(admin_db, yesterday, "total_subject")?;
    Ok(current - previous)
}
