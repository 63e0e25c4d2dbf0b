//! End-to-end collection over the real store adapters

use chrono::NaiveDate;
use folio_domain::{MetricContext, MetricKind, SqlParam};
use folio_numbers::{find, Collector, CollectorConfig};
use folio_store::{MemoryDocumentDb, SqliteDb};
use serde_json::json;

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
}

fn insert_thing(db: &SqliteDb, id: i64, key: &str, type_id: i64, created: &str) {
    db.execute(
        "INSERT INTO thing (id, key, type, created) VALUES (?1, ?2, ?3, ?4)",
        &[SqlParam::Int(id), SqlParam::from(key), SqlParam::Int(type_id), SqlParam::from(created)],
    )
    .unwrap();
}

/// Things store with types, a day of activity and some noise around it
fn seeded_things(with_list_type: bool) -> SqliteDb {
    let db = SqliteDb::open_in_memory().unwrap();
    let types = ["type", "work", "edition", "user", "author"];
    for (i, name) in types.iter().enumerate() {
        insert_thing(&db, i as i64 + 1, &format!("/type/{}", name), 1, "2009-01-01 00:00:00");
    }
    if with_list_type {
        insert_thing(&db, 6, "/type/list", 1, "2009-01-01 00:00:00");
    }

    insert_thing(&db, 100, "/works/OL1W", 2, "2024-05-01 10:00:00");
    insert_thing(&db, 101, "/works/OL2W", 2, "2024-05-01 23:00:00");
    insert_thing(&db, 102, "/works/OL3W", 2, "2024-04-30 12:00:00");
    insert_thing(&db, 103, "/books/OL1M", 3, "2024-05-01 08:15:00");
    insert_thing(&db, 104, "/people/reader", 4, "2024-05-02 00:00:00");
    insert_thing(&db, 105, "/authors/OL1A", 5, "2024-05-01 05:00:00");
    insert_thing(&db, 106, "/people/reader/lists/OL1L", 6, "2024-03-01 00:00:00");
    insert_thing(&db, 107, "/people/reader/lists/OL2L", 6, "2024-05-01 12:00:00");

    for (id, created) in [
        (1, "2024-04-30 23:59:59"),
        (2, "2024-05-01 00:00:00"),
        (3, "2024-05-01 09:00:00"),
        (4, "2024-05-01 23:59:59"),
    ] {
        db.execute(
            "INSERT INTO \"transaction\" (id, action, created) VALUES (?1, 'update', ?2)",
            &[SqlParam::Int(id), SqlParam::from(created)],
        )
        .unwrap();
    }
    db
}

fn seeded_covers() -> SqliteDb {
    let db = SqliteDb::open_in_memory().unwrap();
    for (id, created) in [(1, "2024-05-01 01:00:00"), (2, "2024-05-01 02:00:00"), (3, "2024-05-03 00:00:00")] {
        db.execute(
            "INSERT INTO cover (id, olid, created) VALUES (?1, 'OL1M', ?2)",
            &[SqlParam::Int(id), SqlParam::from(created)],
        )
        .unwrap();
    }
    db
}

fn editions() -> MemoryDocumentDb {
    MemoryDocumentDb::new("editions")
        .with_doc("/books/OL1M", json!({}))
        .with_doc("/books/OL2M", json!({}))
        .with_doc("/books/OL3M", json!({}))
        .with_view_value("admin/ebooks", json!(12))
        .with_view_value("admin/editions_with_covers", json!(7))
}

fn works() -> MemoryDocumentDb {
    ["/works/OL1W", "/works/OL2W", "/works/OL3W", "/works/OL4W"]
        .iter()
        .fold(MemoryDocumentDb::new("works"), |db, key| db.with_doc(*key, json!({})))
}

fn seeds() -> MemoryDocumentDb {
    ["/authors/OL1A", "/authors/OL2A", "/books/OL1M", "/works/OL1W", "fantasy", "science", "travel"]
        .iter()
        .fold(MemoryDocumentDb::new("seeds"), |db, key| db.with_doc(*key, json!({})))
}

#[test]
fn test_full_collection() {
    let things = seeded_things(true);
    let covers = seeded_covers();
    let editions = editions();
    let works = works();
    let seeds = seeds();
    let admin = MemoryDocumentDb::new("admin")
        .with_doc("counts-2024-05-01", json!({"_id": "counts-2024-05-01", "total_ebook": 10, "total_subject": 1}));

    let ctx = MetricContext::for_day(day())
        .with_thingdb(&things)
        .with_coverdb(&covers)
        .with_editions_db(&editions)
        .with_works_db(&works)
        .with_seeds_db(&seeds)
        .with_admin_db(&admin);

    let report = Collector::default().collect(&ctx).unwrap();
    assert!(report.is_complete(), "failures: {:?}", report.failures);

    let expected = json!({
        "_id": "counts-2024-05-02",
        "human_edits": 3,
        "cover": 2,
        "work": 2,
        "edition": 1,
        "user": 0,
        "author": 1,
        "list": 1,
        "total_author": 2,
        "total_subject": 3,
        "total_list": 2,
        "total_cover": 7,
        "total_work": 4,
        "total_edition": 3,
        "total_ebook": 12,
        "ebook": 2,
        "subject": 2,
    });
    assert_eq!(report.counts_document(), expected);
}

#[test]
fn test_first_run_without_snapshot() {
    let editions = editions();
    let seeds = seeds();
    let admin = MemoryDocumentDb::new("admin");
    let ctx = MetricContext::for_day(day())
        .with_editions_db(&editions)
        .with_seeds_db(&seeds)
        .with_admin_db(&admin);

    let collector = Collector::new(CollectorConfig {
        kinds: vec![MetricKind::Delta],
        metrics: Vec::new(),
    });
    let report = collector.collect(&ctx).unwrap();

    assert_eq!(report.values.get("ebook"), Some(&12));
    assert_eq!(report.values.get("subject"), Some(&3));
}

#[test]
fn test_snapshot_feeds_next_day() {
    let delta_and_total = || {
        Collector::new(CollectorConfig {
            kinds: vec![MetricKind::Delta, MetricKind::Total],
            metrics: ["ebook", "subject", "total_ebook", "total_subject"].map(String::from).to_vec(),
        })
    };
    let mut admin = MemoryDocumentDb::new("admin");

    let editions = MemoryDocumentDb::new("editions").with_view_value("admin/ebooks", json!(100));
    let seeds = seeds();
    let first = {
        let ctx = MetricContext::for_day(day())
            .with_editions_db(&editions)
            .with_seeds_db(&seeds)
            .with_admin_db(&admin);
        delta_and_total().collect(&ctx).unwrap()
    };
    assert_eq!(first.values.get("ebook"), Some(&100));
    let key = first.snapshot_key().unwrap();
    assert_eq!(key, "counts-2024-05-02");
    admin.insert(key, first.counts_document());

    let next_day = day().succ_opt().unwrap();
    let editions = MemoryDocumentDb::new("editions").with_view_value("admin/ebooks", json!(103));
    let seeds = crate::seeds().with_doc("poetry", json!({}));
    let ctx = MetricContext::for_day(next_day)
        .with_editions_db(&editions)
        .with_seeds_db(&seeds)
        .with_admin_db(&admin);
    let second = delta_and_total().collect(&ctx).unwrap();

    assert!(second.is_complete(), "failures: {:?}", second.failures);
    assert_eq!(second.values.get("ebook"), Some(&3));
    assert_eq!(second.values.get("subject"), Some(&1));
    assert_eq!(second.snapshot_key().as_deref(), Some("counts-2024-05-03"));
}

#[test]
fn test_missing_list_type_fails_only_list_metrics() {
    let things = seeded_things(false);
    let ctx = MetricContext::for_day(day()).with_thingdb(&things);

    let report = Collector::default().collect(&ctx).unwrap();

    let hard_failures: Vec<_> = report.failures.iter().filter(|f| !f.missing_argument).collect();
    let keys: Vec<&str> = hard_failures.iter().map(|f| f.key.as_str()).collect();
    assert_eq!(keys, vec!["list", "total_list"]);
    assert!(hard_failures[0].error.contains("/type/list"));

    assert_eq!(report.values.get("human_edits"), Some(&3));
    assert_eq!(report.values.get("work"), Some(&2));
}

#[test]
fn test_read_only_file_store() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("covers.sqlite");
    {
        let db = SqliteDb::create(&path).unwrap();
        db.execute(
            "INSERT INTO cover (id, created) VALUES (1, '2024-05-01 12:00:00')",
            &[],
        )
        .unwrap();
    }

    let covers = SqliteDb::open(&path).unwrap();
    let ctx = MetricContext::for_day(day()).with_coverdb(&covers);
    let value = find(MetricKind::Range, "cover").unwrap().evaluate(&ctx).unwrap();
    assert_eq!(value, 1);
}

#[test]
fn test_repeated_collection_is_stable() {
    let things = seeded_things(true);
    let seeds = seeds();
    let ctx = MetricContext::for_day(day()).with_thingdb(&things).with_seeds_db(&seeds);

    let first = Collector::default().collect(&ctx).unwrap();
    let second = Collector::default().collect(&ctx).unwrap();
    assert_eq!(first.values, second.values);
}
