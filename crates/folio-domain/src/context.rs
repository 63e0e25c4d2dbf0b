//! Named inputs a metric is evaluated against

use crate::error::MetricError;
use crate::traits::{DocumentDb, RelationalDb};
use chrono::{Days, NaiveDate};
use std::fmt;

/// A named input of a [`MetricContext`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// First day of the range (inclusive); yesterday for delta metrics
    Start,
    /// Day after the range (exclusive)
    End,
    /// Relational store holding things and transactions
    ThingDb,
    /// Relational store holding covers
    CoverDb,
    /// Document store of editions
    EditionsDb,
    /// Document store of works
    WorksDb,
    /// Document store of seeds (authors, subjects)
    SeedsDb,
    /// Document store of persisted counts snapshots
    AdminDb,
}

impl Field {
    /// Every field, in declaration order
    pub const ALL: [Field; 8] = [
        Field::Start,
        Field::End,
        Field::ThingDb,
        Field::CoverDb,
        Field::EditionsDb,
        Field::WorksDb,
        Field::SeedsDb,
        Field::AdminDb,
    ];

    /// Canonical name of the input
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Start => "start",
            Field::End => "end",
            Field::ThingDb => "thingdb",
            Field::CoverDb => "coverdb",
            Field::EditionsDb => "editions_db",
            Field::WorksDb => "works_db",
            Field::SeedsDb => "seeds_db",
            Field::AdminDb => "admin_db",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inputs of one metric evaluation
///
/// Supplied in full by the caller and never mutated. Store handles are
/// borrowed, so one set of connections can serve every metric of a run.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use folio_domain::{Field, MetricContext};
///
/// let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
/// let ctx = MetricContext::for_day(day);
/// assert_eq!(ctx.start("human_edits").unwrap(), day);
/// assert!(ctx.has(Field::End));
/// assert!(!ctx.has(Field::ThingDb));
/// ```
#[derive(Clone, Copy, Default)]
pub struct MetricContext<'a> {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    thingdb: Option<&'a dyn RelationalDb>,
    coverdb: Option<&'a dyn RelationalDb>,
    editions_db: Option<&'a dyn DocumentDb>,
    works_db: Option<&'a dyn DocumentDb>,
    seeds_db: Option<&'a dyn DocumentDb>,
    admin_db: Option<&'a dyn DocumentDb>,
}

impl<'a> MetricContext<'a> {
    /// An empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// A context covering the single day `[day, day + 1)`
    pub fn for_day(day: NaiveDate) -> Self {
        let mut ctx = Self::new().with_start(day);
        ctx.end = day.checked_add_days(Days::new(1));
        ctx
    }

    /// Set the first day of the range
    pub fn with_start(mut self, start: NaiveDate) -> Self {
        self.start = Some(start);
        self
    }

    /// Set the exclusive end of the range
    pub fn with_end(mut self, end: NaiveDate) -> Self {
        self.end = Some(end);
        self
    }

    /// Set the things/transactions store
    pub fn with_thingdb(mut self, db: &'a dyn RelationalDb) -> Self {
        self.thingdb = Some(db);
        self
    }

    /// Set the covers store
    pub fn with_coverdb(mut self, db: &'a dyn RelationalDb) -> Self {
        self.coverdb = Some(db);
        self
    }

    /// Set the editions store
    pub fn with_editions_db(mut self, db: &'a dyn DocumentDb) -> Self {
        self.editions_db = Some(db);
        self
    }

    /// Set the works store
    pub fn with_works_db(mut self, db: &'a dyn DocumentDb) -> Self {
        self.works_db = Some(db);
        self
    }

    /// Set the seeds store
    pub fn with_seeds_db(mut self, db: &'a dyn DocumentDb) -> Self {
        self.seeds_db = Some(db);
        self
    }

    /// Set the snapshots store
    pub fn with_admin_db(mut self, db: &'a dyn DocumentDb) -> Self {
        self.admin_db = Some(db);
        self
    }

    /// Whether an input was supplied
    pub fn has(&self, field: Field) -> bool {
        match field {
            Field::Start => self.start.is_some(),
            Field::End => self.end.is_some(),
            Field::ThingDb => self.thingdb.is_some(),
            Field::CoverDb => self.coverdb.is_some(),
            Field::EditionsDb => self.editions_db.is_some(),
            Field::WorksDb => self.works_db.is_some(),
            Field::SeedsDb => self.seeds_db.is_some(),
            Field::AdminDb => self.admin_db.is_some(),
        }
    }

    /// Fail with `MissingArgument` on the first absent field, in the order given
    pub fn require(&self, fields: &[Field], metric: &str) -> Result<(), MetricError> {
        match fields.iter().find(|f| !self.has(**f)) {
            Some(field) => Err(missing(*field, metric)),
            None => Ok(()),
        }
    }

    /// First day of the range, if supplied
    pub fn day(&self) -> Option<NaiveDate> {
        self.start
    }

    /// Exclusive end of the range, if supplied
    pub fn until(&self) -> Option<NaiveDate> {
        self.end
    }

    /// First day of the range
    pub fn start(&self, metric: &str) -> Result<NaiveDate, MetricError> {
        self.start.ok_or_else(|| missing(Field::Start, metric))
    }

    /// Exclusive end of the range
    pub fn end(&self, metric: &str) -> Result<NaiveDate, MetricError> {
        self.end.ok_or_else(|| missing(Field::End, metric))
    }

    /// Things/transactions store
    pub fn thingdb(&self, metric: &str) -> Result<&'a dyn RelationalDb, MetricError> {
        self.thingdb.ok_or_else(|| missing(Field::ThingDb, metric))
    }

    /// Covers store
    pub fn coverdb(&self, metric: &str) -> Result<&'a dyn RelationalDb, MetricError> {
        self.coverdb.ok_or_else(|| missing(Field::CoverDb, metric))
    }

    /// Editions store
    pub fn editions_db(&self, metric: &str) -> Result<&'a dyn DocumentDb, MetricError> {
        self.editions_db.ok_or_else(|| missing(Field::EditionsDb, metric))
    }

    /// Works store
    pub fn works_db(&self, metric: &str) -> Result<&'a dyn DocumentDb, MetricError> {
        self.works_db.ok_or_else(|| missing(Field::WorksDb, metric))
    }

    /// Seeds store
    pub fn seeds_db(&self, metric: &str) -> Result<&'a dyn DocumentDb, MetricError> {
        self.seeds_db.ok_or_else(|| missing(Field::SeedsDb, metric))
    }

    /// Snapshots store
    pub fn admin_db(&self, metric: &str) -> Result<&'a dyn DocumentDb, MetricError> {
        self.admin_db.ok_or_else(|| missing(Field::AdminDb, metric))
    }
}

fn missing(field: Field, metric: &str) -> MetricError {
    MetricError::MissingArgument {
        field: field.as_str(),
        metric: metric.to_string(),
    }
}

impl fmt::Debug for MetricContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let supplied: Vec<&str> = Field::ALL
            .iter()
            .filter(|field| self.has(**field))
            .map(Field::as_str)
            .collect();
        f.debug_struct("MetricContext")
            .field("start", &self.start)
            .field("end", &self.end)
            .field("supplied", &supplied)
            .finish()
    }
}
