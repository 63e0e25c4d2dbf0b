//! Run command implementation.

use crate::cli::RunArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use chrono::{NaiveDate, Utc};
use folio_domain::{MetricContext, MetricKind};
use folio_numbers::{CollectionReport, Collector, CollectorConfig};
use folio_store::{CouchDb, SqliteDb};

/// Store handles opened from the configuration.
///
/// Every store is optional; metrics needing an absent one report a missing input.
#[derive(Default)]
pub struct Stores {
    thingdb: Option<SqliteDb>,
    coverdb: Option<SqliteDb>,
    editions_db: Option<CouchDb>,
    works_db: Option<CouchDb>,
    seeds_db: Option<CouchDb>,
    admin_db: Option<CouchDb>,
}

impl Stores {
    /// Open every configured store.
    pub fn open(config: &Config) -> Result<Self> {
        let mut stores = Self::default();

        if let Some(path) = &config.sources.thingdb {
            tracing::info!("Opening thingdb at {}", path.display());
            stores.thingdb = Some(SqliteDb::open(path)?);
        }
        if let Some(path) = &config.sources.coverdb {
            tracing::info!("Opening coverdb at {}", path.display());
            stores.coverdb = Some(SqliteDb::open(path)?);
        }

        let couch = &config.couch;
        match &couch.url {
            Some(url) => {
                let connect = |db: &Option<String>| -> Result<Option<CouchDb>> {
                    match db {
                        Some(name) => {
                            let db = CouchDb::new(url, name.as_str())?;
                            tracing::info!("Using {} on {}", db.name(), url);
                            Ok(Some(db))
                        }
                        None => Ok(None),
                    }
                };
                stores.editions_db = connect(&couch.editions_db)?;
                stores.works_db = connect(&couch.works_db)?;
                stores.seeds_db = connect(&couch.seeds_db)?;
                stores.admin_db = connect(&couch.admin_db)?;
            }
            None => {
                let named = [&couch.editions_db, &couch.works_db, &couch.seeds_db, &couch.admin_db];
                if named.iter().any(|db| db.is_some()) {
                    return Err(CliError::Config("couch databases are named but couch.url is not set".into()));
                }
            }
        }

        Ok(stores)
    }

    /// Context covering `[day, day + 1)` with every opened store.
    pub fn context(&self, day: NaiveDate) -> MetricContext<'_> {
        let mut ctx = MetricContext::for_day(day);
        if let Some(db) = &self.thingdb {
            ctx = ctx.with_thingdb(db);
        }
        if let Some(db) = &self.coverdb {
            ctx = ctx.with_coverdb(db);
        }
        if let Some(db) = &self.editions_db {
            ctx = ctx.with_editions_db(db);
        }
        if let Some(db) = &self.works_db {
            ctx = ctx.with_works_db(db);
        }
        if let Some(db) = &self.seeds_db {
            ctx = ctx.with_seeds_db(db);
        }
        if let Some(db) = &self.admin_db {
            ctx = ctx.with_admin_db(db);
        }
        ctx
    }
}

/// Yesterday in UTC.
pub fn yesterday() -> NaiveDate {
    let today = Utc::now().date_naive();
    today.pred_opt().unwrap_or(today)
}

/// Command-line selection layered over the configured one.
pub fn selection(args: &RunArgs, configured: &CollectorConfig) -> CollectorConfig {
    CollectorConfig {
        kinds: if args.kinds.is_empty() {
            configured.kinds.clone()
        } else {
            args.kinds.iter().copied().map(MetricKind::from).collect()
        },
        metrics: if args.metrics.is_empty() {
            configured.metrics.clone()
        } else {
            args.metrics.clone()
        },
    }
}

/// Open the stores and run the collector for the requested day.
pub fn collect(args: &RunArgs, config: &Config) -> Result<CollectionReport> {
    let day = args.date.unwrap_or_else(yesterday);
    let collector = Collector::new(selection(args, &config.collector));
    // Resolve the selection before opening anything
    collector.selection()?;
    tracing::debug!(
        "Selected kinds {:?} metrics {:?}",
        collector.config().kinds,
        collector.config().metrics
    );

    let stores = Stores::open(config)?;
    let ctx = stores.context(day);
    tracing::debug!("Evaluating against {:?}", ctx);

    Ok(collector.collect(&ctx)?)
}

/// Execute the run command.
pub fn execute_run(args: RunArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let report = collect(&args, config)?;
    println!("{}", formatter.format_report(&report)?);

    let failed = report.failures.iter().filter(|f| !f.missing_argument).count();
    if failed > 0 {
        return Err(CliError::MetricsFailed(failed));
    }
    Ok(())
}
