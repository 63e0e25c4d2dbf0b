//! Daily collection run
//!
//! Evaluates a selection of the catalog against one context and gathers the
//! results into a report. One metric failing does not stop the others; an
//! unknown metric in the selection stops the run before anything is evaluated.

use crate::catalog::{self, MetricDef};
use chrono::NaiveDate;
use folio_domain::{snapshot_key, Document, MetricContext, MetricError, MetricKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

/// Which metrics a run evaluates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectorConfig {
    /// Kinds to include
    #[serde(default = "all_kinds")]
    pub kinds: Vec<MetricKind>,

    /// Storage keys to include; empty means every metric of the selected kinds
    #[serde(default)]
    pub metrics: Vec<String>,
}

fn all_kinds() -> Vec<MetricKind> {
    MetricKind::ALL.to_vec()
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            kinds: all_kinds(),
            metrics: Vec::new(),
        }
    }
}

/// A metric that could not be computed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricFailure {
    /// Storage key of the metric
    pub key: String,
    /// Rendered error
    pub error: String,
    /// Whether the context simply lacked an input
    pub missing_argument: bool,
}

/// Outcome of one collection run
#[derive(Debug, Clone, Default, Serialize)]
pub struct CollectionReport {
    /// Day the run was for (the context's start), if any
    pub day: Option<NaiveDate>,
    /// Day the counts record is filed under (the context's end), if any
    ///
    /// The next day's run reads this record as its previous snapshot.
    pub snapshot_day: Option<NaiveDate>,
    /// Computed values by storage key
    pub values: BTreeMap<String, i64>,
    /// Metrics that failed, in evaluation order
    pub failures: Vec<MetricFailure>,
    /// Wall time of the run in milliseconds
    pub runtime_ms: u64,
}

impl CollectionReport {
    /// Number of metrics that produced a value
    pub fn succeeded(&self) -> usize {
        self.values.len()
    }

    /// Number of metrics that failed
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// True when no metric failed
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Key of the counts record, `counts-<end>`
    pub fn snapshot_key(&self) -> Option<String> {
        self.snapshot_day.map(snapshot_key)
    }

    /// Counts record in the snapshot layout: `_id` plus one field per value
    ///
    /// The `_id` is only present when the run had an end date.
    pub fn counts_document(&self) -> Document {
        let mut doc = serde_json::Map::new();
        if let Some(key) = self.snapshot_key() {
            doc.insert("_id".to_string(), serde_json::Value::String(key));
        }
        for (key, value) in &self.values {
            doc.insert(key.clone(), serde_json::Value::from(*value));
        }
        serde_json::Value::Object(doc)
    }

    /// One-line summary for logs
    pub fn summary(&self) -> String {
        let day = self
            .day
            .map(|d| d.to_string())
            .unwrap_or_else(|| "undated".to_string());
        format!(
            "Collection {}: {} computed, {} failed, {}ms",
            day,
            self.succeeded(),
            self.failed(),
            self.runtime_ms
        )
    }
}

/// Runs a selection of the catalog
#[derive(Debug, Clone, Default)]
pub struct Collector {
    config: CollectorConfig,
}

impl Collector {
    /// Create a collector for the given selection
    pub fn new(config: CollectorConfig) -> Self {
        Self { config }
    }

    /// The selection this collector runs
    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    /// Resolve the configured selection against the catalog
    ///
    /// Fails with [`MetricError::UnknownMetric`] on the first configured key
    /// the catalog does not know.
    pub fn selection(&self) -> Result<Vec<&'static MetricDef>, MetricError> {
        for key in &self.config.metrics {
            if catalog::find_by_key(key).is_none() {
                return Err(MetricError::UnknownMetric(key.clone()));
            }
        }

        let selected = catalog::catalog()
            .iter()
            .filter(|def| self.config.kinds.contains(&def.kind))
            .filter(|def| {
                self.config.metrics.is_empty()
                    || self
                        .config
                        .metrics
                        .iter()
                        .any(|key| key == &def.storage_key() || key == &def.id())
            })
            .collect();
        Ok(selected)
    }

    /// Evaluate the selection against `ctx`
    pub fn collect(&self, ctx: &MetricContext<'_>) -> Result<CollectionReport, MetricError> {
        let selection = self.selection()?;
        let started = Instant::now();
        let mut report = CollectionReport {
            day: ctx.day(),
            snapshot_day: ctx.until(),
            ..CollectionReport::default()
        };

        tracing::info!("Collecting {} metrics", selection.len());

        for def in selection {
            let key = def.storage_key();
            match def.evaluate(ctx) {
                Ok(value) => {
                    report.values.insert(key, value);
                }
                Err(e) => {
                    if e.is_missing_argument() {
                        tracing::debug!("Skipping {}: {}", key, e);
                    } else {
                        tracing::warn!("Failed to compute {}: {}", key, e);
                    }
                    report.failures.push(MetricFailure {
                        key,
                        error: e.to_string(),
                        missing_argument: e.is_missing_argument(),
                    });
                }
            }
        }

        report.runtime_ms = started.elapsed().as_millis() as u64;
        tracing::info!("{}", report.summary());
        Ok(report)
    }
}
