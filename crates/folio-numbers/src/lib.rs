//! Folio Numbers
//!
//! The catalog of library metrics and the collector that evaluates them.
//!
//! ## Metrics
//!
//! - **Range**: things created, edits made or covers added within `[start, end)`
//! - **Total**: point-in-time counts read from the document stores
//! - **Delta**: today's total minus the total recorded in yesterday's snapshot
//!
//! Each metric is a plain function over a [`MetricContext`]. The catalog maps
//! `(kind, name)` to that function and to the inputs it requires; the
//! [`Collector`] runs a selection of the catalog and reports values and
//! failures side by side.
//!
//! ## Example
//!
//! ```
//! use chrono::NaiveDate;
//! use folio_domain::{MetricContext, MetricKind};
//! use folio_numbers::{find, Collector};
//!
//! let def = find(MetricKind::Total, "work").unwrap();
//! assert_eq!(def.storage_key(), "total_work");
//!
//! // Nothing supplied: every metric reports a missing input
//! let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
//! let report = Collector::default().collect(&MetricContext::for_day(day)).unwrap();
//! assert_eq!(report.succeeded(), 0);
//! assert!(report.failures.iter().all(|f| f.missing_argument));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod catalog;
pub mod collector;
pub mod numbers;

#[cfg(test)]
mod testing;

pub use catalog::{catalog, find, find_by_key, of_kind, MetricDef, CATALOG};
pub use collector::{CollectionReport, Collector, CollectorConfig, MetricFailure};
