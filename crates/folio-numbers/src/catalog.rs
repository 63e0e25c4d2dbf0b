//! The metric catalog
//!
//! Every metric the collector can evaluate is one row of [`CATALOG`]: its kind,
//! its name, the context fields it needs and the function that computes it.
//! Lookup is by `(kind, name)` or by storage key; nothing is discovered by
//! naming convention.

use crate::numbers;
use folio_domain::{Field, MetricContext, MetricError, MetricKind};

/// Signature shared by every metric function
pub type ComputeFn = fn(&MetricContext<'_>) -> Result<i64, MetricError>;

/// One entry of the catalog
#[derive(Debug, Clone, Copy)]
pub struct MetricDef {
    /// Metric name, unique within its kind
    pub name: &'static str,
    /// Range, delta or total
    pub kind: MetricKind,
    /// One-line description for listings
    pub description: &'static str,
    /// Context fields that must be present before `compute` runs
    pub required: &'static [Field],
    /// The metric function
    pub compute: ComputeFn,
}

impl MetricDef {
    /// Qualified identifier used in diagnostics, e.g. `range_work`
    pub fn id(&self) -> String {
        format!("{}_{}", self.kind, self.name)
    }

    /// Key the result is recorded under in a counts document
    pub fn storage_key(&self) -> String {
        self.kind.storage_key(self.name)
    }

    /// Validate the required fields, then compute
    ///
    /// A missing field is reported without any store being queried.
    pub fn evaluate(&self, ctx: &MetricContext<'_>) -> Result<i64, MetricError> {
        ctx.require(self.required, &self.id())?;
        let value = (self.compute)(ctx)?;
        tracing::debug!("{} = {}", self.storage_key(), value);
        Ok(value)
    }
}

macro_rules! metric_def {
    ($kind:ident, $name:literal, $description:literal, [$($field:ident),*], $compute:expr) => {
        MetricDef {
            name: $name,
            kind: MetricKind::$kind,
            description: $description,
            required: &[$(Field::$field),*],
            compute: $compute,
        }
    };
}

/// All metrics, in listing order
pub const CATALOG: &[MetricDef] = &[
    // Range: activity within [start, end)
    metric_def!(Range, "human_edits", "Edits made by humans", [Start, End, ThingDb], numbers::human_edits),
    metric_def!(Range, "cover", "Covers added", [Start, End, CoverDb], numbers::cover),
    metric_def!(Range, "work", "Works created", [Start, End, ThingDb], |ctx| numbers::things_created(ctx, "work")),
    metric_def!(Range, "edition", "Editions created", [Start, End, ThingDb], |ctx| {
        numbers::things_created(ctx, "edition")
    }),
    metric_def!(Range, "user", "Users registered", [Start, End, ThingDb], |ctx| numbers::things_created(ctx, "user")),
    metric_def!(Range, "author", "Authors created", [Start, End, ThingDb], |ctx| {
        numbers::things_created(ctx, "author")
    }),
    metric_def!(Range, "list", "Lists created", [Start, End, ThingDb], |ctx| numbers::things_created(ctx, "list")),
    // Total: point-in-time counts
    metric_def!(Total, "author", "Author seeds", [SeedsDb], numbers::total_author),
    metric_def!(Total, "subject", "Subject seeds", [SeedsDb], numbers::total_subject),
    metric_def!(Total, "list", "Lists ever created", [ThingDb], numbers::total_list),
    metric_def!(Total, "cover", "Editions with a cover", [EditionsDb], numbers::total_cover),
    metric_def!(Total, "work", "Works", [WorksDb], numbers::total_work),
    metric_def!(Total, "edition", "Editions", [EditionsDb], numbers::total_edition),
    metric_def!(Total, "ebook", "Editions with an ebook", [EditionsDb], numbers::total_ebook),
    // Delta: change since yesterday's snapshot
    metric_def!(Delta, "ebook", "Ebooks added since the last snapshot", [Start, EditionsDb, AdminDb], numbers::delta_ebook),
    metric_def!(Delta, "subject", "Subjects added since the last snapshot", [Start, SeedsDb, AdminDb], numbers::delta_subject),
];

/// The full catalog
pub fn catalog() -> &'static [MetricDef] {
    CATALOG
}

/// Look up a metric by kind and name
pub fn find(kind: MetricKind, name: &str) -> Option<&'static MetricDef> {
    CATALOG.iter().find(|def| def.kind == kind && def.name == name)
}

/// Look up a metric by the key its result is stored under
///
/// Also accepts the qualified `kind_name` form returned by [`MetricDef::id`].
pub fn find_by_key(key: &str) -> Option<&'static MetricDef> {
    CATALOG
        .iter()
        .find(|def| def.storage_key() == key)
        .or_else(|| CATALOG.iter().find(|def| def.id() == key))
}

/// Metrics of one kind, in listing order
pub fn of_kind(kind: MetricKind) -> impl Iterator<Item = &'static MetricDef> {
    CATALOG.iter().filter(move |def| def.kind == kind)
}
