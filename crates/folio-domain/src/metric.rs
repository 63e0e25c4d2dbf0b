//! Metric kinds and the key derivation rules that go with them

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Calendar date format used for query bounds and snapshot keys
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// How a metric's value relates to time
///
/// The kind decides where a harness stores the result:
/// - Range: events created in `[start, end)`, stored under the bare name
/// - Delta: change since yesterday's snapshot, stored under the bare name
/// - Total: current absolute count, stored under `total_<name>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    /// Count of events within the date range
    Range,

    /// Difference between today's total and yesterday's stored total
    Delta,

    /// Current absolute count; the date range is ignored
    Total,
}

impl MetricKind {
    /// All kinds, in evaluation order
    pub const ALL: [MetricKind; 3] = [MetricKind::Range, MetricKind::Delta, MetricKind::Total];

    /// Get the kind name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Range => "range",
            MetricKind::Delta => "delta",
            MetricKind::Total => "total",
        }
    }

    /// Parse a kind from a string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "range" => Some(MetricKind::Range),
            "delta" => Some(MetricKind::Delta),
            "total" => Some(MetricKind::Total),
            _ => None,
        }
    }

    /// Key under which a metric of this kind is stored
    ///
    /// ```
    /// use folio_domain::MetricKind;
    ///
    /// assert_eq!(MetricKind::Range.storage_key("cover"), "cover");
    /// assert_eq!(MetricKind::Total.storage_key("cover"), "total_cover");
    /// ```
    pub fn storage_key(&self, name: &str) -> String {
        match self {
            MetricKind::Total => format!("total_{}", name),
            MetricKind::Range | MetricKind::Delta => name.to_string(),
        }
    }
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MetricKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid metric kind: {}", s))
    }
}

/// Format a date as `YYYY-MM-DD`
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Key of the persisted counts record for a day
///
/// ```
/// use chrono::NaiveDate;
/// use folio_domain::snapshot_key;
///
/// let day = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
/// assert_eq!(snapshot_key(day), "counts-2024-03-09");
/// ```
pub fn snapshot_key(date: NaiveDate) -> String {
    format!("counts-{}", format_date(date))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_kind_parsing() {
        assert_eq!(MetricKind::parse("range"), Some(MetricKind::Range));
        assert_eq!(MetricKind::parse("Delta"), Some(MetricKind::Delta));
        assert_eq!(MetricKind::parse("TOTAL"), Some(MetricKind::Total));
        assert_eq!(MetricKind::parse("weekly"), None);
        assert!("bogus".parse::<MetricKind>().is_err());
    }

    #[test]
    fn test_kind_serde_lowercase() {
        let json = serde_json::to_string(&MetricKind::Total).unwrap();
        assert_eq!(json, "\"total\"");
        let kind: MetricKind = serde_json::from_str("\"delta\"").unwrap();
        assert_eq!(kind, MetricKind::Delta);
    }

    #[test]
    fn test_delta_keeps_bare_name() {
        assert_eq!(MetricKind::Delta.storage_key("ebook"), "ebook");
    }

    proptest! {
        #[test]
        fn total_keys_are_prefixed(name in "[a-z_]{1,20}") {
            prop_assert_eq!(MetricKind::Total.storage_key(&name), format!("total_{}", name));
            prop_assert_eq!(MetricKind::Range.storage_key(&name), name.clone());
        }

        #[test]
        fn snapshot_keys_sort_like_dates(a in 0i64..20000, b in 0i64..20000) {
            let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
            let da = epoch + chrono::Duration::days(a);
            let db = epoch + chrono::Duration::days(b);
            prop_assert_eq!(da.cmp(&db), snapshot_key(da).cmp(&snapshot_key(db)));
        }
    }
}
