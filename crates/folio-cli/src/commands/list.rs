//! List command implementation.

use crate::cli::ListArgs;
use crate::error::Result;
use crate::output::Formatter;
use folio_domain::MetricKind;
use folio_numbers::{catalog, MetricDef};

/// Catalog entries matching the arguments, in listing order.
pub fn listed(args: &ListArgs) -> Vec<&'static MetricDef> {
    catalog()
        .iter()
        .filter(|def| args.kind.is_none_or(|kind| def.kind == MetricKind::from(kind)))
        .collect()
}

/// Execute the list command.
pub fn execute_list(args: ListArgs, formatter: &Formatter) -> Result<()> {
    let defs = listed(&args);
    println!("{}", formatter.format_catalog(&defs)?);
    Ok(())
}
