//! CLI command definitions and argument parsing.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use folio_domain::MetricKind;
use std::path::PathBuf;

/// Folio - Daily library statistics.
#[derive(Debug, Parser)]
#[command(name = "folio")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "FOLIO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (keys and values only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the metrics the catalog knows
    List(ListArgs),

    /// Compute metrics for one day
    Run(RunArgs),

    /// Print the effective configuration
    Config,
}

/// Arguments for the list command.
#[derive(Debug, Parser)]
pub struct ListArgs {
    /// Only list metrics of this kind
    #[arg(short, long, value_enum)]
    pub kind: Option<KindArg>,
}

/// Arguments for the run command.
#[derive(Debug, Parser)]
pub struct RunArgs {
    /// Day to compute, YYYY-MM-DD (default: yesterday, UTC)
    #[arg(short, long)]
    pub date: Option<NaiveDate>,

    /// Storage key of a metric to compute (repeatable)
    #[arg(short = 'm', long = "metric")]
    pub metrics: Vec<String>,

    /// Kind of metric to compute (repeatable)
    #[arg(short = 'k', long = "kind", value_enum)]
    pub kinds: Vec<KindArg>,
}

/// Metric kind argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum KindArg {
    /// Activity within the day
    Range,
    /// Change since the last snapshot
    Delta,
    /// Point-in-time counts
    Total,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl From<KindArg> for MetricKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Range => MetricKind::Range,
            KindArg::Delta => MetricKind::Delta,
            KindArg::Total => MetricKind::Total,
        }
    }
}
