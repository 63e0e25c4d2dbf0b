//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use folio_numbers::{CollectionReport, MetricDef};
use tabled::{
    builder::Builder,
    settings::{object::Columns, object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format catalog entries.
    pub fn format_catalog(&self, defs: &[&MetricDef]) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_catalog_json(defs),
            OutputFormat::Table => Ok(self.format_catalog_table(defs)),
            OutputFormat::Quiet => Ok(defs.iter().map(|d| d.storage_key()).collect::<Vec<_>>().join("\n")),
        }
    }

    fn format_catalog_json(&self, defs: &[&MetricDef]) -> Result<String> {
        let entries: Vec<serde_json::Value> = defs
            .iter()
            .map(|d| {
                serde_json::json!({
                    "key": d.storage_key(),
                    "kind": d.kind,
                    "name": d.name,
                    "inputs": d.required.iter().map(|f| f.as_str()).collect::<Vec<_>>(),
                    "description": d.description,
                })
            })
            .collect();

        Ok(serde_json::to_string_pretty(&entries)?)
    }

    fn format_catalog_table(&self, defs: &[&MetricDef]) -> String {
        if defs.is_empty() {
            return self.colorize("No metrics found.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Key", "Kind", "Inputs", "Description"]);

        for def in defs {
            let inputs = def.required.iter().map(|f| f.as_str()).collect::<Vec<_>>().join(", ");
            builder.push_record([
                def.storage_key().as_str(),
                def.kind.as_str(),
                inputs.as_str(),
                def.description,
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format the outcome of a collection run.
    pub fn format_report(&self, report: &CollectionReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
            OutputFormat::Table => Ok(self.format_report_table(report)),
            OutputFormat::Quiet => Ok(report
                .values
                .iter()
                .map(|(key, value)| format!("{} {}", key, value))
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    fn format_report_table(&self, report: &CollectionReport) -> String {
        let mut sections = Vec::new();

        if report.values.is_empty() {
            sections.push(self.warning("No metrics computed."));
        } else {
            let mut builder = Builder::default();
            builder.push_record(["Metric", "Value"]);
            for (key, value) in &report.values {
                builder.push_record([key.clone(), value.to_string()]);
            }
            let mut table = builder.build();
            table
                .with(Style::rounded())
                .with(Modify::new(Rows::first()).with(Alignment::center()))
                .with(Modify::new(Columns::last()).with(Alignment::right()));
            sections.push(table.to_string());
        }

        for failure in &report.failures {
            let line = format!("{}: {}", failure.key, failure.error);
            if failure.missing_argument {
                sections.push(self.info(&line));
            } else {
                sections.push(self.error(&line));
            }
        }

        sections.push(self.summary(report));
        sections.join("\n")
    }

    fn summary(&self, report: &CollectionReport) -> String {
        let hard = report.failures.iter().filter(|f| !f.missing_argument).count();
        let skipped = report.failed() - hard;
        let line = format!(
            "{} computed, {} skipped, {} failed",
            report.succeeded(),
            skipped,
            hard
        );
        if hard == 0 {
            self.success(&line)
        } else {
            self.warning(&line)
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}
