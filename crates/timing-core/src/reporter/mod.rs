//! Timing table reporting
//!
//! This module turns a collected [`Metrics`] mapping into a two-column
//! (milliseconds / seconds) table and renders it in various formats.
//!
//! # Output Formats
//!
//! - **Console**: Boxed ASCII table for interactive debugging
//! - **JSON**: Machine-readable `{ name: { ms, s } }` object
//! - **Markdown**: Documentation-friendly table
//!
//! # Example
//!
//! ```
//! use timing_core::reporter::{OutputFormat, Reporter, TimingTable};
//! use timing_core::Metrics;
//!
//! # fn example() -> anyhow::Result<()> {
//! let metrics: Metrics = [("loadTime", 1234.0)].into_iter().collect();
//! let table = TimingTable::from_metrics(&metrics, 2);
//!
//! let output = Reporter::new(OutputFormat::Console).format_table(&table)?;
//! assert!(output.contains("loadTime"));
//! # Ok(())
//! # }
//! ```

mod console;
mod json;
mod markdown;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::Result;

use crate::metrics::Metrics;

pub use console::ConsoleReporter;
pub use json::JsonReporter;
pub use markdown::MarkdownReporter;

/// Output format for timing tables
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Console output with an ASCII table
    #[default]
    Console,
    /// JSON format for machine parsing
    Json,
    /// Pretty-printed JSON
    JsonPretty,
    /// Markdown format for documentation
    Markdown,
}

/// One metric expressed in both units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimingCell {
    pub ms: f64,
    pub s: f64,
}

/// A named row of the timing table
#[derive(Debug, Clone, PartialEq)]
pub struct TimingRow {
    pub name: String,
    pub cell: TimingCell,
}

/// Metrics sorted by name, each with a rounded seconds column
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimingTable {
    rows: Vec<TimingRow>,
}

impl TimingTable {
    /// Build a table, rounding seconds to `precision` decimal places
    pub fn from_metrics(metrics: &Metrics, precision: u8) -> Self {
        let rows = metrics
            .iter()
            .map(|(name, ms)| TimingRow {
                name: name.to_string(),
                cell: TimingCell {
                    ms,
                    s: round_to(ms / 1000.0, precision),
                },
            })
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[TimingRow] {
        &self.rows
    }

    pub fn get(&self, name: &str) -> Option<&TimingCell> {
        self.rows
            .iter()
            .find(|row| row.name == name)
            .map(|row| &row.cell)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The table as a name-keyed map, the shape `console.table` expects
    pub fn to_map(&self) -> BTreeMap<String, TimingCell> {
        self.rows
            .iter()
            .map(|row| (row.name.clone(), row.cell))
            .collect()
    }
}

fn round_to(value: f64, precision: u8) -> f64 {
    let factor = 10f64.powi(i32::from(precision));
    (value * factor).round() / factor
}

/// Reporter for timing tables
#[derive(Debug, Clone, Default)]
pub struct Reporter {
    format: OutputFormat,
}

impl Reporter {
    /// Create a new reporter with the specified output format
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Report a table to stdout
    pub fn report(&self, table: &TimingTable) -> Result<()> {
        let output = self.format_table(table)?;
        print!("{}", output);
        io::stdout().flush()?;
        Ok(())
    }

    /// Write a table to a file
    pub fn write_to_file<P: AsRef<Path>>(&self, table: &TimingTable, path: P) -> Result<()> {
        let output = self.format_table(table)?;
        fs::write(path, output)?;
        Ok(())
    }

    /// Format a table as a string
    pub fn format_table(&self, table: &TimingTable) -> Result<String> {
        match self.format {
            OutputFormat::Console => ConsoleReporter::format(table),
            OutputFormat::Json => JsonReporter::format(table, false),
            OutputFormat::JsonPretty => JsonReporter::format(table, true),
            OutputFormat::Markdown => MarkdownReporter::format(table),
        }
    }
}
