//! Console reporter for timing tables
//!
//! Provides human-readable output as an ASCII table, one row per metric.

use anyhow::Result;
use std::fmt::Write;

use super::{TimingRow, TimingTable};

const NAME_HEADER: &str = "Metric";
const MS_HEADER: &str = "ms";
const S_HEADER: &str = "s";

/// Console format reporter
pub struct ConsoleReporter;

impl ConsoleReporter {
    /// Format a timing table for console output
    pub fn format(table: &TimingTable) -> Result<String> {
        let mut output = String::new();

        let cells: Vec<(&str, String, String)> = table
            .rows()
            .iter()
            .map(|TimingRow { name, cell }| (name.as_str(), cell.ms.to_string(), cell.s.to_string()))
            .collect();

        let name_width = column_width(NAME_HEADER, cells.iter().map(|c| c.0));
        let ms_width = column_width(MS_HEADER, cells.iter().map(|c| c.1.as_str()));
        let s_width = column_width(S_HEADER, cells.iter().map(|c| c.2.as_str()));

        let rule = |left: &str, mid: &str, right: &str| {
            format!(
                "{}{}{}{}{}{}{}",
                left,
                "─".repeat(name_width + 2),
                mid,
                "─".repeat(ms_width + 2),
                mid,
                "─".repeat(s_width + 2),
                right
            )
        };

        writeln!(output, "{}", rule("┌", "┬", "┐"))?;
        writeln!(
            output,
            "│ {:<name_width$} │ {:>ms_width$} │ {:>s_width$} │",
            NAME_HEADER, MS_HEADER, S_HEADER
        )?;
        writeln!(output, "{}", rule("├", "┼", "┤"))?;

        for (name, ms, s) in &cells {
            writeln!(
                output,
                "│ {:<name_width$} │ {:>ms_width$} │ {:>s_width$} │",
                name, ms, s
            )?;
        }

        writeln!(output, "{}", rule("└", "┴", "┘"))?;

        if cells.is_empty() {
            writeln!(output, "(no timing data)")?;
        }

        Ok(output)
    }
}

fn column_width<'a>(header: &str, values: impl Iterator<Item = &'a str>) -> usize {
    values
        .map(|v| v.chars().count())
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or(header.len())
}
