//! Markdown reporter for timing tables

use anyhow::Result;
use std::fmt::Write;

use super::TimingTable;

/// Markdown format reporter
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// Format a timing table as a Markdown table
    pub fn format(table: &TimingTable) -> Result<String> {
        let mut output = String::new();

        writeln!(output, "# Navigation Timing")?;
        writeln!(output)?;
        writeln!(output, "| Metric | ms | s |")?;
        writeln!(output, "|--------|---:|--:|")?;

        for row in table.rows() {
            writeln!(output, "| {} | {} | {} |", row.name, row.cell.ms, row.cell.s)?;
        }

        Ok(output)
    }
}
