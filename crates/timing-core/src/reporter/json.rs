//! JSON reporter for timing tables

use anyhow::Result;

use super::TimingTable;

/// JSON format reporter
pub struct JsonReporter;

impl JsonReporter {
    /// Format a timing table as a `{ name: { ms, s } }` object
    ///
    /// # Arguments
    ///
    /// * `table` - The table to format
    /// * `pretty` - Whether to pretty-print the JSON
    ///
    /// NaN values are written as `null`.
    pub fn format(table: &TimingTable, pretty: bool) -> Result<String> {
        let map = table.to_map();
        let output = if pretty {
            serde_json::to_string_pretty(&map)?
        } else {
            serde_json::to_string(&map)?
        };
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::tests::create_test_table;

    #[test]
    fn test_json_format_compact() {
        let output = JsonReporter::format(&create_test_table(), false).unwrap();

        // Compact JSON should not have newlines
        assert!(!output.contains('\n'));
        assert!(output.contains(r#""loadTime":{"ms":1234.0,"s":1.23}"#));
    }

    #[test]
    fn test_json_format_pretty() {
        let output = JsonReporter::format(&create_test_table(), true).unwrap();

        assert!(output.contains('\n'));
        assert!(output.contains("  "));
    }

    #[test]
    fn test_json_nan_is_null() {
        let output = JsonReporter::format(&create_test_table(), false).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert!(parsed["domContentReadyTime"]["ms"].is_null());
        assert_eq!(parsed["connectTime"]["ms"], 30.0);
    }
}
