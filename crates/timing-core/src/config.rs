//! Configuration for collections and reports
//!
//! Options can be built in code or loaded from a TOML file:
//!
//! ```toml
//! [collect]
//! simple = true
//!
//! [report]
//! format = "markdown"
//! precision = 3
//! ```

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::reporter::OutputFormat;

/// Main configuration structure loaded from TOML files
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Options passed to every collection
    #[serde(default)]
    pub collect: CollectOptions,
    /// Table output settings
    #[serde(default)]
    pub report: ReportConfig,
}

impl TimingConfig {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML is malformed
    /// - The precision is out of range
    ///
    /// # Example
    ///
    /// ```no_run
    /// use timing_core::config::TimingConfig;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let config = TimingConfig::from_file("timing.toml")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string
    ///
    /// # Example
    ///
    /// ```
    /// use timing_core::config::TimingConfig;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let config = TimingConfig::from_str("[collect]\nsimple = true")?;
    /// assert!(config.collect.simple);
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_str(s: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(s).context("Failed to parse TOML configuration")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.report.precision > MAX_PRECISION {
            return Err(crate::TimingError::Config(format!(
                "report.precision must be at most {}, got {}",
                MAX_PRECISION, self.report.precision
            ))
            .into());
        }
        Ok(())
    }
}

/// Options for a single collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectOptions {
    /// Skip copying raw snapshot fields into the result
    pub simple: bool,
}

impl CollectOptions {
    pub fn simple() -> Self {
        Self { simple: true }
    }
}

const MAX_PRECISION: u8 = 10;

/// Table output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Output format (default: console)
    #[serde(default)]
    pub format: OutputFormat,
    /// Decimal places of the seconds column (default: 2)
    #[serde(default = "default_precision")]
    pub precision: u8,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            precision: default_precision(),
        }
    }
}

fn default_precision() -> u8 {
    2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_config() {
        let config = TimingConfig::from_str("").unwrap();
        assert_eq!(config, TimingConfig::default());
        assert!(!config.collect.simple);
        assert_eq!(config.report.format, OutputFormat::Console);
        assert_eq!(config.report.precision, 2);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
            [collect]
            simple = true

            [report]
            format = "json_pretty"
            precision = 3
        "#;

        let config = TimingConfig::from_str(toml).unwrap();
        assert!(config.collect.simple);
        assert_eq!(config.report.format, OutputFormat::JsonPretty);
        assert_eq!(config.report.precision, 3);
    }

    #[test]
    fn test_partial_report_section_keeps_defaults() {
        let config = TimingConfig::from_str("[report]\nformat = \"markdown\"").unwrap();
        assert_eq!(config.report.format, OutputFormat::Markdown);
        assert_eq!(config.report.precision, 2);
    }

    #[test]
    fn test_rejects_unknown_format() {
        assert!(TimingConfig::from_str("[report]\nformat = \"html\"").is_err());
    }

    #[test]
    fn test_rejects_large_precision() {
        let err = TimingConfig::from_str("[report]\nprecision = 42").unwrap_err();
        assert!(err.to_string().contains("precision"));
    }

    #[test]
    fn test_collect_options_from_json() {
        let opts: CollectOptions = serde_json::from_str("{}").unwrap();
        assert!(!opts.simple);
        let opts: CollectOptions = serde_json::from_str(r#"{"simple": true}"#).unwrap();
        assert_eq!(opts, CollectOptions::simple());
    }
}
