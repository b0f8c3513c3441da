//! Metric derivation and the per-collection result mapping
//!
//! This module provides:
//! - **[`Metrics`]**: the name → value mapping built by one collection
//! - **Base durations**: differences between pairs of snapshot timestamps
//! - **Built-in metrics**: `finishLoadTime` and `firstPaintTime`, registered
//!   as ordinary producers
//!
//! # Example
//!
//! ```
//! use timing_core::metrics::{derive_base, Metrics};
//! use timing_core::TimingSnapshot;
//!
//! let snapshot = TimingSnapshot::new()
//!     .with_field("fetchStart", 100.0)
//!     .with_field("loadEventEnd", 500.0);
//!
//! let mut metrics = Metrics::new();
//! derive_base(&snapshot, false, &mut metrics);
//! assert_eq!(metrics.get("loadTime"), Some(400.0));
//! ```

pub mod builtin;
pub mod derived;

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

pub use derived::{derive_base, DERIVED_DURATIONS};

/// Metric values from one collection, keyed by metric name
///
/// Values are milliseconds unless the metric name says otherwise
/// (`finishLoadTime` is in seconds). Missing inputs show up as NaN, which
/// serializes as `null` and reads back as NaN.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metrics {
    #[serde(deserialize_with = "nullable_values")]
    values: BTreeMap<String, f64>,
}

fn nullable_values<'de, D>(deserializer: D) -> Result<BTreeMap<String, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = BTreeMap::<String, Option<f64>>::deserialize(deserializer)?;
    Ok(values
        .into_iter()
        .map(|(name, value)| (name, value.unwrap_or(f64::NAN)))
        .collect())
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Value of `name`, NaN when it has not been set
    pub fn value_or_nan(&self, name: &str) -> f64 {
        self.get(name).unwrap_or(f64::NAN)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.values.iter().map(|(name, value)| (name.as_str(), *value))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.values.keys().map(String::as_str)
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for Metrics {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
