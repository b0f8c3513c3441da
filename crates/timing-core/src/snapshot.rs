//! Legacy navigation timing snapshot
//!
//! A [`TimingSnapshot`] is the read-only bag of timestamps the host exposes as
//! `performance.timing`. Fields are kept exactly as the platform reported them;
//! nothing is validated for monotonicity or presence.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Vendor-prefixed first paint timestamp exposed by older IE/Edge builds
pub const MS_FIRST_PAINT: &str = "msFirstPaint";

/// A single raw field of a timing snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// A numeric timestamp (the common case)
    Number(f64),
    /// A textual value, numeric if it parses as a float
    Text(String),
    /// Anything else (booleans, null, nested objects)
    Other(Value),
}

impl FieldValue {
    /// Coerce the value to a number for duration arithmetic.
    ///
    /// Follows the host's subtraction rules: `null` and blank text are `0`,
    /// booleans are `0` or `1`. Anything else that is not numeric yields NaN,
    /// which then propagates through any difference computed from it.
    pub fn as_number(&self) -> f64 {
        match self {
            FieldValue::Number(v) => *v,
            FieldValue::Text(s) => text_to_number(s),
            FieldValue::Other(Value::Null) => 0.0,
            FieldValue::Other(Value::Bool(flag)) => f64::from(u8::from(*flag)),
            FieldValue::Other(_) => f64::NAN,
        }
    }

    /// The value as a finite float, or `None` if it is not numeric
    pub fn numeric(&self) -> Option<f64> {
        let value = match self {
            FieldValue::Number(v) => *v,
            FieldValue::Text(s) => s.trim().parse().ok()?,
            FieldValue::Other(_) => return None,
        };
        value.is_finite().then_some(value)
    }
}

fn text_to_number(text: &str) -> f64 {
    let text = text.trim();
    if text.is_empty() {
        return 0.0;
    }
    if text.strip_prefix(&['+', '-'][..]).unwrap_or(text) == "Infinity" {
        return if text.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }
    // `parse` also accepts spellings like "inf" and "NaN" that the host does not
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => f64::NAN,
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

/// Named timestamps describing one page-load lifecycle
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimingSnapshot {
    fields: BTreeMap<String, FieldValue>,
}

impl TimingSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly useful for synthetic snapshots
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Numeric value of a field, NaN when it is missing or not a number
    pub fn field(&self, name: &str) -> f64 {
        self.fields
            .get(name)
            .map_or(f64::NAN, FieldValue::as_number)
    }

    /// Iterate over the fields that pass the numeric test
    pub fn numeric_fields(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.fields
            .iter()
            .filter_map(|(name, value)| value.numeric().map(|v| (name.as_str(), v)))
    }

    /// The vendor first-paint timestamp, only when reported as a real number
    pub fn ms_first_paint(&self) -> Option<f64> {
        match self.fields.get(MS_FIRST_PAINT) {
            Some(FieldValue::Number(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for TimingSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut snapshot = Self::new();
        for (name, value) in iter {
            snapshot.insert(name, value);
        }
        snapshot
    }
}
