//! Custom metric registry
//!
//! A [`Producer`] is either a constant or a function of the in-progress
//! [`Metrics`]. Functions return `Ok(Some(value))` to set their metric,
//! `Ok(None)` to leave it out, or an error (recorded as `0`).
//!
//! A function may also write straight into the mapping it is handed. Those
//! writes are kept even when it returns `Ok(None)`, which is how a single
//! producer can publish several related values:
//!
//! ```
//! use timing_core::{Metrics, MetricRegistry, Producer};
//!
//! let mut registry = MetricRegistry::new();
//! registry.register("serverTime", 12.5);
//! registry.register(
//!     "paintPair",
//!     Producer::compute(|metrics: &mut Metrics| {
//!         metrics.insert("paintStart", 10.0);
//!         metrics.insert("paintEnd", 25.0);
//!         Ok(None)
//!     }),
//! );
//! assert_eq!(registry.len(), 2);
//! ```

use std::fmt;

use crate::metrics::Metrics;
use crate::source::TimingSource;

/// Signature of a computed producer
pub type ComputeFn = dyn Fn(&dyn TimingSource, &mut Metrics) -> anyhow::Result<Option<f64>>;

/// How a registered metric obtains its value
pub enum Producer {
    Constant(f64),
    Compute(Box<ComputeFn>),
}

impl Producer {
    pub fn constant(value: f64) -> Self {
        Producer::Constant(value)
    }

    /// A producer computed from the metrics collected so far
    pub fn compute<F>(f: F) -> Self
    where
        F: Fn(&mut Metrics) -> anyhow::Result<Option<f64>> + 'static,
    {
        Producer::Compute(Box::new(move |_source: &dyn TimingSource, metrics: &mut Metrics| f(metrics)))
    }

    /// A producer that also reads the active timing source
    pub fn with_source<F>(f: F) -> Self
    where
        F: Fn(&dyn TimingSource, &mut Metrics) -> anyhow::Result<Option<f64>> + 'static,
    {
        Producer::Compute(Box::new(f))
    }

    pub(crate) fn resolve(
        &self,
        source: &dyn TimingSource,
        metrics: &mut Metrics,
    ) -> anyhow::Result<Option<f64>> {
        match self {
            Producer::Constant(value) => Ok(Some(*value)),
            Producer::Compute(f) => f(source, metrics),
        }
    }
}

impl From<f64> for Producer {
    fn from(value: f64) -> Self {
        Producer::Constant(value)
    }
}

impl fmt::Debug for Producer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Producer::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            Producer::Compute(_) => f.write_str("Compute(..)"),
        }
    }
}

/// Registered custom metrics, in registration order
///
/// Re-registering a name replaces its producer in place. Entries are never
/// removed.
#[derive(Debug, Default)]
pub struct MetricRegistry {
    entries: Vec<(String, Producer)>,
}

impl MetricRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding `finishLoadTime` and `firstPaintTime`
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::metrics::builtin::register_builtins(&mut registry);
        registry
    }

    /// Store or overwrite the producer for `name`
    pub fn register(&mut self, name: impl Into<String>, producer: impl Into<Producer>) {
        let name = name.into();
        let producer = producer.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = producer,
            None => self.entries.push((name, producer)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Producer> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, producer)| producer)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Producer)> + '_ {
        self.entries.iter().map(|(name, producer)| (name.as_str(), producer))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::StaticTimingSource;

    #[test]
    fn test_register_appends_in_order() {
        let mut registry = MetricRegistry::new();
        registry.register("a", 1.0);
        registry.register("b", 2.0);
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_register_overwrites_in_place() {
        let mut registry = MetricRegistry::new();
        registry.register("a", 1.0);
        registry.register("b", 2.0);
        registry.register("a", 3.0);

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert!(matches!(registry.get("a"), Some(Producer::Constant(v)) if *v == 3.0));
    }

    #[test]
    fn test_resolve_constant_and_compute() {
        let source = StaticTimingSource::default();
        let mut metrics = Metrics::new();
        metrics.insert("loadTime", 400.0);

        let constant = Producer::constant(42.0);
        assert_eq!(constant.resolve(&source, &mut metrics).unwrap(), Some(42.0));

        let half = Producer::compute(|m: &mut Metrics| Ok(Some(m.value_or_nan("loadTime") / 2.0)));
        assert_eq!(half.resolve(&source, &mut metrics).unwrap(), Some(200.0));
    }

    #[test]
    fn test_resolve_with_source() {
        let source = StaticTimingSource {
            time_origin: Some(5000.0),
            ..Default::default()
        };
        let mut metrics = Metrics::new();

        let origin = Producer::with_source(|s: &dyn TimingSource, _m: &mut Metrics| Ok(s.time_origin()));
        assert_eq!(origin.resolve(&source, &mut metrics).unwrap(), Some(5000.0));
    }

    #[test]
    fn test_builtins_registered() {
        let registry = MetricRegistry::with_builtins();
        assert!(registry.contains("finishLoadTime"));
        assert!(registry.contains("firstPaintTime"));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_debug_hides_closure() {
        assert_eq!(format!("{:?}", Producer::constant(1.5)), "Constant(1.5)");
        assert_eq!(format!("{:?}", Producer::compute(|_| Ok(None))), "Compute(..)");
    }
}
