//! The metrics collector
//!
//! A [`Collector`] owns a [`MetricRegistry`] and an ordered list of
//! [`TimingProbe`]s. Each collection locates a timing source, derives the base
//! durations from its snapshot, then merges every registered metric into a
//! fresh [`Metrics`] mapping.

use tracing::{debug, error, instrument};

use crate::config::CollectOptions;
use crate::error::{Result, TimingError};
use crate::metrics::{derive_base, Metrics};
use crate::registry::{MetricRegistry, Producer};
use crate::reporter::{OutputFormat, Reporter, TimingTable};
use crate::source::{locate, TimingProbe, TimingSource};

/// Seconds column precision used by the print helpers
const TABLE_PRECISION: u8 = 2;

/// Collects navigation timing metrics from the first available source
pub struct Collector {
    registry: MetricRegistry,
    probes: Vec<Box<dyn TimingProbe>>,
}

impl Collector {
    /// A collector with the built-in metrics registered
    pub fn new(probes: Vec<Box<dyn TimingProbe>>) -> Self {
        Self::with_registry(MetricRegistry::with_builtins(), probes)
    }

    pub fn with_registry(registry: MetricRegistry, probes: Vec<Box<dyn TimingProbe>>) -> Self {
        Self { registry, probes }
    }

    /// Register or overwrite a custom metric
    pub fn register(&mut self, name: impl Into<String>, producer: impl Into<Producer>) {
        self.registry.register(name, producer);
    }

    pub fn registry(&self) -> &MetricRegistry {
        &self.registry
    }

    /// Collect metrics, or `None` when no timing API is available
    pub fn collect(&self, opts: &CollectOptions) -> Option<Metrics> {
        self.try_collect(opts).ok()
    }

    /// Collect metrics, failing with [`TimingError::Unsupported`] when no
    /// probe finds a timing API
    #[instrument(skip(self), fields(simple = opts.simple))]
    pub fn try_collect(&self, opts: &CollectOptions) -> Result<Metrics> {
        let source = locate(&self.probes).ok_or_else(|| {
            debug!("No timing source available from {} probe(s)", self.probes.len());
            TimingError::Unsupported
        })?;
        Ok(self.collect_from(source.as_ref(), opts))
    }

    /// Run one collection against an explicit source
    pub fn collect_from(&self, source: &dyn TimingSource, opts: &CollectOptions) -> Metrics {
        let mut metrics = Metrics::new();

        match source.snapshot() {
            Some(snapshot) => derive_base(&snapshot, opts.simple, &mut metrics),
            None => debug!("{} exposes no legacy timing snapshot", source.label()),
        }

        self.merge_registered(source, &mut metrics);

        debug!("Collected {} metrics from {}", metrics.len(), source.label());
        metrics
    }

    /// Resolve every registered metric into `metrics`.
    ///
    /// A failing producer is logged and recorded as `0`; the rest still run.
    fn merge_registered(&self, source: &dyn TimingSource, metrics: &mut Metrics) {
        for (name, producer) in self.registry.iter() {
            match producer.resolve(source, metrics) {
                Ok(Some(value)) => metrics.insert(name, value),
                Ok(None) => {}
                Err(e) => {
                    error!(metric = name, "Custom metric failed: {:#}", e);
                    metrics.insert(name, 0.0);
                }
            }
        }
    }

    /// Collect and arrange the result as a name-sorted ms / s table.
    ///
    /// An unsupported environment yields an empty table.
    pub fn timing_table(&self, opts: &CollectOptions, precision: u8) -> TimingTable {
        let metrics = self.collect(opts).unwrap_or_default();
        TimingTable::from_metrics(&metrics, precision)
    }

    /// Print the full timing table to stdout
    pub fn print_table(&self, opts: &CollectOptions) -> anyhow::Result<()> {
        let table = self.timing_table(opts, TABLE_PRECISION);
        Reporter::new(OutputFormat::Console).report(&table)
    }

    /// Print the table without raw snapshot fields
    pub fn print_simple_table(&self) -> anyhow::Result<()> {
        self.print_table(&CollectOptions::simple())
    }
}

impl std::fmt::Debug for Collector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collector")
            .field("registry", &self.registry)
            .field(
                "probes",
                &self.probes.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::TimingSnapshot;
    use crate::source::{FixedProbe, StaticTimingSource};

    fn collector_for(snapshot: TimingSnapshot) -> Collector {
        Collector::new(vec![Box::new(FixedProbe::new(
            "performance",
            StaticTimingSource::from_snapshot(snapshot),
        ))])
    }

    #[test]
    fn test_collect_unsupported() {
        let collector = Collector::new(vec![Box::new(FixedProbe::unavailable("performance"))]);
        assert!(collector.collect(&CollectOptions::default()).is_none());
        assert!(matches!(
            collector.try_collect(&CollectOptions::default()),
            Err(TimingError::Unsupported)
        ));
    }

    #[test]
    fn test_collect_includes_builtins() {
        let collector = collector_for(
            TimingSnapshot::new()
                .with_field("navigationStart", 1000.0)
                .with_field("fetchStart", 1005.0)
                .with_field("loadEventEnd", 2000.0),
        );
        let metrics = collector.collect(&CollectOptions::default()).unwrap();

        assert_eq!(metrics.get("loadTime"), Some(995.0));
        assert_eq!(metrics.get("finishLoadTime"), Some(2.0));
        assert_eq!(metrics.get("firstPaint"), Some(0.0));
        assert_eq!(metrics.get("firstPaintTime"), Some(0.0));
    }

    #[test]
    fn test_collect_without_snapshot_still_merges() {
        let source = StaticTimingSource {
            time_origin: Some(1000.0),
            navigation: Some(vec![crate::source::NavigationEntry { load_event_end: 500.0 }]),
            paint: Some(vec![]),
            ..Default::default()
        };
        let mut collector = Collector::new(vec![Box::new(FixedProbe::new("performance", source))]);
        collector.register("answer", 42.0);

        let metrics = collector.collect(&CollectOptions::default()).unwrap();
        assert!(!metrics.contains("loadTime"));
        assert_eq!(metrics.get("finishLoadTime"), Some(1.5));
        assert_eq!(metrics.get("answer"), Some(42.0));
    }

    #[test]
    fn test_failing_builtin_recorded_as_zero() {
        let collector = Collector::new(vec![Box::new(FixedProbe::new(
            "performance",
            StaticTimingSource::default(),
        ))]);
        let metrics = collector.collect(&CollectOptions::default()).unwrap();

        assert_eq!(metrics.get("finishLoadTime"), Some(0.0));
        assert_eq!(metrics.get("firstPaintTime"), Some(0.0));
        assert!(!metrics.contains("firstPaint"));
    }

    #[test]
    fn test_producers_see_earlier_results() {
        let mut collector = collector_for(
            TimingSnapshot::new()
                .with_field("fetchStart", 100.0)
                .with_field("loadEventEnd", 500.0),
        );
        collector.register(
            "loadTimeSeconds",
            Producer::compute(|m: &mut Metrics| Ok(Some(m.value_or_nan("loadTime") / 1000.0))),
        );

        let metrics = collector.collect(&CollectOptions::simple()).unwrap();
        assert_eq!(metrics.get("loadTimeSeconds"), Some(0.4));
    }

    #[test]
    fn test_timing_table_unsupported_is_empty() {
        let collector = Collector::new(vec![]);
        assert!(collector.timing_table(&CollectOptions::default(), 2).is_empty());
    }

    #[test]
    fn test_debug_lists_probe_names() {
        let collector = Collector::new(vec![Box::new(FixedProbe::unavailable("mozPerformance"))]);
        let debug = format!("{:?}", collector);
        assert!(debug.contains("mozPerformance"));
        assert!(debug.contains("finishLoadTime"));
    }
}
