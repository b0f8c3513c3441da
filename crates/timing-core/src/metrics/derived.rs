//! Base durations derived from the legacy timing snapshot

use crate::metrics::Metrics;
use crate::snapshot::TimingSnapshot;

/// `(metric, end field, start field)`: each metric is `end - start`
pub const DERIVED_DURATIONS: &[(&str, &str, &str)] = &[
    // Total time from start to load
    ("loadTime", "loadEventEnd", "fetchStart"),
    // Time spent constructing the DOM tree
    ("domReadyTime", "domComplete", "domInteractive"),
    // Time consumed preparing the new page
    ("readyStart", "fetchStart", "navigationStart"),
    ("redirectTime", "redirectEnd", "redirectStart"),
    ("appcacheTime", "domainLookupStart", "fetchStart"),
    ("unloadEventTime", "unloadEventEnd", "unloadEventStart"),
    // DNS query time
    ("lookupDomainTime", "domainLookupEnd", "domainLookupStart"),
    // TCP connection time
    ("connectTime", "connectEnd", "connectStart"),
    ("requestTime", "responseEnd", "requestStart"),
    // Request to completion of the DOM loading
    ("initDomTreeTime", "domInteractive", "responseEnd"),
    ("loadEventTime", "loadEventEnd", "loadEventStart"),
];

/// Fill `metrics` with the snapshot-derived measurements.
///
/// Unless `simple` is set, every numeric snapshot field is copied first under
/// its own name. Durations are plain differences: no clamping, and a missing
/// field makes the result NaN.
///
/// `domContentReadyTime` is computed from the fields already copied into
/// `metrics`, not from the snapshot, so it is NaN in simple mode.
pub fn derive_base(snapshot: &TimingSnapshot, simple: bool, metrics: &mut Metrics) {
    if !simple {
        for (name, value) in snapshot.numeric_fields() {
            metrics.insert(name, value);
        }
    }

    for (metric, end, start) in DERIVED_DURATIONS {
        metrics.insert(*metric, snapshot.field(end) - snapshot.field(start));
    }

    let dom_content_ready =
        metrics.value_or_nan("domContentLoadedEventEnd") - metrics.value_or_nan("navigationStart");
    metrics.insert("domContentReadyTime", dom_content_ready);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_snapshot() -> TimingSnapshot {
        TimingSnapshot::new()
            .with_field("navigationStart", 1000.0)
            .with_field("redirectStart", 0.0)
            .with_field("redirectEnd", 0.0)
            .with_field("unloadEventStart", 1010.0)
            .with_field("unloadEventEnd", 1012.0)
            .with_field("fetchStart", 1005.0)
            .with_field("domainLookupStart", 1007.0)
            .with_field("domainLookupEnd", 1020.0)
            .with_field("connectStart", 1020.0)
            .with_field("connectEnd", 1050.0)
            .with_field("requestStart", 1051.0)
            .with_field("responseEnd", 1200.0)
            .with_field("domInteractive", 1400.0)
            .with_field("domContentLoadedEventEnd", 1450.0)
            .with_field("domComplete", 1800.0)
            .with_field("loadEventStart", 1801.0)
            .with_field("loadEventEnd", 1810.0)
    }

    #[test]
    fn test_all_durations() {
        let mut metrics = Metrics::new();
        derive_base(&full_snapshot(), false, &mut metrics);

        assert_eq!(metrics.get("loadTime"), Some(805.0));
        assert_eq!(metrics.get("domReadyTime"), Some(400.0));
        assert_eq!(metrics.get("readyStart"), Some(5.0));
        assert_eq!(metrics.get("redirectTime"), Some(0.0));
        assert_eq!(metrics.get("appcacheTime"), Some(2.0));
        assert_eq!(metrics.get("unloadEventTime"), Some(2.0));
        assert_eq!(metrics.get("lookupDomainTime"), Some(13.0));
        assert_eq!(metrics.get("connectTime"), Some(30.0));
        assert_eq!(metrics.get("requestTime"), Some(149.0));
        assert_eq!(metrics.get("initDomTreeTime"), Some(200.0));
        assert_eq!(metrics.get("loadEventTime"), Some(9.0));
        assert_eq!(metrics.get("domContentReadyTime"), Some(450.0));
    }

    #[test]
    fn test_raw_fields_copied_unless_simple() {
        let mut full = Metrics::new();
        derive_base(&full_snapshot(), false, &mut full);
        assert_eq!(full.get("navigationStart"), Some(1000.0));
        assert_eq!(full.get("loadEventEnd"), Some(1810.0));

        let mut simple = Metrics::new();
        derive_base(&full_snapshot(), true, &mut simple);
        assert!(!simple.contains("navigationStart"));
        assert!(!simple.contains("loadEventEnd"));
        assert_eq!(simple.get("loadTime"), Some(805.0));
    }

    #[test]
    fn test_dom_content_ready_is_nan_in_simple_mode() {
        let mut metrics = Metrics::new();
        derive_base(&full_snapshot(), true, &mut metrics);
        assert!(metrics.get("domContentReadyTime").unwrap().is_nan());
    }

    #[test]
    fn test_missing_fields_propagate_nan() {
        let snapshot = TimingSnapshot::new().with_field("fetchStart", 100.0);
        let mut metrics = Metrics::new();
        derive_base(&snapshot, false, &mut metrics);

        assert!(metrics.get("loadTime").unwrap().is_nan());
        assert!(metrics.get("connectTime").unwrap().is_nan());
    }

    #[test]
    fn test_negative_durations_are_kept() {
        let snapshot = TimingSnapshot::new()
            .with_field("connectStart", 80.0)
            .with_field("connectEnd", 50.0);
        let mut metrics = Metrics::new();
        derive_base(&snapshot, true, &mut metrics);
        assert_eq!(metrics.get("connectTime"), Some(-30.0));
    }
}
