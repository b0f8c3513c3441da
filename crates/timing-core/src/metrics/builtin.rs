//! Metrics registered on every new registry
//!
//! Both read the timing source directly instead of the base durations, and
//! pick whichever platform API generation the source exposes.

use anyhow::{anyhow, Context};

use crate::metrics::Metrics;
use crate::registry::{MetricRegistry, Producer};
use crate::source::TimingSource;

pub const FINISH_LOAD_TIME: &str = "finishLoadTime";
pub const FIRST_PAINT_TIME: &str = "firstPaintTime";
pub const FIRST_PAINT: &str = "firstPaint";

pub(crate) fn register_builtins(registry: &mut MetricRegistry) {
    registry.register(FINISH_LOAD_TIME, Producer::with_source(finish_load_time));
    registry.register(FIRST_PAINT_TIME, Producer::with_source(first_paint_time));
}

/// Absolute load-event end, in seconds since the epoch.
///
/// Uses the navigation entry plus time origin when Navigation Timing 2 is
/// available, otherwise the legacy `loadEventEnd`.
pub fn finish_load_time(source: &dyn TimingSource, _metrics: &mut Metrics) -> anyhow::Result<Option<f64>> {
    let time_origin = source
        .time_origin()
        .filter(|origin| *origin != 0.0 && !origin.is_nan());

    if let (Some(entries), Some(origin)) = (source.navigation_entries(), time_origin) {
        let entry = entries
            .first()
            .ok_or_else(|| anyhow!("navigation timing reported no navigation entry"))?;
        return Ok(Some((entry.load_event_end + origin) / 1000.0));
    }

    let snapshot = source
        .snapshot()
        .context("legacy navigation timing is unavailable")?;
    Ok(Some(snapshot.field("loadEventEnd") / 1000.0))
}

/// Publishes `firstPaint` and `firstPaintTime` directly into `metrics`.
///
/// Sources are tried in order: paint timing entries, the vendor load-times
/// accessor, then the vendor `msFirstPaint` snapshot field. Both keys default
/// to `0` when nothing reports a paint.
pub fn first_paint_time(source: &dyn TimingSource, metrics: &mut Metrics) -> anyhow::Result<Option<f64>> {
    let mut first_paint = 0.0;
    let mut first_paint_time = 0.0;

    if let Some(entries) = source.paint_entries() {
        let start = entries.first().map_or(0.0, |entry| entry.start_time);
        let origin = source.time_origin().unwrap_or(f64::NAN);
        first_paint_time = (start + origin) / 1000.0;
    } else if let Some(load_times) = source.load_times() {
        // seconds -> ms
        first_paint = load_times.first_paint_time * 1000.0;
        first_paint_time = first_paint - load_times.start_load_time * 1000.0;
    } else {
        let snapshot = source
            .snapshot()
            .context("legacy navigation timing is unavailable")?;
        if let Some(ms_first_paint) = snapshot.ms_first_paint() {
            first_paint = ms_first_paint;
            first_paint_time = ms_first_paint - snapshot.field("navigationStart");
        }
    }

    metrics.insert(FIRST_PAINT, first_paint);
    metrics.insert(FIRST_PAINT_TIME, first_paint_time);
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{TimingSnapshot, MS_FIRST_PAINT};
    use crate::source::{LoadTimes, NavigationEntry, PaintEntry, StaticTimingSource};

    fn legacy(snapshot: TimingSnapshot) -> StaticTimingSource {
        StaticTimingSource::from_snapshot(snapshot)
    }

    #[test]
    fn test_finish_load_time_navigation_timing_2() {
        let source = StaticTimingSource {
            time_origin: Some(1_600_000_000_000.0),
            navigation: Some(vec![NavigationEntry { load_event_end: 1500.0 }]),
            ..legacy(TimingSnapshot::new().with_field("loadEventEnd", 1.0))
        };

        let value = finish_load_time(&source, &mut Metrics::new()).unwrap();
        assert_eq!(value, Some(1_600_000_001.5));
    }

    #[test]
    fn test_finish_load_time_falls_back_without_time_origin() {
        let source = StaticTimingSource {
            time_origin: Some(0.0),
            navigation: Some(vec![NavigationEntry { load_event_end: 1500.0 }]),
            ..legacy(TimingSnapshot::new().with_field("loadEventEnd", 2500.0))
        };

        let value = finish_load_time(&source, &mut Metrics::new()).unwrap();
        assert_eq!(value, Some(2.5));
    }

    #[test]
    fn test_finish_load_time_legacy() {
        let source = legacy(TimingSnapshot::new().with_field("loadEventEnd", 2500.0));
        let value = finish_load_time(&source, &mut Metrics::new()).unwrap();
        assert_eq!(value, Some(2.5));
    }

    #[test]
    fn test_finish_load_time_empty_entry_list_errors() {
        let source = StaticTimingSource {
            time_origin: Some(1000.0),
            navigation: Some(vec![]),
            ..Default::default()
        };
        assert!(finish_load_time(&source, &mut Metrics::new()).is_err());
    }

    #[test]
    fn test_finish_load_time_without_any_api_errors() {
        let source = StaticTimingSource::default();
        assert!(finish_load_time(&source, &mut Metrics::new()).is_err());
    }

    #[test]
    fn test_first_paint_from_paint_entries() {
        let source = StaticTimingSource {
            time_origin: Some(1000.0),
            paint: Some(vec![PaintEntry {
                name: "first-paint".to_string(),
                start_time: 500.0,
            }]),
            ..Default::default()
        };
        let mut metrics = Metrics::new();

        let returned = first_paint_time(&source, &mut metrics).unwrap();
        assert_eq!(returned, None);
        assert_eq!(metrics.get(FIRST_PAINT), Some(0.0));
        assert_eq!(metrics.get(FIRST_PAINT_TIME), Some(1.5));
    }

    #[test]
    fn test_first_paint_empty_paint_entries() {
        let source = StaticTimingSource {
            time_origin: Some(2000.0),
            paint: Some(vec![]),
            ..Default::default()
        };
        let mut metrics = Metrics::new();
        first_paint_time(&source, &mut metrics).unwrap();
        assert_eq!(metrics.get(FIRST_PAINT_TIME), Some(2.0));
    }

    #[test]
    fn test_first_paint_from_load_times() {
        let source = StaticTimingSource {
            load_times: Some(LoadTimes {
                first_paint_time: 1.5,
                start_load_time: 1.0,
            }),
            ..Default::default()
        };
        let mut metrics = Metrics::new();
        first_paint_time(&source, &mut metrics).unwrap();

        assert_eq!(metrics.get(FIRST_PAINT), Some(1500.0));
        assert_eq!(metrics.get(FIRST_PAINT_TIME), Some(500.0));
    }

    #[test]
    fn test_first_paint_from_ms_first_paint() {
        let source = legacy(
            TimingSnapshot::new()
                .with_field("navigationStart", 1000.0)
                .with_field(MS_FIRST_PAINT, 1240.0),
        );
        let mut metrics = Metrics::new();
        first_paint_time(&source, &mut metrics).unwrap();

        assert_eq!(metrics.get(FIRST_PAINT), Some(1240.0));
        assert_eq!(metrics.get(FIRST_PAINT_TIME), Some(240.0));
    }

    #[test]
    fn test_first_paint_defaults_to_zero() {
        let source = legacy(TimingSnapshot::new().with_field("navigationStart", 1000.0));
        let mut metrics = Metrics::new();
        first_paint_time(&source, &mut metrics).unwrap();

        assert_eq!(metrics.get(FIRST_PAINT), Some(0.0));
        assert_eq!(metrics.get(FIRST_PAINT_TIME), Some(0.0));
    }

    #[test]
    fn test_first_paint_without_any_api_errors() {
        let mut metrics = Metrics::new();
        assert!(first_paint_time(&StaticTimingSource::default(), &mut metrics).is_err());
        assert!(metrics.is_empty());
    }
}
