//! Timing source capability and lookup
//!
//! Each host API generation (standard `performance`, vendor-prefixed variants,
//! a captured dump replayed offline) is exposed through the [`TimingSource`]
//! trait. A [`TimingProbe`] knows how to find one such source; [`locate`] walks
//! an ordered probe list and returns the first source that is available.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::{Result, TimingError};
use crate::snapshot::TimingSnapshot;

/// A navigation entry from the Navigation Timing Level 2 API
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationEntry {
    /// End of the load event, relative to the time origin (ms)
    pub load_event_end: f64,
}

/// A paint entry from the Paint Timing API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaintEntry {
    /// `first-paint` or `first-contentful-paint`
    #[serde(default)]
    pub name: String,
    /// Paint time relative to the time origin (ms)
    pub start_time: f64,
}

/// Chrome's deprecated `chrome.loadTimes()` result (seconds since epoch)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadTimes {
    pub first_paint_time: f64,
    pub start_load_time: f64,
}

/// One generation of the host performance API
pub trait TimingSource {
    /// Human-readable name of the API this source reads
    fn label(&self) -> &str;

    /// The legacy `performance.timing` snapshot, if exposed
    fn snapshot(&self) -> Option<TimingSnapshot>;

    /// `performance.timeOrigin`, if exposed
    fn time_origin(&self) -> Option<f64>;

    /// Navigation entries; `None` when Navigation Timing 2 is unsupported
    fn navigation_entries(&self) -> Option<Vec<NavigationEntry>>;

    /// Paint entries; `None` when Paint Timing is unsupported
    fn paint_entries(&self) -> Option<Vec<PaintEntry>>;

    /// Vendor load-times accessor; `None` when absent
    fn load_times(&self) -> Option<LoadTimes>;
}

/// Finds a [`TimingSource`] in the current environment
pub trait TimingProbe {
    fn name(&self) -> &str;

    fn probe(&self) -> Option<Box<dyn TimingSource>>;
}

/// Return the source of the first probe that reports availability
pub fn locate(probes: &[Box<dyn TimingProbe>]) -> Option<Box<dyn TimingSource>> {
    for probe in probes {
        if let Some(source) = probe.probe() {
            debug!("Timing source found via '{}' ({})", probe.name(), source.label());
            return Some(source);
        }
        debug!("Timing probe '{}' unavailable", probe.name());
    }
    None
}

/// A captured set of timing data, replayable as a [`TimingSource`]
///
/// The JSON shape mirrors what a page can dump with
/// `JSON.stringify({ timing: performance.timing, timeOrigin: performance.timeOrigin, ... })`:
///
/// ```json
/// {
///   "timing": { "navigationStart": 1000, "fetchStart": 1005, "loadEventEnd": 1900 },
///   "timeOrigin": 1000.25,
///   "navigation": [{ "loadEventEnd": 899.75 }],
///   "paint": [{ "name": "first-paint", "startTime": 310.5 }]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticTimingSource {
    #[serde(default)]
    pub timing: Option<TimingSnapshot>,
    #[serde(default)]
    pub time_origin: Option<f64>,
    #[serde(default)]
    pub navigation: Option<Vec<NavigationEntry>>,
    #[serde(default)]
    pub paint: Option<Vec<PaintEntry>>,
    #[serde(default)]
    pub load_times: Option<LoadTimes>,
}

impl StaticTimingSource {
    /// A source exposing only the legacy snapshot
    pub fn from_snapshot(snapshot: TimingSnapshot) -> Self {
        Self {
            timing: Some(snapshot),
            ..Self::default()
        }
    }

    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| TimingError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }
}

impl TimingSource for StaticTimingSource {
    fn label(&self) -> &str {
        "captured"
    }

    fn snapshot(&self) -> Option<TimingSnapshot> {
        self.timing.clone()
    }

    fn time_origin(&self) -> Option<f64> {
        self.time_origin
    }

    fn navigation_entries(&self) -> Option<Vec<NavigationEntry>> {
        self.navigation.clone()
    }

    fn paint_entries(&self) -> Option<Vec<PaintEntry>> {
        self.paint.clone()
    }

    fn load_times(&self) -> Option<LoadTimes> {
        self.load_times
    }
}

/// A probe that always yields the same (possibly absent) captured source
#[derive(Debug, Clone)]
pub struct FixedProbe {
    name: String,
    source: Option<StaticTimingSource>,
}

impl FixedProbe {
    pub fn new(name: impl Into<String>, source: StaticTimingSource) -> Self {
        Self {
            name: name.into(),
            source: Some(source),
        }
    }

    /// A probe whose API is never available
    pub fn unavailable(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: None,
        }
    }
}

impl TimingProbe for FixedProbe {
    fn name(&self) -> &str {
        &self.name
    }

    fn probe(&self) -> Option<Box<dyn TimingSource>> {
        self.source
            .clone()
            .map(|source| Box::new(source) as Box<dyn TimingSource>)
    }
}
