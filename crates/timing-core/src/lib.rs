//! Navigation timing metrics for web pages
//!
//! This crate reads the timing data a browser exposes through its performance
//! API and derives a set of named duration metrics (page load time, DOM ready
//! time, first paint, ...). Callers can register their own metrics, computed
//! from the base measurements.
//!
//! # Features
//!
//! - **Base durations**: `loadTime`, `domReadyTime`, `connectTime` and friends,
//!   each a difference between two snapshot timestamps
//! - **Built-in metrics**: `finishLoadTime` and `firstPaintTime`, using the
//!   newest timing API the source supports
//! - **Custom metrics**: constants or functions of the in-progress result,
//!   with per-metric error isolation
//! - **Pluggable sources**: browser globals, vendor-prefixed variants, or a
//!   captured JSON dump replayed offline
//! - **Reports**: Console, JSON and Markdown ms / s tables
//!
//! # Example
//!
//! ```
//! use timing_core::{CollectOptions, Collector, FixedProbe, StaticTimingSource, TimingSnapshot};
//!
//! let snapshot = TimingSnapshot::new()
//!     .with_field("connectStart", 50.0)
//!     .with_field("connectEnd", 80.0);
//! let probe = FixedProbe::new("performance", StaticTimingSource::from_snapshot(snapshot));
//!
//! let mut collector = Collector::new(vec![Box::new(probe)]);
//! collector.register("budget", 1500.0);
//!
//! let metrics = collector.collect(&CollectOptions::default()).expect("timing available");
//! assert_eq!(metrics.get("connectTime"), Some(30.0));
//! assert_eq!(metrics.get("budget"), Some(1500.0));
//! ```

pub mod collector;
pub mod config;
pub mod error;
pub mod metrics;
pub mod registry;
pub mod reporter;
pub mod snapshot;
pub mod source;

// Re-export main types for convenience
pub use collector::Collector;
pub use config::{CollectOptions, ReportConfig, TimingConfig};
pub use error::TimingError;
pub use metrics::Metrics;
pub use registry::{MetricRegistry, Producer};
pub use reporter::{OutputFormat, Reporter, TimingTable};
pub use snapshot::{FieldValue, TimingSnapshot};
pub use source::{
    locate, FixedProbe, LoadTimes, NavigationEntry, PaintEntry, StaticTimingSource, TimingProbe,
    TimingSource,
};
