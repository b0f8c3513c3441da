//! Replay a captured timing dump and report it
//!
//! Usage: `cargo run --example report_snapshot -- [capture.json] [config.toml] [output-file]`

use std::env;
use std::path::PathBuf;

use timing_core::{
    Collector, FixedProbe, Reporter, StaticTimingSource, TimingConfig, TimingTable,
};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("timing_core=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let capture_path = if args.len() > 1 {
        PathBuf::from(&args[1])
    } else {
        PathBuf::from("crates/timing-core/fixtures/chrome-navigation.json")
    };
    let config = match args.get(2) {
        Some(path) => TimingConfig::from_file(path)?,
        None => TimingConfig::default(),
    };

    let source = StaticTimingSource::from_file(&capture_path)?;
    let collector = Collector::new(vec![Box::new(FixedProbe::new(
        capture_path.display().to_string(),
        source,
    ))]);

    let metrics = collector.try_collect(&config.collect)?;
    let table = TimingTable::from_metrics(&metrics, config.report.precision);
    let reporter = Reporter::new(config.report.format);
    match args.get(3) {
        Some(output) => {
            reporter.write_to_file(&table, output)?;
            tracing::info!("Report written to {}", output);
        }
        None => reporter.report(&table)?,
    }

    Ok(())
}
