//! One-shot metric export
//!
//! Resolves cluster metadata, submits a single double-valued point against
//! the `k8s_cluster` monitored resource, and exits. Any resolution or
//! submission failure exits non-zero; this binary is meant for scheduled
//! invocations where a failed export must be visible immediately.

use anyhow::{Context, Result};
use clap::Parser;
use exporter_lib::{export_once, GceMetadataProvider, MonitoringApiSink};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// One-shot custom-metric export
#[derive(Parser)]
#[command(name = "metric-export-once", version, about, long_about = None)]
struct Cli {
    /// The metric name
    #[arg(long, default_value = "")]
    name: String,

    /// The value to export
    #[arg(long, default_value_t = 0.0)]
    value: f64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer())
        .init();

    let cli = Cli::parse();

    let provider = GceMetadataProvider::new()?;
    let sink = MonitoringApiSink::new()?;

    export_once(&sink, &provider, &cli.name, cli.value)
        .await
        .context("Failed to export metric")?;

    Ok(())
}
