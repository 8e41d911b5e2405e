//! Dummy metric exporter
//!
//! Exports a metric of constant value to the monitoring backend in a loop.
//! The exporter assumes it runs as a pod on a GCE or GKE cluster; the pod
//! id, pod name and namespace are passed in via flags (pod id and name are
//! typically wired up through the Downward API).

use anyhow::{Context, Result};
use clap::Parser;
use exporter_lib::{ExportConfig, ExportParams, Exporter, GceMetadataProvider, MonitoringApiSink};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Continuous custom-metric exporter for autoscaling tests
#[derive(Parser)]
#[command(name = "metric-exporter", version, about, long_about = None)]
struct Cli {
    /// Pod id (required for the legacy resource model)
    #[arg(long = "pod-id", env = "POD_ID", default_value = "")]
    pod_id: String,

    /// Pod namespace (required for the current resource model)
    #[arg(long, env = "POD_NAMESPACE", default_value = "")]
    namespace: String,

    /// Pod name (required for the current resource model)
    #[arg(long = "pod-name", env = "POD_NAME", default_value = "")]
    pod_name: String,

    /// Custom metric name
    #[arg(long = "metric-name", default_value = "foo")]
    metric_name: String,

    /// Custom metric value
    #[arg(long = "metric-value", default_value_t = 0)]
    metric_value: i64,

    /// Custom metric labels as k1=v1,k2=v2
    #[arg(long = "metric-labels", default_value = "bar=1")]
    metric_labels: String,

    /// Export under the legacy resource model (monitored resource
    /// "gke_container"); requires --pod-id
    #[arg(
        long = "use-old-resource-model",
        action = clap::ArgAction::Set,
        default_value_t = true
    )]
    use_old_resource_model: bool,

    /// Export under the current resource model (monitored resource
    /// "k8s_pod"); requires --pod-name and --namespace
    #[arg(
        long = "use-new-resource-model",
        action = clap::ArgAction::Set,
        default_value_t = false
    )]
    use_new_resource_model: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer())
        .init();

    let cli = Cli::parse();

    // Fatal on missing identity fields or malformed labels, before any
    // metadata lookup or submission.
    let config = ExportConfig::new(ExportParams {
        metric_name: cli.metric_name,
        metric_value: cli.metric_value,
        metric_labels: cli.metric_labels,
        pod_id: cli.pod_id,
        namespace: cli.namespace,
        pod_name: cli.pod_name,
        use_legacy_model: cli.use_old_resource_model,
        use_current_model: cli.use_new_resource_model,
    })
    .context("Invalid exporter configuration")?;

    info!(metric_name = %config.metric_name, "Starting metric exporter");

    let provider = GceMetadataProvider::new()?;
    let sink = Arc::new(MonitoringApiSink::new()?);

    let exporter = Exporter::new(config, sink);
    exporter.run(&provider).await;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_flags() {
        let cli = Cli::try_parse_from(["metric-exporter"]).unwrap();

        assert_eq!(cli.metric_name, "foo");
        assert_eq!(cli.metric_value, 0);
        assert_eq!(cli.metric_labels, "bar=1");
        assert!(cli.use_old_resource_model);
        assert!(!cli.use_new_resource_model);
        assert!(cli.pod_id.is_empty());
    }

    #[test]
    fn resource_model_flags_take_explicit_values() {
        let cli = Cli::try_parse_from([
            "metric-exporter",
            "--use-old-resource-model",
            "false",
            "--use-new-resource-model",
            "true",
            "--pod-name",
            "web-abc",
            "--namespace",
            "prod",
        ])
        .unwrap();

        assert!(!cli.use_old_resource_model);
        assert!(cli.use_new_resource_model);
    }

    #[test]
    fn default_flags_with_no_pod_id_fail_validation() {
        let cli = Cli::try_parse_from(["metric-exporter"]).unwrap();

        let result = ExportConfig::new(ExportParams {
            metric_name: cli.metric_name,
            metric_value: cli.metric_value,
            metric_labels: cli.metric_labels,
            pod_id: cli.pod_id,
            namespace: cli.namespace,
            pod_name: cli.pod_name,
            use_legacy_model: cli.use_old_resource_model,
            use_current_model: cli.use_new_resource_model,
        });

        assert!(result.is_err());
    }
}
