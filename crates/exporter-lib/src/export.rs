//! Export configuration, the periodic export loop, and one-shot export
//!
//! The loop submits one point per enabled resource scheme on a fixed
//! cadence and tolerates submission failures; the one-shot path submits a
//! single cluster-scoped point and propagates any failure to the caller.

use crate::error::{ConfigError, ExportError};
use crate::labels::{
    cluster_resource_labels, parse_metric_labels, MetricLabelSet, ResourceIdentity,
    RESOURCE_TYPE_K8S_CLUSTER,
};
use crate::metadata::{MetadataProvider, ResolvedMetadata};
use crate::series::{assemble, ExportRequest, MetricValue};
use crate::sink::TimeSeriesSink;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{info, warn};

/// Raw exporter parameters as taken from the command line.
#[derive(Debug, Clone, Default)]
pub struct ExportParams {
    pub metric_name: String,
    pub metric_value: i64,
    /// Flat `k1=v1,k2=v2` metric-label string.
    pub metric_labels: String,
    pub pod_id: String,
    pub namespace: String,
    pub pod_name: String,
    /// Export under the legacy `gke_container` resource model.
    pub use_legacy_model: bool,
    /// Export under the current `k8s_pod` resource model.
    pub use_current_model: bool,
}

/// Validated, immutable exporter configuration.
///
/// Built once at startup; validation failures here are fatal and happen
/// before any metadata lookup or submission.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub metric_name: String,
    pub metric_value: i64,
    pub metric_labels: MetricLabelSet,
    /// Enabled resource schemes, submitted in order each tick.
    pub schemes: Vec<ResourceIdentity>,
    pub interval: Duration,
}

impl ExportConfig {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(5000);

    pub fn new(params: ExportParams) -> Result<Self, ConfigError> {
        if params.use_legacy_model && params.pod_id.is_empty() {
            return Err(ConfigError::MissingPodId);
        }
        if params.use_current_model && params.pod_name.is_empty() {
            return Err(ConfigError::MissingPodName);
        }
        if params.use_current_model && params.namespace.is_empty() {
            return Err(ConfigError::MissingNamespace);
        }

        let metric_labels = parse_metric_labels(&params.metric_labels)?;

        // Legacy before current, matching submission order within a tick.
        let mut schemes = Vec::new();
        if params.use_legacy_model {
            schemes.push(ResourceIdentity::Legacy {
                pod_id: params.pod_id,
            });
        }
        if params.use_current_model {
            schemes.push(ResourceIdentity::Current {
                namespace: params.namespace,
                pod_name: params.pod_name,
            });
        }

        Ok(Self {
            metric_name: params.metric_name,
            metric_value: params.metric_value,
            metric_labels,
            schemes,
            interval: Self::DEFAULT_INTERVAL,
        })
    }
}

/// Per-tick submission results.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct TickOutcome {
    pub submitted: usize,
    pub failed: usize,
}

/// Continuous exporter: one integer-valued point per enabled scheme per
/// tick, strictly sequential, forever.
pub struct Exporter {
    config: ExportConfig,
    sink: Arc<dyn TimeSeriesSink>,
}

impl Exporter {
    pub fn new(config: ExportConfig, sink: Arc<dyn TimeSeriesSink>) -> Self {
        Self { config, sink }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Handle one tick: assemble and submit a point for each enabled
    /// scheme, in order. A failed submission is logged and does not affect
    /// the other scheme or later ticks.
    pub async fn export_tick(&self, meta: &ResolvedMetadata) -> TickOutcome {
        let mut outcome = TickOutcome::default();

        for identity in &self.config.schemes {
            let point = assemble(
                &self.config.metric_name,
                self.config.metric_labels.clone(),
                identity.resource_type(),
                identity.resource_labels(meta),
                MetricValue::Int64(self.config.metric_value),
            );
            let resource_type = identity.resource_type();
            let request = ExportRequest::new(meta.project_id.as_label(), vec![point]);

            match self.sink.submit(&request).await {
                Ok(()) => {
                    outcome.submitted += 1;
                    info!(
                        resource_type,
                        value = self.config.metric_value,
                        "Finished writing time series"
                    );
                }
                Err(e) => {
                    outcome.failed += 1;
                    warn!(
                        resource_type,
                        error = %e,
                        "Failed to write time series data"
                    );
                }
            }
        }

        outcome
    }

    /// Run the export loop. Metadata is resolved once up front; ticks then
    /// repeat on a fixed period with no backoff, no jitter and no shutdown
    /// hook. The process is stopped by external termination only.
    pub async fn run(&self, provider: &dyn MetadataProvider) {
        let meta = ResolvedMetadata::resolve(provider).await;
        info!(
            interval_ms = self.config.interval.as_millis() as u64,
            schemes = self.config.schemes.len(),
            metric_name = %self.config.metric_name,
            "Starting export loop"
        );

        let mut ticker = interval(self.config.interval);
        loop {
            ticker.tick().await;
            self.export_tick(&meta).await;
        }
    }
}

/// One-shot export: resolve metadata, submit exactly one double-valued
/// point with no metric labels against the `k8s_cluster` resource, and
/// return. Unlike the loop, any submission failure propagates.
pub async fn export_once(
    sink: &dyn TimeSeriesSink,
    provider: &dyn MetadataProvider,
    metric_name: &str,
    value: f64,
) -> Result<(), ExportError> {
    let meta = ResolvedMetadata::resolve(provider).await;
    let point = assemble(
        metric_name,
        MetricLabelSet::new(),
        RESOURCE_TYPE_K8S_CLUSTER,
        cluster_resource_labels(&meta),
        MetricValue::Double(value),
    );
    let metric_type = point.metric_type.clone();
    let request = ExportRequest::new(meta.project_id.as_label(), vec![point]);

    sink.submit(&request).await?;
    info!(metric_type = %metric_type, value, "Exported custom metric");
    Ok(())
}
