//! Metric labels and monitored-resource label schemes
//!
//! Two incompatible resource schemas are supported: the legacy
//! `gke_container` model keyed by pod id, and the current `k8s_pod` model
//! keyed by namespace and pod name. A third, cluster-scoped scheme backs the
//! one-shot export path.

use crate::error::ConfigError;
use crate::metadata::ResolvedMetadata;
use std::collections::HashMap;

/// Monitored resource type for the legacy resource model.
pub const RESOURCE_TYPE_GKE_CONTAINER: &str = "gke_container";
/// Monitored resource type for the current resource model.
pub const RESOURCE_TYPE_K8S_POD: &str = "k8s_pod";
/// Monitored resource type for cluster-scoped one-shot exports.
pub const RESOURCE_TYPE_K8S_CLUSTER: &str = "k8s_cluster";

/// Free-form metric labels, distinct from resource labels.
pub type MetricLabelSet = HashMap<String, String>;

/// Parse a flat `k1=v1,k2=v2` configuration string into a label set.
///
/// An empty input yields an empty set. Every non-empty entry must split
/// into exactly two non-empty parts on `=`; anything else is a
/// configuration error rather than a silent drop.
pub fn parse_metric_labels(spec: &str) -> Result<MetricLabelSet, ConfigError> {
    let mut labels = MetricLabelSet::new();
    if spec.is_empty() {
        return Ok(labels);
    }

    for entry in spec.split(',') {
        let mut parts = entry.splitn(2, '=');
        match (parts.next(), parts.next()) {
            (Some(key), Some(value))
                if !key.is_empty() && !value.is_empty() && !value.contains('=') =>
            {
                labels.insert(key.to_string(), value.to_string());
            }
            _ => {
                return Err(ConfigError::InvalidMetricLabel {
                    entry: entry.to_string(),
                })
            }
        }
    }

    Ok(labels)
}

/// Identity parameters selecting one resource-label scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceIdentity {
    /// Legacy model: the pod is identified by its id alone.
    Legacy { pod_id: String },
    /// Current model: the pod is identified by namespace and name.
    Current { namespace: String, pod_name: String },
}

impl ResourceIdentity {
    /// Monitored resource type string for this identity's scheme.
    pub fn resource_type(&self) -> &'static str {
        match self {
            ResourceIdentity::Legacy { .. } => RESOURCE_TYPE_GKE_CONTAINER,
            ResourceIdentity::Current { .. } => RESOURCE_TYPE_K8S_POD,
        }
    }

    /// Build the full monitored-resource label map for this identity.
    pub fn resource_labels(&self, meta: &ResolvedMetadata) -> HashMap<String, String> {
        match self {
            ResourceIdentity::Legacy { pod_id } => legacy_resource_labels(meta, pod_id),
            ResourceIdentity::Current {
                namespace,
                pod_name,
            } => current_resource_labels(meta, namespace, pod_name),
        }
    }
}

/// Labels for the legacy `gke_container` resource model.
///
/// The metric is exported for the pod, not the container, so the container
/// name is left empty; namespace_id and instance_id are likewise fixed.
pub fn legacy_resource_labels(meta: &ResolvedMetadata, pod_id: &str) -> HashMap<String, String> {
    HashMap::from([
        ("project_id".to_string(), meta.project_id.as_label().to_string()),
        ("zone".to_string(), meta.zone.as_label().to_string()),
        ("cluster_name".to_string(), meta.cluster_name.as_label().to_string()),
        ("container_name".to_string(), String::new()),
        ("pod_id".to_string(), pod_id.to_string()),
        ("namespace_id".to_string(), "default".to_string()),
        ("instance_id".to_string(), String::new()),
    ])
}

/// Labels for the current `k8s_pod` resource model.
pub fn current_resource_labels(
    meta: &ResolvedMetadata,
    namespace: &str,
    pod_name: &str,
) -> HashMap<String, String> {
    HashMap::from([
        ("project_id".to_string(), meta.project_id.as_label().to_string()),
        ("location".to_string(), meta.location.as_label().to_string()),
        ("cluster_name".to_string(), meta.cluster_name.as_label().to_string()),
        ("namespace_name".to_string(), namespace.to_string()),
        ("pod_name".to_string(), pod_name.to_string()),
    ])
}

/// Labels for the cluster-scoped `k8s_cluster` resource used by the
/// one-shot export.
pub fn cluster_resource_labels(meta: &ResolvedMetadata) -> HashMap<String, String> {
    HashMap::from([
        ("project_id".to_string(), meta.project_id.as_label().to_string()),
        ("location".to_string(), meta.location.as_label().to_string()),
        ("cluster_name".to_string(), meta.cluster_name.as_label().to_string()),
    ])
}
