//! Runtime metadata resolution
//!
//! Resolves the project, zone, cluster location and cluster name of the
//! environment the exporter runs in. Each field is looked up independently
//! and a failed lookup degrades to an empty string so that export can
//! proceed with partial identity data.

use crate::error::MetadataError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Instance attribute holding the cluster name on GKE nodes.
pub const ATTR_CLUSTER_NAME: &str = "cluster-name";
/// Instance attribute holding the cluster location on GKE nodes.
pub const ATTR_CLUSTER_LOCATION: &str = "cluster-location";

/// Trait for metadata lookup implementations
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Numeric-less project id of the hosting project.
    async fn project_id(&self) -> Result<String, MetadataError>;

    /// Zone of the hosting instance.
    async fn zone(&self) -> Result<String, MetadataError>;

    /// Value of a custom instance attribute.
    async fn instance_attribute(&self, key: &str) -> Result<String, MetadataError>;
}

/// Outcome of a single metadata lookup.
///
/// `Failed` and `Found("")` render identically in exported labels, but stay
/// distinguishable here so tests can assert on the degradation path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupField {
    Found(String),
    Failed,
}

impl LookupField {
    /// Label value for this field: the trimmed value, or "" on failure.
    pub fn as_label(&self) -> &str {
        match self {
            LookupField::Found(v) => v,
            LookupField::Failed => "",
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, LookupField::Failed)
    }

    fn from_result(result: Result<String, MetadataError>) -> Self {
        match result {
            Ok(v) => LookupField::Found(v.trim().to_string()),
            Err(e) => {
                tracing::debug!(field = %e.field, reason = %e.reason, "Metadata lookup failed");
                LookupField::Failed
            }
        }
    }
}

/// Identity of the runtime environment, one field per lookup.
#[derive(Debug, Clone)]
pub struct ResolvedMetadata {
    pub project_id: LookupField,
    pub zone: LookupField,
    pub location: LookupField,
    pub cluster_name: LookupField,
}

impl ResolvedMetadata {
    /// Query every field from the provider. No caching: each call
    /// re-queries, and individual failures degrade to empty strings.
    pub async fn resolve(provider: &dyn MetadataProvider) -> Self {
        Self {
            project_id: LookupField::from_result(provider.project_id().await),
            zone: LookupField::from_result(provider.zone().await),
            location: LookupField::from_result(
                provider.instance_attribute(ATTR_CLUSTER_LOCATION).await,
            ),
            cluster_name: LookupField::from_result(
                provider.instance_attribute(ATTR_CLUSTER_NAME).await,
            ),
        }
    }
}

/// Metadata provider backed by the GCE metadata server.
pub struct GceMetadataProvider {
    client: Client,
    base_url: Url,
}

const DEFAULT_METADATA_URL: &str = "http://metadata.google.internal/computeMetadata/v1/";

impl GceMetadataProvider {
    /// Create a provider against the standard metadata server address.
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_METADATA_URL)
    }

    /// Create a provider against a custom address (used in tests).
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .context("Failed to create metadata client")?;
        let base_url = Url::parse(base_url).context("Invalid metadata server URL")?;
        Ok(Self { client, base_url })
    }

    async fn get(&self, field: &str, path: &str) -> Result<String, MetadataError> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| MetadataError::new(field, e.to_string()))?;

        let response = self
            .client
            .get(url)
            .header("Metadata-Flavor", "Google")
            .send()
            .await
            .map_err(|e| MetadataError::new(field, e.to_string()))?;

        if !response.status().is_success() {
            return Err(MetadataError::new(
                field,
                format!("metadata server returned {}", response.status()),
            ));
        }

        response
            .text()
            .await
            .map_err(|e| MetadataError::new(field, e.to_string()))
    }
}

#[async_trait]
impl MetadataProvider for GceMetadataProvider {
    async fn project_id(&self) -> Result<String, MetadataError> {
        self.get("project_id", "project/project-id").await
    }

    async fn zone(&self) -> Result<String, MetadataError> {
        // The server returns "projects/<num>/zones/<zone>"; callers want
        // only the final path segment.
        let full = self.get("zone", "instance/zone").await?;
        Ok(full.rsplit('/').next().unwrap_or(&full).to_string())
    }

    async fn instance_attribute(&self, key: &str) -> Result<String, MetadataError> {
        self.get(key, &format!("instance/attributes/{}", key)).await
    }
}
