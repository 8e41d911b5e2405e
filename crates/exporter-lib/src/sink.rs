//! Time-series sink abstraction and the monitoring API implementation

use crate::error::SubmissionError;
use crate::series::ExportRequest;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Trait for time-series submission implementations
#[async_trait]
pub trait TimeSeriesSink: Send + Sync {
    /// Write one request to the backend. All-or-nothing: there is no
    /// partial-success reporting per point.
    async fn submit(&self, request: &ExportRequest) -> Result<(), SubmissionError>;
}

const DEFAULT_MONITORING_URL: &str = "https://monitoring.googleapis.com/";

/// Sink backed by the Cloud Monitoring REST v3 API.
pub struct MonitoringApiSink {
    client: Client,
    base_url: Url,
}

impl MonitoringApiSink {
    /// Create a sink against the production monitoring endpoint.
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_MONITORING_URL)
    }

    /// Create a sink against a custom endpoint (used in tests).
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create monitoring client")?;
        let base_url = Url::parse(base_url).context("Invalid monitoring API URL")?;
        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl TimeSeriesSink for MonitoringApiSink {
    async fn submit(&self, request: &ExportRequest) -> Result<(), SubmissionError> {
        let url = self
            .base_url
            .join(&format!("v3/{}/timeSeries", request.name))
            .map_err(|e| SubmissionError::Transport(e.to_string()))?;

        let response = self
            .client
            .post(url)
            .json(&request.to_body())
            .send()
            .await
            .map_err(|e| SubmissionError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(SubmissionError::Rejected { status, body });
        }

        Ok(())
    }
}
