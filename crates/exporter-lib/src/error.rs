//! Error taxonomy for the exporter
//!
//! Three failure classes with different policies:
//! - `ConfigError`: fatal, detected before any export starts
//! - `MetadataError`: per-field, degraded to an empty label value
//! - `SubmissionError`: tolerated in loop mode, fatal in one-shot mode

use thiserror::Error;

/// Fatal configuration problems, reported at startup before any export.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The legacy (gke_container) resource model needs a pod id.
    #[error("no pod id specified for the legacy resource model")]
    MissingPodId,

    /// The current (k8s_pod) resource model needs a pod name.
    #[error("no pod name specified for the current resource model")]
    MissingPodName,

    /// The current (k8s_pod) resource model needs a namespace.
    #[error("no namespace specified for the current resource model")]
    MissingNamespace,

    /// A metric-label entry did not split into exactly two non-empty
    /// parts on "=".
    #[error("invalid metric label entry {entry:?}: expected key=value")]
    InvalidMetricLabel { entry: String },
}

/// A single metadata-server lookup failed.
///
/// The resolver turns these into empty label values; the error type exists
/// so callers and tests can tell a failed lookup from a genuinely empty one.
#[derive(Debug, Error)]
#[error("metadata lookup for {field:?} failed: {reason}")]
pub struct MetadataError {
    pub field: String,
    pub reason: String,
}

impl MetadataError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// The sink could not deliver a time-series request.
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// The request never reached the backend.
    #[error("transport error submitting time series: {0}")]
    Transport(String),

    /// The backend rejected the request; no partial success.
    #[error("backend rejected time series ({status}): {body}")]
    Rejected { status: u16, body: String },
}

/// Umbrella error for library consumers.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error(transparent)]
    Submission(#[from] SubmissionError),
}
