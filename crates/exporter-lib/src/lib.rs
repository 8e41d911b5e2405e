//! Library for exporting custom metrics to a Cloud Monitoring backend
//!
//! This crate provides the core functionality for:
//! - Runtime metadata resolution (project, zone, cluster identity)
//! - Monitored-resource label schemes (legacy and current resource models)
//! - Time-series point assembly and wire encoding
//! - The periodic export loop and the one-shot export path

pub mod error;
pub mod export;
pub mod labels;
pub mod metadata;
pub mod series;
pub mod sink;

pub use error::{ConfigError, ExportError, MetadataError, SubmissionError};
pub use export::{export_once, ExportConfig, ExportParams, Exporter, TickOutcome};
pub use labels::{MetricLabelSet, ResourceIdentity};
pub use metadata::{GceMetadataProvider, MetadataProvider, ResolvedMetadata};
pub use series::{ExportRequest, MetricValue, TimeSeriesPoint};
pub use sink::{MonitoringApiSink, TimeSeriesSink};
