//! Time-series point assembly and wire encoding
//!
//! Builds single-point time series in the Cloud Monitoring REST v3 shape
//! (`projects.timeSeries.create`). Points carry either an integer or a
//! double value; the two are distinct variants because the continuous and
//! one-shot exporters use different numeric representations.

use crate::labels::MetricLabelSet;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::HashMap;

/// Prefix for user-defined metric types.
pub const METRIC_TYPE_PREFIX: &str = "custom.googleapis.com/";

/// Numeric payload of a data point.
///
/// Kept as a tagged variant: collapsing to one numeric type would silently
/// widen the continuous exporter's integer values or truncate the one-shot
/// exporter's doubles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    Int64(i64),
    Double(f64),
}

impl Serialize for MetricValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            // Proto3 JSON encodes int64 as a decimal string.
            MetricValue::Int64(v) => map.serialize_entry("int64Value", &v.to_string())?,
            MetricValue::Double(v) => map.serialize_entry("doubleValue", v)?,
        }
        map.end()
    }
}

/// One assembled time-series data point, ready for submission.
#[derive(Debug, Clone)]
pub struct TimeSeriesPoint {
    pub metric_type: String,
    pub metric_labels: MetricLabelSet,
    pub resource_type: String,
    pub resource_labels: HashMap<String, String>,
    pub value: MetricValue,
    pub end_time: DateTime<Utc>,
}

/// Construct a point for `metric_name`, stamped with the current wall-clock
/// time. The metric type is always derived from the name; callers never
/// supply it directly.
pub fn assemble(
    metric_name: &str,
    metric_labels: MetricLabelSet,
    resource_type: &str,
    resource_labels: HashMap<String, String>,
    value: MetricValue,
) -> TimeSeriesPoint {
    TimeSeriesPoint {
        metric_type: format!("{}{}", METRIC_TYPE_PREFIX, metric_name),
        metric_labels,
        resource_type: resource_type.to_string(),
        resource_labels,
        value,
        end_time: Utc::now(),
    }
}

/// A create-time-series request: destination project plus the points to
/// write. Built fresh on every export, submitted once, then discarded.
#[derive(Debug, Clone)]
pub struct ExportRequest {
    /// Destination in `projects/<project_id>` form.
    pub name: String,
    pub series: Vec<TimeSeriesPoint>,
}

impl ExportRequest {
    pub fn new(project_id: &str, series: Vec<TimeSeriesPoint>) -> Self {
        Self {
            name: format!("projects/{}", project_id),
            series,
        }
    }

    /// Request body in the REST v3 JSON shape.
    pub fn to_body(&self) -> RequestBody<'_> {
        RequestBody {
            time_series: self.series.iter().map(WireSeries::from).collect(),
        }
    }
}

// Wire-shape structs for the monitoring API JSON encoding.

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestBody<'a> {
    time_series: Vec<WireSeries<'a>>,
}

#[derive(Debug, Serialize)]
struct WireSeries<'a> {
    metric: WireMetric<'a>,
    resource: WireResource<'a>,
    points: [WirePoint; 1],
}

#[derive(Debug, Serialize)]
struct WireMetric<'a> {
    #[serde(rename = "type")]
    metric_type: &'a str,
    labels: &'a MetricLabelSet,
}

#[derive(Debug, Serialize)]
struct WireResource<'a> {
    #[serde(rename = "type")]
    resource_type: &'a str,
    labels: &'a HashMap<String, String>,
}

#[derive(Debug, Serialize)]
struct WirePoint {
    interval: WireInterval,
    value: MetricValue,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireInterval {
    // Gauge semantics: end time only, no start time.
    end_time: String,
}

impl<'a> From<&'a TimeSeriesPoint> for WireSeries<'a> {
    fn from(point: &'a TimeSeriesPoint) -> Self {
        WireSeries {
            metric: WireMetric {
                metric_type: &point.metric_type,
                labels: &point.metric_labels,
            },
            resource: WireResource {
                resource_type: &point.resource_type,
                labels: &point.resource_labels,
            },
            points: [WirePoint {
                interval: WireInterval {
                    end_time: point
                        .end_time
                        .to_rfc3339_opts(SecondsFormat::Nanos, true),
                },
                value: point.value,
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::RESOURCE_TYPE_K8S_CLUSTER;

    #[test]
    fn metric_type_is_prefixed_name() {
        let point = assemble(
            "load",
            MetricLabelSet::new(),
            RESOURCE_TYPE_K8S_CLUSTER,
            HashMap::new(),
            MetricValue::Double(3.5),
        );
        assert_eq!(point.metric_type, "custom.googleapis.com/load");
    }

    #[test]
    fn timestamp_is_assembly_time() {
        let before = Utc::now();
        let point = assemble(
            "foo",
            MetricLabelSet::new(),
            "k8s_pod",
            HashMap::new(),
            MetricValue::Int64(1),
        );
        let after = Utc::now();

        assert!(point.end_time >= before && point.end_time <= after);
    }

    #[test]
    fn request_name_derives_from_project() {
        let request = ExportRequest::new("demo-project", vec![]);
        assert_eq!(request.name, "projects/demo-project");
    }

    #[test]
    fn int64_value_encodes_as_string() {
        let json = serde_json::to_value(MetricValue::Int64(42)).unwrap();
        assert_eq!(json, serde_json::json!({ "int64Value": "42" }));
    }

    #[test]
    fn double_value_encodes_as_number() {
        let json = serde_json::to_value(MetricValue::Double(3.5)).unwrap();
        assert_eq!(json, serde_json::json!({ "doubleValue": 3.5 }));
    }

    #[test]
    fn body_matches_rest_shape() {
        let labels = MetricLabelSet::from([("bar".to_string(), "1".to_string())]);
        let resource_labels =
            HashMap::from([("project_id".to_string(), "demo".to_string())]);
        let point = assemble(
            "foo",
            labels,
            "gke_container",
            resource_labels,
            MetricValue::Int64(7),
        );
        let request = ExportRequest::new("demo", vec![point]);

        let json = serde_json::to_value(request.to_body()).unwrap();
        let series = &json["timeSeries"][0];

        assert_eq!(series["metric"]["type"], "custom.googleapis.com/foo");
        assert_eq!(series["metric"]["labels"]["bar"], "1");
        assert_eq!(series["resource"]["type"], "gke_container");
        assert_eq!(series["resource"]["labels"]["project_id"], "demo");
        assert_eq!(series["points"].as_array().unwrap().len(), 1);
        assert_eq!(series["points"][0]["value"]["int64Value"], "7");
        assert!(series["points"][0]["interval"]["endTime"].is_string());
        assert!(series["points"][0]["interval"].get("startTime").is_none());
    }
}
