use serde::{Deserialize, Serialize};

/// A computed KPI. A NaN `value` serializes as JSON `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricResult {
    pub id: String,
    pub label: String,
    pub value: f64,
    pub formatted: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub x: String,
    pub y: f64,
}

/// A computed chart series, ready for the client to draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartResult {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub chart_type: String,
    pub points: Vec<ChartPoint>,
}
