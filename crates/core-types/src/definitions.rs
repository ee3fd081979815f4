use serde::{Deserialize, Serialize};

/// The aggregation a metric applies to its column(s).
///
/// Unrecognised names are kept as `Unknown` so a partially misconfigured
/// dashboard still loads; such metrics evaluate to NaN.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Aggregation {
    #[default]
    Sum,
    Mean,
    Count,
    NUnique,
    Ratio,
    Unknown(String),
}

impl Aggregation {
    pub fn as_str(&self) -> &str {
        match self {
            Aggregation::Sum => "sum",
            Aggregation::Mean => "mean",
            Aggregation::Count => "count",
            Aggregation::NUnique => "nunique",
            Aggregation::Ratio => "ratio",
            Aggregation::Unknown(name) => name,
        }
    }
}

impl From<String> for Aggregation {
    fn from(name: String) -> Self {
        match name.as_str() {
            "sum" => Aggregation::Sum,
            "mean" => Aggregation::Mean,
            "count" => Aggregation::Count,
            "nunique" => Aggregation::NUnique,
            "ratio" => Aggregation::Ratio,
            _ => Aggregation::Unknown(name),
        }
    }
}

impl From<Aggregation> for String {
    fn from(aggregation: Aggregation) -> Self {
        aggregation.as_str().to_string()
    }
}

/// A scalar KPI declared in the `metrics` section of the config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricDefinition {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub aggregation: Aggregation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    /// Only read by `ratio` metrics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numerator: Option<String>,
    /// Only read by `ratio` metrics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub denominator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl MetricDefinition {
    /// The label shown on the dashboard card, falling back to the id.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }
}

/// How a chart combines the `y` values that share an `x` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartAggregation {
    #[default]
    Sum,
    Mean,
}

/// A grouped series declared in the `charts` section of the config.
///
/// `label`, `type` and `aggregation` are kept as written so the client config
/// echoes the user's file; the accessors apply the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDefinition {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub chart_type: Option<String>,
    pub x: String,
    pub y: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation: Option<String>,
}

impl ChartDefinition {
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }

    /// The rendering hint for the client, `bar` unless configured.
    pub fn kind(&self) -> &str {
        self.chart_type.as_deref().unwrap_or("bar")
    }

    /// `mean` when configured as such; every other value, or none, means `sum`.
    pub fn aggregation(&self) -> ChartAggregation {
        match self.aggregation.as_deref() {
            Some("mean") => ChartAggregation::Mean,
            _ => ChartAggregation::Sum,
        }
    }
}
