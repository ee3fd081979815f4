use crate::error::ConfigError;
use core_types::{Aggregation, ChartDefinition, MetricDefinition};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

/// The config file used when neither `--config` nor `DASHBOARD_CONFIG_PATH` is given.
pub const DEFAULT_CONFIG_PATH: &str = "config/dashboard.yml";

/// The root structure of the dashboard YAML file, after validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardConfig {
    /// Optional page heading.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Path of the CSV file backing the dashboard. Never sent to clients.
    pub data_source: String,
    /// Column parsed into dates at load time and used by the date-range filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_column: Option<String>,
    /// Filter widgets for the page. Free-form; the server only implements the date range.
    pub filters: Vec<JsonValue>,
    pub metrics: Vec<MetricDefinition>,
    pub charts: Vec<ChartDefinition>,
    /// Any other top-level keys, preserved for the client.
    #[serde(flatten)]
    pub extra: BTreeMap<String, JsonValue>,
}

/// The shape of the file before validation. Sections the loader must check are
/// kept loose so a wrong shape gets a precise message instead of a serde error.
#[derive(Debug, Deserialize)]
pub(crate) struct RawDashboardConfig {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    data_source: Option<String>,
    #[serde(default)]
    date_column: Option<String>,
    #[serde(default)]
    filters: Option<JsonValue>,
    #[serde(default)]
    metrics: Option<JsonValue>,
    #[serde(default)]
    charts: Option<JsonValue>,
    #[serde(flatten)]
    extra: BTreeMap<String, JsonValue>,
}

impl RawDashboardConfig {
    pub(crate) fn validate(self) -> Result<DashboardConfig, ConfigError> {
        let data_source = self
            .data_source
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| invalid("Config must define 'data_source'."))?;

        let metrics: Vec<MetricDefinition> = match self.metrics {
            Some(JsonValue::Array(items)) => serde_json::from_value(JsonValue::Array(items))
                .map_err(|e| invalid(&format!("Invalid metric definition: {e}")))?,
            _ => return Err(invalid("Config must define a list of 'metrics'.")),
        };

        let charts: Vec<ChartDefinition> = match self.charts {
            Some(JsonValue::Array(items)) => serde_json::from_value(JsonValue::Array(items))
                .map_err(|e| invalid(&format!("Invalid chart definition: {e}")))?,
            _ => return Err(invalid("Config must define a list of 'charts'.")),
        };

        let filters = match self.filters {
            None | Some(JsonValue::Null) => Vec::new(),
            Some(JsonValue::Array(items)) => items,
            Some(_) => return Err(invalid("'filters' must be a list when present.")),
        };

        ensure_unique_ids("metric", metrics.iter().map(|m| m.id.as_str()))?;
        ensure_unique_ids("chart", charts.iter().map(|c| c.id.as_str()))?;

        for metric in &metrics {
            match &metric.aggregation {
                Aggregation::Ratio if metric.numerator.is_none() || metric.denominator.is_none() => {
                    tracing::warn!(metric = %metric.id, "Ratio metric lacks a numerator or denominator; it will evaluate to NaN.");
                }
                Aggregation::Unknown(name) => {
                    tracing::warn!(metric = %metric.id, aggregation = %name, "Unknown aggregation; the metric will evaluate to NaN.");
                }
                _ => {}
            }
        }

        Ok(DashboardConfig {
            title: self.title,
            data_source,
            date_column: self.date_column.filter(|c| !c.trim().is_empty()),
            filters,
            metrics,
            charts,
            extra: self.extra,
        })
    }
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::ValidationError(message.to_string())
}

fn ensure_unique_ids<'a>(
    kind: &str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for id in ids {
        if id.trim().is_empty() {
            return Err(invalid(&format!("Every {kind} must have a non-empty 'id'.")));
        }
        if !seen.insert(id) {
            return Err(invalid(&format!("Duplicate {kind} id '{id}'.")));
        }
    }
    Ok(())
}

/// The view of the config sent to the browser: everything but `data_source`.
#[derive(Debug, Serialize)]
pub struct ClientConfig<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_column: Option<&'a str>,
    pub filters: &'a [JsonValue],
    pub metrics: &'a [MetricDefinition],
    pub charts: &'a [ChartDefinition],
    #[serde(flatten)]
    pub extra: &'a BTreeMap<String, JsonValue>,
}

impl DashboardConfig {
    pub fn client_config(&self) -> ClientConfig<'_> {
        ClientConfig {
            title: self.title.as_deref(),
            date_column: self.date_column.as_deref(),
            filters: &self.filters,
            metrics: &self.metrics,
            charts: &self.charts,
            extra: &self.extra,
        }
    }

    pub fn chart(&self, id: &str) -> Option<&ChartDefinition> {
        self.charts.iter().find(|c| c.id == id)
    }
}

/// Where the dashboard reads its config and data from.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::Args))]
pub struct DashboardPaths {
    /// Path to the dashboard YAML config.
    #[cfg_attr(
        feature = "clap",
        arg(long = "config", env = "DASHBOARD_CONFIG_PATH", default_value = DEFAULT_CONFIG_PATH)
    )]
    pub config_path: PathBuf,

    /// Path to the CSV data file. Defaults to the config's `data_source`.
    #[cfg_attr(feature = "clap", arg(long = "data", env = "DASHBOARD_DATA_PATH"))]
    pub data_path: Option<PathBuf>,
}

impl Default for DashboardPaths {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
            data_path: None,
        }
    }
}

impl DashboardPaths {
    /// The data file to load: the explicit override if any, else `data_source`.
    pub fn data_path_for(&self, config: &DashboardConfig) -> PathBuf {
        self.data_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(&config.data_source))
    }
}
