use crate::error::ConfigError;
use crate::settings::RawDashboardConfig;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{ClientConfig, DEFAULT_CONFIG_PATH, DashboardConfig, DashboardPaths};

/// Loads and validates the dashboard configuration from a YAML file.
///
/// This function is the primary entry point for this crate. A missing file,
/// unreadable YAML, or a file that fails validation is reported as a
/// `ConfigError`, so the service refuses to start on a bad config.
pub fn load_dashboard_config(path: &Path) -> Result<DashboardConfig, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::NotFound(path.display().to_string()));
    }

    let builder = config::Config::builder()
        .add_source(config::File::from(path).format(config::FileFormat::Yaml))
        .build()?;

    let config = builder.try_deserialize::<RawDashboardConfig>()?.validate()?;
    tracing::info!(
        path = %path.display(),
        metrics = config.metrics.len(),
        charts = config.charts.len(),
        "Loaded dashboard config."
    );
    Ok(config)
}

/// Parses and validates a dashboard configuration held in memory.
pub fn parse_dashboard_config(yaml: &str) -> Result<DashboardConfig, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from_str(yaml, config::FileFormat::Yaml))
        .build()?;

    builder.try_deserialize::<RawDashboardConfig>()?.validate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::Aggregation;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    const VALID: &str = r#"
title: Sales
data_source: data/sales.csv
date_column: date
theme: dark
metrics:
  - id: total_revenue
    label: Total Revenue
    aggregation: sum
    column: revenue
    format: "$,.2f"
  - id: conversion
    aggregation: ratio
    numerator: orders
    denominator: visits
    format: "0.0%"
charts:
  - id: revenue_by_region
    type: bar
    x: region
    y: revenue
"#;

    fn validation_message(yaml: &str) -> String {
        match parse_dashboard_config(yaml) {
            Err(ConfigError::ValidationError(message)) => message,
            other => panic!("expected a validation error, got {other:?}"),
        }
    }

    #[test]
    fn parses_a_complete_config() {
        let config = parse_dashboard_config(VALID).unwrap();
        assert_eq!(config.title.as_deref(), Some("Sales"));
        assert_eq!(config.date_column.as_deref(), Some("date"));
        assert_eq!(config.metrics.len(), 2);
        assert_eq!(config.metrics[1].aggregation, Aggregation::Ratio);
        assert_eq!(config.charts[0].kind(), "bar");
        assert!(config.filters.is_empty());
        assert_eq!(config.extra.get("theme"), Some(&serde_json::json!("dark")));
    }

    #[test]
    fn client_config_omits_the_data_source() {
        let config = parse_dashboard_config(VALID).unwrap();
        let json = serde_json::to_value(config.client_config()).unwrap();
        assert!(json.get("data_source").is_none());
        assert_eq!(json["theme"], "dark");
        assert_eq!(json["metrics"][0]["id"], "total_revenue");
        assert_eq!(json["charts"][0]["type"], "bar");
    }

    #[test]
    fn missing_data_source_is_rejected() {
        let message = validation_message("metrics: []\ncharts: []\n");
        assert_eq!(message, "Config must define 'data_source'.");
    }

    #[test]
    fn metrics_and_charts_must_be_lists() {
        let message = validation_message("data_source: x.csv\nmetrics: nope\ncharts: []\n");
        assert_eq!(message, "Config must define a list of 'metrics'.");

        let message = validation_message("data_source: x.csv\nmetrics: []\n");
        assert_eq!(message, "Config must define a list of 'charts'.");
    }

    #[test]
    fn metric_without_id_is_a_load_error() {
        let message = validation_message(
            "data_source: x.csv\nmetrics:\n  - column: revenue\ncharts: []\n",
        );
        assert!(message.starts_with("Invalid metric definition"), "{message}");
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let message = validation_message(
            "data_source: x.csv\nmetrics:\n  - id: a\n    column: x\n  - id: a\n    column: y\ncharts: []\n",
        );
        assert_eq!(message, "Duplicate metric id 'a'.");
    }

    #[test]
    fn loads_from_disk_and_reports_missing_files() {
        let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        file.write_all(VALID.as_bytes()).unwrap();

        let config = load_dashboard_config(file.path()).unwrap();
        assert_eq!(config.data_source, "data/sales.csv");

        let missing = load_dashboard_config(Path::new("/definitely/not/here.yml"));
        assert!(matches!(missing, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn data_path_override_wins_over_data_source() {
        let config = parse_dashboard_config(VALID).unwrap();
        let paths = DashboardPaths::default();
        assert_eq!(paths.data_path_for(&config), Path::new("data/sales.csv"));

        let paths = DashboardPaths {
            data_path: Some("/tmp/other.csv".into()),
            ..DashboardPaths::default()
        };
        assert_eq!(paths.data_path_for(&config), Path::new("/tmp/other.csv"));
    }
}
