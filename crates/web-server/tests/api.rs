//! End-to-end tests of the HTTP surface over a small on-disk dashboard.

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use configuration::{error::ConfigError, DashboardPaths};
use data_source::DataError;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use tower::ServiceExt;
use web_server::{build_router, AppState};

/// Sixty daily rows from 2024-01-01 to 2024-02-29, alternating regions.
fn sales_csv() -> String {
    let mut csv = String::from("date,region,units,revenue\n");
    for i in 0..60 {
        let date = if i < 31 {
            format!("2024-01-{:02}", i + 1)
        } else {
            format!("2024-02-{:02}", i - 30)
        };
        let region = if i % 2 == 0 { "E" } else { "W" };
        csv.push_str(&format!("{date},{region},{},{}\n", i % 5 + 1, 10 * (i + 1)));
    }
    csv
}

fn config_yaml(data_source: &Path) -> String {
    format!(
        r#"
title: Sales <Overview>
data_source: {}
date_column: date
filters:
  - id: date_range
    type: date_range
metrics:
  - id: total_revenue
    label: Total Revenue
    aggregation: sum
    column: revenue
    format: "$,.2f"
  - id: units
    aggregation: sum
    column: units
    format: ",d"
  - id: orders
    aggregation: count
    column: region
  - id: profit
    aggregation: sum
    column: profit
    format: "$,.2f"
charts:
  - id: revenue_by_region
    label: Revenue by Region
    type: bar
    x: region
    y: revenue
  - id: revenue_over_time
    type: line
    x: date
    y: revenue
"#,
        data_source.display()
    )
}

fn load_state() -> anyhow::Result<AppState> {
    let dir = tempfile::tempdir()?;
    let data_path = dir.path().join("sales.csv");
    let config_path = dir.path().join("dashboard.yml");
    std::fs::write(&data_path, sales_csv())?;
    std::fs::write(&config_path, config_yaml(&data_path))?;

    AppState::load(&DashboardPaths {
        config_path,
        data_path: None,
    })
}

fn app() -> Router {
    build_router(Arc::new(load_state().unwrap()))
}

async fn get(uri: &str) -> (StatusCode, Value) {
    let (status, body) = get_raw(uri).await;
    (status, serde_json::from_str(&body).unwrap())
}

async fn get_raw(uri: &str) -> (StatusCode, String) {
    let response = app()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn metrics_endpoint_returns_every_configured_metric() {
    let (status, body) = get("/api/metrics").await;
    assert_eq!(status, StatusCode::OK);

    let metrics = body["metrics"].as_array().unwrap();
    let formatted: Vec<(&str, &str)> = metrics
        .iter()
        .map(|m| (m["id"].as_str().unwrap(), m["formatted"].as_str().unwrap()))
        .collect();
    assert_eq!(
        formatted,
        vec![
            ("total_revenue", "$18,300.00"),
            ("units", "180"),
            ("orders", "60.0"),
            ("profit", "-"),
        ]
    );
    assert_eq!(metrics[0]["label"], "Total Revenue");
    assert_eq!(metrics[1]["label"], "units");
    assert_eq!(metrics[0]["value"], json!(18300.0));
    // NaN values are sent as null.
    assert_eq!(metrics[3]["value"], Value::Null);
}

#[tokio::test]
async fn metrics_respect_the_date_range() {
    let (status, body) = get("/api/metrics?start_date=2024-02-01&end_date=2024-02-29").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["metrics"][0]["formatted"], "$13,340.00");
    assert_eq!(body["metrics"][2]["value"], json!(29.0));

    let (_, body) = get("/api/metrics?start_date=2024-03-01&end_date=2024-01-01").await;
    assert_eq!(body["metrics"][0]["formatted"], "$0.00");
}

#[tokio::test]
async fn empty_filter_params_are_ignored() {
    let (status, body) = get("/api/metrics?start_date=&end_date=").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["metrics"][0]["formatted"], "$18,300.00");
}

#[tokio::test]
async fn malformed_dates_are_a_client_error() {
    let (status, body) = get("/api/metrics?start_date=last-week").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("start_date"));

    let (status, _) = get("/api/charts/revenue_by_region?end_date=2024-99-99").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn chart_endpoint_groups_by_x() {
    let (status, body) = get("/api/charts/revenue_by_region").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "id": "revenue_by_region",
            "label": "Revenue by Region",
            "type": "bar",
            "points": [{"x": "E", "y": 9000.0}, {"x": "W", "y": 9300.0}],
        })
    );
}

#[tokio::test]
async fn time_series_chart_is_ordered_by_date() {
    let (status, body) = get("/api/charts/revenue_over_time?start_date=2024-02-28").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["label"], "revenue_over_time");
    assert_eq!(
        body["points"],
        json!([{"x": "2024-02-28", "y": 590.0}, {"x": "2024-02-29", "y": 600.0}])
    );
}

#[tokio::test]
async fn unknown_chart_is_not_found() {
    let (status, body) = get("/api/charts/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Unknown chart id: nope"}));
}

#[tokio::test]
async fn table_endpoint_returns_the_most_recent_rows() {
    let (status, body) = get("/api/table").await;
    assert_eq!(status, StatusCode::OK);

    let rows = body["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 50);
    assert_eq!(
        rows[0],
        json!({"date": "2024-02-29", "region": "W", "units": 5, "revenue": 600})
    );
    assert_eq!(rows[49]["date"], "2024-01-11");

    let (_, body) = get("/api/table?end_date=2024-01-02").await;
    let dates: Vec<&str> = body["rows"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["date"].as_str().unwrap())
        .collect();
    assert_eq!(dates, vec!["2024-01-02", "2024-01-01"]);
}

#[tokio::test]
async fn config_endpoint_hides_the_data_source() {
    let (status, body) = get("/api/config").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.get("data_source").is_none());
    assert_eq!(body["date_column"], "date");
    assert_eq!(body["filters"][0]["id"], "date_range");
    assert_eq!(body["charts"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn index_page_embeds_the_client_config() {
    let (status, html) = get_raw("/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("<title>Sales &lt;Overview&gt;</title>"));
    assert!(html.contains("\"revenue_by_region\""));
    assert!(!html.contains("sales.csv"));

    let (status, script) = get_raw("/static/dashboard.js").await;
    assert_eq!(status, StatusCode::OK);
    assert!(script.contains("DASHBOARD_CONFIG"));
}

#[test]
fn startup_fails_on_a_missing_config() {
    let err = AppState::load(&DashboardPaths {
        config_path: "/no/such/dashboard.yml".into(),
        data_path: None,
    })
    .err()
    .unwrap();
    assert!(matches!(err.downcast_ref::<ConfigError>(), Some(ConfigError::NotFound(_))));
}

#[test]
fn startup_fails_on_a_missing_data_file() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("dashboard.yml");
    std::fs::write(&config_path, config_yaml(&dir.path().join("missing.csv"))).unwrap();

    let err = AppState::load(&DashboardPaths {
        config_path,
        data_path: None,
    })
    .err()
    .unwrap();
    assert!(matches!(err.downcast_ref::<DataError>(), Some(DataError::NotFound(_))));
}
