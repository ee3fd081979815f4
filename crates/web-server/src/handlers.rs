use crate::{error::AppError, page, AppState};
use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{Html, IntoResponse, Response},
    Json,
};
use core_types::{ChartResult, FilterSet, MetricResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::sync::Arc;

/// Rows returned by the table endpoint.
pub const TABLE_ROW_LIMIT: usize = 50;

/// The date-range query parameters shared by the data endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct FilterParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl FilterParams {
    fn to_filter_set(&self) -> Result<FilterSet, AppError> {
        Ok(FilterSet::from_params(
            self.start_date.as_deref(),
            self.end_date.as_deref(),
        )?)
    }
}

#[derive(Debug, Serialize)]
pub struct MetricsResponse {
    pub metrics: Vec<MetricResult>,
}

#[derive(Debug, Serialize)]
pub struct TableResponse {
    pub rows: Vec<Map<String, JsonValue>>,
}

/// # GET /
/// The dashboard page, with the client config embedded for the script.
pub async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    let page = page::render(&state.context)?;
    Ok(Html(page))
}

/// # GET /static/dashboard.js
pub async fn dashboard_js() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        page::DASHBOARD_JS,
    )
}

/// # GET /api/config
/// The dashboard config without the server-side `data_source` path.
pub async fn get_config(State(state): State<Arc<AppState>>) -> Response {
    Json(state.context.client_config()).into_response()
}

/// # GET /api/metrics
pub async fn get_metrics(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FilterParams>,
) -> Result<Json<MetricsResponse>, AppError> {
    let filters = params.to_filter_set()?;
    let metrics = state.context.metrics(&filters);
    Ok(Json(MetricsResponse { metrics }))
}

/// # GET /api/charts/:chart_id
pub async fn get_chart(
    Path(chart_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Query(params): Query<FilterParams>,
) -> Result<Json<ChartResult>, AppError> {
    let filters = params.to_filter_set()?;
    state
        .context
        .chart(&chart_id, &filters)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Unknown chart id: {chart_id}")))
}

/// # GET /api/table
/// The most recent filtered rows, newest first when a date column is configured.
pub async fn get_table(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FilterParams>,
) -> Result<Json<TableResponse>, AppError> {
    let filters = params.to_filter_set()?;
    let rows = state.context.recent_rows(&filters, TABLE_ROW_LIMIT).to_records();
    Ok(Json(TableResponse { rows }))
}
