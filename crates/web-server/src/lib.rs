use analytics::DashboardContext;
use anyhow::Context;
use axum::{routing::get, Router};
use configuration::DashboardPaths;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;
pub mod page;

/// The shared application state that all handlers can access.
pub struct AppState {
    pub context: DashboardContext,
}

impl AppState {
    /// Loads the config and the data table. Any failure here is fatal: the
    /// server must not start with an invalid config or without its data.
    pub fn load(paths: &DashboardPaths) -> anyhow::Result<Self> {
        let config = configuration::load_dashboard_config(&paths.config_path)
            .with_context(|| format!("loading dashboard config {}", paths.config_path.display()))?;

        let data_path = paths.data_path_for(&config);
        let table = data_source::load_table(&data_path, config.date_column.as_deref())
            .with_context(|| format!("loading dashboard data {}", data_path.display()))?;

        Ok(Self {
            context: DashboardContext::new(config, table),
        })
    }
}

/// Builds the application router over an already loaded state.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::index))
        .route("/static/dashboard.js", get(handlers::dashboard_js))
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/config", get(handlers::get_config))
        .route("/api/metrics", get(handlers::get_metrics))
        .route("/api/charts/:chart_id", get(handlers::get_chart))
        .route("/api/table", get(handlers::get_table))
        .with_state(state)
        .layer(cors)
        // Logs every incoming request.
        .layer(TraceLayer::new_for_http())
}

/// Loads the dashboard and serves it until Ctrl+C.
pub async fn run_server(addr: SocketAddr, paths: &DashboardPaths) -> anyhow::Result<()> {
    // Tracing is initialized by the binary before this is called.
    let state = Arc::new(AppState::load(paths)?);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Dashboard listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Dashboard stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for the shutdown signal.");
        // Keep serving rather than shutting down on a broken signal handler.
        std::future::pending::<()>().await;
    }
}
