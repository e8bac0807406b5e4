// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::dashboard_service::DashboardService;
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::influx_repository::InfluxRepository;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    get_dashboard, get_thresholds, health_check, list_sensors, sensor_samples, stream_dashboard,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load and validate configuration; bad thresholds stop startup here
    let app_config = load_app_config()?;
    let default_window = app_config.dashboard.default_window()?;

    // Create repository (infrastructure layer)
    let repository = Arc::new(InfluxRepository::new(&app_config.influx)?);

    // Create services (application layer)
    let dashboard_service = DashboardService::new(repository, app_config.thresholds);

    // Create application state
    let state = Arc::new(AppState {
        dashboard_service,
        settings: app_config.dashboard.clone(),
        default_window,
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/thresholds", get(get_thresholds))
        .route("/sensors", get(list_sensors))
        .route("/sensors/:kind/samples", get(sensor_samples))
        .route("/dashboard", get(get_dashboard))
        .route("/dashboard/stream", get(stream_dashboard))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = app_config.server.bind;
    tracing::info!(
        %addr,
        bucket = %app_config.influx.bucket,
        window = %default_window,
        "starting garden-telemetry service"
    );

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
