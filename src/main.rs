// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::sync::Arc;
use axum::{routing::get, Router};
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::chart_service::ChartService;
use crate::application::live_series::LiveSeries;
use crate::application::polling_service::PollingService;
use crate::domain::series_store::RetentionPolicy;
use crate::infrastructure::config::load_config;
use crate::infrastructure::sth_repository::SthRepository;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::dashboard;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_config()?;
    let timezone = config.polling.timezone()?;
    let refresh_interval = config.polling.interval();

    // Create repository (infrastructure layer)
    let repository = Arc::new(SthRepository::new(
        config.source.base_url(),
        config.source.entity_type.clone(),
        config.source.entity_id.clone(),
        config.source.service.clone(),
        config.source.service_path.clone(),
        refresh_interval,
    )?);

    // The one store instance, handed to both loops
    let series = Arc::new(LiveSeries::new(RetentionPolicy::from(&config.retention)));

    // Create services (application layer)
    let polling_service = PollingService::new(repository, config.polling.last_n, timezone);
    let chart_service = ChartService::new();

    tokio::spawn(polling_service.run(series.clone(), refresh_interval));
    tokio::spawn(chart_service.clone().run(series.clone()));

    // Create application state
    let state = Arc::new(AppState {
        chart_service,
        refresh_interval,
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/", get(dashboard))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, source = %config.source.base_url(), "Starting environment dashboard");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Environment dashboard stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
