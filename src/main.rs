use crate::app_env::AppConfig;
use anyhow::Context;
use axum::extract::State;
use dotenv::dotenv;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

mod api;
mod app_env;
mod domain;
mod dto;
mod external_connections;
mod logging;
mod persistence;
mod routes;
mod routing_utils;
mod weather_api;

/// Data shared by every request handler
pub struct SharedData {
    pub ext_cxn: persistence::ExternalConnectivity,
    /// Forecast endpoint used when stamping new todos with the weather
    pub forecast_url: String,
}

pub type AppState = State<Arc<SharedData>>;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    if dotenv().is_err() {
        println!("Starting server without .env file.");
    }
    let config = AppConfig::from_env()?;

    let otel_exporters = match &config.otel_endpoints {
        Some((span_url, metric_url)) => Some(logging::OtelExporters::connect(span_url, metric_url)?),
        None => None,
    };
    logging::setup_logging_and_tracing(logging::log_filter()?, otel_exporters);

    let db = persistence::connect_sqlx(&config.db_url, config.db_max_connections).await?;
    let shared_data = Arc::new(SharedData {
        ext_cxn: persistence::ExternalConnectivity::new(db)?,
        forecast_url: config.weather_api_url,
    });
    let router = routes::build_router(shared_data);

    let listener = TcpListener::bind(&config.server_address)
        .await
        .with_context(|| format!("binding to {}", config.server_address))?;
    info!("Starting server on {}", config.server_address);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("running the HTTP server")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Could not listen for the shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
