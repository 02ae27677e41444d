use anyhow::{Context, anyhow};
use std::env;
use std::num::NonZeroU32;

/// URL for accessing the PostrgeSQL database (should contain a schema name in the path)
pub const DB_URL: &str = "DATABASE_URL";
/// Maximum number of pooled database connections. Defaults to [DEFAULT_DB_MAX_CONNECTIONS]
pub const DB_MAX_CONNECTIONS: &str = "DB_MAX_CONNECTIONS";
/// Log level configuration for the application. For formatting info, see [tracing_subscriber's EnvFilter documentation](https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/struct.EnvFilter.html)
pub const LOG_LEVEL: &str = "LOG_LEVEL";
/// Address the HTTP server binds to. Defaults to [DEFAULT_SERVER_ADDRESS]
pub const SERVER_ADDRESS: &str = "SERVER_ADDRESS";
/// Endpoint returning the forecast list used to stamp new todos with the day's weather
pub const WEATHER_API_URL: &str = "WEATHER_API_URL";

/// OpenTelemetry span export URL. Should be http://localhost:4317 by default, as the service should
/// have an OpenTelemetry collector sidecar which directs metrics to the correct place
pub const OTEL_SPAN_EXPORT_URL: &str = "OTEL_SPAN_EXPORT_URL";
/// OpenTelemetry metrics export URL. Should be http://localhost:4317 by default, as the service should
/// have an OpenTelemetry collector sidecar which directs metrics to the correct place
pub const OTEL_METRIC_EXPORT_URL: &str = "OTEL_METRIC_EXPORT_URL";

pub const DEFAULT_SERVER_ADDRESS: &str = "0.0.0.0:8080";
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Settings the server needs at startup, read from the environment
#[derive(Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub db_url: String,
    pub db_max_connections: u32,
    pub server_address: String,
    pub weather_api_url: String,
    /// Span and metric export URLs. Export is only turned on when both are set.
    pub otel_endpoints: Option<(String, String)>,
}

impl AppConfig {
    /// Reads the configuration from process environment variables
    pub fn from_env() -> Result<AppConfig, anyhow::Error> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<AppConfig, anyhow::Error> {
        let required = |name: &str| {
            lookup(name)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| anyhow!("the {name} environment variable must be set"))
        };

        let db_max_connections = match lookup(DB_MAX_CONNECTIONS) {
            Some(raw) => raw
                .parse::<NonZeroU32>()
                .with_context(|| format!("{DB_MAX_CONNECTIONS} must be a positive integer"))?
                .get(),
            None => DEFAULT_DB_MAX_CONNECTIONS,
        };
        let otel_endpoints = lookup(OTEL_SPAN_EXPORT_URL).zip(lookup(OTEL_METRIC_EXPORT_URL));

        Ok(AppConfig {
            db_url: required(DB_URL)?,
            db_max_connections,
            server_address: lookup(SERVER_ADDRESS)
                .unwrap_or_else(|| DEFAULT_SERVER_ADDRESS.to_owned()),
            weather_api_url: required(WEATHER_API_URL)?,
            otel_endpoints,
        })
    }
}
