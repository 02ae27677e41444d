use crate::app_env;
use anyhow::Context;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use opentelemetry::trace::TracerProvider;
use opentelemetry::{KeyValue, global};
use opentelemetry_http::HeaderExtractor;
use opentelemetry_otlp::{MetricExporter, SpanExporter, WithExportConfig};
use opentelemetry_sdk::metrics::{PeriodicReader, SdkMeterProvider};
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::trace::Tracer;
use opentelemetry_sdk::{Resource, runtime};
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing::{Span, debug, field, info_span};
use tracing_opentelemetry::{MetricsLayer, OpenTelemetryLayer, OpenTelemetrySpanExt};
use tracing_subscriber::{EnvFilter, prelude::*, registry};

/// The name of the service as it should appear in OpenTelemetry collectors
const SERVICE_NAME: &str = "todo-expert";

/// OpenTelemetry primitives which export spans and metrics to a collector in the background
pub struct OtelExporters {
    pub tracer: Tracer,
    pub meter: SdkMeterProvider,
}

impl OtelExporters {
    /// Builds gRPC exporters for the given collector endpoints (typically http://localhost:4317
    /// with a standard sidecar setup)
    pub fn connect(traces_endpoint: &str, metrics_endpoint: &str) -> Result<Self, anyhow::Error> {
        let span_export = SpanExporter::builder()
            .with_tonic()
            .with_endpoint(traces_endpoint)
            .build()
            .context("building the span exporter")?;
        let meter_export = MetricExporter::builder()
            .with_tonic()
            .with_endpoint(metrics_endpoint)
            .build()
            .context("building the meter exporter")?;
        let service_resource = || Resource::new([KeyValue::new("service.name", SERVICE_NAME)]);

        let tracer = opentelemetry_sdk::trace::TracerProvider::builder()
            .with_batch_exporter(span_export, runtime::Tokio)
            .with_resource(service_resource())
            .build()
            .tracer(SERVICE_NAME);
        let meter = SdkMeterProvider::builder()
            .with_reader(PeriodicReader::builder(meter_export, runtime::Tokio).build())
            .with_resource(service_resource())
            .build();

        Ok(OtelExporters { tracer, meter })
    }
}

/// Wraps every route in a span carrying the method, path, status and latency. Spans continue
/// any W3C trace context sent by the caller.
pub fn attach_tracing_http<T>(router: Router<T>) -> Router<T>
where
    T: Clone + Send + Sync + 'static,
{
    router.layer(
        TraceLayer::new_for_http()
            .make_span_with(|request: &Request<Body>| {
                let req_span = info_span!(
                    "request",
                    method = request.method().as_str(),
                    path = request.uri().path(),
                    response_status = field::Empty,
                    latency_ms = field::Empty,
                );

                req_span.set_parent(global::get_text_map_propagator(|propagator| {
                    propagator.extract(&HeaderExtractor(request.headers()))
                }));

                req_span
            })
            .on_response(|response: &Response<Body>, latency: Duration, span: &Span| {
                span.record("response_status", field::display(response.status()));
                span.record("latency_ms", latency.as_millis());
                debug!("request processing complete");
            }),
    )
}

/// Builds the stdout log filter from [app_env::LOG_LEVEL], falling back to "info"
pub fn log_filter() -> Result<EnvFilter, anyhow::Error> {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .with_env_var(app_env::LOG_LEVEL)
        .from_env()
        .with_context(|| format!("{} holds an invalid log filter", app_env::LOG_LEVEL))
}

/// Installs the global subscriber. Stdout gets JSON logs filtered by `stdout_filter`. When
/// exporters are given, everything at "debug" and above is also sent to OpenTelemetry. Crates
/// still logging through "log" are bridged in as well.
pub fn setup_logging_and_tracing(stdout_filter: EnvFilter, otel_exporters: Option<OtelExporters>) {
    global::set_text_map_propagator(TraceContextPropagator::new());

    let (otel_spans, otel_metrics) = match otel_exporters {
        Some(exporters) => (
            Some(OpenTelemetryLayer::new(exporters.tracer)),
            Some(MetricsLayer::new(exporters.meter)),
        ),
        None => (None, None),
    };

    registry()
        .with(LevelFilter::DEBUG)
        .with(otel_spans)
        .with(otel_metrics)
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_filter(stdout_filter),
        )
        .init();
}
