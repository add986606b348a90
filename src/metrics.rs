//! Prometheus metrics: registry, instruments, and the scrape endpoint.

use axum::Router;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use lazy_static::lazy_static;
use prometheus::{Encoder, HistogramOpts, IntCounterVec, Opts, Registry, TextEncoder};

lazy_static! {
    /// Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // Provider Metrics
    pub static ref PROVIDER_REQUESTS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("linkreach_provider_requests_total", "Total number of provider API requests"),
        &["operation", "status"]
    ).expect("metric can be created");
    pub static ref PROVIDER_REQUEST_DURATION_SECONDS: prometheus::HistogramVec = prometheus::HistogramVec::new(
        HistogramOpts::new(
            "linkreach_provider_request_duration_seconds",
            "Provider API request duration in seconds"
        ).buckets(vec![0.01, 0.05, 0.1, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["operation"]
    ).expect("metric can be created");

    // Webhook Metrics
    pub static ref WEBHOOK_EVENTS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("linkreach_webhook_events_total", "Total number of webhook events received"),
        &["status", "outcome"]
    ).expect("metric can be created");

    // Connection Workflow Metrics
    pub static ref CONNECTION_ATTEMPTS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("linkreach_connection_attempts_total", "Total number of connection attempts"),
        &["outcome"]
    ).expect("metric can be created");

    // Error Metrics
    pub static ref ERRORS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("linkreach_errors_total", "Total number of errors"),
        &["error_type", "endpoint"]
    ).expect("metric can be created");
}

/// Initialize metrics registry.
pub fn init_metrics() {
    REGISTRY
        .register(Box::new(PROVIDER_REQUESTS_TOTAL.clone()))
        .expect("PROVIDER_REQUESTS_TOTAL can be registered");
    REGISTRY
        .register(Box::new(PROVIDER_REQUEST_DURATION_SECONDS.clone()))
        .expect("PROVIDER_REQUEST_DURATION_SECONDS can be registered");
    REGISTRY
        .register(Box::new(WEBHOOK_EVENTS_TOTAL.clone()))
        .expect("WEBHOOK_EVENTS_TOTAL can be registered");
    REGISTRY
        .register(Box::new(CONNECTION_ATTEMPTS_TOTAL.clone()))
        .expect("CONNECTION_ATTEMPTS_TOTAL can be registered");
    REGISTRY
        .register(Box::new(ERRORS_TOTAL.clone()))
        .expect("ERRORS_TOTAL can be registered");

    tracing::info!("Metrics registry initialized");
}

/// Router exposing `GET /metrics` in the Prometheus text format.
///
/// Stateless, so it is merged into the application router after the
/// shared state has been applied.
pub fn metrics_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/metrics", get(scrape_metrics))
}

async fn scrape_metrics() -> Response {
    let encoder = TextEncoder::new();
    match encoder.encode_to_string(&REGISTRY.gather()) {
        Ok(text) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, encoder.format_type())],
            text,
        )
            .into_response(),
        Err(error) => {
            tracing::error!(%error, "Metrics encoding failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
