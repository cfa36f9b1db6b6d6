//! Metrics collection and exposition.
//!
//! # Metrics
//! - `server_requests_total` (counter): requests by server, method, status
//! - `server_request_duration_seconds` (histogram): latency by server
//! - `server_listeners_active` (gauge): serving loops currently running
//!
//! # Design Decisions
//! - Recorded through the `metrics` facade; without an installed recorder
//!   every update is a no-op
//! - Prometheus text is rendered by the profiling server, not a separate port

use std::time::Instant;

use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("failed to install metrics recorder: {0}")]
pub struct MetricsError(String);

/// Install the global Prometheus recorder and return a handle for rendering.
pub fn install_recorder() -> Result<PrometheusHandle, MetricsError> {
    PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| MetricsError(e.to_string()))
}

/// Record a completed request.
pub fn record_request(server: &str, method: &str, status: u16, start: Instant) {
    counter!(
        "server_requests_total",
        "server" => server.to_string(),
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("server_request_duration_seconds", "server" => server.to_string())
        .record(start.elapsed().as_secs_f64());
}

/// Record a serving loop starting or stopping.
pub fn record_listener(server: &str, up: bool) {
    let gauge = gauge!("server_listeners_active", "server" => server.to_string());
    if up {
        gauge.increment(1.0);
    } else {
        gauge.decrement(1.0);
    }
}

/// Middleware recording request count and latency under the server's name.
pub async fn track_requests(
    State(server): State<String>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let response = next.run(request).await;
    record_request(&server, &method, response.status().as_u16(), start);
    response
}
