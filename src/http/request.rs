//! Request instrumentation shared by every server role.
//!
//! # Responsibilities
//! - Assign an `x-request-id` (UUID v4) unless the client sent one
//! - Trace each request inside the owning server's logger span
//! - Record request metrics under the server's name
//!
//! # Design Decisions
//! - Request ID added as early as possible so traces carry it
//! - The caller's handler is wrapped, never modified

use axum::{body::Body, http::Request, middleware, Router};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::observability::{metrics, Logger};

pub const X_REQUEST_ID: &str = "x-request-id";

/// Wrap `handler` with request ID, tracing and metrics layers.
pub fn instrument(handler: Router, logger: &Logger) -> Router {
    let parent = logger.span().clone();
    let trace = TraceLayer::new_for_http().make_span_with(move |request: &Request<Body>| {
        let request_id = request
            .headers()
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown");
        tracing::info_span!(
            parent: &parent,
            "request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %request_id,
        )
    });

    handler
        .layer(middleware::from_fn_with_state(
            logger.name().to_string(),
            metrics::track_requests,
        ))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(trace)
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
}
