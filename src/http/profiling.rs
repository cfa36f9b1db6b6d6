//! Default profiling handler.
//!
//! Serves runtime introspection endpoints for the profiling server when the
//! caller does not supply its own handler. It is built once at startup and
//! passed to the assembler explicitly.

use std::time::Instant;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;

pub const INDEX_PATH: &str = "/debug/pprof/";
pub const CMDLINE_PATH: &str = "/debug/pprof/cmdline";
pub const RUNTIME_PATH: &str = "/debug/pprof/runtime";
pub const VARS_PATH: &str = "/debug/vars";
pub const METRICS_PATH: &str = "/debug/metrics";

/// Built-in profiling endpoints.
#[derive(Clone)]
pub struct ProfilingHandler {
    metrics: Option<PrometheusHandle>,
    started: Instant,
}

impl ProfilingHandler {
    pub fn new() -> Self {
        Self {
            metrics: None,
            started: Instant::now(),
        }
    }

    /// Render Prometheus metrics at [`METRICS_PATH`].
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route(INDEX_PATH, get(index))
            .route(CMDLINE_PATH, get(cmdline))
            .route(RUNTIME_PATH, get(runtime))
            .route(VARS_PATH, get(vars))
            .route(METRICS_PATH, get(render_metrics))
            .with_state(self.clone())
    }
}

impl Default for ProfilingHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ProfilingHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfilingHandler")
            .field("metrics", &self.metrics.is_some())
            .field("started", &self.started)
            .finish()
    }
}

#[derive(Serialize)]
struct RuntimeReport {
    workers: usize,
    alive_tasks: usize,
    uptime_seconds: u64,
    pid: u32,
}

#[derive(Serialize)]
struct Vars {
    cmdline: Vec<String>,
    version: &'static str,
    pid: u32,
}

async fn index() -> &'static str {
    "/debug/pprof/\n\
     \n\
     cmdline  the running program's command line\n\
     runtime  async runtime workers and live tasks\n\
     \n\
     /debug/vars     process variables (JSON)\n\
     /debug/metrics  Prometheus metrics\n"
}

async fn cmdline() -> String {
    std::env::args().collect::<Vec<_>>().join("\0")
}

async fn runtime(State(handler): State<ProfilingHandler>) -> Json<RuntimeReport> {
    let metrics = tokio::runtime::Handle::current().metrics();
    Json(RuntimeReport {
        workers: metrics.num_workers(),
        alive_tasks: metrics.num_alive_tasks(),
        uptime_seconds: handler.started.elapsed().as_secs(),
        pid: std::process::id(),
    })
}

async fn vars() -> Json<Vars> {
    Json(Vars {
        cmdline: std::env::args().collect(),
        version: env!("CARGO_PKG_VERSION"),
        pid: std::process::id(),
    })
}

async fn render_metrics(State(handler): State<ProfilingHandler>) -> Response {
    match &handler.metrics {
        Some(handle) => handle.render().into_response(),
        None => (StatusCode::NOT_FOUND, "metrics recorder not installed").into_response(),
    }
}
