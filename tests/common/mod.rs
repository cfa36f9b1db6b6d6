//! Shared utilities for integration tests.

use axum::{routing::get, Router};
use webpa_server::ServerConfig;

/// Config with the three roles on consecutive ports starting at `base`.
pub fn config_on_ports(name: &str, base: i32) -> ServerConfig {
    ServerConfig {
        name: name.to_string(),
        pprof_port: Some(base),
        health_check_port: Some(base + 1),
        port: Some(base + 2),
        health_check_interval_ms: Some(20),
        ..Default::default()
    }
}

/// Primary handler answering `GET /` with `body`.
pub fn primary_router(body: &'static str) -> Router {
    Router::new().route("/", get(move || async move { body }))
}

/// Client that never reuses connections and ignores proxy settings.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
