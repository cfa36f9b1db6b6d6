//! WebPA server launcher.
//!
//! Starts the profiling, health and primary servers described by the
//! configuration file and runs until they exit or Ctrl+C is received.
//!
//! # Architecture Overview
//!
//! ```text
//!   config file ──▶ AppConfig ──▶ Assembler ──▶ RunnableSet
//!                                    │               │
//!                         LoggerFactory        run_all()
//!                                                    │
//!              ┌─────────────────────┬───────────────┴──────┬─────────────────┐
//!              ▼                     ▼                      ▼                 │
//!        <name>.pprof          Health sampler         <name> (primary)        │
//!        :6060 default         <name>.health           :8080 default          │
//!                              :8081 default           HTTPS if cert + key    │
//!                                                                             │
//!              every serving loop / sampler registered on one WorkTracker ◀───┘
//! ```

use std::path::PathBuf;

use axum::{routing::get, Json, Router};
use clap::Parser;
use serde_json::json;

use webpa_server::config::{load_config, AppConfig};
use webpa_server::http::{Assembler, Handlers, ProfilingHandler};
use webpa_server::observability::{init_logging, metrics, TracingLoggerFactory};

#[derive(Parser)]
#[command(name = "webpa-server")]
#[command(about = "Runs the primary, health and profiling servers", long_about = None)]
struct Cli {
    /// Configuration file (TOML, or JSON with a .json extension)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log filter, overriding the configuration file
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    if let Some(level) = cli.log_level {
        config.observability.log_level = level;
    }

    init_logging(&config.observability)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "webpa-server starting");

    tracing::info!(
        name = %config.server.name,
        primary = %config.server.primary_address(),
        health = %config.server.health_address(),
        pprof = %config.server.pprof_address(),
        health_interval = ?config.server.health_check_interval(),
        tls = config.server.tls_files().is_some(),
        "Configuration loaded"
    );

    let mut profiling = ProfilingHandler::new();
    if config.observability.metrics_enabled {
        profiling = profiling.with_metrics(metrics::install_recorder()?);
    }

    let assembler = Assembler::new(&config.server, &TracingLoggerFactory, &profiling);
    let servers = assembler.build_all(Handlers::new(primary_handler(&config.server.name)))?;

    let (tracker, result) = servers.run_all().await;
    if let Err(e) = result {
        tracing::error!(error = %e, running = tracker.active(), "Startup failed");
        return Err(e.into());
    }

    tokio::select! {
        _ = tracker.wait() => tracing::info!("All servers stopped"),
        _ = tokio::signal::ctrl_c() => tracing::info!("Shutdown signal received"),
    }

    Ok(())
}

/// Placeholder primary handler reporting the server identity.
fn primary_handler(name: &str) -> Router {
    let name = name.to_string();
    Router::new().route(
        "/",
        get(move || {
            let name = name.clone();
            async move {
                Json(json!({
                    "name": name,
                    "version": env!("CARGO_PKG_VERSION"),
                }))
            }
        }),
    )
}
