//! HTTP server for a single role (primary, health or profiling).
//!
//! # Responsibilities
//! - Hold the role name, listen address, logger and handler
//! - Load TLS material when configured (primary role only)
//! - Bind the listener and spawn the serving loop on the work tracker

use axum::Router;
use futures_util::future::BoxFuture;
use tracing::Instrument;

use crate::config::TlsFiles;
use crate::http::request;
use crate::lifecycle::{Runnable, StartError, WorkTracker};
use crate::net::{listener, tls};
use crate::observability::{metrics, Logger};

/// One HTTP listener configured for a server role.
///
/// Starting it returns once the listener is bound; requests are served on a
/// background task registered with the tracker. There is no shutdown: the
/// task runs until the process exits or the listener fails.
#[derive(Debug, Clone)]
pub struct WebServer {
    name: String,
    address: String,
    logger: Logger,
    handler: Router,
    tls: Option<TlsFiles>,
}

impl WebServer {
    pub fn new(name: impl Into<String>, address: impl Into<String>, logger: Logger, handler: Router) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            logger,
            handler,
            tls: None,
        }
    }

    /// Serve HTTPS with the given certificate and key.
    pub fn with_tls(mut self, tls: Option<TlsFiles>) -> Self {
        self.tls = tls;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// The handler as supplied, without the instrumentation layers.
    pub fn handler(&self) -> &Router {
        &self.handler
    }

    pub fn tls(&self) -> Option<&TlsFiles> {
        self.tls.as_ref()
    }
}

impl Runnable for WebServer {
    fn run<'a>(&'a self, tracker: &'a WorkTracker) -> BoxFuture<'a, Result<(), StartError>> {
        Box::pin(async move {
            let tls_config = match &self.tls {
                Some(files) => Some(tls::load_tls_config(files).await.map_err(|source| StartError::Tls {
                    name: self.name.clone(),
                    source,
                })?),
                None => None,
            };

            let listener = listener::bind(&self.name, &self.address).await?;
            let app = request::instrument(self.handler.clone(), &self.logger);
            let name = self.name.clone();
            let span = self.logger.span().clone();

            match tls_config {
                None => {
                    tracker.spawn(
                        async move {
                            tracing::info!(scheme = "http", "Server starting");
                            metrics::record_listener(&name, true);
                            let result = axum::serve(listener, app).await;
                            metrics::record_listener(&name, false);
                            log_exit(result);
                        }
                        .instrument(span),
                    );
                }
                Some(config) => {
                    let std_listener = listener.into_std().map_err(|source| StartError::Bind {
                        name: self.name.clone(),
                        address: self.address.clone(),
                        source,
                    })?;
                    tracker.spawn(
                        async move {
                            tracing::info!(scheme = "https", "Server starting");
                            metrics::record_listener(&name, true);
                            let result = axum_server::from_tcp_rustls(std_listener, config)
                                .serve(app.into_make_service())
                                .await;
                            metrics::record_listener(&name, false);
                            log_exit(result);
                        }
                        .instrument(span),
                    );
                }
            }

            Ok(())
        })
    }
}

fn log_exit(result: std::io::Result<()>) {
    match result {
        Ok(()) => tracing::info!("Server stopped"),
        Err(e) => tracing::error!(error = %e, "Server stopped with error"),
    }
}
