//! Assembly of the primary, health and profiling servers from configuration.
//!
//! # Responsibilities
//! - Resolve names, listen addresses and the health interval (with defaults)
//! - Obtain one logger per role from the logger factory
//! - Produce ready-to-start servers, alone or grouped in a `RunnableSet`
//!
//! # Design Decisions
//! - Only logger construction can fail here; every other mistake (ports,
//!   TLS paths) surfaces when the server is started
//! - Construction order of `build_all` is profiling → health → primary,
//!   which is also the start order of the returned set

use axum::Router;
use thiserror::Error;

use crate::config::ServerConfig;
use crate::health::{Health, Stat};
use crate::http::profiling::ProfilingHandler;
use crate::http::server::WebServer;
use crate::lifecycle::RunnableSet;
use crate::observability::{Logger, LoggerFactory, LoggingError};

/// Error raised while assembling servers.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("failed to create logger for {role}: {source}")]
    Logger {
        role: String,
        #[source]
        source: LoggingError,
    },
}

/// Caller-supplied handlers for [`Assembler::build_all`].
#[derive(Debug, Clone)]
pub struct Handlers {
    /// Handler of the primary server.
    pub primary: Router,
    /// Handler of the profiling server; the default profiling handler when `None`.
    pub profiling: Option<Router>,
    /// Statistics exposed by the health server.
    pub health_options: Vec<Stat>,
}

impl Handlers {
    pub fn new(primary: Router) -> Self {
        Self {
            primary,
            profiling: None,
            health_options: Vec::new(),
        }
    }

    pub fn with_profiling(mut self, handler: Router) -> Self {
        self.profiling = Some(handler);
        self
    }

    pub fn with_health_options(mut self, options: impl IntoIterator<Item = Stat>) -> Self {
        self.health_options.extend(options);
        self
    }
}

/// Turns an immutable configuration plus handlers into startable servers.
pub struct Assembler<'a> {
    config: &'a ServerConfig,
    loggers: &'a dyn LoggerFactory,
    default_profiling: &'a ProfilingHandler,
}

impl<'a> Assembler<'a> {
    pub fn new(
        config: &'a ServerConfig,
        loggers: &'a dyn LoggerFactory,
        default_profiling: &'a ProfilingHandler,
    ) -> Self {
        Self {
            config,
            loggers,
            default_profiling,
        }
    }

    fn logger(&self, role: &str) -> Result<Logger, BuildError> {
        self.loggers.new_logger(role).map_err(|source| BuildError::Logger {
            role: role.to_string(),
            source,
        })
    }

    /// The primary server, serving HTTPS when both TLS files are configured.
    pub fn build_primary(&self, handler: Router) -> Result<WebServer, BuildError> {
        let name = self.config.primary_name();
        let logger = self.logger(&name)?;

        Ok(WebServer::new(name, self.config.primary_address(), logger, handler)
            .with_tls(self.config.tls_files()))
    }

    /// The health monitor and the server exposing it, as separate values.
    pub fn build_health_parts(&self, options: &[Stat]) -> Result<(Health, WebServer), BuildError> {
        let name = self.config.health_name();
        let logger = self.logger(&name)?;

        let health = Health::new(self.config.health_check_interval(), logger.clone(), options);
        let server = WebServer::new(name, self.config.health_address(), logger, health.router());
        Ok((health, server))
    }

    /// The health monitor followed by the server exposing it.
    pub fn build_health(&self, options: &[Stat]) -> Result<RunnableSet, BuildError> {
        let (health, server) = self.build_health_parts(options)?;
        Ok(health_set(health, server))
    }

    /// The profiling server, using the default profiling handler when `handler` is `None`.
    pub fn build_profiling(&self, handler: Option<Router>) -> Result<WebServer, BuildError> {
        let name = self.config.pprof_name();
        let logger = self.logger(&name)?;
        let handler = handler.unwrap_or_else(|| self.default_profiling.router());

        Ok(WebServer::new(name, self.config.pprof_address(), logger, handler))
    }

    /// Profiling, health and primary servers in one set, built and started in that order.
    pub fn build_all(&self, handlers: Handlers) -> Result<RunnableSet, BuildError> {
        let profiling = self.build_profiling(handlers.profiling)?;
        let health = self.build_health(&handlers.health_options)?;
        let primary = self.build_primary(handlers.primary)?;

        Ok(RunnableSet::new().with(profiling).with(health).with(primary))
    }
}

/// The sampler must be running before the server exposing it accepts requests.
fn health_set(health: Health, server: WebServer) -> RunnableSet {
    RunnableSet::new().with(health).with(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::TracingLoggerFactory;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::get;
    use std::sync::Mutex;
    use std::time::Duration;
    use tower::ServiceExt;

    /// Records requested logger names and fails for names ending in `fail_suffix`.
    #[derive(Default)]
    struct RecordingFactory {
        requested: Mutex<Vec<String>>,
        fail_suffix: Option<&'static str>,
    }

    impl RecordingFactory {
        fn failing_on(suffix: &'static str) -> Self {
            Self {
                fail_suffix: Some(suffix),
                ..Default::default()
            }
        }

        fn requested(&self) -> Vec<String> {
            self.requested.lock().unwrap().clone()
        }
    }

    impl LoggerFactory for RecordingFactory {
        fn new_logger(&self, name: &str) -> Result<Logger, LoggingError> {
            self.requested.lock().unwrap().push(name.to_string());
            match self.fail_suffix {
                Some(suffix) if name.ends_with(suffix) => Err(LoggingError::InvalidName),
                _ => Ok(Logger::new(name)),
            }
        }
    }

    fn config() -> ServerConfig {
        ServerConfig {
            name: "svc".into(),
            ..Default::default()
        }
    }

    fn marker_router() -> Router {
        Router::new().route("/marker", get(|| async { "marker" }))
    }

    async fn status_of(router: &Router, path: &str) -> StatusCode {
        router
            .clone()
            .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[test]
    fn primary_uses_configured_name_and_default_address() {
        let config = config();
        let profiling = ProfilingHandler::new();
        let assembler = Assembler::new(&config, &TracingLoggerFactory, &profiling);

        let server = assembler.build_primary(marker_router()).unwrap();
        assert_eq!(server.name(), "svc");
        assert_eq!(server.address(), ":8080");
        assert_eq!(server.logger().name(), "svc");
        assert!(server.tls().is_none());
    }

    #[test]
    fn primary_carries_tls_files_when_both_are_set() {
        let config = ServerConfig {
            port: Some(8443),
            certificate_file: "cert.pem".into(),
            key_file: "key.pem".into(),
            ..config()
        };
        let profiling = ProfilingHandler::new();
        let assembler = Assembler::new(&config, &TracingLoggerFactory, &profiling);

        let server = assembler.build_primary(marker_router()).unwrap();
        assert_eq!(server.address(), ":8443");
        let tls = server.tls().expect("tls files");
        assert_eq!(tls.certificate.to_str(), Some("cert.pem"));
        assert_eq!(tls.key.to_str(), Some("key.pem"));
    }

    #[test]
    fn primary_logger_failure_is_returned() {
        let config = config();
        let profiling = ProfilingHandler::new();
        let factory = RecordingFactory::failing_on("svc");
        let assembler = Assembler::new(&config, &factory, &profiling);

        let err = assembler.build_primary(marker_router()).unwrap_err();
        let BuildError::Logger { role, .. } = err;
        assert_eq!(role, "svc");
    }

    #[test]
    fn health_builds_monitor_and_server() {
        let config = ServerConfig {
            health_check_port: Some(9101),
            health_check_interval_ms: Some(250),
            ..config()
        };
        let profiling = ProfilingHandler::new();
        let assembler = Assembler::new(&config, &TracingLoggerFactory, &profiling);

        assert_eq!(assembler.build_health(&[]).unwrap().len(), 2);

        let (health, server) = assembler
            .build_health_parts(&[Stat::new("requests")])
            .unwrap();
        assert_eq!(health.interval(), Duration::from_millis(250));
        assert_eq!(health.snapshot().get("requests"), Some(&0));
        assert_eq!(server.name(), "svc.health");
        assert_eq!(server.address(), ":9101");
    }

    #[tokio::test]
    async fn health_starts_sampler_before_server() {
        use crate::lifecycle::StartError;

        // Hold the health port so the server member cannot bind.
        let taken = tokio::net::TcpListener::bind("0.0.0.0:0").await.unwrap();
        let config = ServerConfig {
            health_check_port: Some(i32::from(taken.local_addr().unwrap().port())),
            ..config()
        };
        let profiling = ProfilingHandler::new();
        let assembler = Assembler::new(&config, &TracingLoggerFactory, &profiling);

        let (health, server) = assembler.build_health_parts(&[]).unwrap();
        let (tracker, result) = health_set(health.clone(), server).run_all().await;

        let err = result.unwrap_err();
        assert!(matches!(err, StartError::Bind { .. }));
        assert_eq!(err.name(), "svc.health");
        assert!(health.is_running());
        assert_eq!(tracker.active(), 1);
    }

    #[tokio::test]
    async fn profiling_defaults_to_builtin_handler() {
        let config = config();
        let profiling = ProfilingHandler::new();
        let assembler = Assembler::new(&config, &TracingLoggerFactory, &profiling);

        let server = assembler.build_profiling(None).unwrap();
        assert_eq!(server.name(), "svc.pprof");
        assert_eq!(server.address(), ":6060");
        assert_eq!(status_of(server.handler(), "/debug/pprof/").await, StatusCode::OK);
        assert_eq!(status_of(server.handler(), "/marker").await, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn profiling_uses_supplied_handler() {
        let config = config();
        let profiling = ProfilingHandler::new();
        let assembler = Assembler::new(&config, &TracingLoggerFactory, &profiling);

        let server = assembler.build_profiling(Some(marker_router())).unwrap();
        assert_eq!(status_of(server.handler(), "/marker").await, StatusCode::OK);
        assert_eq!(
            status_of(server.handler(), "/debug/pprof/").await,
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn build_all_builds_in_order() {
        let config = config();
        let profiling = ProfilingHandler::new();
        let factory = RecordingFactory::default();
        let assembler = Assembler::new(&config, &factory, &profiling);

        let set = assembler.build_all(Handlers::new(marker_router())).unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(factory.requested(), vec!["svc.pprof", "svc.health", "svc"]);
    }

    #[test]
    fn build_all_stops_at_profiling_logger_failure() {
        let config = config();
        let profiling = ProfilingHandler::new();
        let factory = RecordingFactory::failing_on(".pprof");
        let assembler = Assembler::new(&config, &factory, &profiling);

        let err = assembler.build_all(Handlers::new(marker_router())).unwrap_err();
        assert!(matches!(err, BuildError::Logger { ref role, .. } if role == "svc.pprof"));
        assert_eq!(factory.requested(), vec!["svc.pprof"]);
    }

    #[test]
    fn build_all_stops_at_health_logger_failure() {
        let config = config();
        let profiling = ProfilingHandler::new();
        let factory = RecordingFactory::failing_on(".health");
        let assembler = Assembler::new(&config, &factory, &profiling);

        assert!(assembler.build_all(Handlers::new(marker_router())).is_err());
        assert_eq!(factory.requested(), vec!["svc.pprof", "svc.health"]);
    }

    #[test]
    fn empty_name_fails_with_default_factory() {
        let config = ServerConfig {
            name: String::new(),
            ..Default::default()
        };
        let profiling = ProfilingHandler::new();
        let assembler = Assembler::new(&config, &TracingLoggerFactory, &profiling);

        // Role suffixes make the profiling and health names non-empty.
        assert!(assembler.build_profiling(None).is_ok());
        assert!(assembler.build_primary(marker_router()).is_err());
    }

    #[tokio::test]
    async fn rebuilding_yields_independent_servers() {
        let config = config();
        let profiling = ProfilingHandler::new();
        let assembler = Assembler::new(&config, &TracingLoggerFactory, &profiling);

        let (health_a, server_a) = assembler.build_health_parts(&[]).unwrap();
        let (health_b, server_b) = assembler.build_health_parts(&[]).unwrap();
        assert_eq!(server_a.name(), server_b.name());
        assert_eq!(server_a.address(), server_b.address());

        use crate::lifecycle::{Runnable, WorkTracker};
        let tracker = WorkTracker::new();
        health_a.run(&tracker).await.unwrap();
        assert!(health_a.is_running());
        assert!(!health_b.is_running());

        health_b.run(&tracker).await.unwrap();
        assert_eq!(tracker.active(), 2);
    }
}
