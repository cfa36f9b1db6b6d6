//! Configuration schema definitions.
//!
//! This module defines the configuration structure for the server set.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Port used by the primary server when none is configured.
pub const DEFAULT_PORT: u16 = 8080;

/// Port used by the health server when none is configured.
pub const DEFAULT_HEALTH_CHECK_PORT: u16 = 8081;

/// Port used by the profiling server when none is configured.
pub const DEFAULT_PPROF_PORT: u16 = 6060;

/// Sampling interval of the health monitor when none is configured.
pub const DEFAULT_HEALTH_CHECK_INTERVAL: Duration = Duration::from_secs(60);

/// Suffix appended to the server name for the health role.
pub const HEALTH_SUFFIX: &str = ".health";

/// Suffix appended to the server name for the profiling role.
pub const PPROF_SUFFIX: &str = ".pprof";

/// Root configuration for the binary.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Server roles (names, ports, TLS).
    pub server: ServerConfig,

    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,
}

/// Server configuration shared by the primary, health and profiling roles.
///
/// Ports and the interval are signed and optional: absent or non-positive
/// values fall back to the defaults above. Out of range ports are kept as-is
/// and only fail when the server is started.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
    /// Server name, used for logging and as the prefix of role names.
    pub name: String,

    /// Primary server port.
    pub port: Option<i32>,

    /// Health server port.
    pub health_check_port: Option<i32>,

    /// Health sampling interval in milliseconds.
    pub health_check_interval_ms: Option<i64>,

    /// Profiling server port.
    pub pprof_port: Option<i32>,

    /// Path to the primary server's certificate (PEM).
    pub certificate_file: String,

    /// Path to the primary server's private key (PEM).
    pub key_file: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "webpa".to_string(),
            port: None,
            health_check_port: None,
            health_check_interval_ms: None,
            pprof_port: None,
            certificate_file: String::new(),
            key_file: String::new(),
        }
    }
}

/// Certificate and key paths for an HTTPS listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsFiles {
    pub certificate: PathBuf,
    pub key: PathBuf,
}

impl ServerConfig {
    /// Listen address of the primary server.
    pub fn primary_address(&self) -> String {
        listen_address(self.port, DEFAULT_PORT)
    }

    /// Listen address of the health server.
    pub fn health_address(&self) -> String {
        listen_address(self.health_check_port, DEFAULT_HEALTH_CHECK_PORT)
    }

    /// Listen address of the profiling server.
    pub fn pprof_address(&self) -> String {
        listen_address(self.pprof_port, DEFAULT_PPROF_PORT)
    }

    /// Health sampling interval, defaulted when absent or non-positive.
    pub fn health_check_interval(&self) -> Duration {
        match self.health_check_interval_ms {
            Some(ms) if ms >= 1 => Duration::from_millis(ms as u64),
            _ => DEFAULT_HEALTH_CHECK_INTERVAL,
        }
    }

    /// Role name of the primary server.
    pub fn primary_name(&self) -> String {
        self.name.clone()
    }

    /// Role name of the health server.
    pub fn health_name(&self) -> String {
        format!("{}{}", self.name, HEALTH_SUFFIX)
    }

    /// Role name of the profiling server.
    pub fn pprof_name(&self) -> String {
        format!("{}{}", self.name, PPROF_SUFFIX)
    }

    /// TLS files for the primary server. HTTPS requires both paths.
    pub fn tls_files(&self) -> Option<TlsFiles> {
        if self.certificate_file.is_empty() || self.key_file.is_empty() {
            return None;
        }

        Some(TlsFiles {
            certificate: PathBuf::from(&self.certificate_file),
            key: PathBuf::from(&self.key_file),
        })
    }
}

/// Formats `:<port>`, substituting `default` for absent or non-positive ports.
pub fn listen_address(port: Option<i32>, default: u16) -> String {
    match port {
        Some(port) if port >= 1 => format!(":{}", port),
        _ => format!(":{}", default),
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log filter directive (e.g. `info`, `webpa_server=debug`).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Install the Prometheus recorder and expose it on the profiling server.
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: true,
        }
    }
}
