//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Assembler asks the LoggerFactory for one Logger per role
//!     → logging.rs (named `server` spans, global subscriber)
//!
//! Every server:
//!     → request traces nested under its Logger span
//!     → metrics.rs (request counters, latency, live listeners)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → /debug/metrics on the profiling server (Prometheus text)
//! ```

pub mod logging;
pub mod metrics;

pub use logging::{init_logging, Logger, LoggerFactory, LoggingError, TracingLoggerFactory};
