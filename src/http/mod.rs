//! HTTP server assembly subsystem.
//!
//! # Data Flow
//! ```text
//! ServerConfig + Handlers
//!     → builder.rs (names, addresses, loggers, health monitor)
//!     → server.rs (one WebServer per role)
//!     → request.rs (request ID, tracing, metrics around each handler)
//!     → RunnableSet ready to start
//!
//! Profiling role without a handler:
//!     → profiling.rs (built-in runtime endpoints)
//! ```

pub mod builder;
pub mod profiling;
pub mod request;
pub mod server;

pub use builder::{Assembler, BuildError, Handlers};
pub use profiling::ProfilingHandler;
pub use request::X_REQUEST_ID;
pub use server::WebServer;
