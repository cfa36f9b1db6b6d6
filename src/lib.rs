//! Primary, health and profiling HTTP servers assembled from configuration.

pub mod config;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;

pub use config::{AppConfig, ServerConfig};
pub use http::{Assembler, Handlers, WebServer};
pub use lifecycle::{Runnable, RunnableSet, StartError, WorkTracker};
