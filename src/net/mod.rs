//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! WebServer::run
//!     → tls.rs (primary role only: load certificate and key)
//!     → listener.rs (parse `:<port>`, bind)
//!     → Hand off to axum / axum-server serving loop
//! ```
//!
//! # Design Decisions
//! - TLS material is loaded before binding, so a bad certificate never
//!   leaves a bound port behind
//! - No hostname binding: `:<port>` always means all interfaces

pub mod listener;
pub mod tls;
