//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Health::run (monitor.rs):
//!     Periodic timer
//!     → sample uptime and runtime figures
//!     → update shared stats
//!
//! Application code:
//!     → Health::increment / Health::set on registered stats
//!
//! Health server:
//!     GET any path → JSON snapshot of all stats
//! ```
//!
//! # Design Decisions
//! - One Health value is both the sampler and the HTTP handler
//! - Starting twice does not start a second sampler

pub mod monitor;

pub use monitor::{Health, Stat};
