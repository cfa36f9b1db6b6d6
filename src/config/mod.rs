//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML/JSON)
//!     → loader.rs (parse & deserialize)
//!     → AppConfig (immutable)
//!     → ServerConfig borrowed by the assembler
//!     → derived addresses, names, interval (schema.rs)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - No validation at load time: non-positive ports and intervals are
//!   defaulted during assembly, other mistakes surface when servers start

pub mod loader;
pub mod schema;

pub use loader::{load_config, ConfigError};
pub use schema::{AppConfig, LogFormat, ObservabilityConfig, ServerConfig, TlsFiles};
