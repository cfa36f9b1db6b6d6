//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Assembler builds components
//!     → RunnableSet (runnable.rs) groups them in start order
//!     → run_all creates a WorkTracker (tracker.rs)
//!     → each member binds / spawns, registering tasks on the tracker
//!     → caller waits on the tracker
//! ```
//!
//! # Design Decisions
//! - Ordered startup: members start one after another, never concurrently
//! - Fail fast: the first start error aborts the rest of the set
//! - No rollback: members already started keep running
//! - No shutdown: work runs until the process exits or its listener dies

pub mod runnable;
pub mod tracker;

pub use runnable::{Runnable, RunnableSet, StartError};
pub use tracker::{WorkGuard, WorkTracker};
