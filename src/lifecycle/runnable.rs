//! Startable operations and their composition.

use std::net::AddrParseError;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use thiserror::Error;

use crate::lifecycle::tracker::WorkTracker;

/// Error returned when an operation cannot be started.
#[derive(Debug, Error)]
pub enum StartError {
    /// The listen address could not be parsed.
    #[error("{name}: invalid listen address {address:?}: {source}")]
    InvalidAddress {
        name: String,
        address: String,
        #[source]
        source: AddrParseError,
    },
    /// Binding the listener failed.
    #[error("{name}: failed to bind {address}: {source}")]
    Bind {
        name: String,
        address: String,
        #[source]
        source: std::io::Error,
    },
    /// Loading the certificate or key failed.
    #[error("{name}: failed to load TLS configuration: {source}")]
    Tls {
        name: String,
        #[source]
        source: std::io::Error,
    },
    /// Any other start-time failure.
    #[error("{name}: {message}")]
    Failed { name: String, message: String },
}

impl StartError {
    /// Name of the component that failed to start.
    pub fn name(&self) -> &str {
        match self {
            StartError::InvalidAddress { name, .. }
            | StartError::Bind { name, .. }
            | StartError::Tls { name, .. }
            | StartError::Failed { name, .. } => name,
        }
    }
}

/// An operation that can be started, possibly spawning background tasks.
///
/// Implementations register every task they spawn on the given tracker,
/// normally through [`WorkTracker::spawn`]. `run` returns as soon as the
/// operation is started; it does not wait for the spawned work.
///
/// Starting should be idempotent: a second call must not leave the tracker
/// counting work that does not exist. Failing the second call is acceptable.
pub trait Runnable: Send + Sync {
    fn run<'a>(&'a self, tracker: &'a WorkTracker) -> BoxFuture<'a, Result<(), StartError>>;
}

impl<R: Runnable + ?Sized> Runnable for Box<R> {
    fn run<'a>(&'a self, tracker: &'a WorkTracker) -> BoxFuture<'a, Result<(), StartError>> {
        (**self).run(tracker)
    }
}

impl<R: Runnable + ?Sized> Runnable for Arc<R> {
    fn run<'a>(&'a self, tracker: &'a WorkTracker) -> BoxFuture<'a, Result<(), StartError>> {
        (**self).run(tracker)
    }
}

/// Ordered group of operations, itself runnable.
///
/// Members start in order. The first error stops the sequence and is
/// returned; members that already started keep running and stay counted
/// in the tracker.
#[derive(Default)]
pub struct RunnableSet {
    members: Vec<Box<dyn Runnable>>,
}

impl RunnableSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an operation.
    pub fn push<R: Runnable + 'static>(&mut self, runnable: R) {
        self.members.push(Box::new(runnable));
    }

    /// Builder-style [`push`](Self::push).
    pub fn with<R: Runnable + 'static>(mut self, runnable: R) -> Self {
        self.push(runnable);
        self
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Run every member against a fresh tracker.
    ///
    /// The tracker is returned even on failure, holding the work of the
    /// members that did start.
    pub async fn run_all(&self) -> (WorkTracker, Result<(), StartError>) {
        let tracker = WorkTracker::new();
        let result = self.run(&tracker).await;
        (tracker, result)
    }
}

impl From<Vec<Box<dyn Runnable>>> for RunnableSet {
    fn from(members: Vec<Box<dyn Runnable>>) -> Self {
        Self { members }
    }
}

impl std::fmt::Debug for RunnableSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunnableSet")
            .field("len", &self.members.len())
            .finish()
    }
}

impl Runnable for RunnableSet {
    fn run<'a>(&'a self, tracker: &'a WorkTracker) -> BoxFuture<'a, Result<(), StartError>> {
        Box::pin(async move {
            for member in &self.members {
                member.run(tracker).await?;
            }
            Ok(())
        })
    }
}
