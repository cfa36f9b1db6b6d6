//! Health statistics monitor.
//!
//! # Responsibilities
//! - Hold named counters registered through options
//! - Periodically sample process and runtime figures
//! - Serve the current snapshot as JSON

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{extract::State, response::IntoResponse, Json, Router};
use dashmap::DashMap;
use futures_util::future::BoxFuture;
use tokio::time;
use tracing::Instrument;

use crate::config::schema::DEFAULT_HEALTH_CHECK_INTERVAL;
use crate::lifecycle::{Runnable, StartError, WorkTracker};
use crate::observability::Logger;

pub const UPTIME_SECONDS: &str = "uptime_seconds";
pub const SAMPLE_COUNT: &str = "sample_count";
pub const RUNTIME_WORKERS: &str = "runtime_workers";
pub const RUNTIME_ALIVE_TASKS: &str = "runtime_alive_tasks";

/// A named statistic exposed by the health server, starting at zero.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Stat(Cow<'static, str>);

impl Stat {
    pub const fn new(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<String> for Stat {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}

impl From<&'static str> for Stat {
    fn from(name: &'static str) -> Self {
        Self::new(name)
    }
}

/// Health statistics tracker.
///
/// Running it starts the periodic sampler; [`Health::router`] exposes the
/// same statistics over HTTP. Clones share state.
#[derive(Debug, Clone)]
pub struct Health {
    inner: Arc<HealthInner>,
}

#[derive(Debug)]
struct HealthInner {
    interval: Duration,
    logger: Logger,
    stats: DashMap<String, i64>,
    started: AtomicBool,
    created: Instant,
}

impl Health {
    /// A zero `interval` falls back to `DEFAULT_HEALTH_CHECK_INTERVAL`.
    pub fn new(interval: Duration, logger: Logger, options: &[Stat]) -> Self {
        let interval = if interval.is_zero() {
            DEFAULT_HEALTH_CHECK_INTERVAL
        } else {
            interval
        };

        let stats = DashMap::new();
        for stat in [UPTIME_SECONDS, SAMPLE_COUNT, RUNTIME_WORKERS, RUNTIME_ALIVE_TASKS] {
            stats.insert(stat.to_string(), 0);
        }
        for option in options {
            stats.insert(option.name().to_string(), 0);
        }

        Self {
            inner: Arc::new(HealthInner {
                interval,
                logger,
                stats,
                started: AtomicBool::new(false),
                created: Instant::now(),
            }),
        }
    }

    pub fn interval(&self) -> Duration {
        self.inner.interval
    }

    /// Whether the sampler has been started.
    pub fn is_running(&self) -> bool {
        self.inner.started.load(Ordering::SeqCst)
    }

    /// Add `delta` to a statistic, registering it if unknown.
    pub fn increment(&self, stat: &Stat, delta: i64) {
        *self.inner.stats.entry(stat.name().to_string()).or_insert(0) += delta;
    }

    /// Overwrite a statistic.
    pub fn set(&self, stat: &Stat, value: i64) {
        self.inner.stats.insert(stat.name().to_string(), value);
    }

    pub fn get(&self, stat: &Stat) -> Option<i64> {
        self.inner.stats.get(stat.name()).map(|v| *v)
    }

    /// Ordered copy of every statistic.
    pub fn snapshot(&self) -> BTreeMap<String, i64> {
        self.inner
            .stats
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect()
    }

    /// HTTP handler answering every path with the JSON snapshot.
    pub fn router(&self) -> Router {
        Router::new().fallback(report).with_state(self.clone())
    }

    fn sample(&self) {
        let inner = &self.inner;
        inner
            .stats
            .insert(UPTIME_SECONDS.to_string(), inner.created.elapsed().as_secs() as i64);
        *inner.stats.entry(SAMPLE_COUNT.to_string()).or_insert(0) += 1;

        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let metrics = handle.metrics();
            inner
                .stats
                .insert(RUNTIME_WORKERS.to_string(), metrics.num_workers() as i64);
            inner
                .stats
                .insert(RUNTIME_ALIVE_TASKS.to_string(), metrics.num_alive_tasks() as i64);
        }
    }
}

impl Runnable for Health {
    fn run<'a>(&'a self, tracker: &'a WorkTracker) -> BoxFuture<'a, Result<(), StartError>> {
        Box::pin(async move {
            if self.inner.started.swap(true, Ordering::SeqCst) {
                tracing::debug!(parent: self.inner.logger.span(), "Health monitor already running");
                return Ok(());
            }

            let health = self.clone();
            let span = self.inner.logger.span().clone();
            tracker.spawn(
                async move {
                    tracing::info!(interval = ?health.inner.interval, "Health monitor starting");
                    let mut ticker = time::interval(health.inner.interval);
                    loop {
                        ticker.tick().await;
                        health.sample();
                    }
                }
                .instrument(span),
            );

            Ok(())
        })
    }
}

async fn report(State(health): State<Health>) -> impl IntoResponse {
    Json(health.snapshot())
}
