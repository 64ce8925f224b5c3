//! Prometheus-backed metrics registry and snapshot helpers.
//!
//! # Design
//! - Encapsulates collector registration to keep the public API small.
//! - Exposes a minimal set of counters/gauges relevant to the front-end core.

use std::sync::Arc;

use anyhow::{Context, Result};
use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};
use serde::Serialize;

/// Prometheus-backed metrics registry shared across the core's services.
#[derive(Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

struct MetricsInner {
    registry: Registry,
    backend_calls_total: IntCounterVec,
    poll_cycles_total: IntCounter,
    poll_failures_total: IntCounter,
    searches_total: IntCounter,
    active_tasks: IntGauge,
}

/// Snapshot of selected gauges and counters for health reporting.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    /// Current number of non-terminal tasks in the store.
    pub active_tasks: i64,
    /// Total poll cycles executed.
    pub poll_cycles_total: u64,
    /// Total poll cycles that failed.
    pub poll_failures_total: u64,
    /// Total searches dispatched to the backend.
    pub searches_total: u64,
}

impl Metrics {
    /// Construct a new metrics registry with the standard collectors
    /// registered.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the Prometheus collectors cannot be
    /// registered.
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let backend_calls_total = IntCounterVec::new(
            Opts::new(
                "backend_calls_total",
                "Backend RPC calls by operation and outcome",
            ),
            &["operation", "outcome"],
        )?;
        let poll_cycles_total = IntCounter::new("poll_cycles_total", "Task poll cycles executed")?;
        let poll_failures_total =
            IntCounter::new("poll_failures_total", "Task poll cycles that failed")?;
        let searches_total =
            IntCounter::new("searches_total", "Searches dispatched to the backend")?;
        let active_tasks = IntGauge::new("active_tasks", "Non-terminal tasks in the store")?;

        registry
            .register(Box::new(backend_calls_total.clone()))
            .context("register backend_calls_total")?;
        registry
            .register(Box::new(poll_cycles_total.clone()))
            .context("register poll_cycles_total")?;
        registry
            .register(Box::new(poll_failures_total.clone()))
            .context("register poll_failures_total")?;
        registry
            .register(Box::new(searches_total.clone()))
            .context("register searches_total")?;
        registry
            .register(Box::new(active_tasks.clone()))
            .context("register active_tasks")?;

        Ok(Self {
            inner: Arc::new(MetricsInner {
                registry,
                backend_calls_total,
                poll_cycles_total,
                poll_failures_total,
                searches_total,
                active_tasks,
            }),
        })
    }

    /// Record one backend call by operation name and outcome.
    pub fn record_backend_call(&self, operation: &str, ok: bool) {
        let outcome = if ok { "ok" } else { "error" };
        self.inner
            .backend_calls_total
            .with_label_values(&[operation, outcome])
            .inc();
    }

    /// Record one completed poll cycle.
    pub fn record_poll_cycle(&self) {
        self.inner.poll_cycles_total.inc();
    }

    /// Record one failed poll cycle.
    pub fn record_poll_failure(&self) {
        self.inner.poll_failures_total.inc();
    }

    /// Record one search dispatched on behalf of the user.
    pub fn record_search(&self) {
        self.inner.searches_total.inc();
    }

    /// Publish the current number of non-terminal tasks.
    pub fn set_active_tasks(&self, count: usize) {
        self.inner
            .active_tasks
            .set(i64::try_from(count).unwrap_or(i64::MAX));
    }

    /// Capture the current values for health reporting.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            active_tasks: self.inner.active_tasks.get(),
            poll_cycles_total: self.inner.poll_cycles_total.get(),
            poll_failures_total: self.inner.poll_failures_total.get(),
            searches_total: self.inner.searches_total.get(),
        }
    }

    /// Render the registry in the Prometheus text exposition format.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails or produces invalid UTF-8.
    pub fn render(&self) -> Result<String> {
        let mut buffer = Vec::new();
        let encoder = TextEncoder::new();
        encoder
            .encode(&self.inner.registry.gather(), &mut buffer)
            .context("encode metrics")?;
        String::from_utf8(buffer).context("metrics text was not valid UTF-8")
    }
}
