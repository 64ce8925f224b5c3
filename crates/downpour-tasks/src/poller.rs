//! Background loop that pulls authoritative task state from the backend.

use std::sync::{Arc, Weak};
use std::time::Duration;

use downpour_events::{Event, EventBus};
use downpour_gateway::RpcGateway;
use downpour_telemetry::Metrics;
use tracing::{debug, warn};

use crate::store::TaskStore;

/// Ceiling for failure backoff, as a multiple of the base interval.
const MAX_BACKOFF_FACTOR: u32 = 8;

/// Periodic task that reconciles the backend's task list into [`TaskStore`].
///
/// The first cycle fetches immediately; subsequent cycles run on the
/// configured interval. Cycles are strictly sequential: a cycle that
/// outlasts the interval delays the next one, it is never queued. Consecutive
/// failures double the delay up to [`MAX_BACKOFF_FACTOR`] times the base
/// interval; a success resets it. Failed cycles never touch the store.
pub struct Poller {
    gateway: RpcGateway,
    store: Arc<TaskStore>,
    events: EventBus,
    metrics: Metrics,
    interval: Duration,
}

/// Subscription to a running [`Poller`].
///
/// Clone one handle per mounted consumer; the background loop keeps running
/// while at least one clone is alive and winds down once the last one drops.
/// An in-flight request is not forcibly cancelled; its late result is
/// discarded instead of being applied.
#[derive(Clone)]
pub struct PollerHandle {
    _alive: Arc<()>,
}

impl Poller {
    /// Assemble a poller; nothing runs until [`Poller::start`] is called.
    #[must_use]
    pub fn new(
        gateway: RpcGateway,
        store: Arc<TaskStore>,
        events: EventBus,
        metrics: Metrics,
        interval: Duration,
    ) -> Self {
        Self {
            gateway,
            store,
            events,
            metrics,
            interval,
        }
    }

    /// Spawn the background loop and return the first subscriber handle.
    #[must_use]
    pub fn start(self) -> PollerHandle {
        let alive = Arc::new(());
        let subscribers = Arc::downgrade(&alive);
        tokio::spawn(self.run(subscribers));
        PollerHandle { _alive: alive }
    }

    async fn run(self, subscribers: Weak<()>) {
        // Zero initial delay: the first snapshot is fetched right away, the
        // steady cadence starts afterwards.
        let mut delay = Duration::ZERO;
        loop {
            tokio::time::sleep(delay).await;
            if subscribers.upgrade().is_none() {
                break;
            }

            match self.gateway.list_tasks().await {
                Ok(tasks) => {
                    self.metrics.record_poll_cycle();
                    if subscribers.upgrade().is_none() {
                        debug!("discarding poll response, last subscriber unmounted");
                        break;
                    }
                    self.store.reconcile(tasks).await;
                    self.metrics
                        .set_active_tasks(self.store.active_count().await);
                    delay = self.interval;
                }
                Err(err) => {
                    self.metrics.record_poll_cycle();
                    self.metrics.record_poll_failure();
                    let message = err.banner_message();
                    warn!(error = %message, "task poll failed, keeping local state");
                    let _ = self.events.publish(Event::PollFailed { message });
                    delay = next_backoff(delay, self.interval);
                }
            }
        }
        debug!("task poller stopped");
    }
}

fn next_backoff(current: Duration, base: Duration) -> Duration {
    let cap = base.saturating_mul(MAX_BACKOFF_FACTOR);
    if current < base {
        base
    } else {
        current.saturating_mul(2).min(cap)
    }
}
