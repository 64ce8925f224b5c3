//! The application profile shape and derived accessors.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::defaults;

/// Startup knobs for the front-end core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct AppProfile {
    /// Seconds between task polls; also the retention window for terminal
    /// tasks missing from server snapshots.
    pub poll_interval_secs: u64,
    /// Results requested per search page.
    pub page_size: u32,
    /// Platform filter applied before the user picks one.
    pub default_platform: String,
    /// Log level passed to the tracing subscriber.
    pub log_level: String,
    /// Log output format ("json" or "pretty"); inferred from the build when
    /// absent.
    pub log_format: Option<String>,
}

impl Default for AppProfile {
    fn default() -> Self {
        Self {
            poll_interval_secs: defaults::DEFAULT_POLL_INTERVAL_SECS,
            page_size: defaults::DEFAULT_PAGE_SIZE,
            default_platform: defaults::DEFAULT_PLATFORM.to_string(),
            log_level: defaults::DEFAULT_LOG_LEVEL.to_string(),
            log_format: None,
        }
    }
}

impl AppProfile {
    /// Interval between poll cycles.
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// How long an absent terminal task is retained before reconciliation
    /// may drop it; one poll interval.
    #[must_use]
    pub const fn retention(&self) -> Duration {
        self.poll_interval()
    }
}
