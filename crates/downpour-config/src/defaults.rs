//! Default values applied when the profile file or environment is silent.

/// Seconds between task polls.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

/// Results requested per search page.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Platform filter applied before the user picks one.
pub const DEFAULT_PLATFORM: &str = "all";

/// Log level when neither the profile nor `RUST_LOG` says otherwise.
pub const DEFAULT_LOG_LEVEL: &str = "info";
