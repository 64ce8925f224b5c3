#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Wiring for the Downpour front-end core.
//!
//! The embedding desktop shell owns the real IPC transport and the rendering
//! layer; this crate assembles everything in between (profile, telemetry,
//! event bus, gateway, stores, poller) and exposes the workflow façade the
//! UI calls.
//!
//! Layout:
//! - `bootstrap.rs`: [`AppCore`] assembly and telemetry initialisation
//! - `orchestrator.rs`: [`DownloadOrchestrator`], the workflow façade
//! - `platforms.rs`: [`PlatformDirectory`], the session-cached platform list
//! - `banner.rs`: [`ErrorBanner`], the single user-facing failure slot
//! - `error.rs`: application error taxonomy

mod banner;
mod bootstrap;
mod error;
mod orchestrator;
mod platforms;

pub use banner::ErrorBanner;
pub use bootstrap::{AppCore, bootstrap, init_telemetry};
pub use error::{AppError, AppResult};
pub use orchestrator::DownloadOrchestrator;
pub use platforms::PlatformDirectory;
