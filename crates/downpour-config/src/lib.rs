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

//! Process-local application profile for the Downpour core.
//!
//! # Design
//! - `model.rs` holds the profile struct and derived accessors.
//! - `defaults.rs` keeps every default in one place.
//! - `loader.rs` layers YAML file contents and environment overrides.
//! - `validate.rs` rejects out-of-range values before anything runs.
//!
//! Persistent settings storage belongs to the embedding application; this
//! crate only shapes what the core needs at startup.

mod defaults;
mod error;
mod loader;
mod model;
mod validate;

pub use defaults::{
    DEFAULT_LOG_LEVEL, DEFAULT_PAGE_SIZE, DEFAULT_PLATFORM, DEFAULT_POLL_INTERVAL_SECS,
};
pub use error::{ProfileError, ProfileResult};
pub use loader::{apply_env_overrides, load_profile};
pub use model::AppProfile;
pub use validate::validate_profile;
