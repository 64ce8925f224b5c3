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

//! Search state for the front end: the active query, its latest result page,
//! and the selection used for batch downloads.
//!
//! Layout:
//! - `session.rs`: [`SearchSession`], the query/filter/pagination state machine
//! - `selection.rs`: [`SelectionManager`], the page-scoped result selection

mod selection;
mod session;

pub use selection::SelectionManager;
pub use session::{SearchSession, SessionSnapshot};
