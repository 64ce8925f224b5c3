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

//! Typed gateway between the front-end core and the backend transport.
//!
//! Layout:
//! - `gateway.rs`: the [`RpcGateway`] itself: validation, dispatch, error
//!   normalization
//! - `validate.rs`: input rules applied before any backend call
//! - `error.rs`: the gateway error taxonomy

mod error;
mod gateway;
mod validate;

pub use error::{GatewayError, GatewayResult};
pub use gateway::RpcGateway;
