//! Error types for profile operations.

use std::io;

use thiserror::Error;

/// Primary error type for profile loading and validation.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// Reading the profile file failed.
    #[error("profile file operation failed")]
    Io {
        /// Operation identifier.
        operation: &'static str,
        /// Source IO error.
        #[source]
        source: io::Error,
    },
    /// The profile file was not valid YAML for the expected shape.
    #[error("profile file could not be parsed")]
    Parse {
        /// Source parser error.
        #[source]
        source: serde_yaml::Error,
    },
    /// A field contained an invalid value.
    #[error("invalid profile field")]
    InvalidField {
        /// Field that failed validation.
        field: &'static str,
        /// Offending value when available.
        value: Option<String>,
        /// Machine-readable reason for the failure.
        reason: &'static str,
    },
}

/// Convenience alias for profile results.
pub type ProfileResult<T> = Result<T, ProfileError>;
