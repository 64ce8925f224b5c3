//! Error types for gateway operations.

use thiserror::Error;

/// Primary error type for gateway operations.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Input was malformed before any backend call was made.
    ///
    /// Always recoverable locally; never retried automatically.
    #[error("request validation failed")]
    Validation {
        /// The individual rules the input violated.
        violations: Vec<String>,
    },
    /// The backend call itself failed (transport or backend-side error).
    #[error("backend call failed")]
    Backend {
        /// Operation identifier.
        operation: &'static str,
        /// Underlying failure, opaque to the caller.
        #[source]
        source: anyhow::Error,
    },
}

impl GatewayError {
    /// Whether the error was raised before reaching the backend.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// One-line description suitable for the UI error banner.
    #[must_use]
    pub fn banner_message(&self) -> String {
        match self {
            Self::Validation { violations } => {
                format!("invalid request: {}", violations.join(", "))
            }
            Self::Backend { operation, source } => {
                format!("{operation} failed: {source}")
            }
        }
    }
}

/// Convenience alias for gateway results.
pub type GatewayResult<T> = Result<T, GatewayError>;
