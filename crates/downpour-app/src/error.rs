//! Error types for application assembly.

use thiserror::Error;

/// Primary error type for bootstrap operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Telemetry could not be initialised.
    #[error("telemetry initialisation failed")]
    Telemetry {
        /// Operation identifier.
        operation: &'static str,
        /// Underlying failure.
        #[source]
        source: anyhow::Error,
    },
    /// The application profile was rejected.
    #[error("profile rejected")]
    Profile {
        /// Underlying validation or loading failure.
        #[source]
        source: downpour_config::ProfileError,
    },
}

/// Convenience alias for application results.
pub type AppResult<T> = Result<T, AppError>;
