//! Errors surfaced by the public entry points.

use slogx_config::ConfigError;
use slogx_transport::TransportError;
use thiserror::Error;

/// Failures from [`crate::init`] and [`crate::Logger::start`].
#[derive(Debug, Error)]
pub enum SlogxError {
    /// The configuration was rejected.
    #[error(transparent)]
    Config {
        /// Validation failure.
        #[from]
        source: ConfigError,
    },
    /// The log server could not start.
    #[error(transparent)]
    Transport {
        /// Transport failure.
        #[from]
        source: TransportError,
    },
    /// A process-wide logger is already installed.
    #[error("slogx is already initialized")]
    AlreadyInitialized,
}

/// Convenience alias for facade results.
pub type SlogxResult<T> = Result<T, SlogxError>;
