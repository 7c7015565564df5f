//! Error types for the log transport.

use std::io;

use slogx_telemetry::TelemetryError;
use thiserror::Error;

/// Failures raised while starting the log server.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The listener could not be bound.
    #[error("failed to bind log server on port {port}")]
    Bind {
        /// Port that was requested.
        port: u16,
        /// Underlying socket error.
        source: io::Error,
    },
    /// The bound listener did not report its address.
    #[error("failed to read log server address")]
    LocalAddr {
        /// Underlying socket error.
        source: io::Error,
    },
    /// Transport metrics could not be registered.
    #[error("failed to initialise transport metrics")]
    Metrics {
        /// Underlying telemetry error.
        source: TelemetryError,
    },
}

/// Convenience alias for transport results.
pub type TransportResult<T> = Result<T, TransportError>;

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn bind_error_names_the_port_and_keeps_the_source() {
        let err = TransportError::Bind {
            port: 8080,
            source: io::Error::from(io::ErrorKind::AddrInUse),
        };
        assert_eq!(err.to_string(), "failed to bind log server on port 8080");
        assert!(err.source().is_some());
    }
}
