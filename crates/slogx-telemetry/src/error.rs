//! Error types for telemetry operations.

use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::string::FromUtf8Error;

use prometheus::Error as PrometheusError;
use tracing_subscriber::util::TryInitError;

/// Result alias for telemetry operations.
pub type Result<T> = std::result::Result<T, TelemetryError>;

/// Step at which a Prometheus collector failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectorStage {
    /// Creating the collector from its options.
    Build,
    /// Adding the collector to the registry.
    Register,
}

impl Display for CollectorStage {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::Build => "build",
            Self::Register => "register",
        })
    }
}

/// Errors raised by telemetry helpers.
#[derive(Debug)]
pub enum TelemetryError {
    /// Another global subscriber was installed first.
    Subscriber {
        /// Underlying installation error.
        source: TryInitError,
    },
    /// A transport collector could not be set up.
    Collector {
        /// Metric name.
        metric: &'static str,
        /// Step that failed.
        stage: CollectorStage,
        /// Underlying Prometheus error.
        source: PrometheusError,
    },
    /// The text exposition could not be produced.
    Exposition {
        /// Underlying Prometheus error.
        source: PrometheusError,
    },
    /// The encoder produced bytes that are not UTF-8.
    ExpositionText {
        /// Underlying conversion error.
        source: FromUtf8Error,
    },
}

impl Display for TelemetryError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Subscriber { .. } => {
                formatter.write_str("a global tracing subscriber is already installed")
            }
            Self::Collector { metric, stage, .. } => {
                write!(formatter, "could not {stage} collector {metric}")
            }
            Self::Exposition { .. } => formatter.write_str("could not encode metrics exposition"),
            Self::ExpositionText { .. } => {
                formatter.write_str("metrics exposition contained invalid utf-8")
            }
        }
    }
}

impl Error for TelemetryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Subscriber { source } => Some(source),
            Self::Collector { source, .. } | Self::Exposition { source } => Some(source),
            Self::ExpositionText { source } => Some(source),
        }
    }
}
