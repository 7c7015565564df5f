//! Host tracing subscriber installation.
//!
//! # Design
//! - One call installs an `EnvFilter` and a fmt layer; only the selected
//!   format's layer is present, the other slot stays `None`.
//! - `RUST_LOG` overrides the configured directives when it parses.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::{Result, TelemetryError};

/// Directives used when neither `RUST_LOG` nor the caller supplies any.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Subscriber settings for hosts and test binaries.
#[derive(Debug, Clone)]
pub struct LoggingConfig<'a> {
    /// Filter directives, e.g. `info` or `slogx_transport=debug`.
    pub level: &'a str,
    /// Output encoding.
    pub format: LogFormat,
}

impl Default for LoggingConfig<'_> {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL,
            format: LogFormat::infer(),
        }
    }
}

/// Encoding of subscriber output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per line.
    Json,
    /// Human-readable lines.
    Pretty,
}

impl LogFormat {
    /// Pretty in debug builds, JSON otherwise.
    #[must_use]
    pub const fn infer() -> Self {
        if cfg!(debug_assertions) {
            Self::Pretty
        } else {
            Self::Json
        }
    }

    /// Format named `name`; unknown names fall back to [`LogFormat::infer`].
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        let name = name.trim();
        if name.eq_ignore_ascii_case("json") {
            Self::Json
        } else if name.eq_ignore_ascii_case("pretty") {
            Self::Pretty
        } else {
            Self::infer()
        }
    }
}

/// Install the global subscriber described by `config`.
///
/// # Errors
///
/// Returns [`TelemetryError::Subscriber`] when a global subscriber is already
/// set.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let (json, pretty) = match config.format {
        LogFormat::Json => (Some(fmt::layer().json().with_current_span(false)), None),
        LogFormat::Pretty => (None, Some(fmt::layer().with_target(true))),
    };
    tracing_subscriber::registry()
        .with(env_filter(config.level))
        .with(json)
        .with(pretty)
        .try_init()
        .map_err(|source| TelemetryError::Subscriber { source })
}

fn env_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_names_are_case_insensitive() {
        assert_eq!(LogFormat::from_name("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::from_name(" pretty "), LogFormat::Pretty);
        assert_eq!(LogFormat::from_name("yaml"), LogFormat::infer());
    }

    #[test]
    fn installing_twice_fails() {
        let config = LoggingConfig {
            level: "warn",
            format: LogFormat::Pretty,
        };
        let _ = init_logging(&config);
        let err = init_logging(&config).expect_err("second install must fail");
        assert!(matches!(err, TelemetryError::Subscriber { .. }));
    }
}
