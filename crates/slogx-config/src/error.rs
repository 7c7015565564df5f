//! Error types for configuration loading and validation.

use thiserror::Error;

/// Why a configuration was rejected.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable was not set.
    #[error("missing required environment variable {name}")]
    MissingEnv {
        /// Variable name.
        name: &'static str,
    },
    /// A field holds a value outside its allowed range.
    #[error("invalid configuration field {field}: {reason}")]
    InvalidField {
        /// Config field name.
        field: &'static str,
        /// Rejected input, when there was one.
        value: Option<String>,
        /// Short constraint description.
        reason: &'static str,
    },
}

/// Result alias used across the config crate.
pub type ConfigResult<T> = Result<T, ConfigError>;
