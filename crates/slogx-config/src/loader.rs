//! Environment-driven configuration loading.
//!
//! # Design
//! - `SLOGX_DEV` is required so the subsystem is never enabled by accident.
//! - Lookup is injectable; tests pass a closure instead of mutating the process
//!   environment.

use crate::error::{ConfigError, ConfigResult};
use crate::model::Config;
use crate::validate::{parse_bind_addr, parse_bool, parse_number};

/// Enables the subsystem (`true`/`false`). Required.
pub const ENV_DEV: &str = "SLOGX_DEV";
/// Listener port.
pub const ENV_PORT: &str = "SLOGX_PORT";
/// Service name reported in entries.
pub const ENV_SERVICE: &str = "SLOGX_SERVICE";
/// Listener bind address.
pub const ENV_BIND_ADDR: &str = "SLOGX_BIND_ADDR";
/// Per-session queue bound.
pub const ENV_QUEUE_CAPACITY: &str = "SLOGX_QUEUE_CAPACITY";
/// Largest array frame.
pub const ENV_MAX_BATCH: &str = "SLOGX_MAX_BATCH";

impl Config {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnv`] when `SLOGX_DEV` is unset and
    /// [`ConfigError::InvalidField`] when a variable cannot be parsed or the
    /// result fails validation.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`Config::from_env`].
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_dev = lookup(ENV_DEV).ok_or(ConfigError::MissingEnv { name: ENV_DEV })?;
        let mut config = Self::new(parse_bool("is_dev", &raw_dev)?);

        if let Some(port) = lookup(ENV_PORT) {
            config.port = parse_number("port", &port)?;
        }
        if let Some(service) = lookup(ENV_SERVICE) {
            config.service_name = service;
        }
        if let Some(addr) = lookup(ENV_BIND_ADDR) {
            config.bind_addr = parse_bind_addr(&addr)?;
        }
        if let Some(capacity) = lookup(ENV_QUEUE_CAPACITY) {
            config.session_queue_capacity = parse_number("session_queue_capacity", &capacity)?;
        }
        if let Some(batch) = lookup(ENV_MAX_BATCH) {
            config.max_batch = parse_number("max_batch", &batch)?;
        }

        config.validate()?;
        Ok(config)
    }
}
