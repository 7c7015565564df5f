//! Typed configuration consumed by the transport and the facade.

use std::net::{IpAddr, SocketAddr};

use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::error::ConfigResult;
use crate::validate::validate_config;

/// Settings for the log streaming subsystem.
///
/// When `is_dev` is false the subsystem stays inert: no listener is bound and
/// logging calls return immediately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Enables the subsystem. Required.
    pub is_dev: bool,
    /// Port the WebSocket listener binds to.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Logical service name reported in every entry.
    #[serde(default = "default_service_name")]
    pub service_name: String,
    /// Address the listener binds to.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: IpAddr,
    /// Entries buffered per viewer session before frames are dropped.
    #[serde(default = "default_session_queue_capacity")]
    pub session_queue_capacity: usize,
    /// Largest number of entries coalesced into one array frame.
    #[serde(default = "default_max_batch")]
    pub max_batch: usize,
}

const fn default_port() -> u16 {
    defaults::PORT
}

fn default_service_name() -> String {
    defaults::SERVICE_NAME.to_string()
}

const fn default_bind_addr() -> IpAddr {
    defaults::BIND_ADDR
}

const fn default_session_queue_capacity() -> usize {
    defaults::SESSION_QUEUE_CAPACITY
}

const fn default_max_batch() -> usize {
    defaults::MAX_BATCH
}

impl Config {
    /// Configuration with every optional field at its default.
    #[must_use]
    pub fn new(is_dev: bool) -> Self {
        Self {
            is_dev,
            port: default_port(),
            service_name: default_service_name(),
            bind_addr: default_bind_addr(),
            session_queue_capacity: default_session_queue_capacity(),
            max_batch: default_max_batch(),
        }
    }

    /// Override the listener port.
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Override the service name.
    #[must_use]
    pub fn with_service_name(mut self, service_name: impl Into<String>) -> Self {
        self.service_name = service_name.into();
        self
    }

    /// Override the bind address.
    #[must_use]
    pub const fn with_bind_addr(mut self, bind_addr: IpAddr) -> Self {
        self.bind_addr = bind_addr;
        self
    }

    /// Override the per-session queue bound.
    #[must_use]
    pub const fn with_session_queue_capacity(mut self, capacity: usize) -> Self {
        self.session_queue_capacity = capacity;
        self
    }

    /// Override the largest batch frame.
    #[must_use]
    pub const fn with_max_batch(mut self, max_batch: usize) -> Self {
        self.max_batch = max_batch;
        self
    }

    /// Socket address the listener binds to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }

    /// Check every field.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ConfigError::InvalidField`] naming the first field that
    /// fails validation.
    pub fn validate(&self) -> ConfigResult<()> {
        validate_config(self)
    }
}
