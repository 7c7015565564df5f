//! Logger instances: one server, one service identity.
//!
//! # Design
//! - A logger exists only when the subsystem is enabled; [`Logger::start`]
//!   returns `None` for a disabled configuration without binding anything.
//! - Logging is synchronous and never waits on a viewer. With no viewer
//!   connected the call returns before capturing the stack or converting
//!   arguments.

use std::net::SocketAddr;
use std::panic::Location;
use std::path::Path;

use slogx_config::Config;
use slogx_entry::{Arg, CallSite, EntryContext, LogEntry, LogLevel, SourceIdentity};
use slogx_telemetry::MetricsSnapshot;
use slogx_transport::{Broadcaster, LogServer, ServerHandle};
use tracing::info;

use crate::error::SlogxResult;
use crate::layer::SlogxLayer;

/// Handle to a running log server.
#[derive(Debug)]
pub struct Logger {
    context: EntryContext,
    identity: SourceIdentity,
    server: ServerHandle,
}

impl Logger {
    /// Validate `config`, bind its port and start accepting viewers.
    ///
    /// Returns `Ok(None)` when `config.is_dev` is false.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SlogxError::Config`] for an invalid configuration and
    /// [`crate::SlogxError::Transport`] when the port cannot be bound.
    pub async fn start(config: &Config) -> SlogxResult<Option<Self>> {
        if !config.is_dev {
            return Ok(None);
        }
        config.validate()?;
        let server = LogServer::bind(config).await?.spawn();
        info!(
            service = %config.service_name,
            addr = %server.local_addr(),
            "slogx viewer stream ready"
        );
        Ok(Some(Self {
            context: EntryContext::new(config.service_name.as_str()),
            identity: library_identity(),
            server,
        }))
    }

    /// Publish an entry built from already converted arguments.
    #[track_caller]
    pub fn log(&self, level: LogLevel, args: Vec<Arg>) {
        self.emit(level, None, Location::caller(), || args);
    }

    /// Publish an entry, converting arguments only if a viewer is connected.
    #[track_caller]
    pub fn log_with<F>(&self, level: LogLevel, args: F)
    where
        F: FnOnce() -> Vec<Arg>,
    {
        self.emit(level, None, Location::caller(), args);
    }

    #[doc(hidden)]
    #[track_caller]
    pub fn log_from<F>(&self, level: LogLevel, module_path: &'static str, args: F)
    where
        F: FnOnce() -> Vec<Arg>,
    {
        self.emit(level, Some(module_path), Location::caller(), args);
    }

    /// Publish at `DEBUG`.
    #[track_caller]
    pub fn debug(&self, args: Vec<Arg>) {
        self.log(LogLevel::Debug, args);
    }

    /// Publish at `INFO`.
    #[track_caller]
    pub fn info(&self, args: Vec<Arg>) {
        self.log(LogLevel::Info, args);
    }

    /// Publish at `WARN`.
    #[track_caller]
    pub fn warn(&self, args: Vec<Arg>) {
        self.log(LogLevel::Warn, args);
    }

    /// Publish at `ERROR`.
    #[track_caller]
    pub fn error(&self, args: Vec<Arg>) {
        self.log(LogLevel::Error, args);
    }

    /// Build an entry as it would be published, without sending it.
    #[must_use]
    #[track_caller]
    pub fn build_entry(&self, level: LogLevel, args: Vec<Arg>) -> LogEntry {
        let site = self.call_site(None, Location::caller());
        LogEntry::build(level, args, &self.context, site)
    }

    /// Connected viewers.
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.server.broadcaster().session_count()
    }

    /// Address viewers connect to.
    #[must_use]
    pub const fn local_addr(&self) -> SocketAddr {
        self.server.local_addr()
    }

    /// Transport counters for this logger's server.
    #[must_use]
    pub fn metrics(&self) -> MetricsSnapshot {
        self.server.broadcaster().metrics().snapshot()
    }

    /// Service name stamped on every entry.
    #[must_use]
    pub fn service_name(&self) -> &str {
        &self.context.service
    }

    /// Tracing layer that forwards host events through this logger.
    #[must_use]
    pub fn layer(&self) -> SlogxLayer {
        SlogxLayer::for_logger(self)
    }

    #[allow(clippy::redundant_pub_crate)]
    pub(crate) const fn broadcaster(&self) -> &Broadcaster {
        self.server.broadcaster()
    }

    #[allow(clippy::redundant_pub_crate)]
    pub(crate) const fn context(&self) -> &EntryContext {
        &self.context
    }

    fn emit<F>(
        &self,
        level: LogLevel,
        module_path: Option<&'static str>,
        location: &'static Location<'static>,
        args: F,
    ) where
        F: FnOnce() -> Vec<Arg>,
    {
        let broadcaster = self.server.broadcaster();
        if !broadcaster.has_sessions() {
            return;
        }
        let site = self.call_site(module_path, location);
        let entry = LogEntry::build(level, args(), &self.context, site);
        broadcaster.broadcast(&entry);
    }

    /// Backtrace walk first; the caller location fills what debug info lacks.
    fn call_site(
        &self,
        module_path: Option<&'static str>,
        location: &'static Location<'static>,
    ) -> CallSite {
        let mut site = CallSite::capture(&self.identity);
        if site.file.is_none() {
            site.file = Path::new(location.file())
                .file_name()
                .map(|name| name.to_string_lossy().into_owned());
            site.line = Some(location.line());
        }
        if site.func.is_none() {
            site.func = module_path.map(str::to_string);
        }
        site
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.server.abort();
    }
}

fn library_identity() -> SourceIdentity {
    SourceIdentity::new(vec![slogx_entry::library_root(), slogx_entry::source_root!()])
}
