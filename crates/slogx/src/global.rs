//! Process-wide logger used by the logging macros.

use std::sync::OnceLock;

use slogx_config::Config;
use slogx_entry::{Arg, LogLevel};
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{SlogxError, SlogxResult};
use crate::logger::Logger;

static LOGGER: OnceLock<Logger> = OnceLock::new();
static INIT_LOCK: Mutex<()> = Mutex::const_new(());

/// Install the process-wide logger described by `config`.
///
/// A disabled configuration (`is_dev == false`) is accepted and does nothing:
/// no port is bound and every logging call stays a no-op. The server task runs
/// on the current Tokio runtime.
///
/// # Errors
///
/// Returns [`SlogxError::Config`] for an invalid configuration,
/// [`SlogxError::AlreadyInitialized`] if a logger is already installed and
/// [`SlogxError::Transport`] when the port cannot be bound.
pub async fn init(config: Config) -> SlogxResult<()> {
    if !config.is_dev {
        debug!("slogx disabled; skipping log server");
        return Ok(());
    }
    config.validate()?;

    let _guard = INIT_LOCK.lock().await;
    if LOGGER.get().is_some() {
        return Err(SlogxError::AlreadyInitialized);
    }
    if let Some(logger) = Logger::start(&config).await? {
        LOGGER
            .set(logger)
            .map_err(|_| SlogxError::AlreadyInitialized)?;
    }
    Ok(())
}

/// The installed logger, if any.
#[must_use]
pub fn global() -> Option<&'static Logger> {
    LOGGER.get()
}

/// Whether [`init`] has installed a logger.
#[must_use]
pub fn is_initialized() -> bool {
    LOGGER.get().is_some()
}

/// Viewers connected to the installed logger; zero when not initialized.
#[must_use]
pub fn session_count() -> usize {
    global().map_or(0, Logger::session_count)
}

/// Service name of the installed logger.
#[must_use]
pub fn service_name() -> Option<&'static str> {
    global().map(Logger::service_name)
}

/// Publish through the installed logger; a no-op when there is none.
#[track_caller]
pub fn log(level: LogLevel, args: Vec<Arg>) {
    if let Some(logger) = global() {
        logger.log(level, args);
    }
}

#[doc(hidden)]
#[track_caller]
pub fn log_from<F>(level: LogLevel, module_path: &'static str, args: F)
where
    F: FnOnce() -> Vec<Arg>,
{
    if let Some(logger) = global() {
        logger.log_from(level, module_path, args);
    }
}
