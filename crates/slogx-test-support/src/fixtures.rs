//! Test fixtures and environment helpers.

use std::net::{Ipv4Addr, TcpListener};
use std::sync::Once;
use std::time::Duration;

use anyhow::{Context, Result};
use slogx_telemetry::{LogFormat, LoggingConfig, init_logging};
use tokio::time::{Instant, sleep};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

static LOGGING: Once = Once::new();

/// Reserve an unused loopback port.
///
/// The port is released before returning, so a concurrent process could take
/// it; good enough for tests that bind immediately.
///
/// # Errors
///
/// Returns an error if no ephemeral port can be bound.
pub fn free_port() -> Result<u16> {
    let listener =
        TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).context("failed to reserve a local port")?;
    let port = listener
        .local_addr()
        .context("failed to read reserved port")?
        .port();
    Ok(port)
}

/// Poll `condition` until it holds or `timeout` elapses.
pub async fn wait_for<F>(timeout: Duration, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = Instant::now() + timeout;
    loop {
        if condition() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        sleep(POLL_INTERVAL).await;
    }
}

/// Install a compact subscriber once per test binary; `RUST_LOG` overrides.
pub fn init_test_logging() {
    LOGGING.call_once(|| {
        let config = LoggingConfig {
            level: "warn",
            format: LogFormat::Pretty,
        };
        let _ = init_logging(&config);
    });
}
