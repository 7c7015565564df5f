//! Minimal viewer client speaking the log stream protocol.

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use futures_util::StreamExt;
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

/// WebSocket client that decodes entry frames the way the browser viewer does.
pub struct ViewerClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    pending: VecDeque<Value>,
}

impl ViewerClient {
    /// Connect to a log server at `addr`.
    ///
    /// # Errors
    ///
    /// Returns an error if the TCP connection or the upgrade handshake fails.
    pub async fn connect(addr: SocketAddr) -> Result<Self> {
        let url = format!("ws://{addr}/");
        let (stream, _response) = connect_async(url.as_str())
            .await
            .with_context(|| format!("failed to connect viewer to {url}"))?;
        Ok(Self {
            stream,
            pending: VecDeque::new(),
        })
    }

    /// Entries carried by the next text frame; a frame holds one object or an
    /// array of objects.
    ///
    /// # Errors
    ///
    /// Returns an error on timeout, on a closed stream, or on invalid JSON.
    pub async fn next_entries(&mut self, wait: Duration) -> Result<Vec<Value>> {
        if !self.pending.is_empty() {
            return Ok(self.pending.drain(..).collect());
        }
        loop {
            let message = timeout(wait, self.stream.next())
                .await
                .context("timed out waiting for a log frame")?
                .ok_or_else(|| anyhow!("log stream closed"))?
                .context("log stream failed")?;
            match message {
                Message::Text(text) => {
                    let value: Value =
                        serde_json::from_str(&text).context("frame is not valid JSON")?;
                    return Ok(match value {
                        Value::Array(entries) => entries,
                        entry => vec![entry],
                    });
                }
                Message::Close(_) => bail!("log stream closed"),
                _ => {}
            }
        }
    }

    /// Next single entry, splitting batched frames.
    ///
    /// # Errors
    ///
    /// Same as [`ViewerClient::next_entries`].
    pub async fn next_entry(&mut self, wait: Duration) -> Result<Value> {
        loop {
            if let Some(entry) = self.pending.pop_front() {
                return Ok(entry);
            }
            let entries = self.next_entries(wait).await?;
            self.pending.extend(entries);
        }
    }

    /// Whether no frame arrives within `wait`.
    pub async fn is_silent(&mut self, wait: Duration) -> bool {
        self.pending.is_empty() && timeout(wait, self.stream.next()).await.is_err()
    }

    /// Send a close frame and wait for the server to finish the handshake.
    ///
    /// # Errors
    ///
    /// Returns an error if the close frame cannot be sent.
    pub async fn close(mut self) -> Result<()> {
        self.stream
            .close(None)
            .await
            .context("failed to close viewer")?;
        while let Some(Ok(_)) = self.stream.next().await {}
        Ok(())
    }
}
