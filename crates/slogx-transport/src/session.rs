//! Per-viewer tasks: a reader that watches for close and a writer that drains
//! the session queue.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc::Receiver;
use tracing::debug;

use crate::quiet;
use crate::registry::{SessionId, SessionRegistry};

/// Drive one upgraded connection until either side closes it.
///
/// Callers run this inside `quiet::scope`; the writer task sets its own.
#[allow(clippy::redundant_pub_crate)]
pub(crate) async fn run(
    socket: WebSocket,
    peer: SocketAddr,
    registry: Arc<SessionRegistry>,
    max_batch: usize,
) {
    let (id, queue) = registry.open(peer);
    let (sink, stream) = socket.split();
    let mut writer = tokio::spawn(quiet::scope(write_frames(
        sink,
        queue,
        Arc::clone(&registry),
        id,
        max_batch,
    )));

    let finished = tokio::select! {
        () = read_until_closed(stream, id) => None,
        result = &mut writer => Some(result),
    };
    registry.close(id);
    let result = match finished {
        Some(result) => result,
        None => writer.await,
    };
    if let Err(error) = result {
        debug!(session = id, %error, "viewer writer task ended abnormally");
    }
}

async fn read_until_closed(mut stream: SplitStream<WebSocket>, id: SessionId) {
    while let Some(message) = stream.next().await {
        match message {
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(error) => {
                debug!(session = id, %error, "viewer read failed");
                break;
            }
        }
    }
}

/// Owns the sink, so the socket is closed once, here.
async fn write_frames(
    mut sink: SplitSink<WebSocket, Message>,
    mut queue: Receiver<Arc<str>>,
    registry: Arc<SessionRegistry>,
    id: SessionId,
    max_batch: usize,
) {
    let limit = max_batch.max(1);
    let mut batch = Vec::with_capacity(limit);
    while queue.recv_many(&mut batch, limit).await > 0 {
        let frame = encode_frame(&batch);
        batch.clear();
        if let Err(error) = sink.send(Message::Text(frame.into())).await {
            debug!(session = id, %error, "viewer write failed");
            registry.close(id);
            break;
        }
        registry.metrics().inc_frames_sent();
    }
    let _ = sink.close().await;
}

/// One payload goes out as is; several become a JSON array.
#[allow(clippy::redundant_pub_crate)]
pub(crate) fn encode_frame(batch: &[Arc<str>]) -> String {
    if let [single] = batch {
        return single.to_string();
    }
    let capacity = batch.iter().map(|payload| payload.len() + 1).sum::<usize>() + 2;
    let mut frame = String::with_capacity(capacity);
    frame.push('[');
    for (index, payload) in batch.iter().enumerate() {
        if index > 0 {
            frame.push(',');
        }
        frame.push_str(payload);
    }
    frame.push(']');
    frame
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_payload_is_sent_unwrapped() {
        let batch = vec![Arc::from(r#"{"id":"a"}"#)];
        assert_eq!(encode_frame(&batch), r#"{"id":"a"}"#);
    }

    #[test]
    fn several_payloads_form_an_array() {
        let batch: Vec<Arc<str>> = vec![Arc::from(r#"{"id":"a"}"#), Arc::from(r#"{"id":"b"}"#)];
        let frame = encode_frame(&batch);
        assert_eq!(frame, r#"[{"id":"a"},{"id":"b"}]"#);
        let parsed: serde_json::Value = serde_json::from_str(&frame).expect("valid json");
        assert_eq!(parsed.as_array().map(Vec::len), Some(2));
    }
}
