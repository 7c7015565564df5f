//! Bridge from the host's `tracing` events to connected viewers.
//!
//! # Design
//! - Each event becomes one entry: the message first, then an object holding
//!   the remaining fields when there are any.
//! - `TRACE` maps to `DEBUG`; the viewer knows four levels.
//! - Events from slogx's own crates and from the WebSocket stack under the
//!   transport are ignored, as is anything emitted while a frame is being
//!   delivered, so transport activity never feeds back into the stream.
//! - Provenance comes from the event metadata rather than a backtrace.

use std::fmt;
use std::path::Path;

use serde_json::{Map, Value};
use slogx_entry::{Arg, CallSite, EntryContext, LogEntry, LogLevel};
use slogx_transport::{Broadcaster, quiet};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

use crate::global::global;
use crate::logger::Logger;

const MESSAGE_FIELD: &str = "message";
/// Crates whose events describe the transport itself.
const TRANSPORT_TARGETS: &[&str] = &[
    "tungstenite",
    "tokio_tungstenite",
    "axum",
    "hyper",
    "hyper_util",
    "tower_http",
];

enum Target {
    Global,
    Logger {
        broadcaster: Broadcaster,
        context: EntryContext,
    },
}

/// `tracing_subscriber` layer forwarding events to the log viewer.
pub struct SlogxLayer {
    target: Target,
}

impl SlogxLayer {
    /// Layer that publishes through the process-wide logger once it exists.
    #[must_use]
    pub const fn global() -> Self {
        Self {
            target: Target::Global,
        }
    }

    #[allow(clippy::redundant_pub_crate)]
    pub(crate) fn for_logger(logger: &Logger) -> Self {
        Self {
            target: Target::Logger {
                broadcaster: logger.broadcaster().clone(),
                context: logger.context().clone(),
            },
        }
    }

    fn publish(&self, event: &Event<'_>) {
        match &self.target {
            Target::Global => {
                if let Some(logger) = global() {
                    publish_event(logger.broadcaster(), logger.context(), event);
                }
            }
            Target::Logger {
                broadcaster,
                context,
            } => publish_event(broadcaster, context, event),
        }
    }
}

impl Default for SlogxLayer {
    fn default() -> Self {
        Self::global()
    }
}

impl fmt::Debug for SlogxLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let target = match self.target {
            Target::Global => "global",
            Target::Logger { .. } => "logger",
        };
        f.debug_struct("SlogxLayer").field("target", &target).finish()
    }
}

impl<S: Subscriber> Layer<S> for SlogxLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if quiet::is_active() || is_ignored_target(event.metadata().target()) {
            return;
        }
        self.publish(event);
    }
}

fn publish_event(broadcaster: &Broadcaster, context: &EntryContext, event: &Event<'_>) {
    if !broadcaster.has_sessions() {
        return;
    }
    let metadata = event.metadata();
    let mut fields = FieldCollector::default();
    event.record(&mut fields);

    let mut args = vec![Arg::from(fields.message.unwrap_or_default())];
    if !fields.values.is_empty() {
        args.push(Arg::Value(Value::Object(fields.values)));
    }
    let site = CallSite {
        file: metadata
            .file()
            .and_then(|file| Path::new(file).file_name())
            .map(|name| name.to_string_lossy().into_owned()),
        line: metadata.line(),
        func: metadata.module_path().map(str::to_string),
        stack: None,
    };
    let entry = LogEntry::build(level_of(*metadata.level()), args, context, site);
    broadcaster.broadcast(&entry);
}

fn is_ignored_target(target: &str) -> bool {
    let own = target
        .strip_prefix("slogx")
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('_') || rest.starts_with("::"));
    own || TRANSPORT_TARGETS.iter().any(|krate| {
        target
            .strip_prefix(krate)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
    })
}

fn level_of(level: Level) -> LogLevel {
    match level {
        Level::ERROR => LogLevel::Error,
        Level::WARN => LogLevel::Warn,
        Level::INFO => LogLevel::Info,
        _ => LogLevel::Debug,
    }
}

#[derive(Default)]
struct FieldCollector {
    message: Option<String>,
    values: Map<String, Value>,
}

impl FieldCollector {
    fn insert(&mut self, field: &Field, value: Value) {
        if field.name() == MESSAGE_FIELD {
            self.message = Some(match value {
                Value::String(text) => text,
                other => other.to_string(),
            });
        } else {
            self.values.insert(field.name().to_string(), value);
        }
    }
}

impl Visit for FieldCollector {
    fn record_f64(&mut self, field: &Field, value: f64) {
        self.insert(field, slogx_inspect::inspect(&value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, Value::Bool(value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.insert(field, Value::String(value.to_string()));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.insert(field, slogx_inspect::error_value(value, "Error"));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.insert(field, Value::String(format!("{value:?}")));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn own_targets_are_recognised() {
        assert!(is_ignored_target("slogx"));
        assert!(is_ignored_target("slogx_transport::session"));
        assert!(is_ignored_target("slogx::logger"));
        assert!(!is_ignored_target("slogxtra"));
        assert!(!is_ignored_target("shop::checkout"));
    }

    #[test]
    fn websocket_stack_targets_are_ignored() {
        assert!(is_ignored_target("tungstenite::protocol"));
        assert!(is_ignored_target("tokio_tungstenite"));
        assert!(is_ignored_target("hyper::proto::h1::io"));
        assert!(is_ignored_target("hyper_util::server"));
        assert!(is_ignored_target("tower_http::trace::on_request"));
        assert!(is_ignored_target("axum::serve"));
        assert!(!is_ignored_target("axum_helpers"));
        assert!(!is_ignored_target("hyperdrive::engine"));
    }

    #[test]
    fn trace_folds_into_debug() {
        assert_eq!(level_of(Level::TRACE), LogLevel::Debug);
        assert_eq!(level_of(Level::DEBUG), LogLevel::Debug);
        assert_eq!(level_of(Level::WARN), LogLevel::Warn);
        assert_eq!(level_of(Level::ERROR), LogLevel::Error);
    }
}
