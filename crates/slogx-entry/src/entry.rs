//! Canonical log record and its builder.
//!
//! # Design
//! - Building never fails; every argument is already a JSON value or a caught
//!   error by the time it arrives here.
//! - An error argument replaces the entry stacktrace with its own stack. With
//!   several error arguments the last one wins.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::arg::{Arg, CaughtError};
use crate::caller::CallSite;
use crate::clock::{format_timestamp, next_timestamp};
use crate::level::LogLevel;

/// Origin runtime reported when no other value is configured.
const DEFAULT_LANG: &str = "rust";

/// Process-wide values stamped onto every entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryContext {
    /// Logical service name.
    pub service: Arc<str>,
    /// Origin runtime identifier.
    pub lang: &'static str,
}

impl EntryContext {
    /// Context for `service` with the default language tag.
    #[must_use]
    pub fn new(service: impl Into<Arc<str>>) -> Self {
        Self {
            service: service.into(),
            lang: DEFAULT_LANG,
        }
    }
}

/// Provenance recorded with each entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Basename of the caller's source file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Line of the call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    /// Enclosing function of the call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub func: Option<String>,
    /// Origin runtime identifier.
    pub lang: String,
    /// Logical service name.
    pub service: String,
}

/// Error argument as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// Error type name.
    pub name: String,
    /// Error message.
    pub message: String,
    /// Stack of the error; absent on causes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    /// Next error in the source chain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<Box<ErrorRecord>>,
}

impl ErrorRecord {
    fn from_caught(caught: CaughtError, site_stack: Option<&str>) -> Self {
        let CaughtError {
            name,
            message,
            causes,
            backtrace,
        } = caught;
        let stack = backtrace.unwrap_or_else(|| match site_stack {
            Some(site) => format!("{name}: {message}\n{site}"),
            None => format!("{name}: {message}"),
        });
        let cause = causes.into_iter().rev().fold(None, |inner, message| {
            Some(Box::new(Self {
                name: "Error".to_string(),
                message,
                stack: None,
                cause: inner,
            }))
        });
        Self {
            name,
            message,
            stack: Some(stack),
            cause,
        }
    }
}

/// One log record, as sent to viewers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Unique identifier within the process.
    pub id: String,
    /// RFC 3339 UTC timestamp with microseconds.
    pub timestamp: String,
    /// Severity.
    pub level: LogLevel,
    /// Converted call arguments in call order.
    pub args: Vec<Value>,
    /// Call-site stack, or the stack of the last error argument.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stacktrace: Option<String>,
    /// Provenance.
    pub metadata: Metadata,
}

impl LogEntry {
    /// Assemble an entry from converted arguments and a captured call site.
    #[must_use]
    pub fn build(level: LogLevel, args: Vec<Arg>, context: &EntryContext, site: CallSite) -> Self {
        let CallSite {
            file,
            line,
            func,
            stack,
        } = site;

        let mut stacktrace = stack.clone();
        let args = args
            .into_iter()
            .map(|arg| match arg {
                Arg::Value(value) => value,
                Arg::Error(caught) => {
                    let record = ErrorRecord::from_caught(caught, stack.as_deref());
                    stacktrace.clone_from(&record.stack);
                    serde_json::to_value(&record).unwrap_or_else(|_| {
                        Value::String(format!("{}: {}", record.name, record.message))
                    })
                }
            })
            .collect();

        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: format_timestamp(&next_timestamp()),
            level,
            args,
            stacktrace,
            metadata: Metadata {
                file,
                line,
                func,
                lang: context.lang.to_string(),
                service: context.service.to_string(),
            },
        }
    }

    /// Wire encoding of the entry.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if encoding fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;
    use serde_json::json;

    fn site() -> CallSite {
        CallSite {
            file: Some("checkout.rs".to_string()),
            line: Some(42),
            func: Some("shop::checkout::pay".to_string()),
            stack: Some("at shop::checkout::pay (/home/dev/shop/src/checkout.rs:42)".to_string()),
        }
    }

    #[test]
    fn plain_arguments_pass_through_with_call_site_stack() {
        let context = EntryContext::new("billing");
        let entry = LogEntry::build(
            LogLevel::Info,
            vec![Arg::from("started"), Arg::from(json!({"port": 8080}))],
            &context,
            site(),
        );
        assert_eq!(entry.args, vec![json!("started"), json!({"port": 8080})]);
        assert_eq!(entry.stacktrace, site().stack);
        assert_eq!(entry.metadata.file.as_deref(), Some("checkout.rs"));
        assert_eq!(entry.metadata.line, Some(42));
        assert_eq!(entry.metadata.lang, "rust");
        assert_eq!(entry.metadata.service, "billing");
        assert!(Uuid::parse_str(&entry.id).is_ok());
        assert!(entry.timestamp.ends_with('Z'));
    }

    #[test]
    fn error_argument_replaces_stacktrace() {
        let err = io::Error::other("boom");
        let entry = LogEntry::build(
            LogLevel::Error,
            vec![Arg::from("failed"), Arg::error(&err)],
            &EntryContext::new("svc"),
            site(),
        );
        let record = &entry.args[1];
        assert_eq!(entry.args[0], json!("failed"));
        assert_eq!(record["name"], json!("Error"));
        assert_eq!(record["message"], json!("boom"));
        let stack = record["stack"].as_str().expect("stack is a string");
        assert!(stack.starts_with("Error: boom\nat shop::checkout::pay"));
        assert_eq!(entry.stacktrace.as_deref(), Some(stack));
    }

    #[test]
    fn last_error_argument_wins() {
        let first = io::Error::other("first");
        let second = io::Error::other("second");
        let entry = LogEntry::build(
            LogLevel::Error,
            vec![Arg::error(&first), Arg::error(&second)],
            &EntryContext::new("svc"),
            CallSite::default(),
        );
        assert_eq!(entry.stacktrace.as_deref(), Some("Error: second"));
    }

    #[test]
    fn own_backtrace_and_cause_chain_are_kept() {
        let caught = CaughtError {
            name: "Error".to_string(),
            message: "outer".to_string(),
            causes: vec!["middle".to_string(), "root".to_string()],
            backtrace: Some("0: app::main".to_string()),
        };
        let entry = LogEntry::build(
            LogLevel::Error,
            vec![Arg::Error(caught)],
            &EntryContext::new("svc"),
            site(),
        );
        assert_eq!(entry.stacktrace.as_deref(), Some("0: app::main"));
        assert_eq!(
            entry.args[0]["cause"],
            json!({"name": "Error", "message": "middle", "cause": {"name": "Error", "message": "root"}})
        );
    }

    #[test]
    fn empty_arguments_and_unknown_site_serialize_cleanly() {
        let entry = LogEntry::build(
            LogLevel::Debug,
            Vec::new(),
            &EntryContext::new("svc"),
            CallSite::default(),
        );
        let wire: Value =
            serde_json::from_str(&entry.to_json().expect("entry encodes")).expect("valid json");
        assert_eq!(wire["args"], json!([]));
        assert_eq!(wire["level"], json!("DEBUG"));
        assert!(wire.get("stacktrace").is_none());
        assert_eq!(wire["metadata"], json!({"lang": "rust", "service": "svc"}));
    }
}
