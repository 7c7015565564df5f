use std::error::Error;

use serde_json::Value;
use slogx_inspect::{Inspect, error_type_name};

/// One argument of a logging call, already converted.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    /// Any non-error value.
    Value(Value),
    /// An error, rendered as a record with its own stack.
    Error(CaughtError),
}

impl Arg {
    /// Convert an inspectable value.
    #[must_use]
    pub fn inspect<T: Inspect + ?Sized>(value: &T) -> Self {
        Self::Value(slogx_inspect::inspect(value))
    }

    /// Capture an error argument.
    #[must_use]
    pub fn error<E: Error + ?Sized>(err: &E) -> Self {
        Self::Error(CaughtError::new(err))
    }
}

impl From<Value> for Arg {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Self::Value(Value::String(value.to_string()))
    }
}

impl From<String> for Arg {
    fn from(value: String) -> Self {
        Self::Value(Value::String(value))
    }
}

impl From<CaughtError> for Arg {
    fn from(err: CaughtError) -> Self {
        Self::Error(err)
    }
}

/// Snapshot of an error taken at the logging call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaughtError {
    /// Type name of the error, `Error` for trait objects.
    pub name: String,
    /// `Display` text of the error.
    pub message: String,
    /// `Display` text of each `source()` in order.
    pub causes: Vec<String>,
    /// Backtrace captured by the error itself.
    pub backtrace: Option<String>,
}

impl CaughtError {
    /// Snapshot a concrete error, borrowed for any lifetime.
    #[must_use]
    pub fn new<E: Error + ?Sized>(err: &E) -> Self {
        Self::snapshot(err.to_string(), err.source(), error_type_name::<E>(), None)
    }

    /// Snapshot a type-erased error under `name`.
    #[must_use]
    pub fn from_dyn(err: &dyn Error, name: impl Into<String>, backtrace: Option<String>) -> Self {
        Self::snapshot(err.to_string(), err.source(), name.into(), backtrace)
    }

    fn snapshot(
        message: String,
        first_cause: Option<&(dyn Error + 'static)>,
        name: String,
        backtrace: Option<String>,
    ) -> Self {
        let mut causes = Vec::new();
        let mut source = first_cause;
        while let Some(cause) = source {
            causes.push(cause.to_string());
            source = cause.source();
        }
        Self {
            name,
            message,
            causes,
            backtrace,
        }
    }

    /// Snapshot a value whose `Inspect` impl exposes an error view.
    #[must_use]
    pub fn from_inspect<T: Inspect + ?Sized>(value: &T) -> Option<Self> {
        value
            .as_error()
            .map(|err| Self::from_dyn(err, error_type_name::<T>(), value.error_backtrace()))
    }
}
