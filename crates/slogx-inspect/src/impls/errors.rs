use std::backtrace::BacktraceStatus;
use std::error::Error;
use std::io;

use serde_json::{Map, Value};

use crate::inspector::{Inspect, Inspector};
use crate::placeholder::error_type_name;

/// `{"name", "message", "cause"?}` record for an error and its source chain.
///
/// Sources are type-erased, so every link below the top reports `Error`.
#[must_use]
pub fn error_value(err: &(dyn Error + 'static), name: &str) -> Value {
    let mut record = Map::new();
    record.insert("name".to_string(), Value::String(name.to_string()));
    record.insert("message".to_string(), Value::String(err.to_string()));
    if let Some(source) = err.source() {
        record.insert("cause".to_string(), error_value(source, "Error"));
    }
    Value::Object(record)
}

impl Inspect for dyn Error + 'static {
    fn inspect(&self, _inspector: &mut Inspector) -> Value {
        error_value(self, "Error")
    }

    fn as_error(&self) -> Option<&(dyn Error + 'static)> {
        Some(self)
    }
}

impl Inspect for dyn Error + Send + Sync + 'static {
    fn inspect(&self, _inspector: &mut Inspector) -> Value {
        error_value(self, "Error")
    }

    fn as_error(&self) -> Option<&(dyn Error + 'static)> {
        Some(self)
    }
}

macro_rules! inspect_std_error {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Inspect for $ty {
                fn inspect(&self, _inspector: &mut Inspector) -> Value {
                    error_value(self, &error_type_name::<Self>())
                }

                fn as_error(&self) -> Option<&(dyn Error + 'static)> {
                    Some(self)
                }
            }
        )*
    };
}

inspect_std_error!(
    io::Error,
    std::fmt::Error,
    std::num::ParseIntError,
    std::num::ParseFloatError,
    std::str::Utf8Error,
    std::string::FromUtf8Error,
    std::net::AddrParseError,
    serde_json::Error,
);

impl Inspect for anyhow::Error {
    fn inspect(&self, _inspector: &mut Inspector) -> Value {
        error_value(&**self, "Error")
    }

    fn as_error(&self) -> Option<&(dyn Error + 'static)> {
        let err: &(dyn Error + 'static) = &**self;
        Some(err)
    }

    fn error_backtrace(&self) -> Option<String> {
        let backtrace = self.backtrace();
        (backtrace.status() == BacktraceStatus::Captured).then(|| backtrace.to_string())
    }
}
