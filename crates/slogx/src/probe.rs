//! Compile-time classification of logging arguments.
//!
//! The logging macros wrap each argument in [`Probe`] and call `slogx_arg`
//! through five levels of references. Method resolution picks the first trait
//! whose bound holds, in this order: `Error`, `Inspect`, `Serialize`, `Debug`,
//! then an opaque placeholder.

use std::error::Error;
use std::fmt::Debug;

use serde::Serialize;
use serde_json::Value;
use slogx_entry::{Arg, CaughtError};
use slogx_inspect::{Inspect, from_serialize, placeholder, short_type_name};

/// Borrowed argument awaiting classification.
pub struct Probe<'a, T: ?Sized>(pub &'a T);

/// Errors become error records.
pub trait ViaError {
    /// Convert the probed value.
    fn slogx_arg(&self) -> Arg;
}

impl<T: Error + ?Sized> ViaError for &&&&Probe<'_, T> {
    fn slogx_arg(&self) -> Arg {
        Arg::error(self.0)
    }
}

/// Inspectable values, or error records for error-like ones.
pub trait ViaInspect {
    /// Convert the probed value.
    fn slogx_arg(&self) -> Arg;
}

impl<T: Inspect + ?Sized> ViaInspect for &&&Probe<'_, T> {
    fn slogx_arg(&self) -> Arg {
        CaughtError::from_inspect(self.0).map_or_else(|| Arg::inspect(self.0), Arg::Error)
    }
}

/// Serializable values through `serde_json`.
pub trait ViaSerialize {
    /// Convert the probed value.
    fn slogx_arg(&self) -> Arg;
}

impl<T: Serialize + ?Sized> ViaSerialize for &&Probe<'_, T> {
    fn slogx_arg(&self) -> Arg {
        Arg::Value(from_serialize(self.0))
    }
}

/// `Debug` text.
pub trait ViaDebug {
    /// Convert the probed value.
    fn slogx_arg(&self) -> Arg;
}

impl<T: Debug + ?Sized> ViaDebug for &Probe<'_, T> {
    fn slogx_arg(&self) -> Arg {
        Arg::Value(Value::String(format!("{:?}", self.0)))
    }
}

/// Everything else.
pub trait ViaOpaque {
    /// Convert the probed value.
    fn slogx_arg(&self) -> Arg;
}

impl<T: ?Sized> ViaOpaque for Probe<'_, T> {
    fn slogx_arg(&self) -> Arg {
        let name = short_type_name::<T>();
        if name.contains("{{closure}}") {
            Arg::Value(placeholder("func", "closure"))
        } else {
            Arg::Value(placeholder("opaque", &name))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::io;

    use serde_json::json;

    use super::*;

    macro_rules! classify {
        ($value:expr) => {{
            #[allow(unused_imports)]
            use super::{ViaDebug, ViaError, ViaInspect, ViaOpaque, ViaSerialize};
            (&&&&&Probe(&$value)).slogx_arg()
        }};
    }

    #[derive(Serialize)]
    struct Reading {
        celsius: f64,
    }

    #[derive(Debug)]
    struct Token {
        #[allow(dead_code)]
        raw: u32,
    }

    struct Socketish;

    #[test]
    fn errors_take_precedence() {
        let err = io::Error::other("boom");
        match classify!(err) {
            Arg::Error(caught) => {
                assert_eq!(caught.name, "Error");
                assert_eq!(caught.message, "boom");
            }
            Arg::Value(value) => panic!("expected an error record, got {value}"),
        }
    }

    #[test]
    fn error_like_inspect_types_become_error_records() {
        let err: Box<dyn Error + Send + Sync> = "disk full".into();
        assert!(matches!(classify!(err), Arg::Error(caught) if caught.message == "disk full"));
    }

    #[test]
    fn inspectable_values_are_inspected() {
        let mut scores = BTreeMap::new();
        scores.insert("ada", 3);
        assert_eq!(classify!(scores), Arg::Value(json!({"ada": 3})));
        assert_eq!(classify!("plain"), Arg::Value(json!("plain")));
        assert_eq!(classify!(f64::NAN), Arg::Value(json!("NaN")));
    }

    #[test]
    fn serializable_values_use_the_serde_bridge() {
        assert_eq!(
            classify!(Reading { celsius: 21.5 }),
            Arg::Value(json!({"celsius": 21.5}))
        );
    }

    #[test]
    fn debug_values_render_their_debug_text() {
        assert_eq!(
            classify!(Token { raw: 7 }),
            Arg::Value(json!("Token { raw: 7 }"))
        );
    }

    #[test]
    fn everything_else_is_opaque() {
        assert_eq!(classify!(Socketish), Arg::Value(json!("<opaque Socketish>")));
        let callback = |value: u8| value + 1;
        assert_eq!(classify!(callback), Arg::Value(json!("<func closure>")));
    }
}
