//! Fallback for types that implement `Serialize` but not `Inspect`.

use serde::Serialize;
use serde_json::Value;

use crate::placeholder::{placeholder, short_type_name};

/// Convert any serializable value, degrading to a placeholder on failure.
///
/// Non-finite floats follow `serde_json` here and become `null`.
#[must_use]
pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_else(|err| {
        placeholder(
            "unserializable",
            &format!("{}: {err}", short_type_name::<T>()),
        )
    })
}
