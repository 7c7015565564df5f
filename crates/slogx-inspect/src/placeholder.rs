//! Type naming and placeholder strings for values that cannot be rendered.

use std::any::type_name;

use serde_json::Value;

/// Rendered in place of an aggregate already visited in the same conversion.
pub const CIRCULAR: &str = "[circular]";
/// Rendered once the nesting limit is reached.
pub const MAX_DEPTH: &str = "[max depth]";

/// `<kind detail>` placeholder string.
#[must_use]
pub fn placeholder(kind: &str, detail: &str) -> Value {
    Value::String(format!("<{kind} {detail}>"))
}

/// Name of `T` with module paths removed, including inside generic arguments.
#[must_use]
pub fn short_type_name<T: ?Sized>() -> String {
    simplify_type_name(type_name::<T>())
}

/// Strip module paths from a fully qualified type name.
///
/// `alloc::vec::Vec<core::option::Option<i32>>` becomes `Vec<Option<i32>>`.
#[must_use]
pub fn simplify_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment_start = 0;
    let mut chars = full.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == ':' && chars.peek() == Some(&':') {
            chars.next();
            out.truncate(segment_start);
        } else if ch.is_alphanumeric() || ch == '_' {
            out.push(ch);
        } else {
            out.push(ch);
            segment_start = out.len();
        }
    }
    out
}

/// Name reported for an error of type `T`.
///
/// References and `Box`/`Arc`/`Rc` wrappers are peeled so the concrete error
/// type is reported. Trait objects carry no concrete name and report `Error`.
#[must_use]
pub fn error_type_name<T: ?Sized>() -> String {
    let name = short_type_name::<T>();
    let inner = peel_wrappers(&name);
    if inner.starts_with("dyn ") {
        "Error".to_string()
    } else {
        inner.to_string()
    }
}

fn peel_wrappers(mut name: &str) -> &str {
    loop {
        let trimmed = name.trim_start();
        if let Some(rest) = trimmed.strip_prefix('&') {
            name = rest.strip_prefix("mut ").unwrap_or(rest);
            continue;
        }
        let unwrapped = ["Box<", "Arc<", "Rc<"].iter().find_map(|wrapper| {
            trimmed
                .strip_prefix(wrapper)
                .and_then(|rest| rest.strip_suffix('>'))
        });
        match unwrapped {
            Some(inner) => name = inner,
            None => return trimmed,
        }
    }
}
