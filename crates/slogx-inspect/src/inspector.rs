//! The `Inspect` trait and the per-call traversal context.

use std::any::type_name;
use std::collections::HashSet;
use std::error::Error;
use std::ptr;

use serde_json::Value;

use crate::placeholder::{CIRCULAR, MAX_DEPTH};

/// Nesting depth after which traversal stops with `"[max depth]"`.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Conversion of a value into a JSON tree for display.
///
/// Implementations must not panic and must not block; values that cannot be
/// read right now (a held lock, a mutably borrowed cell) render as placeholders.
pub trait Inspect {
    /// Whether values of this type have identity worth tracking for cycles.
    ///
    /// Derived types and maps set this; scalars and sequences leave it false.
    const AGGREGATE: bool = false;

    /// Render `self`, recursing into children through `inspector`.
    fn inspect(&self, inspector: &mut Inspector) -> Value;

    /// Error view of values that behave like errors without implementing
    /// [`std::error::Error`] themselves (`anyhow::Error`, boxed trait objects).
    fn as_error(&self) -> Option<&(dyn Error + 'static)> {
        None
    }

    /// Backtrace captured by the error itself, when it carries one.
    fn error_backtrace(&self) -> Option<String> {
        None
    }
}

/// Traversal state shared by every node of one conversion.
#[derive(Debug)]
pub struct Inspector {
    visited: HashSet<(usize, &'static str)>,
    depth: usize,
    max_depth: usize,
}

impl Default for Inspector {
    fn default() -> Self {
        Self::new()
    }
}

impl Inspector {
    /// Fresh context with [`DEFAULT_MAX_DEPTH`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }

    /// Fresh context that stops descending after `max_depth` levels.
    #[must_use]
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            visited: HashSet::new(),
            depth: 0,
            max_depth,
        }
    }

    /// Render a child one level below the current node.
    pub fn inspect<T: Inspect + ?Sized>(&mut self, value: &T) -> Value {
        if self.depth >= self.max_depth {
            return Value::String(MAX_DEPTH.to_string());
        }
        self.depth += 1;
        let rendered = value.inspect(self);
        self.depth -= 1;
        rendered
    }

    /// Render a value reached through shared indirection (`&T`, `Rc`, `Arc`).
    ///
    /// Aggregates are recorded by address and type; meeting the same identity
    /// again in this conversion yields `"[circular]"`.
    pub fn inspect_shared<T: Inspect + ?Sized>(&mut self, value: &T) -> Value {
        if T::AGGREGATE {
            let identity = (ptr::from_ref(value).cast::<()>().addr(), type_name::<T>());
            if !self.visited.insert(identity) {
                return Value::String(CIRCULAR.to_string());
            }
        }
        value.inspect(self)
    }

    /// Current nesting depth.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Tracked(u8);

    impl Inspect for Tracked {
        const AGGREGATE: bool = true;

        fn inspect(&self, _inspector: &mut Inspector) -> Value {
            Value::from(self.0)
        }
    }

    struct Nest(Option<Box<Nest>>);

    impl Inspect for Nest {
        fn inspect(&self, inspector: &mut Inspector) -> Value {
            match &self.0 {
                Some(child) => Value::Array(vec![inspector.inspect(child.as_ref())]),
                None => Value::Null,
            }
        }
    }

    #[test]
    fn repeated_shared_aggregate_is_circular() {
        let value = Tracked(7);
        let mut inspector = Inspector::new();
        assert_eq!(inspector.inspect_shared(&value), Value::from(7));
        assert_eq!(
            inspector.inspect_shared(&value),
            Value::String(CIRCULAR.to_string())
        );
    }

    #[test]
    fn scalars_are_never_tracked() {
        let value = 5_u32;
        let mut inspector = Inspector::new();
        assert_eq!(inspector.inspect_shared(&value), Value::from(5));
        assert_eq!(inspector.inspect_shared(&value), Value::from(5));
    }

    #[test]
    fn depth_limit_stops_descent() {
        let mut nest = Nest(None);
        for _ in 0..10 {
            nest = Nest(Some(Box::new(nest)));
        }
        let mut inspector = Inspector::with_max_depth(3);
        let rendered = inspector.inspect(&nest);
        assert_eq!(
            rendered,
            serde_json::json!([[["[max depth]"]]]),
            "three levels rendered before the limit"
        );
        assert_eq!(inspector.depth(), 0);
    }
}
