use std::borrow::Cow;
use std::error::Error;
use std::marker::PhantomData;
use std::pin::Pin;
use std::ptr::NonNull;
use std::rc::{self, Rc};
use std::sync::{self, Arc};

use serde_json::{Map, Value};

use crate::inspector::{Inspect, Inspector};
use crate::placeholder::{placeholder, short_type_name};

macro_rules! forward_error_view {
    () => {
        fn as_error(&self) -> Option<&(dyn Error + 'static)> {
            (**self).as_error()
        }

        fn error_backtrace(&self) -> Option<String> {
            (**self).error_backtrace()
        }
    };
}

impl<T: Inspect + ?Sized> Inspect for &T {
    const AGGREGATE: bool = T::AGGREGATE;

    fn inspect(&self, inspector: &mut Inspector) -> Value {
        inspector.inspect_shared(*self)
    }

    forward_error_view!();
}

impl<T: Inspect + ?Sized> Inspect for &mut T {
    const AGGREGATE: bool = T::AGGREGATE;

    fn inspect(&self, inspector: &mut Inspector) -> Value {
        (**self).inspect(inspector)
    }

    forward_error_view!();
}

impl<T: Inspect + ?Sized> Inspect for Box<T> {
    const AGGREGATE: bool = T::AGGREGATE;

    fn inspect(&self, inspector: &mut Inspector) -> Value {
        (**self).inspect(inspector)
    }

    forward_error_view!();
}

impl<T: Inspect + ?Sized> Inspect for Rc<T> {
    fn inspect(&self, inspector: &mut Inspector) -> Value {
        inspector.inspect_shared(&**self)
    }

    forward_error_view!();
}

impl<T: Inspect + ?Sized> Inspect for Arc<T> {
    fn inspect(&self, inspector: &mut Inspector) -> Value {
        inspector.inspect_shared(&**self)
    }

    forward_error_view!();
}

impl<T: Inspect + ?Sized> Inspect for rc::Weak<T> {
    fn inspect(&self, inspector: &mut Inspector) -> Value {
        self.upgrade()
            .map_or(Value::Null, |strong| inspector.inspect_shared(&*strong))
    }
}

impl<T: Inspect + ?Sized> Inspect for sync::Weak<T> {
    fn inspect(&self, inspector: &mut Inspector) -> Value {
        self.upgrade()
            .map_or(Value::Null, |strong| inspector.inspect_shared(&*strong))
    }
}

impl<B> Inspect for Cow<'_, B>
where
    B: Inspect + ToOwned + ?Sized,
{
    const AGGREGATE: bool = B::AGGREGATE;

    fn inspect(&self, inspector: &mut Inspector) -> Value {
        (**self).inspect(inspector)
    }
}

impl<P> Inspect for Pin<P>
where
    P: std::ops::Deref,
    P::Target: Inspect,
{
    fn inspect(&self, inspector: &mut Inspector) -> Value {
        (**self).inspect(inspector)
    }
}

impl<T: Inspect> Inspect for Option<T> {
    const AGGREGATE: bool = T::AGGREGATE;

    fn inspect(&self, inspector: &mut Inspector) -> Value {
        self.as_ref()
            .map_or(Value::Null, |value| value.inspect(inspector))
    }

    fn as_error(&self) -> Option<&(dyn Error + 'static)> {
        self.as_ref().and_then(Inspect::as_error)
    }
}

impl<T: Inspect, E: Inspect> Inspect for Result<T, E> {
    fn inspect(&self, inspector: &mut Inspector) -> Value {
        let (label, payload) = match self {
            Ok(value) => ("Ok", inspector.inspect(value)),
            Err(err) => ("Err", inspector.inspect(err)),
        };
        let mut record = Map::new();
        record.insert(label.to_string(), payload);
        Value::Object(record)
    }
}

impl<T: ?Sized> Inspect for PhantomData<T> {
    fn inspect(&self, _inspector: &mut Inspector) -> Value {
        Value::Null
    }
}

fn pointer_value<T: ?Sized>(ptr: *const T) -> Value {
    if ptr.is_null() {
        Value::Null
    } else {
        placeholder("ptr", &format!("{ptr:p}"))
    }
}

impl<T: ?Sized> Inspect for *const T {
    fn inspect(&self, _inspector: &mut Inspector) -> Value {
        pointer_value(*self)
    }
}

impl<T: ?Sized> Inspect for *mut T {
    fn inspect(&self, _inspector: &mut Inspector) -> Value {
        pointer_value(self.cast_const())
    }
}

impl<T: ?Sized> Inspect for NonNull<T> {
    fn inspect(&self, _inspector: &mut Inspector) -> Value {
        pointer_value(self.as_ptr().cast_const())
    }
}

macro_rules! inspect_fn_pointer {
    ($(($($arg:ident),*))*) => {
        $(
            impl<R, $($arg),*> Inspect for fn($($arg),*) -> R {
                fn inspect(&self, _inspector: &mut Inspector) -> Value {
                    placeholder("func", &short_type_name::<Self>())
                }
            }
        )*
    };
}

inspect_fn_pointer!(() (A) (A, B) (A, B, C));
