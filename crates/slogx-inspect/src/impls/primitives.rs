use std::ffi::{OsStr, OsString};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::num::{NonZeroU32, NonZeroU64, NonZeroUsize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde_json::{Map, Number, Value};

use crate::inspector::{Inspect, Inspector};

macro_rules! inspect_via_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Inspect for $ty {
                fn inspect(&self, _inspector: &mut Inspector) -> Value {
                    Value::from(*self)
                }
            }
        )*
    };
}

inspect_via_from!(bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

macro_rules! inspect_via_display {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Inspect for $ty {
                fn inspect(&self, _inspector: &mut Inspector) -> Value {
                    Value::String(self.to_string())
                }
            }
        )*
    };
}

inspect_via_display!(char, IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr);

macro_rules! inspect_nonzero {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Inspect for $ty {
                fn inspect(&self, _inspector: &mut Inspector) -> Value {
                    Value::from(self.get())
                }
            }
        )*
    };
}

inspect_nonzero!(NonZeroU32, NonZeroU64, NonZeroUsize);

impl Inspect for i128 {
    fn inspect(&self, _inspector: &mut Inspector) -> Value {
        i64::try_from(*self).map_or_else(|_| Value::String(self.to_string()), Value::from)
    }
}

impl Inspect for u128 {
    fn inspect(&self, _inspector: &mut Inspector) -> Value {
        u64::try_from(*self).map_or_else(|_| Value::String(self.to_string()), Value::from)
    }
}

/// Finite floats pass through; non-finite ones become stable strings.
fn float_value(value: f64) -> Value {
    Number::from_f64(value).map_or_else(
        || {
            let label = if value.is_nan() {
                "NaN"
            } else if value.is_sign_positive() {
                "Infinity"
            } else {
                "-Infinity"
            };
            Value::String(label.to_string())
        },
        Value::Number,
    )
}

impl Inspect for f64 {
    fn inspect(&self, _inspector: &mut Inspector) -> Value {
        float_value(*self)
    }
}

impl Inspect for f32 {
    fn inspect(&self, _inspector: &mut Inspector) -> Value {
        float_value(f64::from(*self))
    }
}

impl Inspect for () {
    fn inspect(&self, _inspector: &mut Inspector) -> Value {
        Value::Null
    }
}

impl Inspect for str {
    fn inspect(&self, _inspector: &mut Inspector) -> Value {
        Value::String(self.to_owned())
    }
}

impl Inspect for String {
    fn inspect(&self, _inspector: &mut Inspector) -> Value {
        Value::String(self.clone())
    }
}

impl Inspect for OsStr {
    fn inspect(&self, _inspector: &mut Inspector) -> Value {
        Value::String(self.to_string_lossy().into_owned())
    }
}

impl Inspect for OsString {
    fn inspect(&self, inspector: &mut Inspector) -> Value {
        self.as_os_str().inspect(inspector)
    }
}

impl Inspect for Path {
    fn inspect(&self, _inspector: &mut Inspector) -> Value {
        Value::String(self.to_string_lossy().into_owned())
    }
}

impl Inspect for PathBuf {
    fn inspect(&self, inspector: &mut Inspector) -> Value {
        self.as_path().inspect(inspector)
    }
}

impl Inspect for Duration {
    fn inspect(&self, _inspector: &mut Inspector) -> Value {
        let mut record = Map::new();
        record.insert("secs".to_string(), Value::from(self.as_secs()));
        record.insert("nanos".to_string(), Value::from(self.subsec_nanos()));
        Value::Object(record)
    }
}

impl Inspect for Value {
    fn inspect(&self, _inspector: &mut Inspector) -> Value {
        self.clone()
    }
}

impl Inspect for Number {
    fn inspect(&self, _inspector: &mut Inspector) -> Value {
        Value::Number(self.clone())
    }
}

impl Inspect for Map<String, Value> {
    const AGGREGATE: bool = true;

    fn inspect(&self, _inspector: &mut Inspector) -> Value {
        Value::Object(self.clone())
    }
}
