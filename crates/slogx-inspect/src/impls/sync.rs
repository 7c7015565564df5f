use std::cell::{Cell, OnceCell, RefCell};
use std::sync::atomic::{
    AtomicBool, AtomicI8, AtomicI16, AtomicI32, AtomicI64, AtomicIsize, AtomicU8, AtomicU16,
    AtomicU32, AtomicU64, AtomicUsize, Ordering,
};
use std::sync::mpsc;
use std::sync::{Mutex, OnceLock, RwLock, TryLockError};
use std::thread::{JoinHandle, Thread};

use serde_json::Value;

use crate::inspector::{Inspect, Inspector};
use crate::placeholder::{placeholder, short_type_name};

impl<T: Inspect + ?Sized> Inspect for RefCell<T> {
    const AGGREGATE: bool = T::AGGREGATE;

    fn inspect(&self, inspector: &mut Inspector) -> Value {
        self.try_borrow().map_or_else(
            |_| placeholder("borrowed", &short_type_name::<Self>()),
            |value| (*value).inspect(inspector),
        )
    }
}

impl<T: Inspect + Copy> Inspect for Cell<T> {
    fn inspect(&self, inspector: &mut Inspector) -> Value {
        self.get().inspect(inspector)
    }
}

impl<T: Inspect> Inspect for OnceCell<T> {
    fn inspect(&self, inspector: &mut Inspector) -> Value {
        self.get().map_or(Value::Null, |value| value.inspect(inspector))
    }
}

impl<T: Inspect> Inspect for OnceLock<T> {
    fn inspect(&self, inspector: &mut Inspector) -> Value {
        self.get().map_or(Value::Null, |value| value.inspect(inspector))
    }
}

/// Poisoned locks are read through; a lock held elsewhere is never waited on.
impl<T: Inspect + ?Sized> Inspect for Mutex<T> {
    const AGGREGATE: bool = T::AGGREGATE;

    fn inspect(&self, inspector: &mut Inspector) -> Value {
        match self.try_lock() {
            Ok(guard) => (*guard).inspect(inspector),
            Err(TryLockError::Poisoned(poisoned)) => (*poisoned.into_inner()).inspect(inspector),
            Err(TryLockError::WouldBlock) => placeholder("locked", &short_type_name::<Self>()),
        }
    }
}

impl<T: Inspect + ?Sized> Inspect for RwLock<T> {
    const AGGREGATE: bool = T::AGGREGATE;

    fn inspect(&self, inspector: &mut Inspector) -> Value {
        match self.try_read() {
            Ok(guard) => (*guard).inspect(inspector),
            Err(TryLockError::Poisoned(poisoned)) => (*poisoned.into_inner()).inspect(inspector),
            Err(TryLockError::WouldBlock) => placeholder("locked", &short_type_name::<Self>()),
        }
    }
}

macro_rules! inspect_atomic {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Inspect for $ty {
                fn inspect(&self, _inspector: &mut Inspector) -> Value {
                    Value::from(self.load(Ordering::Relaxed))
                }
            }
        )*
    };
}

inspect_atomic!(
    AtomicBool,
    AtomicI8,
    AtomicI16,
    AtomicI32,
    AtomicI64,
    AtomicIsize,
    AtomicU8,
    AtomicU16,
    AtomicU32,
    AtomicU64,
    AtomicUsize,
);

macro_rules! inspect_channel {
    ($($ty:ident)::+ $(,)?) => {
        impl<T> Inspect for $($ty)::+<T> {
            fn inspect(&self, _inspector: &mut Inspector) -> Value {
                placeholder("chan", &short_type_name::<T>())
            }
        }
    };
}

#[allow(clippy::redundant_pub_crate)]
pub(crate) use inspect_channel;

inspect_channel!(mpsc::Sender);
inspect_channel!(mpsc::SyncSender);
inspect_channel!(mpsc::Receiver);

fn thread_label(thread: &Thread) -> String {
    thread
        .name()
        .map_or_else(|| format!("{:?}", thread.id()), ToString::to_string)
}

impl Inspect for Thread {
    fn inspect(&self, _inspector: &mut Inspector) -> Value {
        placeholder("thread", &thread_label(self))
    }
}

impl<T> Inspect for JoinHandle<T> {
    fn inspect(&self, _inspector: &mut Inspector) -> Value {
        placeholder("thread", &thread_label(self.thread()))
    }
}
