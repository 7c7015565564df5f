//! Logging macros.
//!
//! Each argument is either a JSON literal (`{ .. }` or `[ .. ]`, as accepted by
//! `serde_json::json!`) or any expression. Expressions are converted by the
//! first capability they have: `Error`, `Inspect`, `Serialize`, `Debug`.
//! Anything else renders as an `<opaque Type>` placeholder.

/// Convert logging arguments into a `Vec<slogx::Arg>`.
///
/// ```ignore
/// let args = slogx::args!("user signed in", { "id": 42 }, session);
/// logger.info(args);
/// ```
#[macro_export]
macro_rules! args {
    ($($arg:tt)*) => {
        $crate::__slogx_args!(@acc [] $($arg)*)
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __slogx_args {
    (@acc [$($out:expr,)*]) => {
        ::std::vec![$($out),*]
    };
    (@acc [$($out:expr,)*] { $($json:tt)* } $(, $($rest:tt)*)?) => {
        $crate::__slogx_args!(
            @acc [$($out,)* $crate::__private::Arg::Value($crate::__private::json!({ $($json)* })),]
            $($($rest)*)?
        )
    };
    (@acc [$($out:expr,)*] [ $($json:tt)* ] $(, $($rest:tt)*)?) => {
        $crate::__slogx_args!(
            @acc [$($out,)* $crate::__private::Arg::Value($crate::__private::json!([ $($json)* ])),]
            $($($rest)*)?
        )
    };
    (@acc [$($out:expr,)*] $value:expr $(, $($rest:tt)*)?) => {
        $crate::__slogx_args!(
            @acc [$($out,)* $crate::__slogx_probe!($value),]
            $($($rest)*)?
        )
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __slogx_probe {
    ($value:expr) => {{
        #[allow(unused_imports)]
        use $crate::__private::{ViaDebug, ViaError, ViaInspect, ViaOpaque, ViaSerialize};
        (&&&&&$crate::__private::Probe(&$value)).slogx_arg()
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __slogx_log {
    ($level:expr, $($arg:tt)+) => {
        $crate::__private::log_from($level, ::std::module_path!(), || {
            $crate::args!($($arg)+)
        })
    };
}

/// Publish a `DEBUG` entry through the installed logger.
#[macro_export]
macro_rules! debug {
    ($($arg:tt)+) => {
        $crate::__slogx_log!($crate::LogLevel::Debug, $($arg)+)
    };
}

/// Publish an `INFO` entry through the installed logger.
///
/// ```ignore
/// slogx::info!("order placed", { "order": order_id }, cart);
/// ```
#[macro_export]
macro_rules! info {
    ($($arg:tt)+) => {
        $crate::__slogx_log!($crate::LogLevel::Info, $($arg)+)
    };
}

/// Publish a `WARN` entry through the installed logger.
#[macro_export]
macro_rules! warn {
    ($($arg:tt)+) => {
        $crate::__slogx_log!($crate::LogLevel::Warn, $($arg)+)
    };
}

/// Publish an `ERROR` entry through the installed logger.
///
/// An error argument becomes a `{name, message, stack}` record and its stack
/// replaces the entry stacktrace.
#[macro_export]
macro_rules! error {
    ($($arg:tt)+) => {
        $crate::__slogx_log!($crate::LogLevel::Error, $($arg)+)
    };
}
