#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Log entry model and the call-site inspector that fills its metadata.
//!
//! Layout: `level.rs` (`LogLevel`), `arg.rs` (`Arg`, `CaughtError`),
//! `caller.rs` (`CallSite`, `SourceIdentity`), `clock.rs` (monotonic
//! timestamps), `entry.rs` (`LogEntry::build`).

mod arg;
mod caller;
mod clock;
mod entry;
mod level;

pub use arg::{Arg, CaughtError};
pub use caller::{CallSite, Frame, SourceIdentity, SourceRoot, library_root};
pub use clock::{format_timestamp, next_timestamp};
pub use entry::{EntryContext, ErrorRecord, LogEntry, Metadata};
pub use level::{LogLevel, ParseLevelError};

/// Source root of the crate that invokes the macro.
///
/// Captures `CARGO_MANIFEST_DIR`, `file!()` and `module_path!()` at the call
/// site, so it must be invoked from a file directly under the crate's `src/`.
#[macro_export]
macro_rules! source_root {
    () => {
        $crate::SourceRoot::new(env!("CARGO_MANIFEST_DIR"), file!(), module_path!())
    };
}
