//! Call-site capture that skips the library's own frames.
//!
//! # Design
//! - Each library crate records its source root at compile time with
//!   [`source_root!`](crate::source_root); a frame is the library's own when its
//!   file lives under one of those roots.
//! - Frames without file information fall back to the demangled symbol prefix.
//! - The walk is a pure function over resolved frames so it can be tested
//!   without relying on debug info.

use std::path::{Path, PathBuf};

use backtrace::Backtrace;

/// Symbol marking the bottom of the user-visible stack.
const SHORT_BACKTRACE_MARKER: &str = "__rust_begin_short_backtrace";
/// Suffix appended to closure symbols.
const CLOSURE_SUFFIX: &str = "::{{closure}}";

/// One resolved (possibly inlined) frame of a backtrace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    /// Demangled symbol without the trailing hash.
    pub symbol: Option<String>,
    /// Source file as recorded in debug info.
    pub file: Option<PathBuf>,
    /// Line within `file`.
    pub line: Option<u32>,
}

impl Frame {
    /// Frame with every field known.
    #[must_use]
    pub fn new(symbol: impl Into<String>, file: impl Into<PathBuf>, line: u32) -> Self {
        Self {
            symbol: Some(symbol.into()),
            file: Some(file.into()),
            line: Some(line),
        }
    }

    /// Resolve the current thread's stack, innermost frame first.
    #[must_use]
    pub fn capture_all() -> Vec<Self> {
        let backtrace = Backtrace::new();
        backtrace
            .frames()
            .iter()
            .flat_map(backtrace::BacktraceFrame::symbols)
            .map(|symbol| Self {
                symbol: symbol.name().map(|name| format!("{name:#}")),
                file: symbol.filename().map(Path::to_path_buf),
                line: symbol.lineno(),
            })
            .collect()
    }

    fn symbol_str(&self) -> &str {
        self.symbol.as_deref().unwrap_or("<unknown>")
    }

    fn is_capture_machinery(&self) -> bool {
        let symbol = self.symbol_str();
        symbol.starts_with("backtrace::") || symbol.starts_with("<backtrace::")
    }

    fn is_stack_bottom(&self) -> bool {
        self.symbol_str().contains(SHORT_BACKTRACE_MARKER)
    }

    fn render(&self) -> String {
        let symbol = self.symbol_str();
        match (&self.file, self.line) {
            (Some(file), Some(line)) => format!("at {symbol} ({}:{line})", file.display()),
            (Some(file), None) => format!("at {symbol} ({})", file.display()),
            (None, _) => format!("at {symbol}"),
        }
    }
}

/// Compile-time identity of one library crate's sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRoot {
    absolute: PathBuf,
    relative: Option<PathBuf>,
    crate_name: String,
}

impl SourceRoot {
    /// Build from `env!("CARGO_MANIFEST_DIR")`, `file!()` and `module_path!()`.
    ///
    /// Prefer [`source_root!`](crate::source_root), which supplies all three.
    #[must_use]
    pub fn new(manifest_dir: &str, file: &str, module_path: &str) -> Self {
        let source_dir = Path::new(file)
            .parent()
            .map_or_else(PathBuf::new, Path::to_path_buf);
        let absolute = if source_dir.is_absolute() {
            source_dir.clone()
        } else {
            Path::new(manifest_dir).join(
                source_dir
                    .components()
                    .next_back()
                    .map_or_else(|| Path::new("src"), |last| Path::new(last.as_os_str())),
            )
        };
        // A bare `src` would match every crate's sources.
        let relative = (source_dir.is_relative() && source_dir.components().count() > 1)
            .then_some(source_dir);
        let crate_name = module_path
            .split("::")
            .next()
            .unwrap_or(module_path)
            .to_string();
        Self {
            absolute,
            relative,
            crate_name,
        }
    }

    /// Crate name recorded by the root.
    #[must_use]
    pub fn crate_name(&self) -> &str {
        &self.crate_name
    }

    fn owns(&self, frame: &Frame) -> bool {
        if let Some(file) = &frame.file {
            if file.starts_with(&self.absolute) {
                return true;
            }
            return self
                .relative
                .as_ref()
                .is_some_and(|relative| file.ancestors().any(|dir| dir.ends_with(relative)));
        }
        frame.symbol.as_deref().is_some_and(|symbol| {
            let symbol = symbol.strip_prefix('<').unwrap_or(symbol);
            symbol
                .strip_prefix(self.crate_name.as_str())
                .is_some_and(|rest| rest.starts_with("::"))
        })
    }
}

/// Source root of this crate.
#[must_use]
pub fn library_root() -> SourceRoot {
    crate::source_root!()
}

/// Set of source roots treated as the library's own code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceIdentity {
    roots: Vec<SourceRoot>,
}

impl SourceIdentity {
    /// Identity covering `roots`.
    #[must_use]
    pub const fn new(roots: Vec<SourceRoot>) -> Self {
        Self { roots }
    }

    /// Add another root.
    #[must_use]
    pub fn with_root(mut self, root: SourceRoot) -> Self {
        self.roots.push(root);
        self
    }

    /// Whether `frame` belongs to one of the roots.
    #[must_use]
    pub fn owns(&self, frame: &Frame) -> bool {
        self.roots.iter().any(|root| root.owns(frame))
    }
}

/// Where a logging call was made from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallSite {
    /// Basename of the caller's source file.
    pub file: Option<String>,
    /// Line of the call.
    pub line: Option<u32>,
    /// Enclosing function, with closure segments removed.
    pub func: Option<String>,
    /// `at <func> (<file>:<line>)` lines from the caller outwards.
    pub stack: Option<String>,
}

impl CallSite {
    /// Capture the current stack and locate the first frame outside `identity`.
    #[must_use]
    pub fn capture(identity: &SourceIdentity) -> Self {
        Self::from_frames(&Frame::capture_all(), identity)
    }

    /// Locate the caller in `frames` (innermost first).
    ///
    /// Frames before the first library frame belong to the capture itself and
    /// are skipped, as are the library frames that follow. Without a library
    /// frame, or without anything after it, every field is `None`.
    #[must_use]
    pub fn from_frames(frames: &[Frame], identity: &SourceIdentity) -> Self {
        let Some(first_owned) = frames.iter().position(|frame| identity.owns(frame)) else {
            return Self::default();
        };
        let Some(caller_index) = frames
            .iter()
            .enumerate()
            .skip(first_owned)
            .find(|(_, frame)| !identity.owns(frame) && !frame.is_capture_machinery())
            .map(|(index, _)| index)
        else {
            return Self::default();
        };

        let caller = &frames[caller_index];
        let stack = frames[caller_index..]
            .iter()
            .take_while(|frame| !frame.is_stack_bottom())
            .map(Frame::render)
            .collect::<Vec<_>>()
            .join("\n");

        Self {
            file: caller
                .file
                .as_deref()
                .and_then(Path::file_name)
                .map(|name| name.to_string_lossy().into_owned()),
            line: caller.line,
            func: caller.symbol.as_deref().map(enclosing_function),
            stack: (!stack.is_empty()).then_some(stack),
        }
    }
}

fn enclosing_function(symbol: &str) -> String {
    let mut name = symbol;
    while let Some(stripped) = name.strip_suffix(CLOSURE_SUFFIX) {
        name = stripped;
    }
    name.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> SourceIdentity {
        SourceIdentity::new(vec![SourceRoot::new(
            "/work/slogx/crates/slogx",
            "crates/slogx/src/lib.rs",
            "slogx::logger",
        )])
    }

    fn frames() -> Vec<Frame> {
        vec![
            Frame::new(
                "backtrace::backtrace::trace",
                "/cargo/registry/backtrace/src/lib.rs",
                10,
            ),
            Frame::new(
                "slogx::logger::Logger::log_with",
                "/work/slogx/crates/slogx/src/logger.rs",
                88,
            ),
            Frame::new(
                "slogx::logger::Logger::error",
                "crates/slogx/src/logger.rs",
                120,
            ),
            Frame::new(
                "shop::checkout::pay::{{closure}}::{{closure}}",
                "/home/dev/shop/src/checkout.rs",
                42,
            ),
            Frame::new("shop::main", "/home/dev/shop/src/main.rs", 7),
            Frame::new(
                "std::sys::backtrace::__rust_begin_short_backtrace",
                "/rustc/library/std/src/sys/backtrace.rs",
                152,
            ),
            Frame::new("std::rt::lang_start", "/rustc/library/std/src/rt.rs", 206),
        ]
    }

    #[test]
    fn first_frame_after_library_is_the_caller() {
        let site = CallSite::from_frames(&frames(), &identity());
        assert_eq!(site.file.as_deref(), Some("checkout.rs"));
        assert_eq!(site.line, Some(42));
        assert_eq!(site.func.as_deref(), Some("shop::checkout::pay"));
    }

    #[test]
    fn stack_starts_at_caller_and_stops_at_runtime_entry() {
        let site = CallSite::from_frames(&frames(), &identity());
        assert_eq!(
            site.stack.as_deref(),
            Some(
                "at shop::checkout::pay::{{closure}}::{{closure}} (/home/dev/shop/src/checkout.rs:42)\n\
                 at shop::main (/home/dev/shop/src/main.rs:7)"
            )
        );
    }

    #[test]
    fn no_user_frame_yields_empty_site() {
        let only_library = frames().into_iter().take(3).collect::<Vec<_>>();
        assert_eq!(
            CallSite::from_frames(&only_library, &identity()),
            CallSite::default()
        );
        assert_eq!(
            CallSite::from_frames(&[], &identity()),
            CallSite::default()
        );
    }

    #[test]
    fn user_file_with_same_name_is_not_excluded() {
        let root = identity();
        assert!(!root.owns(&Frame::new(
            "shop::logger::setup",
            "/home/dev/shop/src/logger.rs",
            3
        )));
    }

    #[test]
    fn frames_without_files_fall_back_to_symbols() {
        let root = identity();
        let library = Frame {
            symbol: Some("<slogx::logger::Logger as core::fmt::Debug>::fmt".to_string()),
            ..Frame::default()
        };
        let lookalike = Frame {
            symbol: Some("slogxtra::run".to_string()),
            ..Frame::default()
        };
        assert!(root.owns(&library));
        assert!(!root.owns(&lookalike));
    }

    #[test]
    fn bare_src_relative_root_only_matches_absolute_paths() {
        let root = SourceRoot::new("/work/tool", "src/lib.rs", "tool");
        let identity = SourceIdentity::new(vec![root]);
        assert!(identity.owns(&Frame::new("tool::run", "/work/tool/src/lib.rs", 1)));
        assert!(!identity.owns(&Frame::new("app::run", "src/main.rs", 1)));
    }

    #[test]
    fn library_root_names_this_crate() {
        assert_eq!(library_root().crate_name(), "slogx_entry");
    }
}
