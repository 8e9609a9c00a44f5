//! Lazy call-site resolution
//!
//! A log call captures an unresolved stack snapshot before dispatch; the
//! expensive symbolication only happens if a target actually asks for the
//! call site, and at most once per call no matter how many targets ask.

use std::fmt;

use backtrace::Backtrace;
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use serde::Serialize;

/// Module prefix identifying this crate's own frames in a stack walk.
const FACILITY_PREFIX: &str = concat!(env!("CARGO_CRATE_NAME"), "::");

/// Resolved call-site identity of a log call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Source {
    /// Fully qualified function name
    pub function: String,
    /// Source file path
    pub file: String,
    /// Line number within the file
    pub line: u32,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}:{}", self.function, self.file, self.line)
    }
}

/// Deferred call-site resolution for a single log call
///
/// Holds the unresolved snapshot taken at the call site. [`resolve`] walks
/// the frames outward from the log call, skipping this crate's own frames
/// and the capture machinery, and returns the first caller frame that
/// carries function, file, and line. The answer is memoized; calling
/// [`resolve`] zero, one, or many times is safe and consistent.
///
/// [`resolve`]: SourceResolver::resolve
#[derive(Debug)]
pub struct SourceResolver {
    snapshot: Option<Mutex<Backtrace>>,
    resolved: OnceCell<Option<Source>>,
}

impl SourceResolver {
    /// Capture an unresolved snapshot of the current stack
    pub(crate) fn capture() -> Self {
        Self {
            snapshot: Some(Mutex::new(Backtrace::new_unresolved())),
            resolved: OnceCell::new(),
        }
    }

    /// A resolver with nothing to resolve; always yields `None`
    pub fn unavailable() -> Self {
        Self {
            snapshot: None,
            resolved: OnceCell::new(),
        }
    }

    /// Resolve the call site, symbolicating on first use
    ///
    /// Returns `None` when the stack held no frame outside this crate or
    /// the platform could not produce symbol data.
    pub fn resolve(&self) -> Option<Source> {
        self.resolved.get_or_init(|| self.walk()).clone()
    }

    fn walk(&self) -> Option<Source> {
        let snapshot = self.snapshot.as_ref()?;
        let mut backtrace = snapshot.lock();
        backtrace.resolve();

        for frame in backtrace.frames() {
            for symbol in frame.symbols() {
                let name = match symbol.name() {
                    Some(name) => format!("{name:#}"),
                    None => continue,
                };
                if is_facility_frame(&name) {
                    continue;
                }
                let (Some(file), Some(line)) = (symbol.filename(), symbol.lineno()) else {
                    continue;
                };
                return Some(Source {
                    function: name,
                    file: file.display().to_string(),
                    line,
                });
            }
        }

        None
    }
}

/// Whether a demangled symbol belongs to the logging facility itself.
///
/// Test modules inside this crate count as callers, not facility frames.
fn is_facility_frame(name: &str) -> bool {
    if name.contains("::tests") {
        return false;
    }
    name.contains(FACILITY_PREFIX) || name.starts_with("backtrace::")
}
