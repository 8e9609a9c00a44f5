//! Severity levels and level parsing

use std::fmt;

/// Severity of a log call
///
/// Levels form a total order, `Trace` lowest through `Panic` highest. Both
/// the logger floor and each target's own floor compare against this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Trace log level
    Trace,
    /// Debug log level
    Debug,
    /// Verbose log level
    Verbose,
    /// Info log level
    Info,
    /// Warn log level
    Warn,
    /// Error log level
    Error,
    /// Fatal log level
    Fatal,
    /// Panic log level
    Panic,
}

impl Level {
    /// Canonical lowercase name of the level
    pub fn name(&self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Verbose => "verbose",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Fatal => "fatal",
            Level::Panic => "panic",
        }
    }

    /// Parse a level from its lowercase name
    ///
    /// Unrecognized names resolve to `Level::Trace` rather than failing.
    /// This is inherited behavior and intentional, if surprising: a typo in a
    /// level name silently turns logging fully on, never off.
    pub fn from_name(name: &str) -> Level {
        match name {
            "trace" => Level::Trace,
            "debug" => Level::Debug,
            "verbose" => Level::Verbose,
            "info" => Level::Info,
            "warn" => Level::Warn,
            "error" => Level::Error,
            "fatal" => Level::Fatal,
            "panic" => Level::Panic,
            _ => Level::Trace,
        }
    }

    /// Read a level from an environment variable
    ///
    /// The value is lowercased before parsing, so `LOGFAN_LEVEL=Info` works.
    /// Returns `None` when the variable is unset or not unicode; unknown
    /// values fall back to `Trace` per [`Level::from_name`].
    pub fn from_env(var: &str) -> Option<Level> {
        std::env::var(var)
            .ok()
            .map(|value| Level::from_name(&value.to_lowercase()))
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
