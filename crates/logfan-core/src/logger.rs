//! The user-facing logger handle

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use thiserror::Error;

use crate::context::Context;
use crate::level::Level;
use crate::source::SourceResolver;
use crate::target::{Target, TargetSet};
use crate::value::Value;

static LOGGER_SEQ: AtomicU64 = AtomicU64::new(1);

fn next_logger_id() -> String {
    format!("logger-{}", LOGGER_SEQ.fetch_add(1, Ordering::Relaxed))
}

/// Outcome of a fatal- or panic-level call
///
/// Logging at `Fatal` or `Panic` always dispatches first (subject to the
/// usual floors) and then hands the decision back to the caller as this
/// value instead of hiding process termination inside the log call. Call
/// [`exit`] for the terminal behavior, or propagate it as an error
/// (`Terminal` implements [`std::error::Error`]).
///
/// [`exit`]: Terminal::exit
#[derive(Debug, Error)]
#[must_use = "a terminal outcome does nothing until exit() is called or it is propagated"]
pub enum Terminal {
    /// The process should exit with a non-zero status
    #[error("fatal: {0}")]
    Fatal(String),
    /// Unrecoverable control-flow error carrying the rendered message
    #[error("panic: {0}")]
    Panic(String),
}

impl Terminal {
    /// The rendered message of the terminating call
    pub fn message(&self) -> &str {
        match self {
            Terminal::Fatal(message) | Terminal::Panic(message) => message,
        }
    }

    /// Perform the terminal behavior
    ///
    /// `Fatal` exits the process with status 1; `Panic` panics with the
    /// rendered message.
    pub fn exit(self) -> ! {
        match self {
            Terminal::Fatal(_) => std::process::exit(1),
            Terminal::Panic(message) => panic!("{message}"),
        }
    }
}

/// Structured, leveled logger
///
/// A logger holds a severity floor, an immutable [`Context`], and a shared
/// reference to the target set it dispatches to. [`with_context`] forks the
/// context into a derived logger while the target set stays shared, so a
/// whole family of loggers writes to the same sinks.
///
/// Log methods return `&Self` for fluent chaining:
///
/// ```
/// use logfan_core::{ctx, CaptureTarget, Logger};
///
/// let logger = Logger::new();
/// logger.add_target(CaptureTarget::new());
///
/// logger
///     .with_context(&ctx! { "request" => "42" })
///     .debug(["connecting"])
///     .info(["connected"]);
/// ```
///
/// [`with_context`]: Logger::with_context
#[derive(Clone)]
pub struct Logger {
    level: Level,
    context: Context,
    targets: Arc<TargetSet>,
    id: String,
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    /// Create a logger with a `Trace` floor, empty context, and a fresh
    /// empty target set
    pub fn new() -> Self {
        Self {
            level: Level::Trace,
            context: Context::new(),
            targets: Arc::new(TargetSet::new()),
            id: next_logger_id(),
        }
    }

    /// Create a logger with an initial context
    pub fn new_with_context(initial: &Context) -> Self {
        Self::new().with_context(initial)
    }

    /// Assign an explicit logger id at construction time
    ///
    /// Ids are otherwise generated (`logger-N`) and are immutable for the
    /// logger's lifetime; they correlate concurrent loggers in shared
    /// output.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// This logger's id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// This logger's severity floor
    pub fn level(&self) -> Level {
        self.level
    }

    /// Set the severity floor of this logger instance
    ///
    /// Targets keep their own independent floors, and loggers already
    /// derived from this one are unaffected.
    pub fn set_level(&mut self, level: Level) {
        self.level = level;
    }

    /// Register a target with the shared set
    ///
    /// Visible to every logger sharing the set, including loggers derived
    /// before or after this call.
    pub fn add_target(&self, target: impl Target + 'static) -> &Self {
        self.targets.add(Box::new(target));
        self
    }

    /// Derive a logger with this context extended by `updates`
    ///
    /// The derived logger shares this logger's target set and floor but
    /// owns its own context copy; neither logger can observe the other's
    /// later derivations.
    pub fn with_context(&self, updates: &Context) -> Logger {
        Logger {
            level: self.level,
            context: self.context.extend(updates),
            targets: Arc::clone(&self.targets),
            id: next_logger_id(),
        }
    }

    /// Defensive copy of this logger's context
    pub fn context(&self) -> Context {
        self.context.clone()
    }

    /// Log values at the given level
    ///
    /// Below the floor this returns immediately, without touching the
    /// values or the stack. Otherwise the call-site snapshot is captured
    /// and the call fans out to every registered target before returning.
    pub fn log<I>(&self, level: Level, values: I) -> &Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        if level < self.level {
            return self;
        }
        self.emit(level, values.into_iter().map(Into::into).collect());
        self
    }

    /// Log a single pre-rendered message at the given level
    ///
    /// Use with `format_args!`, printf-style.
    pub fn logf(&self, level: Level, args: fmt::Arguments<'_>) -> &Self {
        if level < self.level {
            return self;
        }
        self.emit(level, vec![Value::Text(args.to_string())]);
        self
    }

    /// Log values at `Trace`
    pub fn trace<I>(&self, values: I) -> &Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        self.log(Level::Trace, values)
    }

    /// Log a formatted message at `Trace`
    pub fn tracef(&self, args: fmt::Arguments<'_>) -> &Self {
        self.logf(Level::Trace, args)
    }

    /// Log values at `Debug`
    pub fn debug<I>(&self, values: I) -> &Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        self.log(Level::Debug, values)
    }

    /// Log a formatted message at `Debug`
    pub fn debugf(&self, args: fmt::Arguments<'_>) -> &Self {
        self.logf(Level::Debug, args)
    }

    /// Log values at `Verbose`
    pub fn verbose<I>(&self, values: I) -> &Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        self.log(Level::Verbose, values)
    }

    /// Log a formatted message at `Verbose`
    pub fn verbosef(&self, args: fmt::Arguments<'_>) -> &Self {
        self.logf(Level::Verbose, args)
    }

    /// Log values at `Info`
    pub fn info<I>(&self, values: I) -> &Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        self.log(Level::Info, values)
    }

    /// Log a formatted message at `Info`
    pub fn infof(&self, args: fmt::Arguments<'_>) -> &Self {
        self.logf(Level::Info, args)
    }

    /// Log values at `Warn`
    pub fn warn<I>(&self, values: I) -> &Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        self.log(Level::Warn, values)
    }

    /// Log a formatted message at `Warn`
    pub fn warnf(&self, args: fmt::Arguments<'_>) -> &Self {
        self.logf(Level::Warn, args)
    }

    /// Log values at `Error`
    pub fn error<I>(&self, values: I) -> &Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        self.log(Level::Error, values)
    }

    /// Log a formatted message at `Error`
    pub fn errorf(&self, args: fmt::Arguments<'_>) -> &Self {
        self.logf(Level::Error, args)
    }

    /// Log values at `Fatal` and return the terminal outcome
    ///
    /// Dispatch completes before this returns; the process exits only when
    /// the caller invokes [`Terminal::exit`].
    pub fn fatal<I>(&self, values: I) -> Terminal
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        let message = join_text(&values);
        if Level::Fatal >= self.level {
            self.emit(Level::Fatal, values);
        }
        Terminal::Fatal(message)
    }

    /// Log a formatted message at `Fatal` and return the terminal outcome
    pub fn fatalf(&self, args: fmt::Arguments<'_>) -> Terminal {
        self.fatal([args.to_string()])
    }

    /// Log values at `Panic` and return the terminal outcome
    ///
    /// [`Terminal::exit`] on the returned value panics with the rendered
    /// message.
    pub fn panic<I>(&self, values: I) -> Terminal
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        let message = join_text(&values);
        self.emit(Level::Panic, values);
        Terminal::Panic(message)
    }

    /// Log a formatted message at `Panic` and return the terminal outcome
    pub fn panicf(&self, args: fmt::Arguments<'_>) -> Terminal {
        self.panic([args.to_string()])
    }

    fn emit(&self, level: Level, values: Vec<Value>) {
        let resolver = SourceResolver::capture();
        self.targets
            .dispatch(&self.id, level, values, &self.context, resolver);
    }
}

/// Space-joined rendering of the text values, ignoring inline contexts.
fn join_text(values: &[Value]) -> String {
    let rendered: Vec<String> = values
        .iter()
        .filter(|value| matches!(value, Value::Text(_)))
        .map(ToString::to_string)
        .collect();
    rendered.join(" ")
}
