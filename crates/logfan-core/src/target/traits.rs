//! Target trait definition and the record a target observes

use crate::context::Context;
use crate::level::Level;
use crate::source::{Source, SourceResolver};
use crate::value::Value;

/// A single dispatched log call, as observed by a target
///
/// Constructed fresh for every dispatch and handed to each registered target
/// by shared reference; the core never retains it. Inline contexts have
/// already been spliced out of [`values`] and merged into [`context`] by the
/// time a target sees the record.
///
/// [`values`]: Record::values
/// [`context`]: Record::context
#[derive(Debug)]
pub struct Record {
    logger_id: String,
    level: Level,
    values: Vec<Value>,
    context: Context,
    resolver: SourceResolver,
}

impl Record {
    /// Build a record by hand
    ///
    /// Dispatch builds records itself; this constructor exists so target
    /// implementations can be unit tested without a logger. Pass
    /// [`SourceResolver::unavailable`] when the call site doesn't matter.
    pub fn new(
        logger_id: impl Into<String>,
        level: Level,
        values: Vec<Value>,
        context: Context,
        resolver: SourceResolver,
    ) -> Self {
        Self {
            logger_id: logger_id.into(),
            level,
            values,
            context,
            resolver,
        }
    }

    /// Identity of the logger that made the call
    pub fn logger_id(&self) -> &str {
        &self.logger_id
    }

    /// Severity of the call
    pub fn level(&self) -> Level {
        self.level
    }

    /// Positional values, with inline contexts already extracted
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Merged context snapshot for the call
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Space-joined rendering of the positional values
    pub fn message(&self) -> String {
        let rendered: Vec<String> = self.values.iter().map(Value::to_string).collect();
        rendered.join(" ")
    }

    /// Resolve the call site, lazily
    ///
    /// The first call symbolicates the captured stack; every call after that
    /// returns the memoized answer, so asking from several targets costs one
    /// resolution. Only call this when source display is actually enabled.
    pub fn source(&self) -> Option<Source> {
        self.resolver.resolve()
    }
}

/// A sink for dispatched log records
///
/// Implementations decide independently whether and how to render each
/// record. The contract:
///
/// - Apply your own minimum-level filter; it is independent of the logger's.
/// - Do not block indefinitely: the dispatch lock is held across every
///   target's `log` call, so a stalled target stalls all loggers sharing
///   the set.
/// - Treat [`Record::source`] as optional and call it only when source
///   display is enabled; resolution walks the stack.
/// - Route `Warn` and above to your secondary (error) stream, everything
///   below to the primary.
/// - Do not panic across this boundary uncontrolled; a write failure is
///   yours to drop, report, or escalate.
pub trait Target: Send + Sync {
    /// Handle one dispatched record
    fn log(&self, record: &Record);
}
