//! Recording target for tests

use std::sync::Arc;

use parking_lot::Mutex;

use super::traits::{Record, Target};
use crate::context::Context;
use crate::level::Level;
use crate::source::Source;

/// One record as retained by a [`CaptureTarget`]
#[derive(Debug, Clone)]
pub struct Captured {
    /// Identity of the logger that made the call
    pub logger_id: String,
    /// Severity of the call
    pub level: Level,
    /// Rendered positional values
    pub values: Vec<String>,
    /// Space-joined message
    pub message: String,
    /// Merged context snapshot
    pub context: Context,
    /// Resolved call site, only when the target was built `with_source(true)`
    pub source: Option<Source>,
}

/// A target that records every dispatch it receives
///
/// Clones share the same record store, so a test can keep a handle after
/// registering the target with a logger:
///
/// ```
/// use logfan_core::{CaptureTarget, Logger};
///
/// let logger = Logger::new();
/// let capture = CaptureTarget::new();
/// logger.add_target(capture.clone());
///
/// logger.info(["started"]);
/// assert_eq!(capture.last().unwrap().message, "started");
/// ```
#[derive(Clone, Default)]
pub struct CaptureTarget {
    records: Arc<Mutex<Vec<Captured>>>,
    resolve_source: bool,
}

impl CaptureTarget {
    /// Create an empty capture target
    pub fn new() -> Self {
        Self::default()
    }

    /// Also resolve and retain each record's call site
    ///
    /// Off by default so capturing stays cheap; source resolution walks the
    /// stack.
    pub fn with_source(mut self, resolve: bool) -> Self {
        self.resolve_source = resolve;
        self
    }

    /// All records captured so far, oldest first
    pub fn records(&self) -> Vec<Captured> {
        self.records.lock().clone()
    }

    /// The most recently captured record
    pub fn last(&self) -> Option<Captured> {
        self.records.lock().last().cloned()
    }

    /// Number of captured records
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Whether nothing has been captured
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Drop all captured records
    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl Target for CaptureTarget {
    fn log(&self, record: &Record) {
        let source = if self.resolve_source {
            record.source()
        } else {
            None
        };
        self.records.lock().push(Captured {
            logger_id: record.logger_id().to_string(),
            level: record.level(),
            values: record.values().iter().map(ToString::to_string).collect(),
            message: record.message(),
            context: record.context().clone(),
            source,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceResolver;
    use crate::value::Value;

    fn record(message: &str) -> Record {
        Record::new(
            "logger-1",
            Level::Info,
            vec![Value::from(message)],
            Context::with("k", "v"),
            SourceResolver::unavailable(),
        )
    }

    #[test]
    fn test_captures_in_order() {
        let capture = CaptureTarget::new();
        capture.log(&record("one"));
        capture.log(&record("two"));

        let records = capture.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].message, "one");
        assert_eq!(records[1].message, "two");
        assert_eq!(capture.last().unwrap().message, "two");
    }

    #[test]
    fn test_clones_share_records() {
        let capture = CaptureTarget::new();
        let handle = capture.clone();
        capture.log(&record("shared"));

        assert_eq!(handle.len(), 1);
        assert_eq!(handle.last().unwrap().context.get("k"), Some("v"));
    }

    #[test]
    fn test_clear_empties_the_store() {
        let capture = CaptureTarget::new();
        capture.log(&record("gone"));
        capture.clear();

        assert!(capture.is_empty());
    }

    #[test]
    fn test_source_not_resolved_by_default() {
        let capture = CaptureTarget::new();
        capture.log(&record("msg"));

        assert_eq!(capture.last().unwrap().source, None);
    }
}
