//! Structured JSON target

use std::io::{self, Write};

use chrono::{Local, SecondsFormat};
use parking_lot::Mutex;
use serde_json::{json, Map};

use super::traits::{Record, Target};
use crate::level::Level;

/// One JSON object per log call, newline separated
///
/// Emitted fields, each individually toggleable: `time` (RFC3339), `level`
/// (name string), `message` (space-joined values), `context` (object),
/// `loggerID`, and `source` (`{function, file, line}`). Stream routing
/// matches [`PrettyTarget`]: `Warn` and above to the error stream.
///
/// [`PrettyTarget`]: super::pretty::PrettyTarget
pub struct JsonTarget<O, E> {
    out: Mutex<O>,
    err: Mutex<E>,
    level: Level,
    show_timestamp: bool,
    show_level: bool,
    show_context: bool,
    show_logger_id: bool,
    show_source: bool,
}

impl JsonTarget<io::Stdout, io::Stderr> {
    /// A JSON target writing to stdout and stderr
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr())
    }
}

impl<O, E> JsonTarget<O, E> {
    /// Create a JSON target over a primary and an error stream
    pub fn new(out: O, err: E) -> Self {
        Self {
            out: Mutex::new(out),
            err: Mutex::new(err),
            level: Level::Trace,
            show_timestamp: true,
            show_level: true,
            show_context: true,
            show_logger_id: true,
            show_source: false,
        }
    }

    /// Set this target's own minimum level
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Enable or disable the `time` field
    pub fn show_timestamp(mut self, show: bool) -> Self {
        self.show_timestamp = show;
        self
    }

    /// Enable or disable the `level` field
    pub fn show_level(mut self, show: bool) -> Self {
        self.show_level = show;
        self
    }

    /// Enable or disable the `context` field
    pub fn show_context(mut self, show: bool) -> Self {
        self.show_context = show;
        self
    }

    /// Enable or disable the `loggerID` field
    pub fn show_logger_id(mut self, show: bool) -> Self {
        self.show_logger_id = show;
        self
    }

    /// Enable or disable the `source` field
    ///
    /// Only when enabled does this target resolve the record's source.
    pub fn show_source(mut self, show: bool) -> Self {
        self.show_source = show;
        self
    }

    fn render(&self, record: &Record) -> Option<String> {
        let mut object = Map::new();
        if self.show_timestamp {
            object.insert(
                "time".to_string(),
                json!(Local::now().to_rfc3339_opts(SecondsFormat::Secs, false)),
            );
        }
        if self.show_level {
            object.insert("level".to_string(), json!(record.level().name()));
        }
        object.insert("message".to_string(), json!(record.message()));
        if self.show_context {
            let context = serde_json::to_value(record.context()).ok()?;
            object.insert("context".to_string(), context);
        }
        if self.show_logger_id {
            object.insert("loggerID".to_string(), json!(record.logger_id()));
        }
        if self.show_source {
            if let Some(source) = record.source() {
                object.insert("source".to_string(), serde_json::to_value(source).ok()?);
            }
        }

        let mut line = serde_json::to_string(&object).ok()?;
        line.push('\n');
        Some(line)
    }
}

impl<O: Write + Send, E: Write + Send> Target for JsonTarget<O, E> {
    fn log(&self, record: &Record) {
        if record.level() < self.level {
            return;
        }
        // A record that fails to serialize is dropped, not escalated.
        let Some(line) = self.render(record) else {
            return;
        };
        if record.level() >= Level::Warn {
            let _ = self.err.lock().write_all(line.as_bytes());
        } else {
            let _ = self.out.lock().write_all(line.as_bytes());
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::context::Context;
    use crate::source::SourceResolver;
    use crate::value::Value;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().clone()).unwrap()
        }

        fn parsed(&self) -> serde_json::Value {
            let contents = self.contents();
            serde_json::from_str(contents.lines().next().unwrap()).unwrap()
        }
    }

    fn record(level: Level, values: Vec<Value>, context: Context) -> Record {
        Record::new("logger-1", level, values, context, SourceResolver::unavailable())
    }

    #[test]
    fn test_emits_one_json_object_per_line() {
        let (out, err) = (SharedBuf::default(), SharedBuf::default());
        let target = JsonTarget::new(out.clone(), err.clone()).show_timestamp(false);

        target.log(&record(
            Level::Info,
            vec![Value::from("job"), Value::from("done")],
            Context::with("queue", "emails"),
        ));

        let object = out.parsed();
        assert_eq!(object["level"], "info");
        assert_eq!(object["message"], "job done");
        assert_eq!(object["context"]["queue"], "emails");
        assert_eq!(object["loggerID"], "logger-1");
        assert!(object.get("time").is_none());
        assert!(object.get("source").is_none());
    }

    #[test]
    fn test_timestamp_field_is_rfc3339() {
        let (out, err) = (SharedBuf::default(), SharedBuf::default());
        let target = JsonTarget::new(out.clone(), err.clone());

        target.log(&record(Level::Info, vec![Value::from("m")], Context::new()));

        let object = out.parsed();
        let time = object["time"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(time).is_ok());
    }

    #[test]
    fn test_warn_and_above_route_to_the_error_stream() {
        let (out, err) = (SharedBuf::default(), SharedBuf::default());
        let target = JsonTarget::new(out.clone(), err.clone()).show_timestamp(false);

        target.log(&record(Level::Warn, vec![Value::from("careful")], Context::new()));

        assert!(out.contents().is_empty());
        assert_eq!(err.parsed()["message"], "careful");
    }

    #[test]
    fn test_target_floor_is_independent() {
        let (out, err) = (SharedBuf::default(), SharedBuf::default());
        let target = JsonTarget::new(out.clone(), err.clone()).with_level(Level::Error);

        target.log(&record(Level::Info, vec![Value::from("hidden")], Context::new()));

        assert!(out.contents().is_empty());
        assert!(err.contents().is_empty());
    }

    #[test]
    fn test_disabled_fields_are_omitted() {
        let (out, err) = (SharedBuf::default(), SharedBuf::default());
        let target = JsonTarget::new(out.clone(), err.clone())
            .show_timestamp(false)
            .show_level(false)
            .show_context(false)
            .show_logger_id(false);

        target.log(&record(
            Level::Info,
            vec![Value::from("bare")],
            Context::with("k", "v"),
        ));

        let object = out.parsed();
        assert_eq!(
            object.as_object().unwrap().keys().collect::<Vec<_>>(),
            vec!["message"]
        );
    }

    #[test]
    fn test_source_field_when_enabled_and_resolvable() {
        let (out, err) = (SharedBuf::default(), SharedBuf::default());
        let target = JsonTarget::new(out.clone(), err.clone())
            .show_timestamp(false)
            .show_source(true);

        let record = Record::new(
            "logger-1",
            Level::Info,
            vec![Value::from("m")],
            Context::new(),
            SourceResolver::capture(),
        );
        target.log(&record);

        let object = out.parsed();
        let source = object["source"].as_object().unwrap();
        assert!(source["file"].as_str().unwrap().ends_with(".rs"));
        assert!(source["line"].as_u64().unwrap() > 0);
        assert!(!source["function"].as_str().unwrap().is_empty());
    }
}
