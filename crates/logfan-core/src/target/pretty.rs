//! Human-readable target

use std::io::{self, Write};

use chrono::{Local, SecondsFormat};
use parking_lot::Mutex;

use super::traits::{Record, Target};
use crate::level::Level;

const RESET: &str = "\x1b[0m";

fn level_color(level: Level) -> &'static str {
    match level {
        Level::Trace => "\x1b[35m",
        Level::Debug => "\x1b[34m",
        Level::Verbose => "\x1b[36m",
        Level::Info => "\x1b[32m",
        Level::Warn => "\x1b[33m",
        Level::Error => "\x1b[31m",
        Level::Fatal => "\x1b[37m\x1b[41;1m",
        Level::Panic => "\x1b[37m\x1b[45;1m",
    }
}

fn paint(color: &str, text: &str) -> String {
    format!("{color}{text}{RESET}")
}

/// Newline-separated human-readable output, suitable for a terminal
///
/// Renders `timestamp level message key=value... @ function - file:line`
/// with every field individually toggleable. `Warn` and above go to the
/// error stream, everything below to the primary stream. The target keeps
/// its own severity floor, independent of any logger's.
///
/// ```no_run
/// use logfan_core::{Level, Logger, PrettyTarget};
///
/// let logger = Logger::new();
/// logger.add_target(
///     PrettyTarget::stdio()
///         .with_level(Level::Debug)
///         .show_source(true),
/// );
/// ```
pub struct PrettyTarget<O, E> {
    out: Mutex<O>,
    err: Mutex<E>,
    level: Level,
    show_timestamp: bool,
    show_level: bool,
    show_context: bool,
    context_keys: Vec<String>,
    use_color: bool,
    show_source: bool,
}

impl PrettyTarget<io::Stdout, io::Stderr> {
    /// A pretty target writing to stdout and stderr
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr())
    }
}

impl<O, E> PrettyTarget<O, E> {
    /// Create a pretty target over a primary and an error stream
    pub fn new(out: O, err: E) -> Self {
        Self {
            out: Mutex::new(out),
            err: Mutex::new(err),
            level: Level::Trace,
            show_timestamp: true,
            show_level: true,
            show_context: true,
            context_keys: Vec::new(),
            use_color: true,
            show_source: false,
        }
    }

    /// Set this target's own minimum level
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Enable or disable the timestamp field
    pub fn show_timestamp(mut self, show: bool) -> Self {
        self.show_timestamp = show;
        self
    }

    /// Enable or disable the level label
    pub fn show_level(mut self, show: bool) -> Self {
        self.show_level = show;
        self
    }

    /// Enable or disable context key/value pairs
    pub fn show_context(mut self, show: bool) -> Self {
        self.show_context = show;
        self
    }

    /// Limit the context keys shown to the given set
    ///
    /// An empty selection means no restriction.
    pub fn select_context<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.context_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Enable or disable ANSI colors
    pub fn use_color(mut self, color: bool) -> Self {
        self.use_color = color;
        self
    }

    /// Enable or disable call-site display
    ///
    /// Only when enabled does this target resolve the record's source.
    pub fn show_source(mut self, show: bool) -> Self {
        self.show_source = show;
        self
    }

    fn render(&self, record: &Record) -> String {
        let mut line = String::new();

        if self.show_timestamp {
            line.push_str(&Local::now().to_rfc3339_opts(SecondsFormat::Secs, false));
            line.push(' ');
        }

        if self.show_level {
            let name = record.level().name();
            // pad to the widest level name so messages line up
            let pad = 7usize.saturating_sub(name.len());
            if self.use_color {
                line.push_str(&paint(level_color(record.level()), name));
            } else {
                line.push_str(name);
            }
            for _ in 0..=pad {
                line.push(' ');
            }
        }

        line.push_str(&record.message());

        if self.show_context {
            for (key, value) in record.context().iter() {
                if !self.context_keys.is_empty()
                    && !self.context_keys.iter().any(|selected| selected == key)
                {
                    continue;
                }
                line.push(' ');
                if self.use_color {
                    line.push_str(&paint(level_color(record.level()), key));
                } else {
                    line.push_str(key);
                }
                line.push('=');
                line.push_str(&value.replace('\n', "\\n"));
            }
        }

        if self.show_source {
            if let Some(source) = record.source() {
                let line_no = source.line.to_string();
                if self.use_color {
                    line.push_str(&format!(
                        " {} {} - {}:{}",
                        paint("\x1b[90m", "@"),
                        paint("\x1b[32m", &source.function),
                        paint("\x1b[33m", &source.file),
                        paint("\x1b[35m", &line_no),
                    ));
                } else {
                    line.push_str(&format!(
                        " @ {} - {}:{}",
                        source.function, source.file, line_no
                    ));
                }
            }
        }

        line.push('\n');
        line
    }
}

impl<O: Write + Send, E: Write + Send> Target for PrettyTarget<O, E> {
    fn log(&self, record: &Record) {
        if record.level() < self.level {
            return;
        }
        let line = self.render(record);
        // Write failures are dropped; a logging sink has nowhere to report them.
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
    }

    fn record(level: Level, message: &str, context: Context) -> Record {
        Record::new(
            "logger-1",
            level,
            vec![Value::from(message)],
            context,
            SourceResolver::unavailable(),
        )
    }

    fn plain_target(out: &SharedBuf, err: &SharedBuf) -> PrettyTarget<SharedBuf, SharedBuf> {
        PrettyTarget::new(out.clone(), err.clone())
            .show_timestamp(false)
            .use_color(false)
    }

    #[test]
    fn test_renders_level_message_and_context() {
        let (out, err) = (SharedBuf::default(), SharedBuf::default());
        let target = plain_target(&out, &err);

        target.log(&record(Level::Info, "ready", Context::with("port", 8080)));

        assert_eq!(out.contents(), "info    ready port=8080\n");
        assert!(err.contents().is_empty());
    }

    #[test]
    fn test_warn_and_above_route_to_the_error_stream() {
        let (out, err) = (SharedBuf::default(), SharedBuf::default());
        let target = plain_target(&out, &err);

        target.log(&record(Level::Info, "fine", Context::new()));
        target.log(&record(Level::Warn, "careful", Context::new()));
        target.log(&record(Level::Error, "broken", Context::new()));

        assert_eq!(out.contents(), "info    fine\n");
        assert_eq!(err.contents(), "warn    careful\nerror   broken\n");
    }

    #[test]
    fn test_target_floor_is_independent() {
        let (out, err) = (SharedBuf::default(), SharedBuf::default());
        let target = plain_target(&out, &err).with_level(Level::Warn);

        target.log(&record(Level::Info, "hidden", Context::new()));

        assert!(out.contents().is_empty());
        assert!(err.contents().is_empty());
    }

    #[test]
    fn test_select_context_limits_shown_keys() {
        let (out, err) = (SharedBuf::default(), SharedBuf::default());
        let target = plain_target(&out, &err).select_context(["request"]);

        let context = Context::new().set("request", "42").set("noise", "much");
        target.log(&record(Level::Info, "msg", context));

        assert_eq!(out.contents(), "info    msg request=42\n");
    }

    #[test]
    fn test_context_values_escape_newlines() {
        let (out, err) = (SharedBuf::default(), SharedBuf::default());
        let target = plain_target(&out, &err);

        target.log(&record(Level::Info, "msg", Context::with("body", "a\nb")));

        assert_eq!(out.contents(), "info    msg body=a\\nb\n");
    }

    #[test]
    fn test_color_wraps_the_level_label() {
        let (out, err) = (SharedBuf::default(), SharedBuf::default());
        let target = PrettyTarget::new(out.clone(), err.clone()).show_timestamp(false);

        target.log(&record(Level::Info, "msg", Context::new()));

        assert!(out.contents().starts_with("\x1b[32minfo\x1b[0m"));
    }

    #[test]
    fn test_disabled_fields_are_omitted() {
        let (out, err) = (SharedBuf::default(), SharedBuf::default());
        let target = plain_target(&out, &err).show_level(false).show_context(false);

        target.log(&record(Level::Info, "bare", Context::with("k", "v")));

        assert_eq!(out.contents(), "bare\n");
    }

    #[test]
    fn test_timestamp_prefix_is_rfc3339() {
        let (out, err) = (SharedBuf::default(), SharedBuf::default());
        let target = PrettyTarget::new(out.clone(), err.clone())
            .use_color(false)
            .show_level(false)
            .show_context(false);

        target.log(&record(Level::Info, "msg", Context::new()));

        let line = out.contents();
        let timestamp = line.split(' ').next().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
    }

    #[test]
    fn test_source_is_omitted_when_unresolvable() {
        let (out, err) = (SharedBuf::default(), SharedBuf::default());
        let target = plain_target(&out, &err).show_source(true);

        target.log(&record(Level::Info, "msg", Context::new()));

        assert_eq!(out.contents(), "info    msg\n");
    }

    #[test]
    fn test_source_is_rendered_when_enabled() {
        let (out, err) = (SharedBuf::default(), SharedBuf::default());
        let target = plain_target(&out, &err).show_source(true);

        let record = Record::new(
            "logger-1",
            Level::Info,
            vec![Value::from("msg")],
            Context::new(),
            SourceResolver::capture(),
        );
        target.log(&record);

        let line = out.contents();
        assert!(line.contains(" @ "), "missing source segment: {line}");
        assert!(line.contains(".rs:"), "missing file:line: {line}");
    }
}
