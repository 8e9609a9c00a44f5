//! Logfan Core
//!
//! Structured, leveled logging with fan-out to independent targets.
//! A [`Logger`] carries a severity floor and an immutable key/value
//! [`Context`]; every call dispatches to the targets registered with its
//! shared target set, and each target filters and renders on its own.
//!
//! ## Context propagation
//!
//! Contexts fork without ever being shared mutably: [`Logger::with_context`]
//! derives a child logger whose context is a copy-on-extend merge, while the
//! target set stays shared across the whole logger family.
//!
//! ```
//! use logfan_core::{ctx, values, CaptureTarget, Logger};
//!
//! let logger = Logger::new();
//! let capture = CaptureTarget::new();
//! logger.add_target(capture.clone());
//!
//! let request_logger = logger.with_context(&ctx! { "request" => "42" });
//! request_logger.info(values!["started"]);
//!
//! let record = capture.last().unwrap();
//! assert_eq!(record.message, "started");
//! assert_eq!(record.context.get("request"), Some("42"));
//! ```
//!
//! Call sites are captured as unresolved stack snapshots and symbolicated
//! only if a target asks, so source display costs nothing when disabled.

pub mod context;
pub mod level;
pub mod logger;
pub mod source;
pub mod target;
pub mod value;

// Re-export commonly used types
pub use context::Context;
pub use level::Level;
pub use logger::{Logger, Terminal};
pub use source::{Source, SourceResolver};
pub use target::{CaptureTarget, Captured, JsonTarget, PrettyTarget, Record, Target};
pub use value::Value;
