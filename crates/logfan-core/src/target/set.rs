//! Shared target registry and dispatch fan-out

use parking_lot::Mutex;

use super::traits::{Record, Target};
use crate::context::Context;
use crate::level::Level;
use crate::source::SourceResolver;
use crate::value::Value;

/// Ordered registry of targets shared by a family of loggers
///
/// Registration order is dispatch order. The mutex serializes registration
/// against dispatch, so a target is never appended mid-iteration and no
/// dispatch observes a torn list. Targets are appended for the lifetime of
/// the set, never removed.
#[derive(Default)]
pub(crate) struct TargetSet {
    targets: Mutex<Vec<Box<dyn Target>>>,
}

impl TargetSet {
    pub(crate) fn new() -> Self {
        Self {
            targets: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn add(&self, target: Box<dyn Target>) {
        self.targets.lock().push(target);
    }

    /// Fan one call out to every registered target, in registration order
    ///
    /// Inline contexts are spliced out of the positional values here:
    /// each `Value::Ctx` is removed from the sequence and merged into the
    /// call context in encounter order, left to right, later ones winning
    /// on key collisions. The lock is held across all target invocations.
    pub(crate) fn dispatch(
        &self,
        logger_id: &str,
        level: Level,
        values: Vec<Value>,
        context: &Context,
        resolver: SourceResolver,
    ) {
        let targets = self.targets.lock();

        let mut merged = context.clone();
        let mut remaining = Vec::with_capacity(values.len());
        for value in values {
            match value {
                Value::Ctx(inline) => merged = merged.extend(&inline),
                other => remaining.push(other),
            }
        }

        let record = Record::new(logger_id, level, remaining, merged, resolver);
        for target in targets.iter() {
            target.log(&record);
        }
    }
}
