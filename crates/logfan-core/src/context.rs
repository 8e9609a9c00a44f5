//! Immutable key/value context attached to log records

use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Immutable string-keyed context data carried by a logger
///
/// A `Context` is never mutated once handed to a logger; [`extend`] produces
/// a fresh copy with updates overlaid, so derived loggers never share mutable
/// backing storage with their parent.
///
/// Entries set with [`unset`] are tombstones: they only matter when the
/// context is used as an update, where they delete the key from the extended
/// result. Contexts produced by [`extend`] never contain tombstones.
///
/// [`extend`]: Context::extend
/// [`unset`]: Context::unset
#[derive(Debug, Clone, Default)]
pub struct Context {
    entries: BTreeMap<String, Option<String>>,
}

impl Context {
    /// Create an empty context
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Create a context holding a single key/value pair
    pub fn with(key: impl Into<String>, value: impl ToString) -> Self {
        Self::new().set(key, value)
    }

    /// Add a key/value pair, consuming and returning the context
    ///
    /// The value is stringified at insertion; anything `Display` works.
    pub fn set(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.entries.insert(key.into(), Some(value.to_string()));
        self
    }

    /// Record a deletion for `key`
    ///
    /// When this context is merged into another via [`Context::extend`], the
    /// key is removed from the result.
    pub fn unset(mut self, key: impl Into<String>) -> Self {
        self.entries.insert(key.into(), None);
        self
    }

    /// Overlay `updates` onto this context, returning a new context
    ///
    /// Keys present here but absent from `updates` carry over unchanged.
    /// A set entry in `updates` overrides any inherited value; a tombstone
    /// deletes the key. Tombstones never survive into the result.
    pub fn extend(&self, updates: &Context) -> Context {
        let mut entries: BTreeMap<String, Option<String>> = self
            .entries
            .iter()
            .filter(|(_, value)| value.is_some())
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        for (key, value) in &updates.entries {
            match value {
                Some(value) => {
                    entries.insert(key.clone(), Some(value.clone()));
                }
                None => {
                    entries.remove(key);
                }
            }
        }

        Context { entries }
    }

    /// Look up the value for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        match self.entries.get(key) {
            Some(Some(value)) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Whether `key` has a value (tombstones don't count)
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Number of present entries
    pub fn len(&self) -> usize {
        self.entries.values().filter(|value| value.is_some()).count()
    }

    /// Whether the context has no present entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over present entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .filter_map(|(key, value)| value.as_deref().map(|value| (key.as_str(), value)))
    }
}

/// Contexts compare by their present key/value pairs, independent of how
/// they were built. Tombstones don't participate.
impl PartialEq for Context {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl Eq for Context {}

impl Serialize for Context {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Build a [`Context`] from `key => value` pairs
///
/// ```
/// use logfan_core::ctx;
///
/// let ctx = ctx! { "request" => "42", "attempt" => 2 };
/// assert_eq!(ctx.get("attempt"), Some("2"));
/// ```
///
/// Deletions are explicit: `ctx! { "a" => 1 }.unset("stale")`.
#[macro_export]
macro_rules! ctx {
    () => { $crate::Context::new() };
    ($($key:expr => $value:expr),+ $(,)?) => {
        $crate::Context::new()$(.set($key, $value))+
    };
}
