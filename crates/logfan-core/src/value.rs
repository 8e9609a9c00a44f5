//! Positional log values

use std::fmt;

use crate::context::Context;

/// A positional value passed to a log call
///
/// Most values are plain text, stringified at the call site. A value may
/// instead be a [`Context`]: dispatch splices those out of the positional
/// sequence and merges them into the call's context, so targets never see
/// them as message values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Rendered text
    Text(String),
    /// Inline context, extracted and merged during dispatch
    Ctx(Context),
}

impl Value {
    /// Stringify any displayable value
    ///
    /// Covers types without a dedicated `From` conversion.
    pub fn display(value: impl fmt::Display) -> Self {
        Value::Text(value.to_string())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(text) => f.write_str(text),
            Value::Ctx(ctx) => {
                let mut first = true;
                for (key, value) in ctx.iter() {
                    if !first {
                        f.write_str(" ")?;
                    }
                    write!(f, "{key}={value}")?;
                    first = false;
                }
                Ok(())
            }
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

impl From<&String> for Value {
    fn from(text: &String) -> Self {
        Value::Text(text.clone())
    }
}

impl From<Context> for Value {
    fn from(ctx: Context) -> Self {
        Value::Ctx(ctx)
    }
}

impl From<&Context> for Value {
    fn from(ctx: &Context) -> Self {
        Value::Ctx(ctx.clone())
    }
}

macro_rules! impl_value_from_display {
    ($($ty:ty),+) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Text(value.to_string())
                }
            }
        )+
    };
}

impl_value_from_display!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char
);

/// Build an array of [`Value`]s from mixed arguments
///
/// ```
/// use logfan_core::{ctx, values, Logger};
///
/// let logger = Logger::new();
/// logger.info(values!["started", ctx! { "request" => "42" }]);
/// ```
#[macro_export]
macro_rules! values {
    () => { ::std::iter::empty::<$crate::Value>() };
    ($($value:expr),+ $(,)?) => {
        [$($crate::Value::from($value)),+]
    };
}
