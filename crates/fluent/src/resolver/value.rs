//! Runtime argument values.

use std::collections::HashMap;
use std::fmt::{Display, Formatter, Result as FmtResult};

use fixed_decimal::{Decimal, FloatPrecision};

/// A runtime value passed as an argument to a Fluent message.
///
/// Strings are inserted verbatim; numbers are formatted for the locale and
/// can drive plural selection.
///
/// # Example
///
/// ```
/// use fluent::Value;
///
/// let count: Value = 42.into();
/// let name: Value = "Ana".into();
/// assert_eq!(count.as_integer(), Some(42));
/// assert_eq!(name.as_string(), Some("Ana"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A string, inserted without formatting.
    String(String),

    /// An integer.
    Integer(i64),

    /// A floating-point number.
    Float(f64),
}

/// Named arguments for a format call.
pub type FluentArgs = HashMap<String, Value>;

impl Value {
    /// Get this value as a string, if it is one.
    pub fn as_string(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            Value::Integer(_) | Value::Float(_) => None,
        }
    }

    /// Get this value as an integer, if it is one.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            Value::String(_) | Value::Float(_) => None,
        }
    }

    /// Decimal form of a numeric value.
    ///
    /// Returns `None` for strings and for floats that are not finite.
    pub fn to_decimal(&self) -> Option<Decimal> {
        match self {
            Value::Integer(n) => Some(Decimal::from(*n)),
            Value::Float(f) => Decimal::try_from_f64(*f, FloatPrecision::RoundTrip).ok(),
            Value::String(_) => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Value::String(s) => write!(f, "{s}"),
            Value::Integer(n) => write!(f, "{n}"),
            Value::Float(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::String(s.clone())
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(i64::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Integer(i64::from(n))
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        i64::try_from(n).map_or(Value::Float(n as f64), Value::Integer)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Float(f64::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}
