//! Scalar cell values and column kinds

use std::fmt;
use std::hash::{Hash, Hasher};

/// A single cell of a [`Dataset`](super::Dataset)
///
/// Equality and hashing follow duplicate-detection semantics rather than
/// IEEE rules: every NaN equals every other NaN and `-0.0` equals `0.0`.
#[derive(Clone, Debug)]
pub enum Value {
    Null,
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Bit pattern used for comparing floats
    fn float_key(f: f64) -> u64 {
        if f.is_nan() {
            f64::NAN.to_bits()
        } else if f == 0.0 {
            0.0f64.to_bits()
        } else {
            f.to_bits()
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => Self::float_key(*a) == Self::float_key(*b),
            (Value::Text(a), Value::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Integer(i) => i.hash(state),
            Value::Float(f) => Self::float_key(*f).hash(state),
            Value::Text(s) => s.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Storage kind of a column
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    Integer,
    Float,
    Text,
}

impl ColumnKind {
    /// Infer the narrowest kind that holds every non-null text value
    ///
    /// A column with no non-null values is `Float`, the kind a column of
    /// missing numbers takes.
    pub fn infer<'a>(values: impl IntoIterator<Item = Option<&'a str>>) -> Self {
        let mut kind = ColumnKind::Integer;
        let mut seen = false;

        for value in values.into_iter().flatten() {
            seen = true;
            let value = value.trim();
            match kind {
                ColumnKind::Integer if value.parse::<i64>().is_ok() => {}
                ColumnKind::Integer | ColumnKind::Float if value.parse::<f64>().is_ok() => {
                    kind = ColumnKind::Float;
                }
                _ => return ColumnKind::Text,
            }
        }

        if seen { kind } else { ColumnKind::Float }
    }

    /// Parse a raw text cell into a value of this kind
    ///
    /// Text that does not parse as the column's number kind becomes `Null`.
    pub fn parse(&self, text: Option<&str>) -> Value {
        let Some(text) = text else {
            return Value::Null;
        };

        match self {
            ColumnKind::Integer => text.trim().parse().map(Value::Integer).unwrap_or_else(|_| {
                log::warn!("Could not parse '{}' as an integer, storing NULL", text);
                Value::Null
            }),
            ColumnKind::Float => text.trim().parse().map(Value::Float).unwrap_or_else(|_| {
                log::warn!("Could not parse '{}' as a float, storing NULL", text);
                Value::Null
            }),
            ColumnKind::Text => Value::Text(text.to_string()),
        }
    }

    /// SQL Server column type used when creating a table
    pub fn sql_type(&self) -> &'static str {
        match self {
            ColumnKind::Integer => "BIGINT",
            ColumnKind::Float => "FLOAT",
            ColumnKind::Text => "NVARCHAR(MAX)",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Integer => write!(f, "integer"),
            ColumnKind::Float => write!(f, "float"),
            ColumnKind::Text => write!(f, "text"),
        }
    }
}
