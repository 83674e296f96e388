//! # Field Values
//!
//! The tagged union stored in every data, change and value map of a
//! changeset. Serialized untagged so values read and write as plain JSON or
//! YAML scalars (`null`, `true`, `42`, `4.5`, `"text"`).

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single field value.
///
/// `Number` holds integers and `Float` holds real numbers; the two never
/// compare equal to each other even when numerically identical.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// No value. Also the sentinel returned by converters that cannot parse
    /// their input.
    #[default]
    Null,
    /// A boolean flag.
    Boolean(bool),
    /// An integer.
    Number(i64),
    /// A floating point number.
    Float(f64),
    /// Free text.
    Text(String),
}

impl Value {
    /// Whether this is `Value::Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The text payload, if this is a `Text` value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The integer payload, if this is a `Number` value.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// A numeric view of `Number` and `Float` values.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Identity comparison used to decide whether a change is pending.
    ///
    /// Like `==`, except floats compare by bit pattern so a `NaN` equals
    /// itself.
    pub fn same_as(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            _ => self == other,
        }
    }

    /// Lower-case name of the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean(_) => "boolean",
            Self::Number(_) => "number",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
        }
    }
}

/// Renders the value the way an input widget would show it. `Null` renders
/// as the empty string.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

// ─── Conversions ─────────────────────────────────────────────────────

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}
