//! # Type Coercion Registry
//!
//! Maps a semantic field type to its default value and the converter pair
//! between a stored [`Value`] and its input representation.
//!
//! | type      | default | to input       | from input     |
//! |-----------|---------|----------------|----------------|
//! | `text`    | `""`    | stringify      | identity       |
//! | `number`  | `0`     | stringify      | parse integer  |
//! | `float`   | `0.0`   | stringify      | parse float    |
//! | `boolean` | `false` | identity       | identity       |
//!
//! Any other type name resolves to the fallback descriptor: default `Null`,
//! stringify, identity. Parse failures return the `Null` sentinel rather
//! than an error; a field that must reject unparsable input adds a
//! validator for it.
//!
//! The registry is built once per process ([`TypeRegistry::global`]) and is
//! read-only afterwards. Per-field [`TypeOptions`] override any entry.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use changeset_core::Value;
use serde::{Deserialize, Serialize};

/// A value converter shared between field configurations.
pub type Converter = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

// ─── Field Type ──────────────────────────────────────────────────────

/// The declared type of a field.
///
/// Serialized as its lower-case name; any unrecognised name round-trips as
/// `Custom`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    Text,
    Number,
    Float,
    Boolean,
    /// A caller-defined type name with no registry entry.
    Custom(String),
}

impl FieldType {
    /// The type's name as written in a schema.
    pub fn name(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Custom(name) => name,
        }
    }
}

impl From<&str> for FieldType {
    fn from(name: &str) -> Self {
        match name {
            "text" => Self::Text,
            "number" => Self::Number,
            "float" => Self::Float,
            "boolean" => Self::Boolean,
            other => Self::Custom(other.to_string()),
        }
    }
}

impl From<String> for FieldType {
    fn from(name: String) -> Self {
        Self::from(name.as_str())
    }
}

impl From<FieldType> for String {
    fn from(ty: FieldType) -> Self {
        ty.name().to_string()
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ─── Converters ──────────────────────────────────────────────────────

/// Generic to-string conversion. `Null` becomes the empty string and text
/// passes through untouched.
fn stringify(value: &Value) -> Value {
    match value {
        Value::Null => Value::Text(String::new()),
        Value::Text(s) => Value::Text(s.clone()),
        other => Value::Text(other.to_string()),
    }
}

fn identity(value: &Value) -> Value {
    value.clone()
}

fn parse_integer(value: &Value) -> Value {
    match value {
        Value::Number(n) => Value::Number(*n),
        Value::Float(x) if x.is_finite() => Value::Number(x.trunc() as i64),
        Value::Text(s) => s.trim().parse::<i64>().map_or(Value::Null, Value::Number),
        _ => Value::Null,
    }
}

fn parse_float(value: &Value) -> Value {
    match value {
        Value::Float(x) => Value::Float(*x),
        Value::Number(n) => Value::Float(*n as f64),
        Value::Text(s) => s.trim().parse::<f64>().map_or(Value::Null, Value::Float),
        _ => Value::Null,
    }
}

// ─── Descriptors ─────────────────────────────────────────────────────

/// Default value and converter pair bound to a field type.
#[derive(Clone)]
pub struct TypeDescriptor {
    pub default: Value,
    /// Value → input representation.
    pub to_input: Converter,
    /// Input representation → value.
    pub from_input: Converter,
}

impl TypeDescriptor {
    fn new(
        default: Value,
        to_input: fn(&Value) -> Value,
        from_input: fn(&Value) -> Value,
    ) -> Self {
        Self {
            default,
            to_input: Arc::new(to_input),
            from_input: Arc::new(from_input),
        }
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("default", &self.default)
            .finish_non_exhaustive()
    }
}

/// Per-field overrides applied on top of the registry entry.
#[derive(Clone, Default)]
pub struct TypeOptions {
    pub value: Option<Value>,
    pub to_input: Option<Converter>,
    pub from_input: Option<Converter>,
}

impl TypeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the default value.
    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Override the value → input converter.
    pub fn to_input<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.to_input = Some(Arc::new(f));
        self
    }

    /// Override the input → value converter.
    pub fn from_input<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.from_input = Some(Arc::new(f));
        self
    }

    /// Resolve these options against a registry entry.
    pub fn apply(&self, base: &TypeDescriptor) -> TypeDescriptor {
        TypeDescriptor {
            default: self.value.clone().unwrap_or_else(|| base.default.clone()),
            to_input: self.to_input.clone().unwrap_or_else(|| base.to_input.clone()),
            from_input: self
                .from_input
                .clone()
                .unwrap_or_else(|| base.from_input.clone()),
        }
    }
}

impl fmt::Debug for TypeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeOptions")
            .field("value", &self.value)
            .field("to_input", &self.to_input.is_some())
            .field("from_input", &self.from_input.is_some())
            .finish()
    }
}

// ─── Registry ────────────────────────────────────────────────────────

/// Immutable mapping from field type to its descriptor.
#[derive(Debug)]
pub struct TypeRegistry {
    entries: HashMap<FieldType, TypeDescriptor>,
    fallback: TypeDescriptor,
}

impl TypeRegistry {
    /// The process-wide registry, built on first use.
    pub fn global() -> &'static TypeRegistry {
        static REGISTRY: OnceLock<TypeRegistry> = OnceLock::new();
        REGISTRY.get_or_init(TypeRegistry::builtin)
    }

    fn builtin() -> Self {
        let mut entries = HashMap::new();
        entries.insert(
            FieldType::Text,
            TypeDescriptor::new(Value::Text(String::new()), stringify, identity),
        );
        entries.insert(
            FieldType::Number,
            TypeDescriptor::new(Value::Number(0), stringify, parse_integer),
        );
        entries.insert(
            FieldType::Float,
            TypeDescriptor::new(Value::Float(0.0), stringify, parse_float),
        );
        entries.insert(
            FieldType::Boolean,
            TypeDescriptor::new(Value::Boolean(false), identity, identity),
        );
        Self {
            entries,
            fallback: TypeDescriptor::new(Value::Null, stringify, identity),
        }
    }

    /// Descriptor for `ty`, or the fallback for unregistered types.
    pub fn lookup(&self, ty: &FieldType) -> &TypeDescriptor {
        self.entries.get(ty).unwrap_or(&self.fallback)
    }

    pub fn is_registered(&self, ty: &FieldType) -> bool {
        self.entries.contains_key(ty)
    }
}
