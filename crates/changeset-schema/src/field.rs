//! # Field Configuration Builder
//!
//! A field is declared as a key plus an ordered list of [`Modifier`]s:
//!
//! ```rust
//! use changeset_schema::{field, field_type, label, required, validation, TypeOptions};
//!
//! let builder = field(
//!     "lastName",
//!     [
//!         label("Last Name"),
//!         field_type("text", TypeOptions::new().value("Smith")),
//!         validation([required()]),
//!     ],
//! );
//! let config = builder.build();
//! assert_eq!(config.value().to_string(), "Smith");
//! ```
//!
//! Building always starts from the implicit defaults `label(key)`,
//! `field_type("text")` and `validation([])`, then applies the caller's
//! modifiers left to right, so a later modifier overrides an earlier one.
//! The validator list is compiled last, against the field's final type,
//! label and converters.

use std::fmt;

use changeset_core::{Outcome, Value};
use tracing::trace;

use crate::pipeline::{pipe, Pipeline, ValidationContext, Validator};
use crate::registry::{Converter, FieldType, TypeOptions, TypeRegistry};

// ─── Modifiers ───────────────────────────────────────────────────────

/// One step in building a field configuration.
#[derive(Debug, Clone)]
pub enum Modifier {
    /// Set the display label.
    Label(String),
    /// Set the type, resetting default value and converters from the
    /// registry before applying `options`.
    Type {
        field_type: FieldType,
        options: TypeOptions,
    },
    /// Replace the validator list.
    Validation(Vec<Validator>),
}

pub fn label(text: impl Into<String>) -> Modifier {
    Modifier::Label(text.into())
}

/// Declare the field's type by name (`"text"`, `"number"`, `"float"`,
/// `"boolean"`, or a custom name) with optional per-field overrides.
pub fn field_type(name: impl Into<FieldType>, options: TypeOptions) -> Modifier {
    Modifier::Type {
        field_type: name.into(),
        options,
    }
}

pub fn validation(validators: impl IntoIterator<Item = Validator>) -> Modifier {
    Modifier::Validation(validators.into_iter().collect())
}

// ─── Builder ─────────────────────────────────────────────────────────

/// Deferred field declaration, materialised by [`FieldBuilder::build`].
#[derive(Debug, Clone)]
pub struct FieldBuilder {
    key: String,
    modifiers: Vec<Modifier>,
}

/// Declare a field.
pub fn field(key: impl Into<String>, modifiers: impl IntoIterator<Item = Modifier>) -> FieldBuilder {
    FieldBuilder {
        key: key.into(),
        modifiers: modifiers.into_iter().collect(),
    }
}

/// Working record the modifiers fold over.
struct Draft {
    key: String,
    label: String,
    field_type: FieldType,
    value: Value,
    to_input: Converter,
    from_input: Converter,
    validators: Vec<Validator>,
}

impl Draft {
    fn apply(mut self, modifier: Modifier) -> Self {
        match modifier {
            Modifier::Label(text) => self.label = text,
            Modifier::Type {
                field_type,
                options,
            } => {
                let descriptor = options.apply(TypeRegistry::global().lookup(&field_type));
                self.field_type = field_type;
                self.value = descriptor.default;
                self.to_input = descriptor.to_input;
                self.from_input = descriptor.from_input;
            }
            Modifier::Validation(validators) => self.validators = validators,
        }
        self
    }
}

impl FieldBuilder {
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Append a modifier after the ones already declared.
    pub fn with(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    /// Materialise the immutable configuration.
    pub fn build(self) -> FieldConfig {
        let text = TypeRegistry::global().lookup(&FieldType::Text);
        let seed = Draft {
            key: self.key.clone(),
            label: String::new(),
            field_type: FieldType::Text,
            value: text.default.clone(),
            to_input: text.to_input.clone(),
            from_input: text.from_input.clone(),
            validators: Vec::new(),
        };

        let defaults = [
            label(self.key.clone()),
            field_type(FieldType::Text, TypeOptions::new()),
            validation([]),
        ];
        let draft = defaults
            .into_iter()
            .chain(self.modifiers)
            .fold(seed, Draft::apply);

        let context = ValidationContext::new(
            draft.field_type.clone(),
            draft.label.clone(),
            draft.to_input.clone(),
            draft.from_input.clone(),
        );
        let validator = pipe(context, draft.validators);

        trace!(
            key = %draft.key,
            field_type = %draft.field_type,
            validators = validator.len(),
            "compiled field configuration"
        );

        FieldConfig {
            key: draft.key,
            label: draft.label,
            field_type: draft.field_type,
            value: draft.value,
            to_input: draft.to_input,
            from_input: draft.from_input,
            validator,
        }
    }
}

// ─── Configuration ───────────────────────────────────────────────────

/// Static configuration of one field. Never mutated after construction.
#[derive(Clone)]
pub struct FieldConfig {
    key: String,
    label: String,
    field_type: FieldType,
    value: Value,
    to_input: Converter,
    from_input: Converter,
    validator: Pipeline,
}

impl FieldConfig {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    /// The default value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn to_input_value(&self, value: &Value) -> Value {
        (self.to_input)(value)
    }

    pub fn from_input_value(&self, value: &Value) -> Value {
        (self.from_input)(value)
    }

    /// Run the compiled validator against `value`.
    pub fn validate(&self, value: &Value) -> Outcome {
        self.validator.run(value.clone())
    }

    pub fn validator(&self) -> &Pipeline {
        &self.validator
    }
}

impl fmt::Debug for FieldConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldConfig")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("field_type", &self.field_type)
            .field("value", &self.value)
            .field("validators", &self.validator.len())
            .finish()
    }
}
