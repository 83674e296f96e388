//! # Validation Pipeline
//!
//! A [`Pipeline`] runs an ordered list of [`Validator`]s over one value.
//! Validators execute strictly left to right; the first `Bad` outcome wins
//! and later validators never run. Each validator receives the value carried
//! by the previous outcome, so a validator may coerce before handing on.
//!
//! Validators see the field through a [`ValidationContext`]: its type,
//! label, and converters, plus `good`/`bad` constructors for building
//! outcomes with contextual messages.

use std::fmt;
use std::sync::Arc;

use changeset_core::{ret, Outcome, Value};

use crate::registry::{Converter, FieldType};

// ─── Context ─────────────────────────────────────────────────────────

/// Read-only view of the field a validator is running for.
#[derive(Clone)]
pub struct ValidationContext {
    field_type: FieldType,
    label: String,
    to_input: Converter,
    from_input: Converter,
}

impl ValidationContext {
    pub fn new(
        field_type: FieldType,
        label: impl Into<String>,
        to_input: Converter,
        from_input: Converter,
    ) -> Self {
        Self {
            field_type,
            label: label.into(),
            to_input,
            from_input,
        }
    }

    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Convert a stored value into its input representation.
    pub fn to_input_value(&self, value: &Value) -> Value {
        (self.to_input)(value)
    }

    /// Convert an input representation back into a stored value.
    pub fn from_input_value(&self, value: &Value) -> Value {
        (self.from_input)(value)
    }

    pub fn good(&self, value: impl Into<Value>) -> Outcome {
        Outcome::good(value)
    }

    pub fn bad(&self, value: impl Into<Value>, reason: impl Into<String>) -> Outcome {
        Outcome::bad(value, reason)
    }
}

impl fmt::Debug for ValidationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationContext")
            .field("field_type", &self.field_type)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

// ─── Validators ──────────────────────────────────────────────────────

/// A single validation rule.
#[derive(Clone)]
pub struct Validator(Arc<dyn Fn(&ValidationContext, &Value) -> Outcome + Send + Sync>);

impl Validator {
    /// Wrap a closure. The closure may return an [`Outcome`] or a raw
    /// [`Value`]; raw values count as `Good`.
    pub fn new<F, R>(f: F) -> Self
    where
        F: Fn(&ValidationContext, &Value) -> R + Send + Sync + 'static,
        R: Into<Outcome>,
    {
        Self(Arc::new(move |ctx: &ValidationContext, value: &Value| ret(f(ctx, value))))
    }

    pub fn call(&self, ctx: &ValidationContext, value: &Value) -> Outcome {
        (self.0)(ctx, value)
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Validator(..)")
    }
}

/// Fails with `"is required"` when the input representation of the value
/// is empty. Works on the input form, so a numeric `0` (rendered `"0"`)
/// passes.
pub fn required() -> Validator {
    Validator::new(|ctx: &ValidationContext, value: &Value| {
        let input = ctx.to_input_value(value);
        let empty = input.is_null() || input.as_text().is_some_and(str::is_empty);
        if empty {
            ctx.bad(value.clone(), "is required")
        } else {
            ctx.good(value.clone())
        }
    })
}

/// Fails with the fixed `reason` when `predicate` rejects the value.
pub fn validate<P>(reason: impl Into<String>, predicate: P) -> Validator
where
    P: Fn(&Value) -> bool + Send + Sync + 'static,
{
    let reason = reason.into();
    Validator::new(move |ctx: &ValidationContext, value: &Value| {
        if predicate(value) {
            ctx.good(value.clone())
        } else {
            ctx.bad(value.clone(), reason.clone())
        }
    })
}

// ─── Pipeline ────────────────────────────────────────────────────────

/// A compiled, short-circuiting sequence of validators bound to one field.
#[derive(Clone)]
pub struct Pipeline {
    context: ValidationContext,
    validators: Arc<[Validator]>,
}

/// Compose `validators` into a single pipeline running under `context`.
pub fn pipe(context: ValidationContext, validators: Vec<Validator>) -> Pipeline {
    Pipeline {
        context,
        validators: validators.into(),
    }
}

impl Pipeline {
    /// Run every validator in order, stopping at the first `Bad` outcome.
    pub fn run(&self, input: impl Into<Outcome>) -> Outcome {
        let mut current = ret(input);
        for validator in self.validators.iter() {
            if current.is_bad() {
                break;
            }
            current = validator.call(&self.context, current.value());
        }
        current
    }

    pub fn context(&self) -> &ValidationContext {
        &self.context
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("context", &self.context)
            .field("validators", &self.validators.len())
            .finish()
    }
}
