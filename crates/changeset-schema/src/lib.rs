//! # changeset-schema — Field Schema for the Changeset Stack
//!
//! Everything a changeset needs to know about its fields before any data
//! exists: what type each field has, how values convert to and from their
//! input representation, and how they are validated.
//!
//! ## Layers
//!
//! - **Type Coercion Registry** (`registry.rs`): maps a [`FieldType`] to a
//!   default value and a pair of converters. Built once per process behind a
//!   `OnceLock` and never mutated.
//!
//! - **Validation Pipeline** (`pipeline.rs`): [`pipe`] composes an ordered
//!   list of [`Validator`]s into one [`Pipeline`] that stops at the first
//!   `Bad` outcome. Ships [`required`] and [`validate`].
//!
//! - **Field Configuration Builder** (`field.rs`): [`field`] folds
//!   [`Modifier`]s ([`label`], [`field_type`], [`validation`]) over implicit
//!   defaults into an immutable [`FieldConfig`].
//!
//! ## Example
//!
//! ```rust
//! use changeset_schema::{field, field_type, label, required, validate, validation, TypeOptions};
//!
//! let age = field(
//!     "age",
//!     [
//!         label("Age"),
//!         field_type("number", TypeOptions::new().value(18)),
//!         validation([
//!             required(),
//!             validate("must be at least 18", |v| v.as_i64().is_some_and(|n| n >= 18)),
//!         ]),
//!     ],
//! )
//! .build();
//!
//! assert_eq!(age.label(), "Age");
//! assert!(age.validate(age.value()).is_good());
//! ```

pub mod field;
pub mod pipeline;
pub mod registry;

pub use field::{field, field_type, label, validation, FieldBuilder, FieldConfig, Modifier};
pub use pipeline::{pipe, required, validate, Pipeline, ValidationContext, Validator};
pub use registry::{Converter, FieldType, TypeDescriptor, TypeOptions, TypeRegistry};
