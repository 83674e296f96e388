//! # Error Types — Structured Error Hierarchy
//!
//! Defines the hard failures of the changeset stack. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Field validation failures are NOT errors. They are `Outcome::Bad`
//!   values collected into the error maps of a changeset.
//! - Configuration misuse (a key that was never declared, a key declared
//!   twice) cannot be recovered from inside a pure transition and is
//!   returned as a `ChangesetError` naming the offending key.

use thiserror::Error;

/// Result type for changeset operations.
pub type Result<T> = std::result::Result<T, ChangesetError>;

/// Top-level error type for the changeset stack.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChangesetError {
    /// A change or data update referenced a key outside the declared field set.
    #[error("unknown field: {key}")]
    UnknownField {
        /// The undeclared key.
        key: String,
    },

    /// The same key was declared by more than one field builder.
    #[error("duplicate field: {key}")]
    DuplicateField {
        /// The key declared twice.
        key: String,
    },
}

impl ChangesetError {
    /// The field key the error refers to.
    pub fn key(&self) -> &str {
        match self {
            Self::UnknownField { key } | Self::DuplicateField { key } => key,
        }
    }
}
