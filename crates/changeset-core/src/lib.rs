//! # changeset-core — Foundational Types for the Changeset Stack
//!
//! This crate is the leaf of the workspace. It defines the primitives every
//! other crate builds on; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **One value union.** Field values are a single tagged [`Value`] enum
//!    (`Null`, `Boolean`, `Number`, `Float`, `Text`). Persisted data, pending
//!    changes and merged values are all maps of `Value`.
//!
//! 2. **Two-state validation outcome.** [`Outcome`] is either `Good(value)` or
//!    `Bad(value, reason)`. There is no third state. A raw `Value` converts
//!    into `Good` through `From`, which is the only normalisation path
//!    ([`ret`]).
//!
//! 3. **Failures are data.** Validation failure is an `Outcome::Bad`, never
//!    an `Err`. Only structural misuse (unknown or duplicate field keys)
//!    surfaces as a [`ChangesetError`].
//!
//! ## Crate Policy
//!
//! - No dependencies on other `changeset-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod outcome;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use error::{ChangesetError, Result};
pub use outcome::{ret, Outcome};
pub use value::Value;
