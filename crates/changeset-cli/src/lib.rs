//! # changeset-cli — CLI Tool for the Changeset Stack
//!
//! Provides the `changeset` command-line interface over the library crates.
//!
//! ## Subcommands
//!
//! - `changeset describe <schema.yaml>`: field configurations as JSON.
//! - `changeset check <schema.yaml>`: define, optionally apply a JSON change
//!   file and commit, then print the snapshot.
//!
//! ```bash
//! changeset describe person.yaml
//! changeset check person.yaml --changes edit.json
//! changeset check person.yaml --changes form.json --from-input --commit
//! ```
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from handlers.
//! - Handlers delegate to the library crates; no changeset logic here.
//! - Exit codes: 0 valid, 2 validation errors, 1 hard failure.

pub mod check;
pub mod describe;
pub mod schema;

/// Exit code for a snapshot whose merged values fail validation.
pub const EXIT_INVALID: u8 = 2;
