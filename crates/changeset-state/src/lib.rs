//! # changeset-state — Immutable Changeset Entity
//!
//! A [`Changeset`] is a snapshot of form state: the declared field
//! configurations, the persisted `data`, the pending `changes`, the merged
//! `values`, and the validation errors of each of those three views.
//!
//! ## Transitions
//!
//! ```text
//! define(fields) ──▶ Changeset ──change(Δ)──▶ Changeset
//!                        │                        │
//!                        │◀──────── clear ────────┤
//!                        │                        │
//!                        │◀─ commit (data = values)
//! ```
//!
//! Every transition is a method taking `&self` and returning a new
//! `Changeset`. The input snapshot is never modified; unchanged maps are
//! shared between snapshots through `Arc`.
//!
//! ## Design
//!
//! Validation failures are data, collected into `errors_for_data`,
//! `errors_for_changes` and `errors_for_values`. The only `Err` a transition
//! returns is a [`ChangesetError`] for structural misuse: a key outside the
//! declared field set, or a key declared twice.

pub mod changeset;
pub mod partition;
pub mod snapshot;

pub use changeset::{define, Changeset, ValueMap};
pub use partition::{ErrorMap, ErrorPartition};
pub use snapshot::Snapshot;

pub use changeset_core::{ChangesetError, Outcome, Value};
