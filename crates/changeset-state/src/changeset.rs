//! # Changeset Entity & Transitions
//!
//! The aggregate root of the stack. A changeset holds:
//!
//! - `fields` / `config`: the declared fields, fixed at [`define`] time.
//! - `data`: the persisted (committed) value of every field.
//! - `changes`: pending overrides, only for fields with an active edit.
//! - `values`: `changes[k]` if present, else `data[k]`. Always recomputed.
//! - the [`ErrorPartition`] of those three views.
//!
//! ## Invariants
//!
//! - `keys(data) == keys(config) == fields`; `keys(changes) ⊆ fields`.
//! - `values[k] == changes.get(k).unwrap_or(data[k])` for every field.
//! - Transitions return a new changeset and never touch `self`.
//! - Errors are recomputed on every transition, never carried over.
//!
//! ## Change scrubbing
//!
//! A pending change equal to the persisted value is not a change. `change`
//! drops such entries instead of storing them, and `update_data` drops the
//! pending changes its new persisted values catch up with.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use changeset_core::{ChangesetError, Result, Value};
use changeset_schema::{FieldBuilder, FieldConfig};
use tracing::{debug, warn};

use crate::partition::{ErrorMap, ErrorPartition};
use crate::snapshot::Snapshot;

/// Field key → value.
pub type ValueMap = BTreeMap<String, Value>;

/// Immutable snapshot of form state.
#[derive(Debug, Clone)]
pub struct Changeset {
    fields: Arc<BTreeSet<String>>,
    config: Arc<BTreeMap<String, FieldConfig>>,
    data: Arc<ValueMap>,
    changes: Arc<ValueMap>,
    values: Arc<ValueMap>,
    errors: Arc<ErrorPartition>,
}

/// Build the initial changeset from field declarations.
///
/// Persisted data starts at each field's default value, there are no
/// pending changes, and validation runs once. Declaring the same key twice
/// is rejected.
pub fn define(builders: impl IntoIterator<Item = FieldBuilder>) -> Result<Changeset> {
    let mut config = BTreeMap::new();
    for builder in builders {
        if config.contains_key(builder.key()) {
            warn!(key = builder.key(), "rejected duplicate field declaration");
            return Err(ChangesetError::DuplicateField {
                key: builder.key().to_string(),
            });
        }
        let field = builder.build();
        config.insert(field.key().to_string(), field);
    }

    let fields: BTreeSet<String> = config.keys().cloned().collect();
    let data: ValueMap = config
        .iter()
        .map(|(key, field)| (key.clone(), field.value().clone()))
        .collect();

    let changeset = Changeset::assemble(
        Arc::new(fields),
        Arc::new(config),
        Arc::new(data),
        ValueMap::new(),
    );
    debug!(
        fields = changeset.fields.len(),
        valid_data = changeset.valid_data(),
        "defined changeset"
    );
    Ok(changeset)
}

impl Changeset {
    // ── Transitions ──────────────────────────────────────────────────

    /// Stage pending values.
    ///
    /// Entries are merged into a copy of the current changes in order, so a
    /// later entry for the same key wins. An entry equal to the persisted
    /// value removes any pending change for that key. Keys outside the
    /// declared field set are rejected and no snapshot is produced.
    pub fn change<K, V>(&self, partial: impl IntoIterator<Item = (K, V)>) -> Result<Self>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let mut changes = (*self.changes).clone();
        for (key, value) in partial {
            let key = self.require_field(key.into())?;
            let value = value.into();
            if self.data.get(&key).is_some_and(|persisted| persisted.same_as(&value)) {
                changes.remove(&key);
            } else {
                changes.insert(key, value);
            }
        }
        Ok(self.derive("change", Arc::clone(&self.data), changes))
    }

    /// Drop every pending change.
    pub fn clear(&self) -> Self {
        self.derive("clear", Arc::clone(&self.data), ValueMap::new())
    }

    /// Promote the merged values to persisted data.
    pub fn commit(&self) -> Self {
        self.derive("commit", Arc::clone(&self.values), ValueMap::new())
    }

    /// Overwrite persisted values while keeping pending edits.
    ///
    /// Pending changes that now equal the persisted value are dropped; the
    /// rest stay pending. Keys outside the declared field set are rejected.
    pub fn update_data<K, V>(&self, partial: impl IntoIterator<Item = (K, V)>) -> Result<Self>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let mut data = (*self.data).clone();
        for (key, value) in partial {
            let key = self.require_field(key.into())?;
            data.insert(key, value.into());
        }
        let changes: ValueMap = self
            .changes
            .iter()
            .filter(|(key, value)| {
                !data
                    .get(*key)
                    .is_some_and(|persisted| persisted.same_as(value))
            })
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        Ok(self.derive("update_data", Arc::new(data), changes))
    }

    // ── Read surface ─────────────────────────────────────────────────

    pub fn fields(&self) -> &BTreeSet<String> {
        &self.fields
    }

    pub fn config(&self) -> &BTreeMap<String, FieldConfig> {
        &self.config
    }

    /// Configuration of a single field.
    pub fn field(&self, key: &str) -> Option<&FieldConfig> {
        self.config.get(key)
    }

    pub fn data(&self) -> &ValueMap {
        &self.data
    }

    pub fn changes(&self) -> &ValueMap {
        &self.changes
    }

    pub fn values(&self) -> &ValueMap {
        &self.values
    }

    /// Effective value of a single field.
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Keys with a pending change.
    pub fn changed_fields(&self) -> BTreeSet<&str> {
        self.changes.keys().map(String::as_str).collect()
    }

    pub fn errors_for_data(&self) -> &ErrorMap {
        &self.errors.errors_for_data
    }

    pub fn errors_for_changes(&self) -> &ErrorMap {
        &self.errors.errors_for_changes
    }

    pub fn errors_for_values(&self) -> &ErrorMap {
        &self.errors.errors_for_values
    }

    pub fn valid_data(&self) -> bool {
        self.errors.valid_data()
    }

    pub fn valid_changes(&self) -> bool {
        self.errors.valid_changes()
    }

    pub fn valid_values(&self) -> bool {
        self.errors.valid_values()
    }

    /// Serializable copy of the state, without the field configurations.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            fields: self.fields.iter().cloned().collect(),
            data: (*self.data).clone(),
            changes: (*self.changes).clone(),
            values: (*self.values).clone(),
            errors_for_data: self.errors.errors_for_data.clone(),
            errors_for_changes: self.errors.errors_for_changes.clone(),
            errors_for_values: self.errors.errors_for_values.clone(),
            valid_data: self.valid_data(),
            valid_changes: self.valid_changes(),
            valid_values: self.valid_values(),
        }
    }

    // ── Internals ────────────────────────────────────────────────────

    /// Compute merged values and errors for a new snapshot.
    fn assemble(
        fields: Arc<BTreeSet<String>>,
        config: Arc<BTreeMap<String, FieldConfig>>,
        data: Arc<ValueMap>,
        changes: ValueMap,
    ) -> Self {
        let values = if changes.is_empty() {
            Arc::clone(&data)
        } else {
            Arc::new(
                data.iter()
                    .map(|(key, value)| {
                        let effective = changes.get(key).unwrap_or(value);
                        (key.clone(), effective.clone())
                    })
                    .collect(),
            )
        };
        let errors = ErrorPartition::compute(&config, &data, &changes);
        Self {
            fields,
            config,
            data,
            changes: Arc::new(changes),
            values,
            errors: Arc::new(errors),
        }
    }

    fn derive(&self, op: &'static str, data: Arc<ValueMap>, changes: ValueMap) -> Self {
        let next = Self::assemble(
            Arc::clone(&self.fields),
            Arc::clone(&self.config),
            data,
            changes,
        );
        debug!(
            op,
            changes = next.changes.len(),
            valid_values = next.valid_values(),
            "changeset transition"
        );
        next
    }

    fn require_field(&self, key: String) -> Result<String> {
        if self.fields.contains(&key) {
            Ok(key)
        } else {
            warn!(key = %key, "rejected undeclared field");
            Err(ChangesetError::UnknownField { key })
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
