//! # Error Partition
//!
//! Re-validation routine run at the end of every transition. Each declared
//! field is validated against its persisted value and, when it has one,
//! its pending change:
//!
//! - `errors_for_data[k]`: the persisted value fails.
//! - `errors_for_changes[k]`: the pending change fails. Only keys with a
//!   pending change can appear here.
//! - `errors_for_values[k]`: the changes-side outcome when `k` has a pending
//!   change, otherwise the data-side outcome. A stale persisted failure is
//!   hidden by a valid pending change.

use std::collections::BTreeMap;

use changeset_schema::FieldConfig;
use serde::{Deserialize, Serialize};

use crate::changeset::ValueMap;

/// Field key → failure reason.
pub type ErrorMap = BTreeMap<String, String>;

/// Validation errors of the three views of a changeset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPartition {
    pub errors_for_data: ErrorMap,
    pub errors_for_changes: ErrorMap,
    pub errors_for_values: ErrorMap,
}

impl ErrorPartition {
    /// Validate every field in `config` against `data` and `changes`.
    pub fn compute(
        config: &BTreeMap<String, FieldConfig>,
        data: &ValueMap,
        changes: &ValueMap,
    ) -> Self {
        let mut partition = Self::default();

        for (key, field) in config {
            let data_error = data
                .get(key)
                .and_then(|value| field.validate(value).reason().map(str::to_string));
            if let Some(reason) = &data_error {
                partition
                    .errors_for_data
                    .insert(key.clone(), reason.clone());
            }

            match changes.get(key) {
                Some(change) => {
                    if let Some(reason) = field.validate(change).reason() {
                        partition
                            .errors_for_changes
                            .insert(key.clone(), reason.to_string());
                        partition
                            .errors_for_values
                            .insert(key.clone(), reason.to_string());
                    }
                }
                None => {
                    if let Some(reason) = data_error {
                        partition.errors_for_values.insert(key.clone(), reason);
                    }
                }
            }
        }

        partition
    }

    pub fn valid_data(&self) -> bool {
        self.errors_for_data.is_empty()
    }

    pub fn valid_changes(&self) -> bool {
        self.errors_for_changes.is_empty()
    }

    pub fn valid_values(&self) -> bool {
        self.errors_for_values.is_empty()
    }
}
