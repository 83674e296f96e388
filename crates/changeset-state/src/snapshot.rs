//! # Snapshot
//!
//! Serializable view of a [`Changeset`](crate::Changeset). The changeset
//! itself holds compiled validators and converters and cannot be
//! serialized; a snapshot carries everything else.

use serde::{Deserialize, Serialize};

use crate::changeset::ValueMap;
use crate::partition::ErrorMap;

/// Plain-data copy of a changeset's read surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub fields: Vec<String>,
    pub data: ValueMap,
    pub changes: ValueMap,
    pub values: ValueMap,
    pub errors_for_data: ErrorMap,
    pub errors_for_changes: ErrorMap,
    pub errors_for_values: ErrorMap,
    pub valid_data: bool,
    pub valid_changes: bool,
    pub valid_values: bool,
}
