//! Comparison output types.
//!
//! All record lists are produced in deterministic order (collections by
//! name, modes and entries in source order, deletions by key) so two runs
//! over the same inputs serialize byte-identically.

use crate::model::TokenValue;
use serde::{Deserialize, Serialize};

/// The complete, classified difference between two snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    pub value_changes: Vec<ValueChange>,
    pub path_changes: Vec<PathChange>,
    pub collection_renames: Vec<CollectionRename>,
    pub mode_renames: Vec<ModeRename>,
    pub new_modes: Vec<NewMode>,
    pub deleted_modes: Vec<DeletedMode>,
    pub new_variables: Vec<NewVariable>,
    pub deleted_variables: Vec<DeletedVariable>,
}

/// The value of a matched entry changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueChange {
    /// Stable variable id; `None` when matched by path
    pub id: Option<String>,
    /// Path in the current snapshot
    pub path: String,
    pub collection: String,
    pub mode: String,
    pub old_value: TokenValue,
    pub new_value: TokenValue,
    #[serde(rename = "type")]
    pub token_type: String,
}

/// A variable kept its id but moved to a different path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathChange {
    pub id: String,
    pub old_path: String,
    pub new_path: String,
    pub collection: String,
    pub mode: String,
    /// Value in the current snapshot
    pub value: TokenValue,
    #[serde(rename = "type")]
    pub token_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionRename {
    pub old_name: String,
    pub new_name: String,
}

/// A mode renamed within a collection (named as in the current snapshot).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeRename {
    pub collection: String,
    pub old_mode: String,
    pub new_mode: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMode {
    pub collection: String,
    pub mode: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedMode {
    pub collection: String,
    pub mode: String,
}

/// One (variable × mode) fact present on only one side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableEntry {
    /// Stable variable id; `None` when matched by path
    pub id: Option<String>,
    /// Composite key in the snapshot the entry came from
    pub key: String,
    pub path: String,
    pub collection: String,
    pub mode: String,
    pub value: TokenValue,
    #[serde(rename = "type")]
    pub token_type: String,
}

pub type NewVariable = VariableEntry;
pub type DeletedVariable = VariableEntry;

/// The eight result categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChangeCategory {
    ValueChanges,
    PathChanges,
    CollectionRenames,
    ModeRenames,
    NewModes,
    DeletedModes,
    NewVariables,
    DeletedVariables,
}

impl ChangeCategory {
    pub const ALL: [ChangeCategory; 8] = [
        ChangeCategory::ValueChanges,
        ChangeCategory::PathChanges,
        ChangeCategory::CollectionRenames,
        ChangeCategory::ModeRenames,
        ChangeCategory::NewModes,
        ChangeCategory::DeletedModes,
        ChangeCategory::NewVariables,
        ChangeCategory::DeletedVariables,
    ];

    /// Breaking changes invalidate a reference that used to resolve.
    pub fn is_breaking(&self) -> bool {
        match self {
            ChangeCategory::ValueChanges | ChangeCategory::NewVariables => false,
            ChangeCategory::PathChanges
            | ChangeCategory::CollectionRenames
            | ChangeCategory::ModeRenames
            | ChangeCategory::NewModes
            | ChangeCategory::DeletedModes
            | ChangeCategory::DeletedVariables => true,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ChangeCategory::ValueChanges => "Value changes",
            ChangeCategory::PathChanges => "Path changes",
            ChangeCategory::CollectionRenames => "Collection renames",
            ChangeCategory::ModeRenames => "Mode renames",
            ChangeCategory::NewModes => "New modes",
            ChangeCategory::DeletedModes => "Deleted modes",
            ChangeCategory::NewVariables => "New variables",
            ChangeCategory::DeletedVariables => "Deleted variables",
        }
    }
}

impl ComparisonResult {
    /// Number of records in one category
    pub fn count(&self, category: ChangeCategory) -> usize {
        match category {
            ChangeCategory::ValueChanges => self.value_changes.len(),
            ChangeCategory::PathChanges => self.path_changes.len(),
            ChangeCategory::CollectionRenames => self.collection_renames.len(),
            ChangeCategory::ModeRenames => self.mode_renames.len(),
            ChangeCategory::NewModes => self.new_modes.len(),
            ChangeCategory::DeletedModes => self.deleted_modes.len(),
            ChangeCategory::NewVariables => self.new_variables.len(),
            ChangeCategory::DeletedVariables => self.deleted_variables.len(),
        }
    }
}

/// Per-category counts with totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ChangeCounts {
    pub value_changes: usize,
    pub path_changes: usize,
    pub collection_renames: usize,
    pub mode_renames: usize,
    pub new_modes: usize,
    pub deleted_modes: usize,
    pub new_variables: usize,
    pub deleted_variables: usize,
    pub total: usize,
    pub breaking: usize,
}
