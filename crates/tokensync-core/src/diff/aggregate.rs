//! Merging and classification.
//!
//! Combines the structural matcher's output with one entry comparator's
//! output into a single [`ComparisonResult`], and answers the questions the
//! publish gate asks of it.

use crate::diff::entries::EntryComparison;
use crate::diff::fallback::PathComparison;
use crate::diff::matcher::StructuralChanges;
use crate::diff::model::{ChangeCategory, ChangeCounts, ComparisonResult, ValueChange};
use crate::normalize::mode_key;

/// Merge structural changes with identity-based entry changes.
pub fn aggregate_identity(
    structural: StructuralChanges,
    entries: EntryComparison,
) -> ComparisonResult {
    ComparisonResult {
        value_changes: entries.value_changes,
        path_changes: entries.path_changes,
        collection_renames: structural.collection_renames,
        mode_renames: structural.mode_renames,
        new_modes: structural.new_modes,
        deleted_modes: structural.deleted_modes,
        new_variables: entries.new_variables,
        deleted_variables: entries.deleted_variables,
    }
}

/// Merge structural changes with path-based entry changes.
///
/// Previous-only entries under a renamed or deleted mode and current-only
/// entries under a new or renamed mode are dropped. Returns the result and
/// the number of entries dropped that way.
pub fn aggregate_fallback(
    structural: StructuralChanges,
    paths: PathComparison,
) -> (ComparisonResult, usize) {
    let mut suppressed = 0usize;

    let deleted_variables = paths
        .only_in_previous
        .into_iter()
        .filter(|e| {
            let explained = structural
                .renamed_or_deleted_mode_keys
                .contains(&mode_key(&e.collection, &e.mode));
            suppressed += usize::from(explained);
            !explained
        })
        .collect();
    let new_variables = paths
        .only_in_current
        .into_iter()
        .filter(|e| {
            let explained = structural
                .new_or_renamed_mode_keys
                .contains(&mode_key(&e.collection, &e.mode));
            suppressed += usize::from(explained);
            !explained
        })
        .collect();

    let result = ComparisonResult {
        value_changes: paths.value_changes.into_iter().map(ValueChange::from).collect(),
        path_changes: Vec::new(),
        collection_renames: structural.collection_renames,
        mode_renames: structural.mode_renames,
        new_modes: structural.new_modes,
        deleted_modes: structural.deleted_modes,
        new_variables,
        deleted_variables,
    };
    (result, suppressed)
}

pub fn has_changes(result: &ComparisonResult) -> bool {
    ChangeCategory::ALL.iter().any(|c| result.count(*c) > 0)
}

/// True when any breaking category is non-empty.
pub fn has_breaking_changes(result: &ComparisonResult) -> bool {
    ChangeCategory::ALL
        .iter()
        .filter(|c| c.is_breaking())
        .any(|c| result.count(*c) > 0)
}

/// Per-category counts plus `total` and the `breaking` subtotal.
pub fn get_change_counts(result: &ComparisonResult) -> ChangeCounts {
    let mut counts = ChangeCounts {
        value_changes: result.value_changes.len(),
        path_changes: result.path_changes.len(),
        collection_renames: result.collection_renames.len(),
        mode_renames: result.mode_renames.len(),
        new_modes: result.new_modes.len(),
        deleted_modes: result.deleted_modes.len(),
        new_variables: result.new_variables.len(),
        deleted_variables: result.deleted_variables.len(),
        total: 0,
        breaking: 0,
    };
    for category in ChangeCategory::ALL {
        let n = result.count(category);
        counts.total += n;
        if category.is_breaking() {
            counts.breaking += n;
        }
    }
    counts
}
