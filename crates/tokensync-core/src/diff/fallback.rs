//! Path-only comparison for baselines without stable identifiers.
//!
//! Entries are matched by `"{path}:{collection}.{mode}"`. A moved token is
//! indistinguishable from a deletion plus an addition here; no rename
//! detection is attempted.

use crate::diff::model::{ValueChange, VariableEntry};
use crate::errors::TokenSyncError;
use crate::model::{CompositeKey, Entry, Snapshot, TokenValue};
use crate::normalize::{resolve_collection, resolve_mode};
use std::collections::BTreeMap;

/// A path-matched entry whose value changed.
#[derive(Debug, Clone, PartialEq)]
pub struct PathValueChange {
    pub key: CompositeKey,
    pub path: String,
    pub collection: String,
    pub mode: String,
    pub old_value: TokenValue,
    pub new_value: TokenValue,
    pub token_type: String,
}

impl From<PathValueChange> for ValueChange {
    fn from(change: PathValueChange) -> Self {
        ValueChange {
            id: None,
            path: change.path,
            collection: change.collection,
            mode: change.mode,
            old_value: change.old_value,
            new_value: change.new_value,
            token_type: change.token_type,
        }
    }
}

/// Output of the fallback comparator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathComparison {
    pub value_changes: Vec<PathValueChange>,
    pub only_in_previous: Vec<VariableEntry>,
    pub only_in_current: Vec<VariableEntry>,
    /// Entries found on both sides with equal values
    pub matched: usize,
    /// Entries without a path
    pub issues: Vec<TokenSyncError>,
}

/// True iff at least one entry carries a non-empty variable id.
pub fn has_stable_identifiers(snapshot: &Snapshot) -> bool {
    snapshot.entries.values().any(|e| e.stable_id().is_some())
}

struct PathEntry<'a> {
    entry: &'a Entry,
    collection: String,
    mode: String,
}

fn path_entry<'a>(
    key: &CompositeKey,
    entry: &'a Entry,
) -> Result<(CompositeKey, PathEntry<'a>), TokenSyncError> {
    let collection = resolve_collection(key, entry);
    let mode = resolve_mode(key, entry);
    if !entry.has_path() {
        return Err(TokenSyncError::MalformedEntry {
            location: key.to_string(),
        });
    }
    let path_key = CompositeKey::compose(&entry.path, &collection, &mode);
    Ok((
        path_key,
        PathEntry {
            entry,
            collection,
            mode,
        },
    ))
}

fn only_in(key: CompositeKey, found: &PathEntry<'_>) -> VariableEntry {
    VariableEntry {
        id: None,
        key: key.to_string(),
        path: found.entry.path.clone(),
        collection: found.collection.clone(),
        mode: found.mode.clone(),
        value: found.entry.value.clone(),
        token_type: found.entry.token_type.clone(),
    }
}

/// Compare two snapshots by path, collection and mode.
///
/// When two previous entries share a path key, the later one is used for
/// matching and the earlier one is reported in `only_in_previous`.
pub fn compare_by_path(previous: &Snapshot, current: &Snapshot) -> PathComparison {
    let mut out = PathComparison::default();

    let mut lookup: BTreeMap<CompositeKey, PathEntry<'_>> = BTreeMap::new();
    for (key, entry) in previous.iter() {
        match path_entry(key, entry) {
            Ok((path_key, found)) => {
                if let Some(displaced) = lookup.insert(path_key.clone(), found) {
                    tracing::debug!(composite_key = %path_key, "duplicate path key in previous snapshot");
                    out.only_in_previous.push(only_in(path_key, &displaced));
                }
            }
            Err(err) => out.issues.push(err),
        }
    }

    for (key, entry) in current.iter() {
        let (path_key, found) = match path_entry(key, entry) {
            Ok(pair) => pair,
            Err(err) => {
                out.issues.push(err);
                continue;
            }
        };
        match lookup.remove(&path_key) {
            Some(old) if old.entry.value.same_as(&entry.value) => out.matched += 1,
            Some(old) => out.value_changes.push(PathValueChange {
                key: path_key,
                path: entry.path.clone(),
                collection: found.collection,
                mode: found.mode,
                old_value: old.entry.value.clone(),
                new_value: entry.value.clone(),
                token_type: entry.token_type.clone(),
            }),
            None => out.only_in_current.push(only_in(path_key, &found)),
        }
    }

    for (path_key, unconsumed) in lookup {
        out.only_in_previous.push(only_in(path_key, &unconsumed));
    }
    out.only_in_previous.sort_by(|a, b| a.key.cmp(&b.key));

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SnapshotMetadata;

    fn snapshot_of(entries: Vec<Entry>) -> Snapshot {
        Snapshot::from_entries(entries, SnapshotMetadata::default())
            .unwrap()
            .snapshot
    }

    #[test]
    fn test_has_stable_identifiers() {
        let bare = snapshot_of(vec![Entry::new("a.b", "c", "m", TokenValue::Null)]);
        assert!(!has_stable_identifiers(&bare));

        let mixed = snapshot_of(vec![
            Entry::new("a.b", "c", "m", TokenValue::Null),
            Entry::new("a.c", "c", "m", TokenValue::Null).with_variable_id("v1"),
        ]);
        assert!(has_stable_identifiers(&mixed));

        let empty_id = snapshot_of(vec![
            Entry::new("a.b", "c", "m", TokenValue::Null).with_variable_id("")
        ]);
        assert!(!has_stable_identifiers(&empty_id));
    }

    #[test]
    fn test_matched_and_changed_by_path() {
        let previous = snapshot_of(vec![
            Entry::new("a.b", "c", "m", TokenValue::from(1.0)),
            Entry::new("a.c", "c", "m", TokenValue::from(5.0)),
        ]);
        let current = snapshot_of(vec![
            Entry::new("a.b", "c", "m", TokenValue::from(2.0)),
            Entry::new("a.c", "c", "m", TokenValue::from(5.0)),
        ]);
        let out = compare_by_path(&previous, &current);
        assert_eq!(out.value_changes.len(), 1);
        assert_eq!(out.value_changes[0].path, "a.b");
        assert_eq!(out.matched, 1);
        assert!(out.only_in_previous.is_empty());
        assert!(out.only_in_current.is_empty());
    }

    #[test]
    fn test_moved_path_is_add_plus_delete() {
        let previous = snapshot_of(vec![Entry::new("a.b", "c", "m", TokenValue::from(1.0))]);
        let current = snapshot_of(vec![Entry::new("a.z", "c", "m", TokenValue::from(1.0))]);
        let out = compare_by_path(&previous, &current);
        assert_eq!(out.only_in_previous.len(), 1);
        assert_eq!(out.only_in_current.len(), 1);
        assert_eq!(out.only_in_previous[0].key, "a.b:c.m");
        assert_eq!(out.only_in_current[0].key, "a.z:c.m");
    }

    #[test]
    fn test_current_ids_are_ignored_for_matching() {
        let previous = snapshot_of(vec![Entry::new("a.b", "c", "m", TokenValue::from(1.0))]);
        let current = snapshot_of(vec![
            Entry::new("a.b", "c", "m", TokenValue::from(1.0)).with_variable_id("VariableID:1:2")
        ]);
        let out = compare_by_path(&previous, &current);
        assert_eq!(out.matched, 1);
        assert!(out.only_in_current.is_empty());
    }

    #[test]
    fn test_duplicate_previous_path_key_is_only_in_previous() {
        let mut previous = Snapshot::new(SnapshotMetadata::default());
        previous.entries.insert(
            CompositeKey::from_raw("k1"),
            Entry::new("a.b", "c", "m", TokenValue::from(1.0)),
        );
        previous.entries.insert(
            CompositeKey::from_raw("k2"),
            Entry::new("a.b", "c", "m", TokenValue::from(1.0)),
        );
        let current = snapshot_of(vec![Entry::new("a.b", "c", "m", TokenValue::from(1.0))]);

        let out = compare_by_path(&previous, &current);
        assert_eq!(out.matched, 1);
        assert_eq!(out.only_in_previous.len(), 1);
    }
}
