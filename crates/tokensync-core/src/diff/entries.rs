//! Identity-based entry comparison.
//!
//! Previous entries are grouped by variable id and mode; every current entry
//! is then looked up by the same coordinates. A previous entry no current
//! entry consumed is a deletion, unless the structural matcher already
//! explains its absence.

use crate::diff::model::{DeletedVariable, NewVariable, PathChange, ValueChange, VariableEntry};
use crate::errors::TokenSyncError;
use crate::model::{CompositeKey, Entry, Snapshot};
use crate::normalize::{mode_key, resolve_identity, ResolvedIdentity};
use std::collections::{BTreeMap, BTreeSet};

/// Entry-level output of the identity comparator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryComparison {
    pub value_changes: Vec<ValueChange>,
    pub path_changes: Vec<PathChange>,
    pub new_variables: Vec<NewVariable>,
    pub deleted_variables: Vec<DeletedVariable>,
    /// Matched pairs with neither a path nor a value difference
    pub unchanged: usize,
    /// Entries skipped because a structural change accounts for them
    pub explained: usize,
    /// Entries whose identity could not be resolved
    pub issues: Vec<TokenSyncError>,
}

struct Located<'a> {
    key: &'a CompositeKey,
    entry: &'a Entry,
    identity: ResolvedIdentity,
    consumed: bool,
}

/// variable id → mode → entries (usually one; several only when a path is
/// used as identity across collections)
type Grouping<'a> = BTreeMap<String, BTreeMap<String, Vec<Located<'a>>>>;

/// Compare two snapshots by stable identity.
///
/// `renamed_or_deleted_mode_keys` holds `"collection:mode"` keys whose
/// previous entries are explained by a structural rename or deletion.
pub fn compare_entries(
    previous: &Snapshot,
    current: &Snapshot,
    renamed_or_deleted_mode_keys: &BTreeSet<String>,
) -> EntryComparison {
    let mut out = EntryComparison::default();

    let mut grouping: Grouping<'_> = BTreeMap::new();
    for (key, entry) in previous.iter() {
        match resolve_identity(key, entry) {
            Ok(identity) => grouping
                .entry(identity.variable_id.clone())
                .or_default()
                .entry(identity.mode.clone())
                .or_default()
                .push(Located {
                    key,
                    entry,
                    identity,
                    consumed: false,
                }),
            Err(err) => out.issues.push(err),
        }
    }

    for (key, entry) in current.iter() {
        let identity = match resolve_identity(key, entry) {
            Ok(identity) => identity,
            Err(err) => {
                out.issues.push(err);
                continue;
            }
        };

        let Some(modes) = grouping.get_mut(&identity.variable_id) else {
            out.new_variables
                .push(variable_entry(key, entry, &identity));
            continue;
        };
        let Some(candidates) = modes.get_mut(&identity.mode) else {
            // new or renamed mode of a known variable
            out.explained += 1;
            continue;
        };
        let position = candidates
            .iter()
            .position(|c| c.identity.collection == identity.collection)
            .unwrap_or(0);
        let Some(old) = candidates.get_mut(position) else {
            continue;
        };
        old.consumed = true;
        let old = &*old;

        let mut changed = false;
        if old.entry.path != entry.path {
            changed = true;
            out.path_changes.push(PathChange {
                id: identity.variable_id.clone(),
                old_path: old.entry.path.clone(),
                new_path: entry.path.clone(),
                collection: identity.collection.clone(),
                mode: identity.mode.clone(),
                value: entry.value.clone(),
                token_type: entry.token_type.clone(),
            });
        }
        if !old.entry.value.same_as(&entry.value) {
            changed = true;
            out.value_changes.push(ValueChange {
                id: Some(identity.variable_id.clone()),
                path: entry.path.clone(),
                collection: identity.collection.clone(),
                mode: identity.mode.clone(),
                old_value: old.entry.value.clone(),
                new_value: entry.value.clone(),
                token_type: entry.token_type.clone(),
            });
        }
        if !changed {
            out.unchanged += 1;
        }
    }

    let unconsumed = grouping
        .values()
        .flat_map(|modes| modes.values())
        .flatten()
        .filter(|located| !located.consumed);
    for located in unconsumed {
        let structural = mode_key(&located.identity.collection, &located.identity.mode);
        if renamed_or_deleted_mode_keys.contains(&structural) {
            out.explained += 1;
            continue;
        }
        out.deleted_variables
            .push(variable_entry(located.key, located.entry, &located.identity));
    }
    out.deleted_variables.sort_by(|a, b| a.key.cmp(&b.key));

    out
}

fn variable_entry(key: &CompositeKey, entry: &Entry, identity: &ResolvedIdentity) -> VariableEntry {
    VariableEntry {
        id: Some(identity.variable_id.clone()),
        key: key.to_string(),
        path: entry.path.clone(),
        collection: identity.collection.clone(),
        mode: identity.mode.clone(),
        value: entry.value.clone(),
        token_type: entry.token_type.clone(),
    }
}
