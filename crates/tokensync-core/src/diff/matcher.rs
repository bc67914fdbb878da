//! Collection and mode matching.
//!
//! Decides whether a collection or mode that disappeared was renamed or
//! deleted (and symmetrically for appearances). Two regimes:
//!
//! - **By id**: when every entry on both sides carries `collectionId` and
//!   `modeId`, renames are read directly off the ids.
//! - **Heuristic**: otherwise collections are paired by a [`RenameStrategy`]
//!   (equal mode count by default) and modes are paired positionally, in
//!   the order each side first enumerates them.
//!
//! Both regimes also produce the side tables the entry comparators use to
//! skip absences that a structural change already explains.

use crate::diff::model::{CollectionRename, DeletedMode, ModeRename, NewMode};
use crate::model::Snapshot;
use crate::normalize::{
    build_collection_maps, build_modes_by_collection, has_structure_ids, mode_key,
    CollectionInfo, ModeSet, ModesByCollection,
};
use std::collections::{BTreeMap, BTreeSet};

/// How structural changes were determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuralRegime {
    ById,
    Heuristic,
}

/// Structural output of the matcher.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuralChanges {
    pub regime: StructuralRegime,
    pub collection_renames: Vec<CollectionRename>,
    pub mode_renames: Vec<ModeRename>,
    pub new_modes: Vec<NewMode>,
    pub deleted_modes: Vec<DeletedMode>,
    /// `"collection:mode"` keys (previous-side names) that were renamed away
    /// or deleted
    pub renamed_or_deleted_mode_keys: BTreeSet<String>,
    /// `"collection:mode"` keys (current-side names) that were added or are
    /// the target of a rename
    pub new_or_renamed_mode_keys: BTreeSet<String>,
}

impl StructuralChanges {
    fn empty(regime: StructuralRegime) -> Self {
        Self {
            regime,
            collection_renames: Vec::new(),
            mode_renames: Vec::new(),
            new_modes: Vec::new(),
            deleted_modes: Vec::new(),
            renamed_or_deleted_mode_keys: BTreeSet::new(),
            new_or_renamed_mode_keys: BTreeSet::new(),
        }
    }
}

/// A collection offered to a [`RenameStrategy`].
#[derive(Debug, Clone, Copy)]
pub struct CollectionCandidate<'a> {
    pub name: &'a str,
    pub modes: &'a ModeSet,
}

/// Scores how plausible it is that `current` is `previous` under a new name.
///
/// `None` rules the pair out. Among the remaining candidates the highest
/// score wins and ties go to the candidate enumerated first.
pub trait RenameStrategy {
    fn score(&self, previous: CollectionCandidate<'_>, current: CollectionCandidate<'_>)
        -> Option<u32>;
}

/// Pairs collections that have the same number of modes.
///
/// Single-feature and unweighted: two renamed collections with equal mode
/// counts are paired in name order, which may be wrong.
#[derive(Debug, Clone, Copy, Default)]
pub struct EqualModeCount;

impl RenameStrategy for EqualModeCount {
    fn score(
        &self,
        previous: CollectionCandidate<'_>,
        current: CollectionCandidate<'_>,
    ) -> Option<u32> {
        (previous.modes.len() == current.modes.len()).then_some(1)
    }
}

/// Pair collections that vanished with collections that appeared.
///
/// Returns `(previous_index, current_index)` pairs. Each current candidate is
/// used at most once; previous collections are processed in slice order.
pub fn match_collection_renames<S>(
    previous: &[CollectionCandidate<'_>],
    current: &[CollectionCandidate<'_>],
    strategy: &S,
) -> Vec<(usize, usize)>
where
    S: RenameStrategy + ?Sized,
{
    let mut taken = vec![false; current.len()];
    let mut pairs = Vec::new();

    for (i, old) in previous.iter().enumerate() {
        let mut best: Option<(usize, u32)> = None;
        let mut tied = 0usize;

        for (j, candidate) in current.iter().enumerate() {
            if taken[j] {
                continue;
            }
            let Some(score) = strategy.score(*old, *candidate) else {
                continue;
            };
            match best {
                Some((_, best_score)) if score < best_score => {}
                Some((_, best_score)) if score == best_score => tied += 1,
                _ => {
                    best = Some((j, score));
                    tied = 1;
                }
            }
        }

        if let Some((j, _)) = best {
            if tied > 1 {
                tracing::debug!(
                    collection = old.name,
                    chosen = current[j].name,
                    candidates = tied,
                    "ambiguous collection rename, first candidate wins"
                );
            }
            taken[j] = true;
            pairs.push((i, j));
        }
    }

    pairs
}

/// Detect structural changes between two (phantom-filtered) snapshots,
/// choosing the id regime when both sides carry structure ids.
pub fn match_structure(previous: &Snapshot, current: &Snapshot) -> StructuralChanges {
    match_structure_with(previous, current, &EqualModeCount)
}

/// [`match_structure`] with a custom heuristic strategy.
pub fn match_structure_with<S>(
    previous: &Snapshot,
    current: &Snapshot,
    strategy: &S,
) -> StructuralChanges
where
    S: RenameStrategy + ?Sized,
{
    if has_structure_ids(previous) && has_structure_ids(current) {
        detect_structural_changes_by_id(
            &build_collection_maps(previous),
            &build_collection_maps(current),
        )
    } else {
        detect_structural_changes(
            &build_modes_by_collection(previous),
            &build_modes_by_collection(current),
            strategy,
        )
    }
}

/// Heuristic regime over collection-name → mode-name tables.
pub fn detect_structural_changes<S>(
    previous: &ModesByCollection,
    current: &ModesByCollection,
    strategy: &S,
) -> StructuralChanges
where
    S: RenameStrategy + ?Sized,
{
    let mut changes = StructuralChanges::empty(StructuralRegime::Heuristic);

    let only_in_previous: Vec<CollectionCandidate<'_>> = previous
        .iter()
        .filter(|(name, _)| !current.contains_key(*name))
        .map(|(name, modes)| CollectionCandidate { name, modes })
        .collect();
    let only_in_current: Vec<CollectionCandidate<'_>> = current
        .iter()
        .filter(|(name, _)| !previous.contains_key(*name))
        .map(|(name, modes)| CollectionCandidate { name, modes })
        .collect();

    // (previous name, current name) for every collection present on both sides
    let mut paired: Vec<(&str, &str)> = previous
        .keys()
        .filter(|name| current.contains_key(*name))
        .map(|name| (name.as_str(), name.as_str()))
        .collect();

    for (i, j) in match_collection_renames(&only_in_previous, &only_in_current, strategy) {
        let old = only_in_previous[i];
        let new = only_in_current[j];
        changes.collection_renames.push(CollectionRename {
            old_name: old.name.to_string(),
            new_name: new.name.to_string(),
        });
        for mode in old.modes {
            changes
                .renamed_or_deleted_mode_keys
                .insert(mode_key(old.name, mode));
        }
        for mode in new.modes {
            changes
                .new_or_renamed_mode_keys
                .insert(mode_key(new.name, mode));
        }
        paired.push((old.name, new.name));
    }
    paired.sort();

    for (old_name, new_name) in paired {
        let (Some(previous_modes), Some(current_modes)) =
            (previous.get(old_name), current.get(new_name))
        else {
            continue;
        };
        let deleted: Vec<&String> = previous_modes.difference(current_modes).collect();
        let added: Vec<&String> = current_modes.difference(previous_modes).collect();

        if !deleted.is_empty() && deleted.len() == added.len() {
            for (old_mode, new_mode) in deleted.into_iter().zip(added) {
                changes.mode_renames.push(ModeRename {
                    collection: new_name.to_string(),
                    old_mode: old_mode.clone(),
                    new_mode: new_mode.clone(),
                });
                changes
                    .renamed_or_deleted_mode_keys
                    .insert(mode_key(old_name, old_mode));
                changes
                    .new_or_renamed_mode_keys
                    .insert(mode_key(new_name, new_mode));
            }
        } else {
            for mode in deleted {
                changes.deleted_modes.push(DeletedMode {
                    collection: old_name.to_string(),
                    mode: mode.clone(),
                });
                changes
                    .renamed_or_deleted_mode_keys
                    .insert(mode_key(old_name, mode));
            }
            for mode in added {
                changes.new_modes.push(NewMode {
                    collection: new_name.to_string(),
                    mode: mode.clone(),
                });
                changes
                    .new_or_renamed_mode_keys
                    .insert(mode_key(new_name, mode));
            }
        }
    }

    changes
}

/// Id regime over collection-id tables.
///
/// Same collection id with a different name is a rename; mode ids are
/// compared within each collection id present on both sides.
pub fn detect_structural_changes_by_id(
    previous: &BTreeMap<String, CollectionInfo>,
    current: &BTreeMap<String, CollectionInfo>,
) -> StructuralChanges {
    let mut changes = StructuralChanges::empty(StructuralRegime::ById);

    for (collection_id, old) in previous {
        let Some(new) = current.get(collection_id) else {
            continue;
        };

        if old.name != new.name {
            changes.collection_renames.push(CollectionRename {
                old_name: old.name.clone(),
                new_name: new.name.clone(),
            });
            for mode in old.modes.values() {
                changes
                    .renamed_or_deleted_mode_keys
                    .insert(mode_key(&old.name, mode));
            }
            for mode in new.modes.values() {
                changes
                    .new_or_renamed_mode_keys
                    .insert(mode_key(&new.name, mode));
            }
        }

        for (mode_id, old_mode) in &old.modes {
            match new.modes.get(mode_id) {
                Some(new_mode) if new_mode != old_mode => {
                    changes.mode_renames.push(ModeRename {
                        collection: new.name.clone(),
                        old_mode: old_mode.clone(),
                        new_mode: new_mode.clone(),
                    });
                    changes
                        .renamed_or_deleted_mode_keys
                        .insert(mode_key(&old.name, old_mode));
                    changes
                        .new_or_renamed_mode_keys
                        .insert(mode_key(&new.name, new_mode));
                }
                Some(_) => {}
                None => {
                    changes.deleted_modes.push(DeletedMode {
                        collection: old.name.clone(),
                        mode: old_mode.clone(),
                    });
                    changes
                        .renamed_or_deleted_mode_keys
                        .insert(mode_key(&old.name, old_mode));
                }
            }
        }

        for (mode_id, new_mode) in &new.modes {
            if !old.modes.contains_key(mode_id) {
                changes.new_modes.push(NewMode {
                    collection: new.name.clone(),
                    mode: new_mode.clone(),
                });
                changes
                    .new_or_renamed_mode_keys
                    .insert(mode_key(&new.name, new_mode));
            }
        }
    }

    changes
}
