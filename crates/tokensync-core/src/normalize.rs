//! Identity normalization.
//!
//! Resolves the (identity, collection, mode) coordinates of an entry,
//! removes phantom modes, and builds the collection/mode tables consumed by
//! the structural matcher.
//!
//! One resolution rule is used everywhere: explicit entry fields first, then
//! the decomposed composite key, then the entry-level fallbacks (first path
//! segment for the collection, `"default"` for the mode).
//!
//! Mode sets keep the order in which modes first appear in the snapshot,
//! which is the order the heuristic matcher pairs renamed modes in.

use crate::errors::{Result, TokenSyncError};
use crate::model::{CompositeKey, Entry, Snapshot, DEFAULT_MODE};
use indexmap::IndexSet;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Mode names within one collection, in order of first appearance
pub type ModeSet = IndexSet<String>;

/// Collection name → mode names
pub type ModesByCollection = BTreeMap<String, ModeSet>;

/// Collection as seen through the design tool's internal ids.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CollectionInfo {
    pub name: String,
    /// Mode id → mode name
    pub modes: BTreeMap<String, String>,
}

/// Fully resolved coordinates of one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentity {
    pub variable_id: String,
    pub collection: String,
    pub mode: String,
}

fn phantom_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9]+:[0-9]+$").expect("phantom mode pattern is valid"))
}

/// True iff `mode` is two digit groups joined by a single colon (`"21598:4"`).
pub fn is_phantom_mode(mode: &str) -> bool {
    phantom_pattern().is_match(mode)
}

/// Collection name for an entry stored under `key`
pub fn resolve_collection(key: &CompositeKey, entry: &Entry) -> String {
    match (&entry.collection, key.parts()) {
        (Some(name), _) => name.clone(),
        (None, Some(parts)) => parts.collection.to_string(),
        (None, None) => entry.resolved_collection().to_string(),
    }
}

/// Mode name for an entry stored under `key`
pub fn resolve_mode(key: &CompositeKey, entry: &Entry) -> String {
    match (&entry.mode, key.parts()) {
        (Some(mode), _) => mode.clone(),
        (None, Some(parts)) => parts.mode.to_string(),
        (None, None) => DEFAULT_MODE.to_string(),
    }
}

/// Resolve the stable identity of an entry.
///
/// # Errors
///
/// `UnresolvableIdentity` when neither the entry nor its key names a
/// variable.
pub fn resolve_identity(key: &CompositeKey, entry: &Entry) -> Result<ResolvedIdentity> {
    let variable_id = match (entry.stable_id(), key.parts()) {
        (Some(id), _) => id.to_string(),
        (None, Some(parts)) => parts.identity.to_string(),
        (None, None) => {
            return Err(TokenSyncError::UnresolvableIdentity {
                key: key.to_string(),
            })
        }
    };
    Ok(ResolvedIdentity {
        variable_id,
        collection: resolve_collection(key, entry),
        mode: resolve_mode(key, entry),
    })
}

/// `"collection:mode"`, the form used by the rename/deletion side tables
pub fn mode_key(collection: &str, mode: &str) -> String {
    format!("{}:{}", collection, mode)
}

/// Copy of `snapshot` without entries whose resolved mode is phantom.
///
/// A collection whose only modes were phantom simply disappears.
pub fn filter_phantom_modes(snapshot: &Snapshot) -> Snapshot {
    let mut filtered = Snapshot::new(snapshot.metadata.clone());
    let mut dropped = 0usize;
    for (key, entry) in snapshot.iter() {
        if is_phantom_mode(&resolve_mode(key, entry)) {
            dropped += 1;
            continue;
        }
        filtered.entries.insert(key.clone(), entry.clone());
    }
    if dropped > 0 {
        tracing::debug!(
            source = snapshot.metadata.label(),
            dropped,
            "filtered phantom mode entries"
        );
    }
    filtered
}

/// Collection id → name and mode id → mode name.
///
/// Only entries carrying a `collectionId` contribute, and only those that
/// also carry a `modeId` add a mode. Phantom modes are skipped.
pub fn build_collection_maps(snapshot: &Snapshot) -> BTreeMap<String, CollectionInfo> {
    let mut maps: BTreeMap<String, CollectionInfo> = BTreeMap::new();
    for (key, entry) in snapshot.iter() {
        let Some(collection_id) = entry.collection_id.as_deref() else {
            continue;
        };
        let info = maps
            .entry(collection_id.to_string())
            .or_insert_with(|| CollectionInfo {
                name: resolve_collection(key, entry),
                modes: BTreeMap::new(),
            });
        let mode = resolve_mode(key, entry);
        if let Some(mode_id) = entry.mode_id.as_deref() {
            if !is_phantom_mode(&mode) {
                info.modes.insert(mode_id.to_string(), mode);
            }
        }
    }
    maps
}

/// Collection name → set of mode names, for the heuristic matcher.
pub fn build_modes_by_collection(snapshot: &Snapshot) -> ModesByCollection {
    let mut modes: ModesByCollection = BTreeMap::new();
    for (key, entry) in snapshot.iter() {
        let mode = resolve_mode(key, entry);
        if is_phantom_mode(&mode) {
            continue;
        }
        modes
            .entry(resolve_collection(key, entry))
            .or_default()
            .insert(mode);
    }
    modes
}

/// True when every entry carries both a collection id and a mode id, so
/// structural changes can be read off the ids instead of guessed.
pub fn has_structure_ids(snapshot: &Snapshot) -> bool {
    !snapshot.is_empty()
        && snapshot
            .entries
            .values()
            .all(|e| e.collection_id.is_some() && e.mode_id.is_some())
}
