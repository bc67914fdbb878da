//! Baseline snapshot persistence
//!
//! Snapshots are stored as JSON. Two document shapes are accepted on read:
//!
//! - keyed: `{"entries": {"<composite key>": {entry}}, "metadata": {...}}`
//! - list: `{"entries": [{entry}, ...], "metadata": {...}}`, keyed on load
//!
//! Writes always produce the keyed shape. Entry order is kept as written in
//! both shapes.

#![allow(clippy::result_large_err)]

use crate::cas::atomic::atomic_write;
use crate::cas::FsStore;
use crate::errors::{io_error, serialization_error, snapshot_error, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tokensync_core::errors::TokenSyncError;
use tokensync_core::model::{CompositeKey, Entry, Snapshot, SnapshotMetadata};
use tokensync_core::{log_op_end, log_op_error, log_op_start};

/// A loaded snapshot plus the entries that could not be keyed
#[derive(Debug, Clone)]
pub struct LoadedSnapshot {
    pub snapshot: Snapshot,
    pub rejected: Vec<TokenSyncError>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EntriesDocument {
    Keyed(IndexMap<CompositeKey, Entry>),
    List(Vec<Entry>),
}

#[derive(Deserialize)]
struct SnapshotDocument {
    entries: EntriesDocument,
    #[serde(default)]
    metadata: SnapshotMetadata,
}

/// Load a snapshot file
///
/// # Errors
///
/// - `Io` when the file cannot be read
/// - `Serialization` when it is not a snapshot document
/// - `EmptyKeySpace` when a list document has entries but none can be keyed
pub fn load_snapshot(path: &Path) -> Result<LoadedSnapshot> {
    log_op_start!("load_snapshot", path = %path.display());
    let start = std::time::Instant::now();

    let loaded = load_snapshot_impl(path).map_err(|e| {
        log_op_error!(
            "load_snapshot",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "load_snapshot",
        duration_ms = start.elapsed().as_millis() as u64,
        entries = loaded.snapshot.len(),
        rejected = loaded.rejected.len()
    );
    Ok(loaded)
}

fn load_snapshot_impl(path: &Path) -> Result<LoadedSnapshot> {
    let content = fs::read_to_string(path).map_err(|e| io_error("load_snapshot", e))?;
    parse_snapshot_str(&content, &path.display().to_string())
}

/// Parse a snapshot document
///
/// `origin` labels the snapshot in errors and becomes its `source` when the
/// document does not name one.
pub fn parse_snapshot_str(content: &str, origin: &str) -> Result<LoadedSnapshot> {
    let document: SnapshotDocument = serde_json::from_str(content)
        .map_err(|e| serialization_error("load_snapshot", origin, e))?;

    let mut metadata = document.metadata;
    if metadata.source.is_none() {
        metadata.source = Some(origin.to_string());
    }

    match document.entries {
        EntriesDocument::Keyed(entries) => Ok(LoadedSnapshot {
            snapshot: Snapshot { entries, metadata },
            rejected: Vec::new(),
        }),
        EntriesDocument::List(entries) => {
            let build = Snapshot::from_entries(entries, metadata)
                .map_err(|e| snapshot_error("load_snapshot", e))?;
            for reject in &build.rejected {
                tracing::warn!(origin, error = %reject, "skipping malformed entry");
            }
            Ok(LoadedSnapshot {
                snapshot: build.snapshot,
                rejected: build.rejected,
            })
        }
    }
}

/// On-disk bytes of a snapshot: pretty JSON in entry order, trailing newline
pub fn snapshot_bytes(snapshot: &Snapshot) -> Result<Vec<u8>> {
    let mut bytes = serde_json::to_vec_pretty(snapshot)
        .map_err(|e| serialization_error("save_snapshot", snapshot.metadata.label(), e))?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Write a snapshot atomically, replacing any existing file
pub fn save_snapshot(path: &Path, snapshot: &Snapshot) -> Result<()> {
    let bytes = snapshot_bytes(snapshot)?;
    atomic_write(path, &bytes)?;
    tracing::info!(
        path = %path.display(),
        entries = snapshot.len(),
        "snapshot saved"
    );
    Ok(())
}

/// Store a snapshot in the archive and return its digest
pub fn archive_snapshot(store: &FsStore, snapshot: &Snapshot) -> Result<String> {
    let bytes = snapshot_bytes(snapshot)?;
    let digest = store.write(&bytes, "json")?;
    tracing::info!(digest = %digest, entries = snapshot.len(), "snapshot archived");
    Ok(digest)
}
