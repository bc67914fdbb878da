use tokensync_core::model::{Entry, Snapshot, SnapshotMetadata, TokenValue};

/// Build a keyed snapshot from raw entries, panicking on rejects
#[allow(dead_code)]
pub fn snapshot(source: &str, entries: Vec<Entry>) -> Snapshot {
    let build = Snapshot::from_entries(
        entries,
        SnapshotMetadata::new("2026-01-01T00:00:00Z").with_source(source),
    )
    .unwrap();
    assert!(build.rejected.is_empty(), "unexpected rejects: {:?}", build.rejected);
    build.snapshot
}

/// An entry with a stable variable id
#[allow(dead_code)]
pub fn token(id: &str, path: &str, collection: &str, mode: &str, value: &str) -> Entry {
    Entry::new(path, collection, mode, TokenValue::from(value))
        .with_variable_id(id)
        .with_type("COLOR")
}

/// An entry with a stable variable id and design-tool structure ids
#[allow(dead_code)]
pub fn token_with_ids(
    id: &str,
    path: &str,
    (collection_id, collection): (&str, &str),
    (mode_id, mode): (&str, &str),
    value: &str,
) -> Entry {
    token(id, path, collection, mode, value).with_structure_ids(collection_id, mode_id)
}

/// An id-less numeric entry, as produced by the bootstrap exporter
#[allow(dead_code)]
pub fn bare(path: &str, collection: &str, mode: &str, value: f64) -> Entry {
    Entry::new(path, collection, mode, TokenValue::from(value)).with_type("number")
}
