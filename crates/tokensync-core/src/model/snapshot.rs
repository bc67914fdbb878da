use crate::errors::{Result, TokenSyncError};
use crate::model::entry::Entry;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier used to match an entry across two snapshots.
///
/// `"{variableId}:{collection}.{mode}"` when the entry has a stable id,
/// `"{path}:{collection}.{mode}"` otherwise.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompositeKey(String);

/// Borrowed pieces of a decomposed [`CompositeKey`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyParts<'a> {
    /// Variable id or path, depending on how the key was built
    pub identity: &'a str,
    pub collection: &'a str,
    pub mode: &'a str,
}

impl CompositeKey {
    /// Wrap a key exactly as a snapshot file spells it
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Build the key for an entry.
    ///
    /// # Errors
    ///
    /// `MalformedEntry` when the entry has neither a stable id nor a path.
    pub fn for_entry(entry: &Entry) -> Result<Self> {
        let identity = match entry.stable_id() {
            Some(id) => id,
            None if entry.has_path() => entry.path.as_str(),
            None => {
                return Err(TokenSyncError::MalformedEntry {
                    location: format!(
                        "{}.{}",
                        entry.resolved_collection(),
                        entry.resolved_mode()
                    ),
                })
            }
        };
        Ok(Self::compose(
            identity,
            entry.resolved_collection(),
            entry.resolved_mode(),
        ))
    }

    pub fn compose(identity: &str, collection: &str, mode: &str) -> Self {
        Self(format!("{}:{}.{}", identity, collection, mode))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split the key back into identity, collection and mode.
    ///
    /// The mode is the text after the last `.`; in the remainder the last `:`
    /// separates identity from collection. This keeps design-tool ids such as
    /// `VariableID:1:2`, dotted paths, and phantom modes like `21598:4`
    /// intact. Returns `None` when either separator is missing or the identity
    /// is empty.
    ///
    /// A mode name containing `.` cannot be recovered from the key alone:
    /// `p:theme.high.contrast` yields collection `theme.high` and mode
    /// `contrast`. Resolution reads the entry's `collection` and `mode`
    /// fields first, so only keyed entries lacking those fields are affected.
    pub fn parts(&self) -> Option<KeyParts<'_>> {
        let (head, mode) = self.0.rsplit_once('.')?;
        let (identity, collection) = head.rsplit_once(':')?;
        if identity.is_empty() {
            return None;
        }
        Some(KeyParts {
            identity,
            collection,
            mode,
        })
    }
}

impl fmt::Display for CompositeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Capture metadata for a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMetadata {
    /// RFC 3339 capture timestamp
    #[serde(default)]
    pub captured_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl SnapshotMetadata {
    pub fn new(captured_at: impl Into<String>) -> Self {
        Self {
            captured_at: captured_at.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Label used in log events and error messages
    pub fn label(&self) -> &str {
        self.source.as_deref().unwrap_or("snapshot")
    }
}

/// A complete, timestamped capture of all token entries.
///
/// Entries keep source order: the order of the file or of the entry list
/// they were built from. Mode enumeration follows it; equality does not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Snapshot {
    pub entries: IndexMap<CompositeKey, Entry>,
    #[serde(default)]
    pub metadata: SnapshotMetadata,
}

/// Outcome of keying a list of raw entries.
#[derive(Debug, Clone)]
pub struct SnapshotBuild {
    pub snapshot: Snapshot,
    /// Entries that could not be keyed, located by their input index
    pub rejected: Vec<TokenSyncError>,
}

impl Snapshot {
    pub fn new(metadata: SnapshotMetadata) -> Self {
        Self {
            entries: IndexMap::new(),
            metadata,
        }
    }

    /// Key and insert one entry; a later entry with the same key replaces
    /// the earlier one in place.
    ///
    /// # Errors
    ///
    /// `MalformedEntry` when no key can be built.
    pub fn insert(&mut self, entry: Entry) -> Result<CompositeKey> {
        let key = CompositeKey::for_entry(&entry)?;
        if self.entries.insert(key.clone(), entry).is_some() {
            tracing::debug!(composite_key = %key, "duplicate key replaced earlier entry");
        }
        Ok(key)
    }

    /// Key a list of raw entries.
    ///
    /// Malformed entries are collected in [`SnapshotBuild::rejected`] and the
    /// rest are kept.
    ///
    /// # Errors
    ///
    /// `EmptyKeySpace` when the input is non-empty and every entry is
    /// malformed.
    pub fn from_entries(entries: Vec<Entry>, metadata: SnapshotMetadata) -> Result<SnapshotBuild> {
        let entry_count = entries.len();
        let mut snapshot = Snapshot::new(metadata);
        let mut rejected = Vec::new();

        for (index, entry) in entries.into_iter().enumerate() {
            if let Err(err) = snapshot.insert(entry) {
                let location = match err {
                    TokenSyncError::MalformedEntry { location } => {
                        format!("entries[{}] ({})", index, location)
                    }
                    other => return Err(other),
                };
                rejected.push(TokenSyncError::MalformedEntry { location });
            }
        }

        if entry_count > 0 && snapshot.is_empty() {
            return Err(TokenSyncError::EmptyKeySpace {
                side: snapshot.metadata.label().to_string(),
                entry_count,
            });
        }

        Ok(SnapshotBuild { snapshot, rejected })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &CompositeKey) -> Option<&Entry> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CompositeKey, &Entry)> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::value::TokenValue;

    #[test]
    fn test_key_prefers_stable_id() {
        let entry = Entry::new("colors.primary", "theme", "light", TokenValue::Null)
            .with_variable_id("v1");
        assert_eq!(
            CompositeKey::for_entry(&entry).unwrap().as_str(),
            "v1:theme.light"
        );

        let anonymous = Entry::new("colors.primary", "theme", "light", TokenValue::Null);
        assert_eq!(
            CompositeKey::for_entry(&anonymous).unwrap().as_str(),
            "colors.primary:theme.light"
        );
    }

    #[test]
    fn test_key_without_id_or_path_is_malformed() {
        let entry = Entry::new("", "theme", "light", TokenValue::Null);
        let err = CompositeKey::for_entry(&entry).unwrap_err();
        assert!(matches!(err, TokenSyncError::MalformedEntry { .. }));
    }

    #[test]
    fn test_parts_of_design_tool_key() {
        let key = CompositeKey::from_raw("VariableID:1:2:Primitives.Light");
        let parts = key.parts().unwrap();
        assert_eq!(parts.identity, "VariableID:1:2");
        assert_eq!(parts.collection, "Primitives");
        assert_eq!(parts.mode, "Light");
    }

    #[test]
    fn test_parts_of_path_key_and_phantom_mode() {
        let key = CompositeKey::from_raw("colors.primary:theme.light");
        let parts = key.parts().unwrap();
        assert_eq!(parts.identity, "colors.primary");
        assert_eq!(parts.collection, "theme");

        let phantom = CompositeKey::from_raw("v1:theme.21598:4");
        assert_eq!(phantom.parts().unwrap().mode, "21598:4");
    }

    #[test]
    fn test_parts_splits_dotted_mode_at_last_dot() {
        let key = CompositeKey::from_raw("colors.bg:theme.high.contrast");
        let parts = key.parts().unwrap();
        assert_eq!(parts.identity, "colors.bg");
        assert_eq!(parts.collection, "theme.high");
        assert_eq!(parts.mode, "contrast");
    }

    #[test]
    fn test_entries_keep_insertion_order() {
        let entries = vec![
            Entry::new("z", "theme", "light", TokenValue::Null),
            Entry::new("a", "theme", "dark", TokenValue::Null),
            Entry::new("z", "theme", "light", TokenValue::from("#fff")),
        ];
        let snapshot = Snapshot::from_entries(entries, SnapshotMetadata::default())
            .unwrap()
            .snapshot;
        let keys: Vec<&str> = snapshot.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["z:theme.light", "a:theme.dark"]);
        assert_eq!(snapshot.entries[0].value, TokenValue::from("#fff"));
    }

    #[test]
    fn test_parts_rejects_unstructured_key() {
        assert!(CompositeKey::from_raw("no-separators").parts().is_none());
        assert!(CompositeKey::from_raw(":theme.light").parts().is_none());
    }

    #[test]
    fn test_from_entries_collects_rejects() {
        let entries = vec![
            Entry::new("a.b", "c", "m", TokenValue::Number(1.0)),
            Entry::new("", "c", "m", TokenValue::Number(2.0)),
        ];
        let build = Snapshot::from_entries(entries, SnapshotMetadata::default()).unwrap();
        assert_eq!(build.snapshot.len(), 1);
        assert_eq!(build.rejected.len(), 1);
        match &build.rejected[0] {
            TokenSyncError::MalformedEntry { location } => assert!(location.starts_with("entries[1]")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_from_entries_all_malformed_is_fatal() {
        let entries = vec![Entry::new("", "c", "m", TokenValue::Null)];
        let err = Snapshot::from_entries(entries, SnapshotMetadata::new("t").with_source("local"))
            .unwrap_err();
        assert_eq!(
            err,
            TokenSyncError::EmptyKeySpace {
                side: "local".to_string(),
                entry_count: 1
            }
        );
    }

    #[test]
    fn test_from_entries_empty_input_is_ok() {
        let build = Snapshot::from_entries(Vec::new(), SnapshotMetadata::default()).unwrap();
        assert!(build.snapshot.is_empty());
        assert!(build.rejected.is_empty());
    }
}
