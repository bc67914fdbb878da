//! Snapshot data model: entries, composite keys and token values.

pub mod entry;
pub mod snapshot;
pub mod value;

pub use entry::{Entry, DEFAULT_MODE};
pub use snapshot::{CompositeKey, KeyParts, Snapshot, SnapshotBuild, SnapshotMetadata};
pub use value::{AliasKind, ColorValue, TokenValue, VariableAlias};
