//! tokensync core - design-token baseline comparison
//!
//! This crate provides the comparison engine and its data model:
//! - Snapshot, entry and token value types with source-ordered entries
//! - Identity normalization and phantom-mode filtering
//! - Collection and mode rename detection (by id or heuristic)
//! - Identity-based and path-based entry comparison
//! - Breaking/non-breaking classification and renderers
//!
//! The crate performs no I/O. Loading and persisting snapshots lives in
//! `tokensync-store`; the command line lives in `tokensync-cli`.

pub mod diff;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod normalize;

pub use diff::{compare, Comparison, ComparisonResult};
pub use errors::{ExError, ExErrorKind, Result, TokenSyncError};
pub use model::{CompositeKey, Entry, Snapshot, SnapshotMetadata, TokenValue};
