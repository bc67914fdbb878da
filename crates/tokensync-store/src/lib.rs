//! tokensync store - snapshot persistence and bootstrap export
//!
//! Provides:
//! - Baseline snapshot loading and saving (JSON, atomic writes)
//! - Content-addressable archive (CAS) for superseded baselines
//! - Bootstrap export of id-less snapshots from token source files

pub mod baseline;
pub mod bootstrap;
pub mod cas;
pub mod errors;

// Re-export key types
pub use baseline::{load_snapshot, save_snapshot, LoadedSnapshot};
pub use bootstrap::export_directory;
pub use errors::Result;
