//! Content-addressable archive for superseded baselines
//!
//! Provides:
//! - Filesystem-based CAS with atomic writes
//! - Collision detection
//! - Sharding by first 2 hex chars of digest

pub(crate) mod atomic;
mod fs_store;
mod sharding;

pub use fs_store::{compute_digest, FsStore};
