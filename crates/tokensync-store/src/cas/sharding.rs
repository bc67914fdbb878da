//! Shard layout for the archive
//!
//! Blobs live under a subdirectory named after the first 2 hex characters
//! of their digest so no single directory grows unbounded.

use std::path::{Path, PathBuf};

/// For digest "abc123...", returns "<root>/ab/abc123.<ext>"
pub fn shard_path(root: &Path, digest: &str, extension: &str) -> PathBuf {
    let shard = &digest[..2.min(digest.len())];

    root.join(shard).join(format!("{}.{}", digest, extension))
}
