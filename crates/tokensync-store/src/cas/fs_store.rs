//! Filesystem-based content-addressable archive

#![allow(clippy::result_large_err)]

use crate::cas::atomic::atomic_write;
use crate::cas::sharding::shard_path;
use crate::errors::{cas_collision, cas_missing, io_error, Result};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

/// Extensions probed when reading a blob back by digest
const KNOWN_EXTENSIONS: [&str; 3] = ["json", "yaml", "txt"];

/// SHA-256 of `content`, lowercase hex
pub fn compute_digest(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}

/// Filesystem-based CAS store
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write content and return its digest
    ///
    /// Writing the same content twice is a no-op. Finding different content
    /// under the same digest is reported as a collision.
    pub fn write(&self, content: &[u8], extension: &str) -> Result<String> {
        let digest = compute_digest(content);
        let target_path = shard_path(&self.root, &digest, extension);

        if target_path.exists() {
            let existing = fs::read(&target_path).map_err(|e| io_error("read_cas", e))?;
            if existing == content {
                tracing::debug!(digest = %digest, "archive blob already present");
                return Ok(digest);
            }
            return Err(cas_collision(&digest));
        }

        atomic_write(&target_path, content)?;
        Ok(digest)
    }

    /// Read a blob back by digest
    pub fn read(&self, digest: &str) -> Result<Vec<u8>> {
        match self.locate(digest) {
            Some(path) => fs::read(&path).map_err(|e| io_error("read_cas", e)),
            None => Err(cas_missing(digest)),
        }
    }

    pub fn contains(&self, digest: &str) -> bool {
        self.locate(digest).is_some()
    }

    fn locate(&self, digest: &str) -> Option<PathBuf> {
        KNOWN_EXTENSIONS
            .iter()
            .map(|ext| shard_path(&self.root, digest, ext))
            .find(|path| path.exists())
    }
}
