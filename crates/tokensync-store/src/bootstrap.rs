//! Bootstrap export of id-less snapshots from token source files
//!
//! Token files are JSON or YAML documents shaped as
//!
//! ```text
//! { collection: { mode: { group: { ...: { "$value": .., "$type": .., "$description"?: .. } } } } }
//! ```
//!
//! Every leaf (an object carrying `$value`) becomes one entry whose path is
//! the dot-joined group names. Entries carry no variable ids, so comparing
//! against such a snapshot uses the path-only regime.

#![allow(clippy::result_large_err)]

use crate::errors::{bootstrap_error, io_error, serialization_error, Result};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tokensync_core::model::{Entry, Snapshot, SnapshotMetadata, TokenValue};
use tokensync_core::{log_op_end, log_op_error, log_op_start};

const VALUE_KEY: &str = "$value";
const TYPE_KEY: &str = "$type";
const DESCRIPTION_KEY: &str = "$description";

/// Supported token file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Json,
    Yaml,
}

impl SourceFormat {
    /// Format for a file, by extension
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Some(SourceFormat::Json),
            Some("yaml") | Some("yml") => Some(SourceFormat::Yaml),
            _ => None,
        }
    }
}

/// Export every token file under `dir` into one snapshot
///
/// Files are read in sorted path order and entries keep document order
/// within a file; a later file redefining the same (path, collection, mode)
/// replaces the earlier entry.
pub fn export_directory(dir: &Path, source: &str) -> Result<Snapshot> {
    log_op_start!("bootstrap_export", dir = %dir.display(), source = source);
    let start = std::time::Instant::now();

    let snapshot = export_directory_impl(dir, source).map_err(|e| {
        log_op_error!(
            "bootstrap_export",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "bootstrap_export",
        duration_ms = start.elapsed().as_millis() as u64,
        entries = snapshot.len()
    );
    Ok(snapshot)
}

fn export_directory_impl(dir: &Path, source: &str) -> Result<Snapshot> {
    let mut files = Vec::new();
    collect_token_files(dir, &mut files)?;
    files.sort();

    let metadata =
        SnapshotMetadata::new(chrono::Utc::now().to_rfc3339()).with_source(source.to_string());
    let mut snapshot = Snapshot::new(metadata);

    for file in &files {
        let Some(format) = SourceFormat::from_path(file) else {
            continue;
        };
        let origin = file.display().to_string();
        let content = fs::read_to_string(file).map_err(|e| io_error("bootstrap_read", e))?;
        for entry in parse_token_document(&content, format, &origin)? {
            snapshot
                .insert(entry)
                .map_err(|e| bootstrap_error(&origin, &e.to_string()))?;
        }
        tracing::debug!(file = %origin, "token file exported");
    }

    Ok(snapshot)
}

fn collect_token_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let read_dir = fs::read_dir(dir).map_err(|e| io_error("bootstrap_read_dir", e))?;
    for item in read_dir {
        let path = item.map_err(|e| io_error("bootstrap_read_dir", e))?.path();
        if path.is_dir() {
            collect_token_files(&path, files)?;
        } else if SourceFormat::from_path(&path).is_some() {
            files.push(path);
        }
    }
    Ok(())
}

/// Parse one token document into id-less entries
pub fn parse_token_document(
    content: &str,
    format: SourceFormat,
    origin: &str,
) -> Result<Vec<Entry>> {
    let root: Value = match format {
        SourceFormat::Json => serde_json::from_str(content)
            .map_err(|e| serialization_error("bootstrap_parse", origin, e))?,
        SourceFormat::Yaml => serde_yaml::from_str(content)
            .map_err(|e| serialization_error("bootstrap_parse", origin, e))?,
    };

    let collections = as_object(&root, origin, "document root")?;
    let mut entries = Vec::new();
    for (collection, modes) in collections {
        let modes = as_object(modes, origin, collection)?;
        for (mode, groups) in modes {
            let groups = as_object(groups, origin, &format!("{}.{}", collection, mode))?;
            if groups.contains_key(VALUE_KEY) {
                return Err(bootstrap_error(
                    origin,
                    &format!("token directly under mode '{}.{}' has no path", collection, mode),
                ));
            }
            let mut path = Vec::new();
            walk_groups(groups, collection, mode, &mut path, origin, &mut entries)?;
        }
    }
    Ok(entries)
}

fn walk_groups(
    node: &Map<String, Value>,
    collection: &str,
    mode: &str,
    path: &mut Vec<String>,
    origin: &str,
    out: &mut Vec<Entry>,
) -> Result<()> {
    for (name, child) in node {
        if name.starts_with('$') {
            continue;
        }
        path.push(name.clone());
        let joined = path.join(".");
        let child = as_object(child, origin, &joined)?;

        if let Some(raw) = child.get(VALUE_KEY) {
            let value: TokenValue = serde_json::from_value(raw.clone())
                .map_err(|e| serialization_error("bootstrap_parse", origin, e))?;
            let mut entry = Entry::new(joined, collection, mode, value);
            if let Some(token_type) = child.get(TYPE_KEY).and_then(Value::as_str) {
                entry = entry.with_type(token_type);
            }
            if let Some(description) = child.get(DESCRIPTION_KEY).and_then(Value::as_str) {
                entry = entry.with_description(description);
            }
            out.push(entry);
        } else {
            walk_groups(child, collection, mode, path, origin, out)?;
        }
        path.pop();
    }
    Ok(())
}

fn as_object<'a>(value: &'a Value, origin: &str, at: &str) -> Result<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| bootstrap_error(origin, &format!("expected an object at '{}'", at)))
}
