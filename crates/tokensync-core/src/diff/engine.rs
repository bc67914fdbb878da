//! Comparison orchestration.
//!
//! The entry point is [`compare`]: filter phantom modes, match structure,
//! pick the identity or path comparator, aggregate.

#![allow(clippy::result_large_err)]

use crate::diff::aggregate::{aggregate_fallback, aggregate_identity, get_change_counts};
use crate::diff::entries::compare_entries;
use crate::diff::fallback::{compare_by_path, has_stable_identifiers};
use crate::diff::matcher::{match_structure_with, EqualModeCount, RenameStrategy, StructuralRegime};
use crate::diff::model::ComparisonResult;
use crate::errors::{ExError, Result, TokenSyncError};
use crate::model::Snapshot;
use crate::normalize::{filter_phantom_modes, resolve_identity};
use crate::{log_op_end, log_op_error, log_op_start};
use serde::{Deserialize, Serialize};

/// Which entry comparator produced the entry-level changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonRegime {
    Identity,
    PathFallback,
}

/// A comparison result with the bookkeeping that explains it.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub result: ComparisonResult,
    pub regime: ComparisonRegime,
    pub structural_regime: StructuralRegime,
    /// Entries matched with no difference
    pub unchanged: usize,
    /// Entries skipped because a structural change accounts for them
    pub explained: usize,
    /// Per-entry problems; the affected entries were skipped
    pub issues: Vec<TokenSyncError>,
}

/// Compare a previous snapshot against a current one.
///
/// # Errors
///
/// - `EmptyKeySpace`: a non-empty snapshot in which no entry can be keyed
pub fn compare(previous: &Snapshot, current: &Snapshot) -> std::result::Result<Comparison, ExError> {
    compare_with_strategy(previous, current, &EqualModeCount)
}

/// [`compare`] with a custom collection-rename strategy.
pub fn compare_with_strategy<S>(
    previous: &Snapshot,
    current: &Snapshot,
    strategy: &S,
) -> std::result::Result<Comparison, ExError>
where
    S: RenameStrategy + ?Sized,
{
    log_op_start!(
        "compare",
        previous_len = previous.len(),
        current_len = current.len()
    );
    let start = std::time::Instant::now();

    let comparison = compare_impl(previous, current, strategy).map_err(|e| {
        log_op_error!(
            "compare",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        ExError::from(e).with_op("compare")
    })?;

    let counts = get_change_counts(&comparison.result);
    log_op_end!(
        "compare",
        duration_ms = start.elapsed().as_millis() as u64,
        total = counts.total,
        breaking = counts.breaking,
        issues = comparison.issues.len()
    );

    Ok(comparison)
}

fn compare_impl<S>(previous: &Snapshot, current: &Snapshot, strategy: &S) -> Result<Comparison>
where
    S: RenameStrategy + ?Sized,
{
    ensure_key_space(previous)?;
    ensure_key_space(current)?;

    let previous = filter_phantom_modes(previous);
    let current = filter_phantom_modes(current);

    let structural = match_structure_with(&previous, &current, strategy);
    let structural_regime = structural.regime;

    if has_stable_identifiers(&previous) {
        let entries = compare_entries(&previous, &current, &structural.renamed_or_deleted_mode_keys);
        let unchanged = entries.unchanged;
        let explained = entries.explained;
        let issues = entries.issues.clone();
        Ok(Comparison {
            result: aggregate_identity(structural, entries),
            regime: ComparisonRegime::Identity,
            structural_regime,
            unchanged,
            explained,
            issues,
        })
    } else {
        let mut paths = compare_by_path(&previous, &current);
        let unchanged = paths.matched;
        let issues = std::mem::take(&mut paths.issues);
        let (result, explained) = aggregate_fallback(structural, paths);
        Ok(Comparison {
            result,
            regime: ComparisonRegime::PathFallback,
            structural_regime,
            unchanged,
            explained,
            issues,
        })
    }
}

/// A non-empty snapshot must contain at least one entry that can be keyed.
fn ensure_key_space(snapshot: &Snapshot) -> Result<()> {
    if snapshot.is_empty() {
        return Ok(());
    }
    let usable = snapshot
        .iter()
        .any(|(key, entry)| entry.has_path() || resolve_identity(key, entry).is_ok());
    if usable {
        Ok(())
    } else {
        Err(TokenSyncError::EmptyKeySpace {
            side: snapshot.metadata.label().to_string(),
            entry_count: snapshot.len(),
        })
    }
}
