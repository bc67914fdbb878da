//! End-to-end comparison scenarios through `diff::compare`.
//!
//! Covers single-value edits, path moves, mode and collection renames,
//! phantom modes, the path-only fallback, and the classification guarantees.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{bare, snapshot, token, token_with_ids};
use std::collections::BTreeSet;
use tokensync_core::diff::fallback::compare_by_path;
use tokensync_core::diff::model::{CollectionRename, ModeRename};
use tokensync_core::diff::{
    compare, get_change_counts, has_breaking_changes, has_changes, ComparisonRegime,
    ComparisonResult, StructuralRegime,
};
use tokensync_core::normalize::{build_modes_by_collection, filter_phantom_modes};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn deleted_keys(result: &ComparisonResult) -> BTreeSet<String> {
    result.deleted_variables.iter().map(|v| v.key.clone()).collect()
}

fn new_keys(result: &ComparisonResult) -> BTreeSet<String> {
    result.new_variables.iter().map(|v| v.key.clone()).collect()
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn test_value_edit_is_single_non_breaking_change() {
    // Given v1 changes value only
    let previous = snapshot("baseline", vec![token("v1", "colors.primary", "theme", "light", "#fff")]);
    let current = snapshot("remote", vec![token("v1", "colors.primary", "theme", "light", "#eee")]);

    // When
    let comparison = compare(&previous, &current).unwrap();
    let counts = get_change_counts(&comparison.result);

    // Then
    assert_eq!(comparison.regime, ComparisonRegime::Identity);
    assert_eq!(counts.value_changes, 1);
    assert_eq!(counts.total, 1);
    assert_eq!(counts.breaking, 0);
    assert!(!has_breaking_changes(&comparison.result));

    let change = &comparison.result.value_changes[0];
    assert_eq!(change.id.as_deref(), Some("v1"));
    assert_eq!(change.old_value.to_string(), "#fff");
    assert_eq!(change.new_value.to_string(), "#eee");
}

#[test]
fn test_path_move_is_single_breaking_change() {
    let previous = snapshot("baseline", vec![token("v1", "colors.primary", "theme", "light", "#fff")]);
    let current = snapshot(
        "remote",
        vec![token("v1", "colors.primary.base", "theme", "light", "#fff")],
    );

    let comparison = compare(&previous, &current).unwrap();
    let counts = get_change_counts(&comparison.result);

    assert_eq!(counts.path_changes, 1);
    assert_eq!(counts.total, 1);
    assert_eq!(counts.breaking, 1);
    assert_eq!(comparison.result.path_changes[0].old_path, "colors.primary");
    assert_eq!(comparison.result.path_changes[0].new_path, "colors.primary.base");
}

#[test]
fn test_all_modes_renamed_pair_in_enumeration_order() {
    // Given theme {light, dark} becomes theme {day, night}
    let previous = snapshot(
        "baseline",
        vec![
            token("v1", "colors.bg", "theme", "light", "#fff"),
            token("v1", "colors.bg", "theme", "dark", "#000"),
        ],
    );
    let current = snapshot(
        "remote",
        vec![
            token("v1", "colors.bg", "theme", "day", "#fff"),
            token("v1", "colors.bg", "theme", "night", "#000"),
        ],
    );

    // When
    let comparison = compare(&previous, &current).unwrap();
    let result = &comparison.result;

    // Then: exactly two renames and nothing else
    assert_eq!(
        result.mode_renames,
        vec![
            ModeRename {
                collection: "theme".into(),
                old_mode: "light".into(),
                new_mode: "day".into()
            },
            ModeRename {
                collection: "theme".into(),
                old_mode: "dark".into(),
                new_mode: "night".into()
            },
        ]
    );
    assert!(result.new_modes.is_empty());
    assert!(result.deleted_modes.is_empty());
    assert!(result.new_variables.is_empty());
    assert!(result.deleted_variables.is_empty());
    assert_eq!(get_change_counts(result).mode_renames, 2);
    assert_eq!(comparison.explained, 4);
}

#[test]
fn test_mode_rename_in_fallback_regime_is_not_double_reported() {
    let previous = snapshot(
        "baseline",
        vec![bare("space.s", "theme", "light", 4.0), bare("space.s", "theme", "dark", 4.0)],
    );
    let current = snapshot(
        "local",
        vec![bare("space.s", "theme", "day", 4.0), bare("space.s", "theme", "night", 4.0)],
    );

    let comparison = compare(&previous, &current).unwrap();

    assert_eq!(comparison.regime, ComparisonRegime::PathFallback);
    assert_eq!(comparison.result.mode_renames.len(), 2);
    assert!(comparison.result.new_variables.is_empty());
    assert!(comparison.result.deleted_variables.is_empty());
    assert_eq!(comparison.explained, 4);
}

#[test]
fn test_phantom_mode_never_surfaces() {
    let previous = snapshot("baseline", vec![token("v1", "colors.bg", "theme", "light", "#fff")]);
    let current = snapshot(
        "remote",
        vec![
            token("v1", "colors.bg", "theme", "light", "#fff"),
            token("v1", "colors.bg", "theme", "21598:4", "#123"),
            token("v2", "colors.fg", "internal", "3:1", "#456"),
        ],
    );

    let modes = build_modes_by_collection(&filter_phantom_modes(&current));
    assert!(!modes["theme"].contains("21598:4"));
    assert!(!modes.contains_key("internal"));

    let forward = compare(&previous, &current).unwrap();
    assert!(!has_changes(&forward.result));

    let backward = compare(&current, &previous).unwrap();
    assert!(!has_changes(&backward.result));
}

#[test]
fn test_fallback_reports_value_change_and_one_sided_paths() {
    // Given a baseline with no identifiers
    let previous = snapshot(
        "baseline",
        vec![bare("a.b", "c", "m", 1.0), bare("a.gone", "c", "m", 3.0)],
    );
    let current = snapshot(
        "local",
        vec![bare("a.b", "c", "m", 2.0), bare("a.added", "c", "m", 4.0)],
    );

    // When compared path-only
    let paths = compare_by_path(&previous, &current);

    // Then
    assert_eq!(paths.value_changes.len(), 1);
    assert_eq!(paths.value_changes[0].path, "a.b");
    assert_eq!(paths.only_in_previous.len(), 1);
    assert_eq!(paths.only_in_previous[0].path, "a.gone");
    assert_eq!(paths.only_in_current.len(), 1);
    assert_eq!(paths.only_in_current[0].path, "a.added");

    // And through the engine they surface as value/deleted/new
    let comparison = compare(&previous, &current).unwrap();
    assert_eq!(comparison.regime, ComparisonRegime::PathFallback);
    let counts = get_change_counts(&comparison.result);
    assert_eq!(counts.value_changes, 1);
    assert_eq!(counts.deleted_variables, 1);
    assert_eq!(counts.new_variables, 1);
    assert!(comparison.result.value_changes[0].id.is_none());
}

#[test]
fn test_collection_rename_by_heuristic() {
    let previous = snapshot(
        "baseline",
        vec![
            token("v1", "colors.bg", "colors", "light", "#fff"),
            token("v1", "colors.bg", "colors", "dark", "#000"),
        ],
    );
    let current = snapshot(
        "remote",
        vec![
            token("v1", "colors.bg", "palette", "light", "#fff"),
            token("v1", "colors.bg", "palette", "dark", "#000"),
        ],
    );

    let comparison = compare(&previous, &current).unwrap();

    assert_eq!(comparison.structural_regime, StructuralRegime::Heuristic);
    assert_eq!(
        comparison.result.collection_renames,
        vec![CollectionRename {
            old_name: "colors".into(),
            new_name: "palette".into()
        }]
    );
    assert!(comparison.result.deleted_variables.is_empty());
    assert!(comparison.result.new_variables.is_empty());
    assert!(comparison.result.mode_renames.is_empty());
    assert_eq!(get_change_counts(&comparison.result).breaking, 1);
}

#[test]
fn test_structure_ids_give_exact_renames() {
    let previous = snapshot(
        "baseline",
        vec![
            token_with_ids("v1", "colors.bg", ("c1", "theme"), ("m1", "light"), "#fff"),
            token_with_ids("v1", "colors.bg", ("c1", "theme"), ("m2", "dark"), "#000"),
        ],
    );
    let current = snapshot(
        "remote",
        vec![
            token_with_ids("v1", "colors.bg", ("c1", "brand"), ("m1", "light"), "#fff"),
            token_with_ids("v1", "colors.bg", ("c1", "brand"), ("m2", "night"), "#000"),
        ],
    );

    let comparison = compare(&previous, &current).unwrap();
    let result = &comparison.result;

    assert_eq!(comparison.structural_regime, StructuralRegime::ById);
    assert_eq!(result.collection_renames.len(), 1);
    assert_eq!(
        result.mode_renames,
        vec![ModeRename {
            collection: "brand".into(),
            old_mode: "dark".into(),
            new_mode: "night".into()
        }]
    );
    assert!(result.deleted_variables.is_empty());
    assert!(result.new_variables.is_empty());
    assert!(result.value_changes.is_empty());
}

#[test]
fn test_added_mode_is_breaking_but_its_entries_are_not_new_variables() {
    let previous = snapshot("baseline", vec![token("v1", "colors.bg", "theme", "light", "#fff")]);
    let current = snapshot(
        "remote",
        vec![
            token("v1", "colors.bg", "theme", "light", "#fff"),
            token("v1", "colors.bg", "theme", "contrast", "#fff"),
            token("v1", "colors.bg", "theme", "dim", "#ccc"),
        ],
    );

    let comparison = compare(&previous, &current).unwrap();

    assert_eq!(comparison.result.new_modes.len(), 2);
    assert!(comparison.result.new_variables.is_empty());
    assert!(has_breaking_changes(&comparison.result));
}

// ---------------------------------------------------------------------------
// Guarantees
// ---------------------------------------------------------------------------

#[test]
fn test_converse_detection() {
    let a = snapshot(
        "a",
        vec![
            token("v1", "colors.bg", "theme", "light", "#fff"),
            token("v2", "colors.fg", "theme", "light", "#000"),
        ],
    );
    let b = snapshot("b", vec![token("v1", "colors.bg", "theme", "light", "#fff")]);

    let forward = compare(&a, &b).unwrap();
    let backward = compare(&b, &a).unwrap();

    assert!(deleted_keys(&forward.result).contains("v2:theme.light"));
    assert!(new_keys(&backward.result).contains("v2:theme.light"));
}

#[test]
fn test_no_key_is_both_new_and_deleted() {
    let previous = snapshot(
        "baseline",
        vec![
            token("v1", "a", "theme", "light", "#fff"),
            token("v2", "b", "theme", "light", "#fff"),
            token("v3", "c", "spacing", "default", "4"),
        ],
    );
    let current = snapshot(
        "remote",
        vec![
            token("v2", "b", "theme", "light", "#000"),
            token("v4", "d", "theme", "light", "#fff"),
            token("v3", "c", "sizes", "default", "4"),
        ],
    );

    let result = compare(&previous, &current).unwrap().result;
    let overlap: Vec<_> = deleted_keys(&result)
        .intersection(&new_keys(&result))
        .cloned()
        .collect();
    assert!(overlap.is_empty(), "overlap: {:?}", overlap);
}

#[test]
fn test_breaking_aggregation_matches_breaking_categories() {
    let previous = snapshot(
        "baseline",
        vec![
            token("v1", "a", "theme", "light", "#fff"),
            token("v2", "b", "theme", "light", "#fff"),
        ],
    );
    let current = snapshot(
        "remote",
        vec![
            token("v1", "a.moved", "theme", "light", "#000"),
            token("v3", "c", "theme", "light", "#fff"),
        ],
    );

    let result = compare(&previous, &current).unwrap().result;
    let breaking_sum = result.path_changes.len()
        + result.collection_renames.len()
        + result.mode_renames.len()
        + result.new_modes.len()
        + result.deleted_modes.len()
        + result.deleted_variables.len();

    assert_eq!(has_breaking_changes(&result), breaking_sum > 0);
    assert_eq!(get_change_counts(&result).breaking, breaking_sum);
    assert_eq!(breaking_sum, 2);
}

#[test]
fn test_deletions_are_independent_of_input_order() {
    let entries = vec![
        token("v2", "b", "theme", "dark", "#111"),
        token("v1", "a", "theme", "light", "#fff"),
        token("v1", "a", "theme", "dark", "#000"),
    ];
    let mut reversed = entries.clone();
    reversed.reverse();
    let current = snapshot("remote", vec![token("v1", "a", "theme", "light", "#eee")]);

    let first = compare(&snapshot("baseline", entries), &current).unwrap();
    let second = compare(&snapshot("baseline", reversed), &current).unwrap();

    assert_eq!(
        serde_json::to_string(&first.result).unwrap(),
        serde_json::to_string(&second.result).unwrap()
    );
}
