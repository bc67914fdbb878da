#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{snapshot, token};
use tokensync_core::errors::TokenSyncError;
use tokensync_core::logging_facility::test_capture::init_test_capture;
use tokensync_core::model::{CompositeKey, Entry, Snapshot, SnapshotMetadata};
use tokensync_core::{compare, log_op_end, log_op_error, log_op_start};
use tokensync_core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START};

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name);

    let start_events: Vec<_> = capture
        .events_for_op(op_name)
        .into_iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_START))
        .collect();

    assert_eq!(start_events.len(), 1, "Should have exactly one start event");
    assert!(start_events[0]
        .component
        .as_deref()
        .is_some_and(|c| c.starts_with("logging_facility_tests")));
}

#[test]
fn test_log_op_end_records_duration() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    let events = capture.events_for_op(op_name);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event.as_deref(), Some(EVENT_END));
    assert_eq!(events[0].field("duration_ms"), Some("42"));
}

#[test]
fn test_log_op_error_includes_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = TokenSyncError::EmptyKeySpace {
        side: "remote".to_string(),
        entry_count: 3,
    };
    log_op_error!(op_name, err, duration_ms = 10);

    capture.assert_event_exists(op_name, EVENT_END_ERROR);
    let error_event = capture
        .events_for_op(op_name)
        .into_iter()
        .find(|e| e.event.as_deref() == Some(EVENT_END_ERROR))
        .expect("Should have error event");
    assert_eq!(error_event.field("err.code"), Some("ERR_EMPTY_KEY_SPACE"));
    assert_eq!(error_event.field("err.kind"), Some("EmptyKeySpace"));
}

#[test]
fn test_log_macros_with_extra_fields() {
    let capture = init_test_capture();
    let op_name = "test_log_macros_fields_unique_4";

    log_op_start!(op_name, composite_key = "v1:theme.light", previous_len = 3u64);

    let event = capture
        .events_for_op(op_name)
        .into_iter()
        .next()
        .expect("Should have start event");
    assert_eq!(event.field("composite_key"), Some("v1:theme.light"));
    assert_eq!(event.field("previous_len"), Some("3"));
}

#[test]
#[should_panic(expected = "Expected event")]
fn test_capture_assert_event_exists_fails() {
    let capture = init_test_capture();
    capture.assert_event_exists("nonexistent_op_truly_unique_999", EVENT_START);
}

#[test]
fn test_compare_emits_start_and_end() {
    let capture = init_test_capture();

    let previous = snapshot("baseline", vec![token("v1", "colors.bg", "theme", "light", "#fff")]);
    let current = snapshot("remote", vec![token("v1", "colors.bg", "theme", "light", "#000")]);
    compare(&previous, &current).unwrap();

    capture.assert_event_exists("compare", EVENT_START);
    capture.assert_event_exists("compare", EVENT_END);
    let ends = capture.count_events(|e| {
        e.op.as_deref() == Some("compare")
            && e.event.as_deref() == Some(EVENT_END)
            && e.field("total").is_some()
    });
    assert!(ends >= 1);
}

#[test]
fn test_compare_failure_emits_error_event() {
    let capture = init_test_capture();

    let mut broken = Snapshot::new(SnapshotMetadata::new("t").with_source("broken-for-logging"));
    let bare: Entry = serde_json::from_value(serde_json::json!({ "value": 1 })).unwrap();
    broken.entries.insert(CompositeKey::from_raw("opaque"), bare);

    let err = compare(&broken, &Snapshot::default()).unwrap_err();
    assert_eq!(err.code(), "ERR_EMPTY_KEY_SPACE");

    let errors = capture.count_events(|e| {
        e.op.as_deref() == Some("compare")
            && e.event.as_deref() == Some(EVENT_END_ERROR)
            && e.field("err.code") == Some("ERR_EMPTY_KEY_SPACE")
    });
    assert!(errors >= 1);
}
