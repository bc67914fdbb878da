//! Canonical schema constants for structured logging and events
//!
//! These constants keep log fields consistent between the core engine,
//! the store and the CLI.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_RUN_ID: &str = "run_id";

// Token identity
pub const FIELD_VARIABLE_ID: &str = "variable_id";
pub const FIELD_COLLECTION: &str = "collection";
pub const FIELD_MODE: &str = "mode";
pub const FIELD_COMPOSITE_KEY: &str = "composite_key";

// Snapshot sizes
pub const FIELD_PREVIOUS_LEN: &str = "previous_len";
pub const FIELD_CURRENT_LEN: &str = "current_len";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
