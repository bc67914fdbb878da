//! Structured logging facility for tokensync
//!
//! - Single initialization point via `init(profile)`
//! - Structured logging macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//! - Test capture mode for deterministic assertions
//!
//! The comparison engine only emits `tracing` events. Nothing is written
//! anywhere until the embedding program installs a subscriber, which the CLI
//! does through [`init`].
//!
//! ```rust
//! use tokensync_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
