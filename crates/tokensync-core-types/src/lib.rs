//! Core types shared across tokensync facilities
//!
//! This crate provides foundational types used by the error, logging and
//! command-line layers:
//!
//! - **Correlation types**: RunId, RunContext
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::{RunContext, RunId};
