//! Baseline comparison engine.
//!
//! Compares a previous snapshot against a current one and classifies every
//! difference as breaking or non-breaking.
//!
//! ## Entry point
//!
//! ```
//! use tokensync_core::diff::{compare, has_breaking_changes, render_console_summary};
//! use tokensync_core::model::Snapshot;
//!
//! let previous = Snapshot::default();
//! let current = Snapshot::default();
//! let comparison = compare(&previous, &current).unwrap();
//! assert!(!has_breaking_changes(&comparison.result));
//! print!("{}", render_console_summary(&comparison.result));
//! ```
//!
//! ## Guarantees
//!
//! - **Determinism**: identical inputs produce identical, identically ordered
//!   output.
//! - **Phantom modes**: mode labels such as `21598:4` never reach discovery or
//!   comparison.
//! - **Exclusivity**: no entry is reported both as new and as deleted.
//! - **Explained absences**: entries under a renamed or deleted mode are not
//!   reported again as deleted variables.

pub mod aggregate;
pub mod engine;
pub mod entries;
pub mod fallback;
pub mod human_summary;
pub mod matcher;
pub mod model;

pub use aggregate::{get_change_counts, has_breaking_changes, has_changes};
pub use engine::{compare, compare_with_strategy, Comparison, ComparisonRegime};
pub use human_summary::{render_console_summary, render_markdown_report};
pub use matcher::{EqualModeCount, RenameStrategy, StructuralRegime};
pub use model::{ChangeCategory, ChangeCounts, ComparisonResult};
