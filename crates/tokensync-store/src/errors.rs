//! Error handling for tokensync-store
//!
//! Wraps tokensync-core ExError with store-specific helpers

use tokensync_core::errors::{ExError, ExErrorKind, TokenSyncError};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}

/// Create a serialization error for a snapshot or token document
pub fn serialization_error(
    operation: &str,
    origin: &str,
    reason: impl std::fmt::Display,
) -> ExError {
    ExError::new(ExErrorKind::Serialization)
        .with_op(operation.to_string())
        .with_message(format!("{}: {}", origin, reason))
}

/// Lift a domain error raised while loading a snapshot
pub fn snapshot_error(operation: &str, err: TokenSyncError) -> ExError {
    ExError::from(err).with_op(operation.to_string())
}

/// Create a CAS collision error
pub fn cas_collision(digest: &str) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("cas_write")
        .with_message(format!("CAS collision for digest {}", digest))
}

/// Create a CAS missing blob error
pub fn cas_missing(digest: &str) -> ExError {
    ExError::new(ExErrorKind::NotFound)
        .with_op("cas_read")
        .with_message(format!("CAS blob not found for digest {}", digest))
}

/// Create a bootstrap validation error
pub fn bootstrap_error(origin: &str, reason: &str) -> ExError {
    ExError::new(ExErrorKind::InvalidInput)
        .with_op("bootstrap_export")
        .with_message(format!("{}: {}", origin, reason))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helpers_set_kind_and_op() {
        let err = cas_missing("abc");
        assert_eq!(err.kind(), ExErrorKind::NotFound);
        assert_eq!(err.op(), Some("cas_read"));

        let err = bootstrap_error("tokens/theme.json", "leaf without $value");
        assert_eq!(err.code(), "ERR_INVALID_INPUT");
        assert!(err.message().contains("tokens/theme.json"));
    }

    #[test]
    fn test_snapshot_error_keeps_domain_kind() {
        let err = snapshot_error(
            "load_snapshot",
            TokenSyncError::EmptyKeySpace {
                side: "baseline".to_string(),
                entry_count: 2,
            },
        );
        assert_eq!(err.kind(), ExErrorKind::EmptyKeySpace);
        assert_eq!(err.op(), Some("load_snapshot"));
    }
}
