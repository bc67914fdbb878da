use thiserror::Error;

/// Result type alias using TokenSyncError
pub type Result<T> = std::result::Result<T, TokenSyncError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers (the CLI, report
/// generators, tests) can match on without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Snapshot content
    InvalidInput,
    /// An entry carries neither a variable id nor a path, so no composite key exists
    MalformedEntry,
    /// A non-empty snapshot in which no entry yields a usable key
    EmptyKeySpace,
    NotFound,

    // Integration/IO
    Io,
    /// Snapshot or token document that does not parse
    Serialization,
    Persistence,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::MalformedEntry => "ERR_MALFORMED_ENTRY",
            ExErrorKind::EmptyKeySpace => "ERR_EMPTY_KEY_SPACE",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification for programmatic handling plus the operation
/// and key that help locate the offending entry.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    key: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            key: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add composite key (or raw map key) context
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the key context, if any
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(key) = &self.key {
            write!(f, " (key: {})", key)?;
        }
        if let Some(source) = &self.source {
            write!(f, " <- {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain error taxonomy for snapshot handling and comparison
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TokenSyncError {
    /// Entry has neither a variable id nor a path
    #[error("Entry at '{location}' has neither a variable id nor a path")]
    MalformedEntry { location: String },

    /// Identity could not be recovered from the fields or the composite key
    #[error("Cannot resolve variable identity for key '{key}'")]
    UnresolvableIdentity { key: String },

    /// Every entry of a non-empty snapshot was malformed
    #[error("Snapshot '{side}' has no usable key space ({entry_count} entries, all malformed)")]
    EmptyKeySpace { side: String, entry_count: usize },
}

impl From<TokenSyncError> for ExError {
    fn from(err: TokenSyncError) -> Self {
        match err {
            TokenSyncError::MalformedEntry { location } => {
                ExError::new(ExErrorKind::MalformedEntry)
                    .with_key(location)
                    .with_message("Entry has neither a variable id nor a path")
            }

            TokenSyncError::UnresolvableIdentity { key } => {
                ExError::new(ExErrorKind::MalformedEntry)
                    .with_key(key)
                    .with_message("Variable identity not present in fields or key")
            }

            TokenSyncError::EmptyKeySpace { side, entry_count } => {
                ExError::new(ExErrorKind::EmptyKeySpace).with_message(format!(
                    "Snapshot '{}' has {} entries and none are usable",
                    side, entry_count
                ))
            }
        }
    }
}
