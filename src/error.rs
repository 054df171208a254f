//! Error types for followsweep.

use thiserror::Error;

/// Errors surfaced by the import, session and workflow layers.
#[derive(Debug, Error)]
pub enum SweepError {
    /// Filesystem failure while reading or writing a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Input could not be decoded as JSON at all.
    #[error("JSON error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The export file is valid JSON but not in the expected shape.
    #[error("Invalid export format: {0}")]
    Format(String),

    /// A persisted session file is missing fields or breaks an invariant.
    #[error("Invalid session file: {0}")]
    InvalidSession(String),

    /// A file or session that was asked for does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The workflow refused an action on the current request.
    #[error("Not allowed: {0}")]
    NotAllowed(String),

    /// Configuration could not be read, parsed or written.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SweepError {
    /// Exit code the binary uses for this error.
    ///
    /// Refusals get their own code so scripts can tell "try again later"
    /// apart from real failures.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::NotAllowed(_) => 2,
            _ => 1,
        }
    }
}
