//! Error types for DealBrief.
//!
//! Library crates use [`DealBriefError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all DealBrief operations.
#[derive(Debug, thiserror::Error)]
pub enum DealBriefError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Network/HTTP error during document fetch or synthesis.
    #[error("network error: {0}")]
    Network(String),

    /// Brief synthesis error (request build, response shape).
    #[error("synthesis error: {0}")]
    Synthesis(String),

    /// Unknown report type passed to the formatter. Indicates a caller bug;
    /// never retried and never swallowed by per-stage isolation.
    #[error("invalid report type: {0:?} (expected \"one_pager\" or \"deep_dive\")")]
    InvalidReportType(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error (missing identity field, malformed record).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, DealBriefError>;

impl DealBriefError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
