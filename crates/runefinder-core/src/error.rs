//! Error types for RuneFinder.
//!
//! Two layers of failure exist:
//! - [`ParseError`] describes a single malformed database line. The query
//!   engine skips such lines, so these never reach callers of `search`.
//! - [`RuneError`] covers everything that fails a whole query: resolving or
//!   fetching the database, and reading the stream once it is open.

use std::path::PathBuf;
use thiserror::Error;

/// Why a single `UnicodeData.txt` line was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("expected at least {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("invalid code point field: {0:?}")]
    InvalidCodepoint(String),

    #[error("code point U+{0:04X} is not a Unicode scalar value")]
    NotAScalarValue(u32),

    #[error("empty character name")]
    EmptyName,
}

/// Coarse grouping of [`RuneError`] for callers that translate errors into
/// their own response codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Locating, fetching or opening the database failed.
    Resolve,
    /// The database was opened but reading it failed mid-scan.
    StreamRead,
    /// Failure inside the library itself.
    Internal,
}

/// Main error type for the RuneFinder library.
#[derive(Debug, Error)]
pub enum RuneError {
    // Network errors
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    #[error("Request timeout after {0:?}")]
    Timeout(std::time::Duration),

    #[error("Download failed for {url}: {message}")]
    DownloadFailed { url: String, message: String },

    // File system errors
    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    #[error("Not a regular file: {0}")]
    NotAFile(PathBuf),

    // Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    // Reading an opened database
    #[error("Failed to read character database: {message}")]
    StreamRead {
        message: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Other(String),
}

/// Result type alias for RuneFinder operations.
pub type Result<T> = std::result::Result<T, RuneError>;

impl From<std::io::Error> for RuneError {
    fn from(err: std::io::Error) -> Self {
        RuneError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl From<reqwest::Error> for RuneError {
    fn from(err: reqwest::Error) -> Self {
        RuneError::Network {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl RuneError {
    /// Create an IO error with path context.
    ///
    /// Permission failures get their own variant so callers can tell them
    /// apart from a missing or unreadable file.
    pub fn io_with_path(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if err.kind() == std::io::ErrorKind::PermissionDenied {
            return RuneError::PermissionDenied(path);
        }
        RuneError::Io {
            message: err.to_string(),
            path: Some(path),
            source: Some(err),
        }
    }

    /// Wrap an error raised while reading an already-open database.
    pub fn stream_read(err: std::io::Error) -> Self {
        RuneError::StreamRead {
            message: err.to_string(),
            source: err,
        }
    }

    /// Which part of a query failed.
    pub fn category(&self) -> ErrorCategory {
        match self {
            RuneError::Network { .. }
            | RuneError::Timeout(_)
            | RuneError::DownloadFailed { .. }
            | RuneError::Io { .. }
            | RuneError::PermissionDenied(_)
            | RuneError::NotAFile(_)
            | RuneError::Config { .. } => ErrorCategory::Resolve,

            RuneError::StreamRead { .. } => ErrorCategory::StreamRead,

            RuneError::Other(_) => ErrorCategory::Internal,
        }
    }

    /// Check if a caller could reasonably retry the query.
    ///
    /// The library never retries on its own.
    pub fn is_retryable(&self) -> bool {
        matches!(self, RuneError::Network { .. } | RuneError::Timeout(_))
    }
}
