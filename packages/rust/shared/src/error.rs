//! Error types for bookgrab.
//!
//! Library crates use [`BookgrabError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all bookgrab operations.
#[derive(Debug, thiserror::Error)]
pub enum BookgrabError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Network/HTTP error while fetching a page.
    #[error("network error: {0}")]
    Network(String),

    /// Response body could not be decoded with its declared charset.
    #[error("decode error for {url}: {message}")]
    Decode { url: String, message: String },

    /// URL resolution or structural query error.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// The index page has no node matching the book title query.
    #[error("no book title found on index page {url}")]
    MissingTitle { url: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BookgrabError>;

impl BookgrabError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a decode error for the page at `url`.
    pub fn decode(url: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Decode {
            url: url.into(),
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
