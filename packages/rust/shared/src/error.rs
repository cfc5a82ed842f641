//! Error types for vtdex.
//!
//! Library crates use [`VtdexError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all vtdex operations.
#[derive(Debug, thiserror::Error)]
pub enum VtdexError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Network/HTTP error fetching a page, detail document, or API response.
    #[error("network error: {0}")]
    Network(String),

    /// HTML extraction or API response parsing error.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// A scraped entry lacks a mandatory field. Recovered by skipping the entry.
    #[error("missing required field `{field}` for {name:?}")]
    MissingField { field: &'static str, name: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Stage file (de)serialization error.
    #[error("serialization error at {path:?}: {source}")]
    Serialization {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Data validation error (argument out of range, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, VtdexError>;

impl VtdexError {
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

    /// Wrap a `serde_json::Error` with the stage file it came from.
    pub fn serialization(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Serialization {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = VtdexError::config("concurrency limit must be at least 1");
        assert_eq!(
            err.to_string(),
            "config error: concurrency limit must be at least 1"
        );

        let err = VtdexError::MissingField {
            field: "image",
            name: "Amelia".into(),
        };
        assert_eq!(
            err.to_string(),
            r#"missing required field `image` for "Amelia""#
        );
    }
}
