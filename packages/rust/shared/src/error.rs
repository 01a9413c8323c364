//! Error types for tildegen.
//!
//! Library crates use [`TildegenError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all tildegen operations.
#[derive(Debug, thiserror::Error)]
pub enum TildegenError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// The account database could not be enumerated.
    #[error("account database error: {message}")]
    Accounts { message: String },

    /// Account database or template parsing error.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A renderer failed to produce its output.
    #[error("render error ({format}): {message}")]
    Render { format: String, message: String },

    /// An output format identifier with no registered renderer.
    #[error("unsupported output format: {0}")]
    UnsupportedFormat(String),

    /// Data validation error.
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, TildegenError>;

impl TildegenError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create an account database error from any displayable message.
    pub fn accounts(msg: impl Into<String>) -> Self {
        Self::Accounts {
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

    /// Create a render error for the given output format.
    pub fn render(format: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Render {
            format: format.into(),
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = TildegenError::config("group_id must be an integer");
        assert_eq!(err.to_string(), "config error: group_id must be an integer");

        let err = TildegenError::UnsupportedFormat("xml".into());
        assert_eq!(err.to_string(), "unsupported output format: xml");

        let err = TildegenError::accounts("getent passwd exited with 2");
        assert_eq!(err.to_string(), "account database error: getent passwd exited with 2");

        let err = TildegenError::render("yaml", "bad document");
        assert!(err.to_string().contains("(yaml)"));
    }

    #[test]
    fn io_error_keeps_path() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = TildegenError::io("/etc/passwd", source);
        assert!(err.to_string().contains("/etc/passwd"));
    }
}
