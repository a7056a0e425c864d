//! Error types for BrandLens.
//!
//! Library crates use [`BrandLensError`] via `thiserror`.
//! The CLI app wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all BrandLens operations.
#[derive(Debug, thiserror::Error)]
pub enum BrandLensError {
    /// Configuration loading or validation error (missing API key, bad TOML).
    #[error("config error: {message}")]
    Config { message: String },

    /// Network/HTTP error. Fatal when it hits the primary page fetch;
    /// auxiliary stylesheet fetch failures are swallowed by the caller.
    #[error("network error: {0}")]
    Network(String),

    /// HTML or JSON parsing error.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// LLM call transport failure (HTTP error, malformed API response).
    #[error("llm error: {0}")]
    Llm(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error (malformed URL, bad request payload).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// The coordinator was given a request type it does not know.
    #[error("unknown request type: {request_type}")]
    UnknownRequest { request_type: String },

    /// A required request field was absent or empty.
    #[error("missing required field: {field}")]
    MissingField { field: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BrandLensError>;

impl BrandLensError {
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

    /// Create a missing-field error for a request payload.
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
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
