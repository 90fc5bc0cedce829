//! Core error types for the formwork framework.
//!
//! Validation failures caused by user input are never errors: they are
//! collected as messages on elements and forms. [`FormworkError`] covers the
//! remaining cases, where a caller broke a contract (for example handing a
//! plain string to a file field), a request body could not be parsed, or
//! configuration could not be loaded.

use thiserror::Error;

/// The primary error type for the formwork framework.
///
/// Each variant maps to an appropriate HTTP status code via
/// [`FormworkError::status_code`].
#[derive(Error, Debug)]
pub enum FormworkError {
    // ── Contract violations ──────────────────────────────────────────

    /// A file field received a value that is not an uploaded file.
    #[error("Value of field \"{field}\" is not a file")]
    InvalidFileValue {
        /// The field that received the value.
        field: String,
    },

    // ── Request errors ───────────────────────────────────────────────

    /// HTTP 400 Bad Request, e.g. a malformed multipart body.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A mutation was attempted on an immutable structure.
    #[error("Suspicious operation: {0}")]
    SuspiciousOperation(String),

    // ── Configuration ────────────────────────────────────────────────

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    // ── IO ───────────────────────────────────────────────────────────

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl FormworkError {
    /// Returns the HTTP status code associated with this error.
    ///
    /// - `InvalidFileValue`, `BadRequest` -> 400
    /// - `SuspiciousOperation` -> 403
    /// - Everything else -> 500
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidFileValue { .. } | Self::BadRequest(_) => 400,
            Self::SuspiciousOperation(_) => 403,
            Self::ConfigurationError(_) | Self::IoError(_) => 500,
        }
    }
}

/// A convenience type alias for `Result<T, FormworkError>`.
pub type FormworkResult<T> = Result<T, FormworkError>;
