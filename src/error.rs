//! Error types for archive-creation operations.
//!
//! This module provides the [`Error`] enum which represents all possible
//! failure modes when building an archive, the coarse [`ErrorCode`]
//! taxonomy a UI layer switches on, and a convenient [`Result<T>`] alias.
//!
//! # Error Handling
//!
//! All fallible operations in this crate return `Result<T, Error>`. Callers
//! that only need to decide what to show the user can match on
//! [`Error::code`]:
//!
//! ```rust
//! use packsmith::{Error, ErrorCode};
//!
//! fn user_message(error: &Error) -> String {
//!     match error.code() {
//!         ErrorCode::InvalidInput => format!("Please check your input: {}", error),
//!         ErrorCode::ProcessingFailed => format!("Could not create the archive: {}", error),
//!         ErrorCode::EngineNotReady => "Encryption is still loading, try again.".to_string(),
//!         ErrorCode::Cancelled => "Cancelled.".to_string(),
//!         _ => error.to_string(),
//!     }
//! }
//!
//! let err = Error::InvalidInput("Enter a password to encrypt the archive".into());
//! assert!(user_message(&err).contains("password"));
//! ```
//!
//! ## Locating the failing entry
//!
//! ```rust
//! use packsmith::Error;
//!
//! fn failing_entry(error: &Error) -> Option<usize> {
//!     match error {
//!         Error::ProcessingFailed { entry_index, .. } => *entry_index,
//!         _ => None,
//!     }
//! }
//! ```

use std::io;

/// Coarse error classification exposed to callers.
///
/// Every [`Error`] maps onto exactly one code. The UI layer decides how to
/// present an error from this code alone; the `Display` output of the
/// error carries the human-readable message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorCode {
    /// The request failed its precondition checks; nothing was processed.
    InvalidInput,
    /// A read, encode or finalize step failed partway through.
    ProcessingFailed,
    /// Encryption was requested before the encryption engine was ready.
    EngineNotReady,
    /// The caller cancelled the operation between entries.
    Cancelled,
}

impl ErrorCode {
    /// Returns a stable identifier suitable for logs and JSON output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::ProcessingFailed => "processing_failed",
            Self::EngineNotReady => "engine_not_ready",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Helper struct for formatting ProcessingFailed error messages.
struct ProcessingFailedDisplay<'a> {
    entry_index: Option<usize>,
    path: Option<&'a str>,
    message: &'a str,
}

impl std::fmt::Display for ProcessingFailedDisplay<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Archive creation failed")?;
        match (self.entry_index, self.path) {
            (Some(idx), Some(path)) => write!(f, " at entry {} ({})", idx, path)?,
            (Some(idx), None) => write!(f, " at entry {}", idx)?,
            (None, Some(path)) => write!(f, " at '{}'", path)?,
            (None, None) => {}
        }
        write!(f, ": {}", self.message)
    }
}

/// The main error type for archive-creation operations.
///
/// | Category | Variants | Code |
/// |----------|----------|------|
/// | Preconditions | [`InvalidInput`][Self::InvalidInput], [`InvalidArchivePath`][Self::InvalidArchivePath], [`InvalidCompressionLevel`][Self::InvalidCompressionLevel] | `InvalidInput` |
/// | Processing | [`ProcessingFailed`][Self::ProcessingFailed], [`Io`][Self::Io] | `ProcessingFailed` |
/// | Encryption | [`EngineNotReady`][Self::EngineNotReady], [`UnsupportedFeature`][Self::UnsupportedFeature] | `EngineNotReady` |
/// | Control | [`Cancelled`][Self::Cancelled] | `Cancelled` |
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// An I/O error occurred outside of a specific entry.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The request failed a precondition check.
    ///
    /// Returned before any entry changes status, e.g. for an empty entry
    /// list or a blank password on an encrypted ZIP request.
    #[error("{0}")]
    InvalidInput(String),

    /// An archive path failed validation.
    ///
    /// Paths must be non-empty, relative, and free of `.`/`..` segments,
    /// empty segments and NUL bytes.
    #[error("Invalid archive path: {0}")]
    InvalidArchivePath(String),

    /// The compression level is outside the valid range (0-9).
    #[error("Invalid compression level {level}: must be between 0 and 9")]
    InvalidCompressionLevel {
        /// The rejected level.
        level: u32,
    },

    /// Reading a source or writing into the container failed.
    ///
    /// When the failure happened while an entry was in flight, its index
    /// and path are recorded and that entry is left in the `Error` status.
    /// Failures while finalizing the container carry no entry.
    #[error("{}", ProcessingFailedDisplay { entry_index: *entry_index, path: path.as_deref(), message: message.as_str() })]
    ProcessingFailed {
        /// Index of the entry being processed, if any.
        entry_index: Option<usize>,
        /// Archive path of the entry being processed, if any.
        path: Option<String>,
        /// Message of the underlying cause.
        message: String,
    },

    /// Encrypted output was requested without an initialized engine.
    ///
    /// Call [`EncryptionEngine::initialize`] (or `preload` in async code)
    /// and pass the engine to the orchestrator.
    ///
    /// [`EncryptionEngine::initialize`]: crate::crypto::EncryptionEngine::initialize
    #[error("Encryption engine is not ready; initialize it before creating an encrypted archive")]
    EngineNotReady,

    /// A feature required by the request was not compiled in.
    #[error("Unsupported feature: {feature}")]
    UnsupportedFeature {
        /// The name of the missing feature.
        feature: &'static str,
    },

    /// The operation was cancelled by the caller.
    #[error("Operation cancelled")]
    Cancelled,
}

impl Error {
    /// Returns the coarse classification of this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidInput(_)
            | Self::InvalidArchivePath(_)
            | Self::InvalidCompressionLevel { .. } => ErrorCode::InvalidInput,
            Self::ProcessingFailed { .. } | Self::Io(_) => ErrorCode::ProcessingFailed,
            Self::EngineNotReady | Self::UnsupportedFeature { .. } => ErrorCode::EngineNotReady,
            Self::Cancelled => ErrorCode::Cancelled,
        }
    }

    /// Builds a [`Error::ProcessingFailed`] for an entry in flight.
    pub(crate) fn entry_failed(index: usize, path: &str, cause: impl std::fmt::Display) -> Self {
        Self::ProcessingFailed {
            entry_index: Some(index),
            path: Some(path.to_string()),
            message: cause.to_string(),
        }
    }

    /// Builds a [`Error::ProcessingFailed`] for the finalize step.
    pub(crate) fn finalize_failed(cause: impl std::fmt::Display) -> Self {
        Self::ProcessingFailed {
            entry_index: None,
            path: None,
            message: cause.to_string(),
        }
    }
}

/// A specialized Result type for archive-creation operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            Error::InvalidInput("x".into()).code(),
            ErrorCode::InvalidInput
        );
        assert_eq!(
            Error::InvalidArchivePath("x".into()).code(),
            ErrorCode::InvalidInput
        );
        assert_eq!(
            Error::InvalidCompressionLevel { level: 12 }.code(),
            ErrorCode::InvalidInput
        );
        assert_eq!(
            Error::finalize_failed("boom").code(),
            ErrorCode::ProcessingFailed
        );
        assert_eq!(
            Error::Io(io::Error::other("disk")).code(),
            ErrorCode::ProcessingFailed
        );
        assert_eq!(Error::EngineNotReady.code(), ErrorCode::EngineNotReady);
        assert_eq!(Error::Cancelled.code(), ErrorCode::Cancelled);
    }

    #[test]
    fn test_processing_failed_display() {
        let err = Error::entry_failed(2, "dir/b.txt", "handle invalidated");
        assert_eq!(
            err.to_string(),
            "Archive creation failed at entry 2 (dir/b.txt): handle invalidated"
        );

        let err = Error::finalize_failed("out of memory");
        assert_eq!(err.to_string(), "Archive creation failed: out of memory");
    }

    #[test]
    fn test_invalid_input_display_is_message() {
        let err = Error::InvalidInput("Enter a password to encrypt the archive".into());
        assert_eq!(err.to_string(), "Enter a password to encrypt the archive");
    }

    #[test]
    fn test_error_code_as_str() {
        assert_eq!(ErrorCode::InvalidInput.to_string(), "invalid_input");
        assert_eq!(ErrorCode::EngineNotReady.as_str(), "engine_not_ready");
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
