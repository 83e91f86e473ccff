//! Exit codes for the CLI tool.

use packsmith::{Error, ErrorCode};

/// Exit code constants
pub const SUCCESS: i32 = 0;
/// Archive written, but an option was ignored
pub const WARNING: i32 = 1;
/// Fatal error occurred
pub const FATAL_ERROR: i32 = 2;
/// A file could not be read or written into the archive
pub const PROCESSING_FAILED: i32 = 3;
/// Encryption unavailable
pub const ENCRYPTION_UNAVAILABLE: i32 = 4;
/// I/O error
pub const IO_ERROR: i32 = 5;
/// Ctrl+C (128 + SIGINT)
pub const USER_INTERRUPT: i32 = 130;
/// Invalid command line arguments or request
pub const BAD_ARGS: i32 = 255;

/// Exit code enum for structured handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success,
    Warning,
    FatalError,
    ProcessingFailed,
    EncryptionUnavailable,
    IoError,
    UserInterrupt,
    BadArgs,
}

impl ExitCode {
    /// Returns the numeric exit code
    pub fn code(self) -> i32 {
        match self {
            Self::Success => SUCCESS,
            Self::Warning => WARNING,
            Self::FatalError => FATAL_ERROR,
            Self::ProcessingFailed => PROCESSING_FAILED,
            Self::EncryptionUnavailable => ENCRYPTION_UNAVAILABLE,
            Self::IoError => IO_ERROR,
            Self::UserInterrupt => USER_INTERRUPT,
            Self::BadArgs => BAD_ARGS,
        }
    }
}

/// Converts a packsmith error to an exit code
pub fn error_to_exit_code(error: &Error) -> ExitCode {
    if let Error::Io(_) = error {
        return ExitCode::IoError;
    }
    match error.code() {
        ErrorCode::InvalidInput => ExitCode::BadArgs,
        ErrorCode::ProcessingFailed => ExitCode::ProcessingFailed,
        ErrorCode::EngineNotReady => ExitCode::EncryptionUnavailable,
        ErrorCode::Cancelled => ExitCode::UserInterrupt,
        // Future codes - required by #[non_exhaustive]
        _ => ExitCode::FatalError,
    }
}
