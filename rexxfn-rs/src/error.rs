//! Error types shared by the string functions and the line cursor.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Everything a REXX built-in can fail with.
///
/// End-of-file is not here: it is an expected control signal and
/// travels as [`crate::cursor::ReadResult::EndOfFile`] instead.
#[derive(Debug, Error)]
pub enum RexxError {
    /// The path does not exist.
    #[error("File does not exist: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The path exists but is a directory, socket, …
    #[error("Path is not a file: {}", .0.display())]
    NotAFile(PathBuf),

    /// The file exists but may not be opened.
    #[error("Permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    /// Any other failure while opening or scanning a file for reading.
    #[error("Error reading file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file could not be opened or written for LINEOUT.
    #[error("Error writing to file {}: {source}", .path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file exists but could not be removed.
    #[error("Error deleting file {}: {source}", .path.display())]
    DeleteFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Bad mode letter, position or count passed by the calling script.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Name is not a known built-in function.
    #[error("unknown function: {0}")]
    UnknownFunction(String),
}

impl RexxError {
    /// Classify an `io::Error` raised while opening `path` for reading.
    pub fn from_read(path: PathBuf, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => RexxError::FileNotFound(path),
            io::ErrorKind::PermissionDenied => RexxError::PermissionDenied(path),
            _ => RexxError::Io { path, source },
        }
    }

    /// Whether this is a usage error in the calling script rather than a
    /// runtime environment failure.  Usage errors are never turned into a
    /// process exit.
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            RexxError::InvalidArgument(_) | RexxError::UnknownFunction(_)
        )
    }

    /// Whether a permissive reader should report this as FILE_NOT_FOUND
    /// rather than END_OF_FILE.
    pub fn is_missing(&self) -> bool {
        matches!(
            self,
            RexxError::FileNotFound(_) | RexxError::NotAFile(_) | RexxError::PermissionDenied(_)
        )
    }
}

/// Shorthand for usage errors.
pub(crate) fn invalid(msg: impl Into<String>) -> RexxError {
    RexxError::InvalidArgument(msg.into())
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, RexxError>;

// ── Tests ─────────────────────────────────────────────────────────────────────
