//! Error policy: what a failure turns into at the session boundary.

use std::fmt;

use crate::error::{invalid, RexxError};

/// Two independent switches, fixed when a session is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorPolicy {
    /// File-not-found, permission and I/O failures end the process with a
    /// failure status instead of returning a sentinel.
    pub terminate_on_error: bool,
    /// Write a diagnostic line before every failure return or termination.
    pub verbose: bool,
}

impl Default for ErrorPolicy {
    fn default() -> Self {
        Self { terminate_on_error: true, verbose: true }
    }
}

impl ErrorPolicy {
    /// Everything degrades to sentinels, nothing is printed.
    pub fn permissive() -> Self {
        Self { terminate_on_error: false, verbose: false }
    }

    pub fn with_terminate_on_error(mut self, on: bool) -> Self {
        self.terminate_on_error = on;
        self
    }

    pub fn with_verbose(mut self, on: bool) -> Self {
        self.verbose = on;
        self
    }
}

/// What a sequential or positional read does on reaching end of file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnEof {
    /// Return the END_OF_FILE sentinel.
    Signal,
    /// End the process successfully.  Only honoured while
    /// `terminate_on_error` is set; otherwise behaves like `Signal`.
    #[default]
    Terminate,
}

impl std::str::FromStr for OnEof {
    type Err = RexxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "SIGNAL" | "S" => Ok(OnEof::Signal),
            "TERMINATE" | "T" | "EXIT" => Ok(OnEof::Terminate),
            _ => Err(invalid(format!("LINEIN: invalid end-of-file action {s:?}; use SIGNAL or TERMINATE"))),
        }
    }
}

/// A request to end the process, raised by a session operation and acted
/// on by the binary's `main`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Halt {
    /// Expected end of input.
    Success,
    /// A file operation failed under `terminate_on_error`.
    Failure,
}

impl Halt {
    pub fn exit_code(self) -> i32 {
        match self {
            Halt::Success => 0,
            Halt::Failure => 1,
        }
    }
}

impl fmt::Display for Halt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Halt::Success => write!(f, "end of input"),
            Halt::Failure => write!(f, "terminated on error"),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
