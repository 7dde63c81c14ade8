//! A REXX file-function session: one cursor table plus one error policy.
//!
//! [`LineCursor`] reports every failure as a typed error.  `Session` is the
//! boundary where the policy is applied: it writes the diagnostic line when
//! `verbose` is set, and either degrades the failure to a sentinel or
//! returns [`Halt`] so the binary's `main` can exit.  Usage errors pass
//! straight through to the caller whatever the policy says.
//!
//! ```rust
//! use rexxfn::{ErrorPolicy, OnEof, ReadResult, Session};
//!
//! let mut s = Session::with_sink(ErrorPolicy::permissive(), Vec::new());
//! let r = s.linein("/no/such/file", None, OnEof::Signal).unwrap();
//! assert_eq!(r, ReadResult::FileNotFound);
//! ```

use std::fmt::Display;
use std::io::{self, Write};
use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::cursor::{self, absolute, DeleteOutcome, LineCursor, ReadResult, FILE_NOT_FOUND};
use crate::error::RexxError;
use crate::policy::{ErrorPolicy, Halt, OnEof};
use crate::value::Value;

/// Why a session call did not produce a value.
#[derive(Debug, Error)]
pub enum Interrupt {
    /// The policy asks for the process to end.
    #[error("{0}")]
    Halt(Halt),
    /// The calling script passed a bad argument.
    #[error(transparent)]
    Usage(RexxError),
}

impl From<Halt> for Interrupt {
    fn from(h: Halt) -> Self {
        Interrupt::Halt(h)
    }
}

/// Outcome of `LINEOUT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    Written,
    Failed,
}

impl WriteStatus {
    /// REXX return code: 0 written, 1 failed.
    pub fn code(self) -> i64 {
        match self {
            WriteStatus::Written => 0,
            WriteStatus::Failed => 1,
        }
    }
}

/// Outcome of `RM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteStatus {
    Deleted,
    NotFound,
    Failed,
}

impl DeleteStatus {
    /// 0 deleted, the FILE_NOT_FOUND sentinel when absent, 1 on failure.
    pub fn into_value(self) -> Value {
        Value::Int(match self {
            DeleteStatus::Deleted => 0,
            DeleteStatus::NotFound => i64::from(FILE_NOT_FOUND),
            DeleteStatus::Failed => 1,
        })
    }
}

/// One logical run of a ported script.
pub struct Session<W: Write = io::Stderr> {
    cursor: LineCursor,
    policy: ErrorPolicy,
    diag: W,
}

impl Session<io::Stderr> {
    /// A session whose diagnostics go to stderr.
    pub fn new(policy: ErrorPolicy) -> Self {
        Self::with_sink(policy, io::stderr())
    }
}

impl Default for Session<io::Stderr> {
    fn default() -> Self {
        Self::new(ErrorPolicy::default())
    }
}

impl<W: Write> Session<W> {
    /// A session whose diagnostics go to `diag`.
    pub fn with_sink(policy: ErrorPolicy, diag: W) -> Self {
        Self { cursor: LineCursor::new(), policy, diag }
    }

    pub fn policy(&self) -> ErrorPolicy {
        self.policy
    }

    pub fn cursor(&self) -> &LineCursor {
        &self.cursor
    }

    pub fn cursor_mut(&mut self) -> &mut LineCursor {
        &mut self.cursor
    }

    pub fn sink(&self) -> &W {
        &self.diag
    }

    /// Line number of the last line read by any `linein`.
    pub fn last_record(&self) -> usize {
        self.cursor.last_record()
    }

    fn say(&mut self, msg: impl Display) {
        if self.policy.verbose {
            // Nowhere left to report a failing diagnostic stream.
            let _ = writeln!(self.diag, "{msg}");
        }
    }

    /// Report `e` and either halt or hand back `fallback`.
    fn fail<T>(&mut self, e: RexxError, fallback: T) -> Result<T, Interrupt> {
        if e.is_usage() {
            return Err(Interrupt::Usage(e));
        }
        self.say(&e);
        if self.policy.terminate_on_error {
            debug!(error = %e, "terminating on error");
            return Err(Halt::Failure.into());
        }
        Ok(fallback)
    }

    /// `LINEIN(path[, line])`.
    ///
    /// End of file returns [`ReadResult::EndOfFile`], or halts with
    /// [`Halt::Success`] when `on_eof` is `Terminate` and the policy
    /// terminates on error.  With a permissive policy a missing, unreadable
    /// or non-regular file yields [`ReadResult::FileNotFound`] and any other
    /// read failure yields [`ReadResult::EndOfFile`].
    pub fn linein(
        &mut self,
        path: impl AsRef<Path>,
        line: Option<i64>,
        on_eof: OnEof,
    ) -> Result<ReadResult, Interrupt> {
        match self.cursor.read_line(path, line) {
            Ok(ReadResult::EndOfFile)
                if on_eof == OnEof::Terminate && self.policy.terminate_on_error =>
            {
                Err(Halt::Success.into())
            }
            Ok(r) => Ok(r),
            Err(e) => {
                let fallback = if e.is_missing() { ReadResult::FileNotFound } else { ReadResult::EndOfFile };
                self.fail(e, fallback)
            }
        }
    }

    /// `LINEOUT(path, content)`, truncating unless `append`.
    pub fn lineout(
        &mut self,
        path: impl AsRef<Path>,
        content: &str,
        append: bool,
    ) -> Result<WriteStatus, Interrupt> {
        match self.cursor.write_line(path, content, append) {
            Ok(()) => Ok(WriteStatus::Written),
            Err(e) => self.fail(e, WriteStatus::Failed),
        }
    }

    /// Delete `path`.  A missing path is reported but never halts.
    pub fn rm(&mut self, path: impl AsRef<Path>) -> Result<DeleteStatus, Interrupt> {
        let abs = absolute(path.as_ref());
        match self.cursor.delete_file(path) {
            Ok(DeleteOutcome::Deleted) => {
                self.say(format_args!("File successfully deleted: {}", abs.display()));
                Ok(DeleteStatus::Deleted)
            }
            Ok(DeleteOutcome::NotFound) => {
                self.say(format_args!("File does not exist (not deleted): {}", abs.display()));
                Ok(DeleteStatus::NotFound)
            }
            Err(e) => self.fail(e, DeleteStatus::Failed),
        }
    }

    /// Every line of `path`, leaving the cursor table untouched.  With a
    /// permissive policy a failure yields whatever was read before it.
    pub fn records(&mut self, path: impl AsRef<Path>) -> Result<Vec<String>, Interrupt> {
        let iter = match cursor::records(path) {
            Ok(iter) => iter,
            Err(e) => return self.fail(e, Vec::new()),
        };
        let mut out = Vec::new();
        for rec in iter {
            match rec {
                Ok(line) => out.push(line),
                Err(e) => return self.fail(e, out),
            }
        }
        Ok(out)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
