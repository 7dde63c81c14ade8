//! Per-file read cursor with REXX `LINEIN` semantics, plus `LINEOUT` and
//! file removal.
//!
//! Each file, keyed by its canonical absolute path, has an implicit cursor:
//! the number of the last line handed out by a sequential read.  A
//! sequential read returns the line after the cursor and advances it by
//! one.  A positional read names its line explicitly and never reads or
//! writes the cursor.  A sequential read past the last line returns
//! [`ReadResult::EndOfFile`] and resets the cursor, so the following
//! sequential read starts again at line 1.
//!
//! No file handle survives between calls.  Every read opens the file and
//! scans from the top to the target line; the only state kept is the line
//! number.
//!
//! This layer reports failures as [`RexxError`]s.  Turning them into
//! sentinels, diagnostics or a process exit is [`crate::session`]'s job.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Lines, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::error::{invalid, Result, RexxError};
use crate::value::Value;

/// Returned in place of a line when the file cannot be read.
pub const FILE_NOT_FOUND: u32 = 0xEEEE_EEEE;
/// Returned in place of a line when the requested line is past the end.
pub const END_OF_FILE: u32 = 0xFFFF_FFFF;

// ── Public types ──────────────────────────────────────────────────────────────

/// Outcome of a `LINEIN`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadResult {
    /// Line content without its newline terminator.
    Line(String),
    EndOfFile,
    FileNotFound,
}

impl ReadResult {
    /// The numeric sentinel for the non-line outcomes.
    pub fn sentinel(&self) -> Option<u32> {
        match self {
            ReadResult::Line(_) => None,
            ReadResult::EndOfFile => Some(END_OF_FILE),
            ReadResult::FileNotFound => Some(FILE_NOT_FOUND),
        }
    }

    pub fn is_eof(&self) -> bool {
        matches!(self, ReadResult::EndOfFile)
    }

    /// The line as a string or the sentinel as an integer.
    pub fn into_value(self) -> Value {
        match self {
            ReadResult::Line(s) => Value::Str(s),
            other => Value::Int(other.sentinel().map_or(0, i64::from)),
        }
    }
}

/// Outcome of a successful `delete_file`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// Nothing to delete; no action was taken.
    NotFound,
}

/// Canonical file identity → last sequentially read line number.
///
/// A file has an entry only while it is mid-way through a sequential pass:
/// the entry appears on the first sequential read and disappears again on
/// the end-of-file reset or an explicit reset.  An absent entry reads as 0.
#[derive(Debug, Default)]
pub struct CursorTable {
    positions: HashMap<PathBuf, usize>,
}

impl CursorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current cursor for `key`, 0 if not yet read.
    pub fn get(&self, key: &Path) -> usize {
        self.positions.get(key).copied().unwrap_or(0)
    }

    fn advance(&mut self, key: PathBuf, line: usize) {
        self.positions.insert(key, line);
    }

    /// Forget the cursor for `key`.  Returns `true` if one existed.
    pub fn reset(&mut self, key: &Path) -> bool {
        self.positions.remove(key).is_some()
    }

    pub fn clear(&mut self) {
        self.positions.clear();
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Stateful line reader/writer for one logical session.
///
/// Methods take `&mut self` for anything that touches the cursor table, so
/// a cursor shared between threads needs an outer lock held across the
/// whole read; nothing here synchronises internally.
#[derive(Debug, Default)]
pub struct LineCursor {
    table: CursorTable,
    last_record: usize,
}

impl LineCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(&self) -> &CursorTable {
        &self.table
    }

    /// Line number of the most recent line handed out by any read, 0 if
    /// none yet.
    pub fn last_record(&self) -> usize {
        self.last_record
    }

    /// Resolve `path` to the key used in the cursor table.
    ///
    /// Fails with `FileNotFound`, `PermissionDenied` or `NotAFile` when the
    /// path is not an existing regular file.  Two spellings of the same file
    /// resolve to the same key.
    pub fn identity(path: &Path) -> Result<PathBuf> {
        let abs = absolute(path);
        let meta = fs::metadata(path).map_err(|e| RexxError::from_read(abs.clone(), e))?;
        if !meta.is_file() {
            return Err(RexxError::NotAFile(abs));
        }
        fs::canonicalize(path).map_err(|e| RexxError::from_read(abs, e))
    }

    /// `LINEIN`.
    ///
    /// With `line = None` this is a sequential read of the line after the
    /// file's cursor.  With `Some(n)` it reads line `n` (1-based) and leaves
    /// the cursor alone; `n < 1` is a usage error.
    pub fn read_line(&mut self, path: impl AsRef<Path>, line: Option<i64>) -> Result<ReadResult> {
        if let Some(n) = line {
            if n < 1 {
                return Err(invalid(format!("LINEIN: line number must be >= 1, got {n}")));
            }
        }
        let key = Self::identity(path.as_ref())?;

        let target = match line {
            Some(n) => n as usize,
            None => self.table.get(&key) + 1,
        };
        let sequential = line.is_none();
        trace!(file = %key.display(), line = target, sequential, "scanning");

        match scan_to(&key, target)? {
            Some(content) => {
                self.last_record = target;
                if sequential {
                    debug!(file = %key.display(), line = target, "cursor advanced");
                    self.table.advance(key, target);
                }
                Ok(ReadResult::Line(content))
            }
            None => {
                if sequential {
                    debug!(file = %key.display(), "end of file, cursor reset");
                    self.table.reset(&key);
                }
                Ok(ReadResult::EndOfFile)
            }
        }
    }

    /// Cursor for `path`, 0 if it has none or cannot be resolved.
    pub fn position(&self, path: impl AsRef<Path>) -> usize {
        Self::identity(path.as_ref())
            .map(|key| self.table.get(&key))
            .unwrap_or(0)
    }

    /// Drop the cursor for `path` so the next sequential read starts at
    /// line 1.  Returns `true` if a cursor was dropped.
    pub fn reset(&mut self, path: impl AsRef<Path>) -> bool {
        match Self::identity(path.as_ref()) {
            Ok(key) => self.table.reset(&key),
            Err(_) => false,
        }
    }

    pub fn reset_all(&mut self) {
        self.table.clear();
    }

    /// `LINEOUT`: write `content` plus a newline, truncating the file first
    /// unless `append` is set.  Creates the file if needed.
    pub fn write_line(&self, path: impl AsRef<Path>, content: &str, append: bool) -> Result<()> {
        let path = path.as_ref();
        let fail = |source| RexxError::WriteFailure { path: path.to_path_buf(), source };
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .append(append)
            .truncate(!append)
            .open(path)
            .map_err(fail)?;
        writeln!(file, "{content}").map_err(fail)?;
        debug!(file = %path.display(), append, "line written");
        Ok(())
    }

    /// Remove `path`.  A missing path is reported as
    /// [`DeleteOutcome::NotFound`], not an error; a failed removal is.
    pub fn delete_file(&self, path: impl AsRef<Path>) -> Result<DeleteOutcome> {
        let abs = absolute(path.as_ref());
        let fail = |source| RexxError::DeleteFailure { path: abs.clone(), source };
        if !abs.try_exists().map_err(fail)? {
            return Ok(DeleteOutcome::NotFound);
        }
        fs::remove_file(&abs).map_err(fail)?;
        debug!(file = %abs.display(), "file deleted");
        Ok(DeleteOutcome::Deleted)
    }
}

// ── Record iteration ──────────────────────────────────────────────────────────

/// Every line of a file in order, newline-stripped.
///
/// Records end at `\n` or `\r\n`; a lone `\r` stays part of the line.
pub struct Records {
    path: PathBuf,
    lines: Lines<BufReader<File>>,
}

impl Iterator for Records {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        let line = self.lines.next()?;
        Some(line.map_err(|source| RexxError::Io { path: self.path.clone(), source }))
    }
}

/// Open `path` for a full pass.  Independent of any cursor table.
pub fn records(path: impl AsRef<Path>) -> Result<Records> {
    let key = LineCursor::identity(path.as_ref())?;
    let file = File::open(&key).map_err(|e| RexxError::from_read(key.clone(), e))?;
    Ok(Records { path: key, lines: BufReader::new(file).lines() })
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Read from the top of `path` to line `target`.  `Ok(None)` means the file
/// has fewer lines.
fn scan_to(path: &Path, target: usize) -> Result<Option<String>> {
    let file = File::open(path).map_err(|e| RexxError::from_read(path.to_path_buf(), e))?;
    let io_err = |source: io::Error| RexxError::Io { path: path.to_path_buf(), source };
    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(io_err)?;
        if idx + 1 == target {
            return Ok(Some(line));
        }
    }
    Ok(None)
}

/// Absolute form of `path` for messages; falls back to the path as given.
pub(crate) fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
