//! REXX built-in string functions and line-oriented file I/O for scripts
//! ported off the mainframe.
//!
//! - String functions (`SUBSTR`, `WORD`, `TRANSLATE`, …) as typed functions
//!   in [`strops`] and by REXX name through [`call_builtin`]
//! - `LINEIN`/`LINEOUT` with a per-file read cursor, plus file deletion
//! - A [`Session`] applying one [`ErrorPolicy`] to every file failure
//! - A batch runner ([`script`]) executing one command per line
//!
//! # Quick start
//!
//! ```rust
//! use rexxfn::{call_builtin, ErrorPolicy, OnEof, ReadResult, Session, Value};
//!
//! let v = call_builtin("SUBSTR", &[Value::from("HELLO"), Value::Int(2), Value::Int(3)]);
//! assert_eq!(v.unwrap().unwrap(), Value::from("ELL"));
//!
//! let dir = std::env::temp_dir().join(format!("rexxfn-doc-{}", std::process::id()));
//! std::fs::create_dir_all(&dir).unwrap();
//! let file = dir.join("in.txt");
//! std::fs::write(&file, "first\nsecond\n").unwrap();
//!
//! let mut s = Session::new(ErrorPolicy::permissive());
//! assert_eq!(s.linein(&file, None, OnEof::Signal).unwrap(), ReadResult::Line("first".into()));
//! assert_eq!(s.linein(&file, None, OnEof::Signal).unwrap(), ReadResult::Line("second".into()));
//! assert_eq!(s.linein(&file, None, OnEof::Signal).unwrap(), ReadResult::EndOfFile);
//! std::fs::remove_dir_all(&dir).unwrap();
//! ```

pub mod builtins;
pub mod cli;
pub mod config;
pub mod cursor;
pub mod error;
pub mod logging;
pub mod policy;
pub mod script;
pub mod session;
pub mod strops;
pub mod value;

// Re-exports for convenience.
pub use builtins::call_builtin;
pub use cursor::{LineCursor, ReadResult, END_OF_FILE, FILE_NOT_FOUND};
pub use error::{Result, RexxError};
pub use policy::{ErrorPolicy, Halt, OnEof};
pub use script::RunSummary;
pub use session::{DeleteStatus, Interrupt, Session, WriteStatus};
pub use value::Value;
