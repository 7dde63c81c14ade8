//! Batch command runner.
//!
//! Executes one command per line against a [`Session`], so a whole ported
//! script's worth of `LINEIN`s shares one cursor table.  Arguments are
//! whitespace-separated; use double quotes to keep blanks or pass an empty
//! string.  Blank lines and lines starting with `;` are skipped.
//!
//! | Command | Result |
//! |---------|--------|
//! | `LINEIN <file> [<line>\|*] [SIGNAL\|TERMINATE]` | the line, or a sentinel |
//! | `LINEOUT <file> <text> [<append>]` | `0` written, `1` failed |
//! | `RM <file>` | `0`, `1`, or the FILE_NOT_FOUND sentinel |
//! | `RECORDS <file>` | every line of the file |
//! | `RESET [<file>]` | nothing; forgets one or all cursors |
//! | any string built-in, e.g. `SUBSTR HELLO 2 3` | the function result |

use std::io::{self, BufRead, Write};

use tracing::trace;

use crate::builtins::{call_builtin, is_builtin};
use crate::config::split_args;
use crate::error::{invalid, RexxError};
use crate::policy::{Halt, OnEof};
use crate::session::{Interrupt, Session};
use crate::value::Value;

/// How a batch run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    /// Set when a command asked for the process to end.
    pub halt: Option<Halt>,
    /// Commands rejected as usage errors; the run continued past them.
    pub usage_errors: usize,
}

impl RunSummary {
    /// 0/1 from a halt; otherwise 2 if any command was rejected, else 0.
    pub fn exit_code(&self) -> i32 {
        match self.halt {
            Some(h) => h.exit_code(),
            None if self.usage_errors > 0 => 2,
            None => 0,
        }
    }
}

/// Execute one command line and return the values it produced.
pub fn exec_line<W: Write>(session: &mut Session<W>, line: &str) -> Result<Vec<Value>, Interrupt> {
    let line = line.trim();
    if line.is_empty() || line.starts_with(';') {
        return Ok(Vec::new());
    }
    let mut tokens = split_args(line);
    if tokens.is_empty() {
        return Ok(Vec::new());
    }
    let name = tokens.remove(0).to_ascii_uppercase();
    trace!(command = %name, args = tokens.len(), "exec");

    match name.as_str() {
        "LINEIN" => {
            let path = required(&tokens, 0, &name)?;
            let line_no = match tokens.get(1).map(String::as_str) {
                None | Some("*") | Some("") => None,
                Some(n) => Some(n.trim().parse::<i64>().map_err(|_| {
                    usage(invalid(format!("LINEIN: line number must be a whole number, got {n:?}")))
                })?),
            };
            let on_eof = match tokens.get(2) {
                Some(s) => s.parse::<OnEof>().map_err(usage)?,
                None => OnEof::default(),
            };
            Ok(vec![session.linein(path, line_no, on_eof)?.into_value()])
        }
        "LINEOUT" => {
            let path = required(&tokens, 0, &name)?;
            let text = required(&tokens, 1, &name)?;
            let append = tokens.get(2).is_some_and(|s| Value::from(s.as_str()).as_bool());
            Ok(vec![Value::Int(session.lineout(path, text, append)?.code())])
        }
        "RM" => {
            let path = required(&tokens, 0, &name)?;
            Ok(vec![session.rm(path)?.into_value()])
        }
        "RECORDS" => {
            let path = required(&tokens, 0, &name)?;
            Ok(session.records(path)?.into_iter().map(Value::Str).collect())
        }
        "RESET" => {
            match tokens.first() {
                Some(path) => {
                    session.cursor_mut().reset(path);
                }
                None => session.cursor_mut().reset_all(),
            }
            Ok(Vec::new())
        }
        _ if !is_builtin(&name) => Err(usage(RexxError::UnknownFunction(name))),
        _ => {
            let args: Vec<Value> = tokens.into_iter().map(Value::Str).collect();
            match call_builtin(&name, &args) {
                Some(Ok(v)) => Ok(vec![v]),
                Some(Err(e)) => Err(usage(e)),
                None => Err(usage(RexxError::UnknownFunction(name))),
            }
        }
    }
}

/// Run every line of `input`, printing results to `out` and rejected
/// commands to `err`.  Stops at the first halt.
///
/// When `prompt` is given it is written to `out` before each line is read.
pub fn run<W, R, O, E>(
    session: &mut Session<W>,
    mut input: R,
    out: &mut O,
    err: &mut E,
    prompt: Option<&str>,
) -> io::Result<RunSummary>
where
    W: Write,
    R: BufRead,
    O: Write,
    E: Write,
{
    let mut summary = RunSummary::default();
    let mut buf = String::new();
    let mut lineno = 0;

    loop {
        if let Some(p) = prompt {
            write!(out, "{p}")?;
            out.flush()?;
        }
        buf.clear();
        if input.read_line(&mut buf)? == 0 {
            break;
        }
        lineno += 1;

        match exec_line(session, &buf) {
            Ok(values) => {
                for v in values {
                    writeln!(out, "{v}")?;
                }
            }
            Err(Interrupt::Usage(e)) => {
                writeln!(err, "rexxfn: line {lineno}: {e}")?;
                summary.usage_errors += 1;
            }
            Err(Interrupt::Halt(h)) => {
                summary.halt = Some(h);
                break;
            }
        }
    }

    out.flush()?;
    Ok(summary)
}

fn required<'a>(tokens: &'a [String], idx: usize, name: &str) -> Result<&'a str, Interrupt> {
    tokens
        .get(idx)
        .map(String::as_str)
        .ok_or_else(|| usage(invalid(format!("{name}: argument {} missing", idx + 1))))
}

fn usage(e: RexxError) -> Interrupt {
    Interrupt::Usage(e)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::{END_OF_FILE, FILE_NOT_FOUND};
    use crate::policy::ErrorPolicy;
    use std::fs;

    fn quiet(terminate: bool) -> Session<Vec<u8>> {
        let policy = ErrorPolicy::default()
            .with_terminate_on_error(terminate)
            .with_verbose(false);
        Session::with_sink(policy, Vec::new())
    }

    fn run_str(session: &mut Session<Vec<u8>>, script: &str) -> (Vec<String>, String, RunSummary) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let summary = run(session, script.as_bytes(), &mut out, &mut err, None).unwrap();
        let out = String::from_utf8(out).unwrap().lines().map(str::to_owned).collect();
        (out, String::from_utf8(err).unwrap(), summary)
    }

    #[test]
    fn string_commands() {
        let mut s = quiet(true);
        let (out, err, summary) = run_str(
            &mut s,
            "SUBSTR HELLO 2 3\n; comment\n\nword \"one two three\" 2\nINSERT _0000 file.txt 5\n",
        );
        assert_eq!(out, ["ELL", "two", "file_0000.txt"]);
        assert_eq!(err, "");
        assert_eq!(summary, RunSummary::default());
    }

    #[test]
    fn empty_quoted_argument() {
        let mut s = quiet(true);
        let (out, _, _) = run_str(&mut s, "WORDS \"\"\nSTRIP \"  hi  \"\n");
        assert_eq!(out, ["0", "hi"]);
    }

    #[test]
    fn sequential_linein_then_eof_sentinel() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.txt");
        fs::write(&path, "a\nb\n").unwrap();
        let p = path.display();
        let mut s = quiet(true);
        let script = format!(
            "LINEIN {p} * SIGNAL\nLINEIN {p} 2\nLINEIN {p} * SIGNAL\nLINEIN {p} * SIGNAL\nLINEIN {p} * SIGNAL\n"
        );
        let (out, _, summary) = run_str(&mut s, &script);
        assert_eq!(out, ["a", "b", "b", END_OF_FILE.to_string().as_str(), "a"]);
        assert!(summary.halt.is_none());
    }

    #[test]
    fn eof_terminate_halts_successfully() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.txt");
        fs::write(&path, "only\n").unwrap();
        let p = path.display();
        let mut s = quiet(true);
        let (out, _, summary) = run_str(&mut s, &format!("LINEIN {p}\nLINEIN {p}\nSUBSTR never 1\n"));
        assert_eq!(out, ["only"]);
        assert_eq!(summary.halt, Some(Halt::Success));
        assert_eq!(summary.exit_code(), 0);
    }

    #[test]
    fn missing_file_halts_or_returns_sentinel() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("missing.txt");
        let script = format!("LINEIN {}\nCOPIES x 2\n", p.display());

        let mut s = quiet(true);
        let (out, _, summary) = run_str(&mut s, &script);
        assert!(out.is_empty());
        assert_eq!(summary.exit_code(), 1);

        let mut s = quiet(false);
        let (out, _, summary) = run_str(&mut s, &script);
        assert_eq!(out, [FILE_NOT_FOUND.to_string().as_str(), "xx"]);
        assert_eq!(summary.exit_code(), 0);
    }

    #[test]
    fn lineout_rm_records_reset() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("out.txt");
        let p = p.display();
        let mut s = quiet(true);
        let script = format!(
            "LINEOUT {p} first\nLINEOUT {p} \"second line\" 1\nRECORDS {p}\n\
             LINEIN {p}\nRESET {p}\nLINEIN {p}\nRESET\nRM {p}\nRM {p}\n"
        );
        let (out, _, summary) = run_str(&mut s, &script);
        assert_eq!(
            out,
            ["0", "0", "first", "second line", "first", "first", "0", FILE_NOT_FOUND.to_string().as_str()]
        );
        assert!(summary.halt.is_none());
    }

    #[test]
    fn usage_errors_are_reported_and_skipped() {
        let mut s = quiet(true);
        let (out, err, summary) = run_str(
            &mut s,
            "SUBSTR abc 0\nFROB x\nLINEIN\nCOPIES ab 9223372036854775807\nCOPIES ab 2\n",
        );
        assert_eq!(out, ["abab"]);
        assert!(err.contains("line 1: invalid argument"));
        assert!(err.contains("line 2: unknown function: FROB"));
        assert!(err.contains("line 3: invalid argument: LINEIN: argument 1 missing"));
        assert!(err.contains("line 4: invalid argument: COPIES"));
        assert_eq!(summary.usage_errors, 4);
        assert_eq!(summary.exit_code(), 2);
    }

    #[test]
    fn prompt_is_written_before_each_line() {
        let mut s = quiet(true);
        let mut out = Vec::new();
        let mut err = Vec::new();
        run(&mut s, "COPIES a 1\n".as_bytes(), &mut out, &mut err, Some("> ")).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "> a\n> ");
    }
}
