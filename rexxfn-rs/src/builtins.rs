//! Built-in REXX string functions, called by name.
//!
//! Each function receives its already-evaluated arguments as [`Value`]s and
//! returns `Result<Value, RexxError>`.  Names are matched case-insensitively,
//! as REXX does.  Trailing optional arguments may simply be left off; an
//! empty string for a pad or strip character counts as omitted.

use std::str::FromStr;

use crate::error::{invalid, Result, RexxError};
use crate::strops::{self, DatatypeKind, StripMode, VerifyMode};
use crate::value::Value;

/// Names accepted by [`call_builtin`].
pub const BUILTINS: &[&str] = &[
    "CHANGESTR", "COMPARE", "COPIES", "DATATYPE", "DELSTR", "DELWORD", "INSERT", "LEFT", "POS",
    "RIGHT", "STRIP", "SUBSTR", "TRANSLATE", "VERIFY", "WORD", "WORDS",
];

pub fn is_builtin(name: &str) -> bool {
    BUILTINS.contains(&name.to_ascii_uppercase().as_str())
}

/// Dispatch a built-in function call.
///
/// Returns `None` if the function name is not a built-in (caller should
/// then try its own commands or report an unknown function).
pub fn call_builtin(name: &str, args: &[Value]) -> Option<Result<Value>> {
    // Inner function returns Result<Option<Value>>:
    //   Ok(None)    → not a builtin
    //   Ok(Some(v)) → success
    //   Err(e)      → builtin call failed
    fn inner(name: &str, args: &[Value]) -> Result<Option<Value>> {
        Ok(Some(match name {
            "TRANSLATE" => {
                let s = get_str(args, 0, name)?;
                let to = opt_str(args, 1);
                let from = opt_str(args, 2);
                let pad = opt_char(args, 3);
                Value::Str(strops::translate(&s, to.as_deref(), from.as_deref(), pad)?)
            }
            "SUBSTR" => {
                let s = get_str(args, 0, name)?;
                let start = get_int(args, 1, name)?;
                let len = opt_count(args, 2, name)?;
                Value::Str(strops::substr(&s, start, len)?)
            }
            "WORD" => {
                let s = get_str(args, 0, name)?;
                let n = get_int(args, 1, name)?;
                let delim = opt_str(args, 2).unwrap_or_else(|| " ".to_owned());
                Value::Str(strops::word(&s, n, &delim)?)
            }
            "WORDS" => {
                let s = get_str(args, 0, name)?;
                let delim = opt_str(args, 1).unwrap_or_else(|| " ".to_owned());
                Value::from(strops::words(&s, &delim)?)
            }
            "POS" => {
                let needle = get_str(args, 0, name)?;
                let haystack = get_str(args, 1, name)?;
                let start = opt_int(args, 2, name)?.unwrap_or(1);
                Value::from(strops::pos(&needle, &haystack, start)?)
            }
            "CHANGESTR" => {
                let old = get_str(args, 0, name)?;
                let new = get_str(args, 1, name)?;
                let s = get_str(args, 2, name)?;
                Value::Str(strops::changestr(&old, &new, &s))
            }
            "STRIP" => {
                let s = get_str(args, 0, name)?;
                let mode: StripMode = opt_mode(args, 1)?.unwrap_or_default();
                let ch = opt_char(args, 2).unwrap_or(' ');
                Value::Str(strops::strip(&s, mode, ch))
            }
            "DATATYPE" => {
                let s = get_str(args, 0, name)?;
                let kind: DatatypeKind = opt_mode(args, 1)?.unwrap_or_default();
                Value::from(strops::datatype(&s, kind))
            }
            "VERIFY" => {
                let s = get_str(args, 0, name)?;
                let reference = get_str(args, 1, name)?;
                let mode: VerifyMode = opt_mode(args, 2)?.unwrap_or_default();
                Value::from(strops::verify(&s, &reference, mode))
            }
            "DELSTR" => {
                let s = get_str(args, 0, name)?;
                let start = get_int(args, 1, name)?;
                let len = opt_count(args, 2, name)?;
                Value::Str(strops::delstr(&s, start, len)?)
            }
            "COMPARE" => {
                let a = get_str(args, 0, name)?;
                let b = get_str(args, 1, name)?;
                let pad = opt_char(args, 2).unwrap_or(' ');
                Value::from(strops::compare(&a, &b, pad))
            }
            "LEFT" | "RIGHT" => {
                let s = get_str(args, 0, name)?;
                let len = get_count(args, 1, name)?;
                let pad = opt_char(args, 2).unwrap_or(' ');
                Value::Str(if name == "LEFT" {
                    strops::left(&s, len, pad)?
                } else {
                    strops::right(&s, len, pad)?
                })
            }
            "COPIES" => {
                let s = get_str(args, 0, name)?;
                let n = get_count(args, 1, name)?;
                Value::Str(strops::copies(&s, n)?)
            }
            "DELWORD" => {
                let s = get_str(args, 0, name)?;
                let n = get_int(args, 1, name)?;
                let count = opt_count(args, 2, name)?.unwrap_or(1);
                let delim = opt_str(args, 3).unwrap_or_else(|| " ".to_owned());
                Value::Str(strops::delword(&s, n, count, &delim)?)
            }
            "INSERT" => {
                let new = get_str(args, 0, name)?;
                let s = get_str(args, 1, name)?;
                let position = get_int(args, 2, name)?;
                Value::Str(strops::insert(&new, &s, position))
            }
            _ => return Ok(None),
        }))
    }
    inner(&name.to_ascii_uppercase(), args).transpose()
}

// ── Argument accessors ────────────────────────────────────────────────────────

fn get_str(args: &[Value], idx: usize, name: &str) -> Result<String> {
    args.get(idx)
        .map(Value::as_str)
        .ok_or_else(|| invalid(format!("{name}: argument {} missing", idx + 1)))
}

fn opt_str(args: &[Value], idx: usize) -> Option<String> {
    args.get(idx).map(Value::as_str)
}

fn get_int(args: &[Value], idx: usize, name: &str) -> Result<i64> {
    opt_int(args, idx, name)?
        .ok_or_else(|| invalid(format!("{name}: argument {} missing", idx + 1)))
}

fn opt_int(args: &[Value], idx: usize, name: &str) -> Result<Option<i64>> {
    args.get(idx)
        .map(|v| {
            v.as_int().ok_or_else(|| {
                invalid(format!("{name}: argument {} must be a whole number, got {v:?}", idx + 1))
            })
        })
        .transpose()
}

/// A length or repeat count: a whole number that is not negative.
fn opt_count(args: &[Value], idx: usize, name: &str) -> Result<Option<usize>> {
    match opt_int(args, idx, name)? {
        Some(n) if n < 0 => Err(invalid(format!(
            "{name}: argument {} must not be negative, got {n}",
            idx + 1
        ))),
        other => Ok(other.map(|n| n as usize)),
    }
}

fn get_count(args: &[Value], idx: usize, name: &str) -> Result<usize> {
    opt_count(args, idx, name)?
        .ok_or_else(|| invalid(format!("{name}: argument {} missing", idx + 1)))
}

fn opt_char(args: &[Value], idx: usize) -> Option<char> {
    args.get(idx).and_then(Value::as_char)
}

fn opt_mode<T: FromStr<Err = RexxError>>(args: &[Value], idx: usize) -> Result<Option<T>> {
    match args.get(idx).map(Value::as_str) {
        Some(s) if !s.trim().is_empty() => s.parse().map(Some),
        _ => Ok(None),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
