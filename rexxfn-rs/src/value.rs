//! Argument and result values for REXX built-in calls.
//!
//! REXX is typeless; every value is a string at heart, but built-ins coerce
//! freely to whole numbers when an argument is a position, a length or a
//! count.  Sentinel results are carried as integers so a ported script can
//! compare them numerically.

use std::fmt;

/// A REXX argument or result value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Int(i64),
    Str(String),
}

impl Default for Value {
    fn default() -> Self {
        Value::Str(String::new())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Str(s) => write!(f, "{s}"),
        }
    }
}

impl Value {
    /// Coerce to boolean: `0`, `""`, `"0"` and the usual "off" words are falsy.
    pub fn as_bool(&self) -> bool {
        match self {
            Value::Int(n) => *n != 0,
            Value::Str(s) => {
                let s = s.trim();
                !(s.is_empty()
                    || s == "0"
                    || s.eq_ignore_ascii_case("off")
                    || s.eq_ignore_ascii_case("false")
                    || s.eq_ignore_ascii_case("no"))
            }
        }
    }

    /// Coerce to a whole number.  Returns `None` for a string that is not
    /// one, so callers can report a usage error instead of guessing.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::Str(s) => s.trim().parse().ok(),
        }
    }

    /// Coerce to a string (clones for Str, formats for Int).
    pub fn as_str(&self) -> String {
        self.to_string()
    }

    /// First character of the value, used for pad and strip characters.
    pub fn as_char(&self) -> Option<char> {
        match self {
            Value::Int(n) => n.to_string().chars().next(),
            Value::Str(s) => s.chars().next(),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Int(n as i64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Int(if b { 1 } else { 0 })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
