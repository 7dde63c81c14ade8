//! `.rexxfnrc` configuration file parser.
//!
//! Sets the session's error policy before any script runs:
//!
//! | Directive | Action |
//! |-----------|--------|
//! | `/set terminate_on_error=<bool>` | end the process on file errors |
//! | `/set verbose=<bool>` | print a diagnostic for every failure |
//! | Lines starting with `;` | comment, ignored |
//! | Any other `/command` | silently skipped |
//!
//! `<bool>` is `1`/`0`, `on`/`off`, `true`/`false` or `yes`/`no`.  Both
//! `/set name=value` and `/set name value` are accepted.

use std::fs;
use std::io;
use std::path::Path;

use thiserror::Error;

use crate::policy::ErrorPolicy;

/// A bad line in a config file.  Loading carries on past it.
#[derive(Debug, Error)]
#[error("line {line}: {message}")]
pub struct ConfigError {
    pub line: usize,
    pub message: String,
}

/// Settings read from an rc file.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub policy: ErrorPolicy,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply every `/set` in `src` on top of the defaults.
    ///
    /// A rejected line leaves its setting untouched and is returned in the
    /// error list with its 1-based line number.
    pub fn load_str(src: &str) -> (Self, Vec<ConfigError>) {
        let mut config = Config::new();
        let errors = src
            .lines()
            .enumerate()
            .filter_map(|(idx, raw)| {
                let args = set_arguments(raw)?;
                config
                    .apply_set(&split_args(args))
                    .err()
                    .map(|message| ConfigError { line: idx + 1, message })
            })
            .collect();
        (config, errors)
    }

    /// [`Config::load_str`] on the contents of `path`.
    pub fn load_file(path: &Path) -> io::Result<(Self, Vec<ConfigError>)> {
        fs::read_to_string(path).map(|src| Self::load_str(&src))
    }

    fn apply_set(&mut self, tokens: &[String]) -> Result<(), String> {
        let (name, value) = match tokens {
            [] => return Err("/set: requires an argument".into()),
            [first, more @ ..] => match first.split_once('=') {
                Some((n, v)) => (n.to_owned(), v.to_owned()),
                None if !more.is_empty() => (first.clone(), more.join(" ")),
                None => return Err(format!("/set: missing value for '{first}'")),
            },
        };

        let slot = match name.as_str() {
            "terminate_on_error" => &mut self.policy.terminate_on_error,
            "verbose" => &mut self.policy.verbose,
            "" => return Err("/set: variable name cannot be empty".into()),
            other => return Err(format!("/set: unknown variable '{other}'")),
        };
        *slot = parse_switch(&value)
            .ok_or_else(|| format!("/set: '{value}' is not a boolean value for '{name}'"))?;
        Ok(())
    }
}

/// The argument text of a `/set` line; `None` for comments, blank lines,
/// plain text and every other `/command`.
fn set_arguments(raw: &str) -> Option<&str> {
    let body = raw.trim().strip_prefix("/set")?;
    match body.chars().next() {
        None => Some(""),
        Some(c) if c.is_whitespace() => Some(body.trim()),
        Some(_) => None,
    }
}

// ── Argument tokenizer ────────────────────────────────────────────────────────

/// Split `s` into whitespace-delimited tokens.  Double quotes group words
/// and may hold `\"` escapes; `""` yields an empty token.
pub fn split_args(s: &str) -> Vec<String> {
    let mut out = Vec::new();
    // `Some` while a token is being collected, even if still empty.
    let mut token: Option<String> = None;
    let mut quoted = false;
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        if quoted {
            match c {
                '"' => quoted = false,
                '\\' => token.get_or_insert_with(String::new).extend(chars.next()),
                _ => token.get_or_insert_with(String::new).push(c),
            }
        } else if c == '"' {
            quoted = true;
            token.get_or_insert_with(String::new);
        } else if c.is_whitespace() {
            out.extend(token.take());
        } else {
            token.get_or_insert_with(String::new).push(c);
        }
    }
    out.extend(token);
    out
}

fn parse_switch(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "on" | "true" | "yes" => Some(true),
        "0" | "off" | "false" | "no" => Some(false),
        _ => None,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
