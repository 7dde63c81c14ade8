//! REXX string built-ins as plain Rust functions.
//!
//! Every position and length counts characters (Unicode scalar values) and
//! is 1-based, the way REXX counts them.  Functions that take an explicit
//! start position reject positions below 1 with
//! [`RexxError::InvalidArgument`]; `insert` is the one exception and clamps.
//!
//! Mode letters (`STRIP`'s L/T/B, `DATATYPE`'s N/A/U/L/W, `VERIFY`'s N/M)
//! are parsed into enums up front so the functions themselves are total.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::OnceLock;

use aho_corasick::AhoCorasick;
use regex::Regex;

use crate::error::{invalid, Result, RexxError};

// ── Mode enums ────────────────────────────────────────────────────────────────

/// Which end(s) `strip` removes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StripMode {
    Leading,
    Trailing,
    #[default]
    Both,
}

impl FromStr for StripMode {
    type Err = RexxError;

    /// Accepts the option letter or the full REXX option word
    /// (`L`/`Leading`, `T`/`Trailing`, `B`/`Both`), any case.
    fn from_str(s: &str) -> Result<Self> {
        match option_letter(s) {
            Some('L') => Ok(StripMode::Leading),
            Some('T') => Ok(StripMode::Trailing),
            Some('B') => Ok(StripMode::Both),
            _ => Err(invalid(format!("STRIP: invalid mode {s:?}; use 'L', 'T' or 'B'"))),
        }
    }
}

/// Classification tested by `datatype`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DatatypeKind {
    #[default]
    Number,
    Alphanumeric,
    Upper,
    Lower,
    Whole,
}

impl FromStr for DatatypeKind {
    type Err = RexxError;

    fn from_str(s: &str) -> Result<Self> {
        match option_letter(s) {
            Some('N') => Ok(DatatypeKind::Number),
            Some('A') => Ok(DatatypeKind::Alphanumeric),
            Some('U') => Ok(DatatypeKind::Upper),
            Some('L') => Ok(DatatypeKind::Lower),
            Some('W') => Ok(DatatypeKind::Whole),
            _ => Err(invalid(format!("DATATYPE: invalid type {s:?}"))),
        }
    }
}

/// `verify` mode: report the first non-matching (N) or matching (M) char.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerifyMode {
    #[default]
    Nomatch,
    Match,
}

impl FromStr for VerifyMode {
    type Err = RexxError;

    fn from_str(s: &str) -> Result<Self> {
        match option_letter(s) {
            Some('N') => Ok(VerifyMode::Nomatch),
            Some('M') => Ok(VerifyMode::Match),
            _ => Err(invalid(format!("VERIFY: invalid mode {s:?}; use 'N' or 'M'"))),
        }
    }
}

/// First letter of an option word, uppercased.
fn option_letter(s: &str) -> Option<char> {
    s.trim().chars().next().map(|c| c.to_ascii_uppercase())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Longest result LEFT and RIGHT (in chars) or COPIES (in bytes) will build.
pub const MAX_RESULT_LEN: usize = 16 * 1024 * 1024;

/// `None` means the size computation itself overflowed.
fn check_result_len(name: &str, len: Option<usize>) -> Result<()> {
    match len {
        Some(n) if n <= MAX_RESULT_LEN => Ok(()),
        _ => Err(invalid(format!("{name}: result longer than {MAX_RESULT_LEN}"))),
    }
}

/// Convert a 1-based start position to a 0-based char offset.
fn start_offset(name: &str, start: i64) -> Result<usize> {
    if start < 1 {
        return Err(invalid(format!("{name}: start position must be >= 1, got {start}")));
    }
    Ok((start - 1) as usize)
}

fn require_delim(name: &str, delim: &str) -> Result<()> {
    if delim.is_empty() {
        return Err(invalid(format!("{name}: delimiter must not be empty")));
    }
    Ok(())
}

/// Byte index of the `n`th char of `s`, or `s.len()` when past the end.
fn byte_at(s: &str, n: usize) -> usize {
    s.char_indices().nth(n).map(|(b, _)| b).unwrap_or(s.len())
}

// ── String functions ──────────────────────────────────────────────────────────

/// TRANSLATE.
///
/// - no tables: uppercase `s`
/// - `map_to` only: delete every char of `map_to` from `s`
/// - both: replace each char found in `map_from` with the char at the same
///   position in `map_to`.  A `map_from` shorter than `map_to` is first
///   padded with `pad`; the tables must then be the same length.
///
/// When `map_from` repeats a char, the last position wins.
pub fn translate(
    s: &str,
    map_to: Option<&str>,
    map_from: Option<&str>,
    pad: Option<char>,
) -> Result<String> {
    let (to, from) = match (map_to, map_from) {
        (None, None) => return Ok(s.to_uppercase()),
        (Some(to), None) => return Ok(s.chars().filter(|c| !to.contains(*c)).collect()),
        (None, Some(_)) => return Err(invalid("TRANSLATE: input table given without output table")),
        (Some(to), Some(from)) => (to, from),
    };

    let to: Vec<char> = to.chars().collect();
    let mut from: Vec<char> = from.chars().collect();
    if let Some(p) = pad {
        if from.len() < to.len() {
            from.resize(to.len(), p);
        }
    }
    if from.len() != to.len() {
        return Err(invalid(format!(
            "TRANSLATE: tables differ in length ({} vs {})",
            to.len(),
            from.len()
        )));
    }

    let table: HashMap<char, char> = from.into_iter().zip(to).collect();
    Ok(s.chars().map(|c| table.get(&c).copied().unwrap_or(c)).collect())
}

/// SUBSTR: `length` chars from 1-based `start`, or the rest of `s`.
/// A start past the end yields an empty string.
pub fn substr(s: &str, start: i64, length: Option<usize>) -> Result<String> {
    let skip = start_offset("SUBSTR", start)?;
    let rest = s.chars().skip(skip);
    Ok(match length {
        Some(n) => rest.take(n).collect(),
        None => rest.collect(),
    })
}

/// WORD: the `n`th `delim`-separated token, or `""` when out of range.
pub fn word(s: &str, n: i64, delim: &str) -> Result<String> {
    require_delim("WORD", delim)?;
    if n < 1 {
        return Ok(String::new());
    }
    Ok(s.split(delim).nth((n - 1) as usize).unwrap_or("").to_owned())
}

/// WORDS: number of `delim`-separated tokens; 0 for blank input.
///
/// Consecutive delimiters produce empty tokens, which are counted.
pub fn words(s: &str, delim: &str) -> Result<usize> {
    if s.trim().is_empty() {
        return Ok(0);
    }
    require_delim("WORDS", delim)?;
    Ok(s.split(delim).count())
}

/// POS: 1-based index of the first `needle` at or after `start`, else 0.
pub fn pos(needle: &str, haystack: &str, start: i64) -> Result<usize> {
    let skip = start_offset("POS", start)?;
    if skip > haystack.chars().count() {
        return Ok(0);
    }
    let from = byte_at(haystack, skip);
    Ok(match haystack[from..].find(needle) {
        Some(rel) => haystack[..from + rel].chars().count() + 1,
        None => 0,
    })
}

/// CHANGESTR: replace every non-overlapping `old` in `s` with `new`,
/// scanning left to right.  An empty `old` leaves `s` unchanged.
pub fn changestr(old: &str, new: &str, s: &str) -> String {
    if old.is_empty() {
        return s.to_owned();
    }
    AhoCorasick::new([old]).replace_all(s, &[new])
}

/// STRIP: remove runs of `ch` from the chosen end(s).
pub fn strip(s: &str, mode: StripMode, ch: char) -> String {
    match mode {
        StripMode::Leading => s.trim_start_matches(ch),
        StripMode::Trailing => s.trim_end_matches(ch),
        StripMode::Both => s.trim_matches(ch),
    }
    .to_owned()
}

fn whole_number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[+-]?\d+$").expect("whole-number pattern is valid"))
}

/// DATATYPE.  The empty string is never of any type.
pub fn datatype(s: &str, kind: DatatypeKind) -> bool {
    if s.is_empty() {
        return false;
    }
    match kind {
        DatatypeKind::Number => s.trim().parse::<f64>().is_ok(),
        DatatypeKind::Alphanumeric => s.chars().all(char::is_alphanumeric),
        // At least one cased char, and no char of the opposite case.
        DatatypeKind::Upper => s.chars().any(char::is_uppercase) && !s.chars().any(char::is_lowercase),
        DatatypeKind::Lower => s.chars().any(char::is_lowercase) && !s.chars().any(char::is_uppercase),
        DatatypeKind::Whole => whole_number_re().is_match(s),
    }
}

/// VERIFY: 1-based index of the first char of `s` that is not in
/// `reference` (Nomatch) or is in it (Match); 0 if there is none.
pub fn verify(s: &str, reference: &str, mode: VerifyMode) -> usize {
    let want_member = mode == VerifyMode::Match;
    s.chars()
        .position(|c| reference.contains(c) == want_member)
        .map_or(0, |i| i + 1)
}

/// DELSTR: remove `length` chars from 1-based `start`, or everything from
/// `start` on.
pub fn delstr(s: &str, start: i64, length: Option<usize>) -> Result<String> {
    let skip = start_offset("DELSTR", start)?;
    let mut out: String = s.chars().take(skip).collect();
    if let Some(n) = length {
        out.extend(s.chars().skip(skip.saturating_add(n)));
    }
    Ok(out)
}

/// COMPARE: pad the shorter string with `pad`, then return the 1-based
/// index of the first differing char, or 0 if equal.
pub fn compare(a: &str, b: &str, pad: char) -> usize {
    let mut ai = a.chars();
    let mut bi = b.chars();
    let mut idx = 0;
    loop {
        idx += 1;
        match (ai.next(), bi.next()) {
            (None, None) => return 0,
            (x, y) => {
                if x.unwrap_or(pad) != y.unwrap_or(pad) {
                    return idx;
                }
            }
        }
    }
}

/// LEFT: first `length` chars, right-padded with `pad` when short.
pub fn left(s: &str, length: usize, pad: char) -> Result<String> {
    check_result_len("LEFT", Some(length))?;
    let mut out: String = s.chars().take(length).collect();
    let have = out.chars().count();
    out.extend(std::iter::repeat_n(pad, length - have));
    Ok(out)
}

/// RIGHT: last `length` chars, left-padded with `pad` when short.
pub fn right(s: &str, length: usize, pad: char) -> Result<String> {
    check_result_len("RIGHT", Some(length))?;
    let have = s.chars().count();
    if have >= length {
        return Ok(s.chars().skip(have - length).collect());
    }
    let mut out: String = std::iter::repeat_n(pad, length - have).collect();
    out.push_str(s);
    Ok(out)
}

pub fn copies(s: &str, n: usize) -> Result<String> {
    check_result_len("COPIES", s.len().checked_mul(n))?;
    Ok(s.repeat(n))
}

/// DELWORD: remove `count` tokens starting at token `word_num`.
/// An out-of-range `word_num` returns `s` unchanged.
pub fn delword(s: &str, word_num: i64, count: usize, delim: &str) -> Result<String> {
    require_delim("DELWORD", delim)?;
    let mut tokens: Vec<&str> = s.split(delim).collect();
    if word_num < 1 || word_num as usize > tokens.len() {
        return Ok(s.to_owned());
    }
    let first = (word_num - 1) as usize;
    let end = first.saturating_add(count).min(tokens.len());
    tokens.drain(first..end);
    Ok(tokens.join(delim))
}

/// INSERT: put `new` before 1-based `position` of `s`.
///
/// Unlike SUBSTR and DELSTR a position below 1 is clamped to 1 rather than
/// rejected; ported scripts rely on this.  A position past the end appends.
pub fn insert(new: &str, s: &str, position: i64) -> String {
    let at = byte_at(s, (position.max(1) - 1) as usize);
    let mut out = String::with_capacity(s.len() + new.len());
    out.push_str(&s[..at]);
    out.push_str(new);
    out.push_str(&s[at..]);
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────
