//! Placeholder renumbering and membership-list generation.
//!
//! Callers write fragments with the generic marker `?`. Before a fragment is
//! merged into a builder, each marker is rewritten to a positional reference
//! whose index continues from the values already bound (`$4`, `$5`, ...).

use crate::error::{ClauseError, ClauseResult};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// The unnumbered marker callers put in fragments.
pub const MARKER: &str = "?";

/// How positional references are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    /// `$1, $2, ...` (PostgreSQL)
    #[default]
    Dollar,
    /// `?, ?, ...` (MySQL, SQLite). Markers are left as they are.
    Question,
    /// `:1, :2, ...` (Oracle)
    Colon,
}

impl Dialect {
    /// Whether references carry an explicit index.
    pub fn is_numbered(self) -> bool {
        !matches!(self, Dialect::Question)
    }

    fn prefix(self) -> char {
        match self {
            Dialect::Dollar => '$',
            Dialect::Question => '?',
            Dialect::Colon => ':',
        }
    }

    /// Write the reference for 1-based `index` into `out`.
    pub fn write_placeholder(self, out: &mut String, index: usize) {
        out.push(self.prefix());
        if self.is_numbered() {
            push_usize(out, index);
        }
    }

    /// Render the reference for 1-based `index`.
    pub fn placeholder(self, index: usize) -> String {
        let mut s = String::with_capacity(4);
        self.write_placeholder(&mut s, index);
        s
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Dialect::Dollar => "dollar",
            Dialect::Question => "question",
            Dialect::Colon => "colon",
        })
    }
}

impl FromStr for Dialect {
    type Err = ClauseError;

    fn from_str(s: &str) -> ClauseResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dollar" | "postgres" | "postgresql" => Ok(Dialect::Dollar),
            "question" | "mysql" | "sqlite" => Ok(Dialect::Question),
            "colon" | "oracle" => Ok(Dialect::Colon),
            other => Err(ClauseError::config(format!(
                "unknown placeholder dialect: {other}"
            ))),
        }
    }
}

// Write a usize as decimal digits into `out` without going through fmt.
#[inline]
fn push_usize(out: &mut String, mut n: usize) {
    if n < 10 {
        out.push((b'0' + n as u8) as char);
        return;
    }
    let mut buf = [0u8; 20];
    let mut pos = buf.len();
    while n > 0 {
        pos -= 1;
        buf[pos] = b'0' + (n % 10) as u8;
        n /= 10;
    }
    for &b in &buf[pos..] {
        out.push(b as char);
    }
}

/// Replace the markers in `fragment`, in order, with references
/// `start, start + 1, ..., start + count - 1`.
///
/// Substitution is blind and sequential: the first marker gets `start`, the
/// second `start + 1`, regardless of what surrounds it. With `count == 0` the
/// fragment is returned untouched. Surplus markers stay verbatim; a mismatch
/// between markers and `count` is logged, not rejected.
pub fn renumber(fragment: &str, start: usize, count: usize, dialect: Dialect) -> String {
    if count == 0 {
        return fragment.to_string();
    }

    let mut out = String::with_capacity(fragment.len() + count * 3);
    let end = start + count;
    let mut next = start;
    let mut markers = 0usize;
    let mut rest = fragment;

    while let Some(pos) = rest.find(MARKER) {
        out.push_str(&rest[..pos]);
        markers += 1;
        if next < end {
            dialect.write_placeholder(&mut out, next);
            next += 1;
        } else {
            out.push_str(MARKER);
        }
        rest = &rest[pos + MARKER.len()..];
    }
    out.push_str(rest);

    if markers != count {
        crate::logging::placeholder_mismatch(fragment, markers, count);
    }
    out
}

/// Build `column IN (p1, ..., pn)` (or `NOT IN`) with `count` fresh
/// references starting at `start`. Returns an empty string when `count == 0`.
pub fn membership(
    column: &str,
    negated: bool,
    start: usize,
    count: usize,
    dialect: Dialect,
) -> String {
    if count == 0 {
        return String::new();
    }

    let mut out = String::with_capacity(column.len() + 10 + count * 4);
    out.push_str(column);
    out.push_str(if negated { " NOT IN (" } else { " IN (" });
    for i in 0..count {
        if i > 0 {
            out.push_str(", ");
        }
        dialect.write_placeholder(&mut out, start + i);
    }
    out.push(')');
    out
}

/// Indices referenced in `sql`, in textual order.
///
/// Returns `None` for [`Dialect::Question`], whose references carry no index.
/// Single-quoted literals (with `''` escapes), `--` line comments and
/// `/* */` block comments (nested, as PostgreSQL allows) are skipped.
/// Dollar-quoted bodies (`$$ ... $$`, `$tag$`) are not recognized as
/// placeholders because no digit follows the `$`.
pub fn placeholder_indices(sql: &str, dialect: Dialect) -> Option<Vec<usize>> {
    if !dialect.is_numbered() {
        return None;
    }

    let prefix = dialect.prefix() as u8;
    let bytes = sql.as_bytes();
    let mut indices = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\'' => {
                i = skip_quoted(bytes, i);
                continue;
            }
            b'-' if bytes.get(i + 1) == Some(&b'-') => {
                i = skip_line_comment(bytes, i);
                continue;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = skip_block_comment(bytes, i);
                continue;
            }
            b if b == prefix => {
                // `::type` casts and `$1` inside identifiers like `col$1` are skipped
                let preceded_by_word = i > 0
                    && (bytes[i - 1].is_ascii_alphanumeric()
                        || bytes[i - 1] == b'_'
                        || bytes[i - 1] == prefix);
                let mut j = i + 1;
                let mut n = 0usize;
                while j < bytes.len() && bytes[j].is_ascii_digit() {
                    n = n.saturating_mul(10).saturating_add((bytes[j] - b'0') as usize);
                    j += 1;
                }
                if j > i + 1 && !preceded_by_word {
                    indices.push(n);
                    i = j;
                    continue;
                }
            }
            _ => {}
        }
        i += 1;
    }
    Some(indices)
}

// Position just past the literal opening at `start`; `''` stays inside it.
fn skip_quoted(bytes: &[u8], start: usize) -> usize {
    let mut j = start + 1;
    while j < bytes.len() {
        if bytes[j] == b'\'' {
            if bytes.get(j + 1) == Some(&b'\'') {
                j += 2;
                continue;
            }
            return j + 1;
        }
        j += 1;
    }
    bytes.len()
}

fn skip_line_comment(bytes: &[u8], start: usize) -> usize {
    match bytes[start..].iter().position(|&b| b == b'\n') {
        Some(pos) => start + pos + 1,
        None => bytes.len(),
    }
}

fn skip_block_comment(bytes: &[u8], start: usize) -> usize {
    let mut depth = 1usize;
    let mut j = start + 2;
    while j < bytes.len() && depth > 0 {
        match (bytes[j], bytes.get(j + 1)) {
            (b'/', Some(&b'*')) => {
                depth += 1;
                j += 2;
            }
            (b'*', Some(&b'/')) => {
                depth -= 1;
                j += 2;
            }
            _ => j += 1,
        }
    }
    j.min(bytes.len())
}
