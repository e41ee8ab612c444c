//! Docstring extraction for Python.
//!
//! Docstrings are the first statement of a module, `def`, `async def`, or
//! `class` body when that statement is a string literal. Decorators,
//! nesting, and methods need no special handling: every header in the file
//! is visited in source order.

use regex::Regex;

use super::{DocExtractor, RecordKind, TaggedRecord};
use crate::error::GleanError;
use crate::mask::line_of;

/// Finds module, function, and class docstrings.
#[derive(Debug, Clone)]
pub struct PythonExtractor {
    header: Regex,
}

impl PythonExtractor {
    /// Compiles the header pattern.
    ///
    /// # Errors
    ///
    /// Returns [`GleanError::Pattern`] if the pattern fails to compile.
    pub fn new() -> Result<Self, GleanError> {
        Ok(Self { header: Regex::new(r"(?m)^[ \t]*(async[ \t]+def|def|class)[ \t]+([A-Za-z_]\w*)")? })
    }
}

impl DocExtractor for PythonExtractor {
    fn extract(&self, source: &str, path: &str) -> Vec<TaggedRecord> {
        let mut records = Vec::new();
        let mut pos = 0;

        if let Some(lit) = literal_at(source, skip_trivia(source, 0)) {
            let body = dedent(lit.inner);
            if !body.is_empty() {
                records.push(record(RecordKind::Module, "module", body, path, line_of(source, lit.start)));
            }
            pos = lit.end;
        }

        while let Some(caps) = self.header.captures_at(source, pos) {
            let (Some(whole), Some(keyword), Some(name)) = (caps.get(0), caps.get(1), caps.get(2)) else {
                break;
            };
            pos = whole.end();
            let Some(colon) = header_end(source, name.end()) else {
                continue;
            };
            let Some(lit) = literal_at(source, skip_trivia(source, colon + 1)) else {
                continue;
            };
            pos = lit.end;
            let body = dedent(lit.inner);
            if body.is_empty() {
                continue;
            }
            let kind = if keyword.as_str() == "class" { RecordKind::Class } else { RecordKind::Function };
            let line = line_of(source, whole.start() + (whole.len() - whole.as_str().trim_start().len()));
            records.push(record(kind, name.as_str(), body, path, line));
        }
        records
    }
}

fn record(kind: RecordKind, name: &str, body: String, path: &str, line: usize) -> TaggedRecord {
    TaggedRecord { kind, name: Some(name.to_string()), body, source: path.to_string(), line }
}

struct Literal<'a> {
    start: usize,
    end: usize,
    inner: &'a str,
}

/// Skips whitespace and `#` comments; returns the next statement offset.
fn skip_trivia(source: &str, mut pos: usize) -> usize {
    let bytes = source.as_bytes();
    while pos < bytes.len() {
        match bytes[pos] {
            b' ' | b'\t' | b'\r' | b'\n' | b'\x0c' => pos += 1,
            b'#' => {
                pos = bytes[pos..].iter().position(|b| *b == b'\n').map_or(bytes.len(), |p| pos + p);
            }
            _ => break,
        }
    }
    pos
}

/// Parses a string literal (optional `r`/`u` prefix) starting at `pos`.
fn literal_at(source: &str, pos: usize) -> Option<Literal<'_>> {
    let bytes = source.as_bytes();
    let mut start_quote = pos;
    if matches!(bytes.get(pos), Some(b'r' | b'R' | b'u' | b'U')) {
        start_quote += 1;
    }
    let rest = source.get(start_quote..)?;

    for triple in ["\"\"\"", "'''"] {
        if rest.starts_with(triple) {
            let body_start = start_quote + 3;
            let close = find_close(bytes, body_start, triple.as_bytes(), true)?;
            return Some(Literal { start: pos, end: close + 3, inner: &source[body_start..close] });
        }
    }
    let quote = *bytes.get(start_quote)?;
    if quote == b'"' || quote == b'\'' {
        let body_start = start_quote + 1;
        let close = find_close(bytes, body_start, &[quote], false)?;
        return Some(Literal { start: pos, end: close + 1, inner: &source[body_start..close] });
    }
    None
}

fn find_close(bytes: &[u8], mut i: usize, quote: &[u8], multiline: bool) -> Option<usize> {
    while i < bytes.len() {
        if bytes[i] == b'\\' {
            i += 2;
            continue;
        }
        if bytes[i] == b'\n' && !multiline {
            return None;
        }
        if bytes[i..].starts_with(quote) {
            return Some(i);
        }
        i += 1;
    }
    None
}

/// Offset of the `:` closing a `def`/`class` header, skipping brackets and strings.
fn header_end(source: &str, from: usize) -> Option<usize> {
    let bytes = source.as_bytes();
    let mut depth = 0usize;
    let mut i = from;
    while i < bytes.len() {
        match bytes[i] {
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => depth = depth.saturating_sub(1),
            b':' if depth == 0 => return Some(i),
            b'\n' if depth == 0 => return None,
            b'#' => {
                i = bytes[i..].iter().position(|b| *b == b'\n').map_or(bytes.len(), |p| i + p);
                continue;
            }
            q @ (b'"' | b'\'') => {
                i = find_close(bytes, i + 1, &[q], false)? + 1;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Removes the common indentation of every line after the first, then trims.
fn dedent(text: &str) -> String {
    let mut lines = text.lines();
    let first = lines.next().unwrap_or("").trim();
    let rest: Vec<&str> = lines.collect();
    let indent = rest
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);

    let mut out = vec![first.to_string()];
    out.extend(rest.iter().map(|l| l.get(indent..).unwrap_or_else(|| l.trim_start()).trim_end().to_string()));
    out.join("\n").trim().to_string()
}
