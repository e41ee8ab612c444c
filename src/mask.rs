//! Literal and comment stripper.
//!
//! Pattern matching over raw source has to ignore text inside string
//! literals and comments. [`mask`] blanks every literal to spaces of the
//! same byte length (newlines kept) and records the comment spans, so byte
//! offsets and line numbers found on the masked text are valid against the
//! original.

use std::ops::Range;

/// Which quote characters open a string literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteStyle {
    /// `'` and `"`, plus C# verbatim `@"..."` strings.
    CFamily,
    /// `'`, `"`, and back-tick template strings (TypeScript / JavaScript).
    Script,
}

/// Source text with literals blanked out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskedText {
    /// Same byte length as the input; literal bytes other than `\n` are spaces.
    pub text: String,
    /// Literal spans, quotes included.
    pub literal_ranges: Vec<Range<usize>>,
    /// `//` and `/* */` spans found outside literals.
    pub comment_ranges: Vec<Range<usize>>,
}

impl MaskedText {
    /// Whether `pos` falls inside a comment.
    #[must_use]
    pub fn in_comment(&self, pos: usize) -> bool {
        is_pos_in_ranges(pos, &self.comment_ranges)
    }

    /// Whether `pos` falls inside a string literal.
    #[must_use]
    pub fn in_literal(&self, pos: usize) -> bool {
        is_pos_in_ranges(pos, &self.literal_ranges)
    }
}

/// Masks string literals in `text` and locates comments.
///
/// Unterminated `'`/`"` literals end at the end of their line; an
/// unterminated back-tick or verbatim literal ends at the end of its opening
/// line. An unterminated `/*` extends to end of file.
#[must_use]
pub fn mask(text: &str, style: QuoteStyle) -> MaskedText {
    let bytes = text.as_bytes();
    let len = bytes.len();
    let mut literal_ranges = Vec::new();
    let mut comment_ranges = Vec::new();

    let mut i = 0;
    while i < len {
        let next = bytes.get(i + 1).copied();
        let end = match (bytes[i], next) {
            (b'/', Some(b'/')) => {
                let end = line_end(bytes, i);
                comment_ranges.push(i..end);
                end
            }
            (b'/', Some(b'*')) => {
                let end = find(bytes, i + 2, b"*/").map_or(len, |p| p + 2);
                comment_ranges.push(i..end);
                end
            }
            (b'@', Some(b'"')) if style == QuoteStyle::CFamily => {
                let end = verbatim_end(bytes, i);
                literal_ranges.push(i..end);
                end
            }
            (q @ (b'"' | b'\''), _) => {
                let end = quoted_end(bytes, i, q, false);
                literal_ranges.push(i..end);
                end
            }
            (b'`', _) if style == QuoteStyle::Script => {
                let end = quoted_end(bytes, i, b'`', true);
                literal_ranges.push(i..end);
                end
            }
            _ => i + 1,
        };
        i = end.max(i + 1);
    }

    let mut masked = bytes.to_vec();
    for range in &literal_ranges {
        for b in &mut masked[range.clone()] {
            if *b != b'\n' {
                *b = b' ';
            }
        }
    }

    MaskedText {
        text: String::from_utf8_lossy(&masked).into_owned(),
        literal_ranges,
        comment_ranges,
    }
}

/// Every quoted run in `text`, including runs that sit inside comments.
///
/// [`mask`] only reports literals in code; reference scanners use this to see
/// commented-out literals as well and then test them against the comment
/// ranges.
#[must_use]
pub fn literal_spans(text: &str, style: QuoteStyle) -> Vec<Range<usize>> {
    let bytes = text.as_bytes();
    let mut spans = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let end = match bytes[i] {
            q @ (b'"' | b'\'') => quoted_end(bytes, i, q, false),
            b'`' if style == QuoteStyle::Script => quoted_end(bytes, i, b'`', true),
            _ => {
                i += 1;
                continue;
            }
        };
        spans.push(i..end);
        i = end.max(i + 1);
    }
    spans
}

/// Half-open range test: `start <= pos < end` for any range.
#[must_use]
pub fn is_pos_in_ranges(pos: usize, ranges: &[Range<usize>]) -> bool {
    ranges.iter().any(|r| r.contains(&pos))
}

/// 1-based line number of byte offset `pos`.
#[must_use]
pub fn line_of(text: &str, pos: usize) -> usize {
    let end = pos.min(text.len());
    text.as_bytes()[..end].iter().filter(|b| **b == b'\n').count() + 1
}

fn line_end(bytes: &[u8], from: usize) -> usize {
    bytes[from..].iter().position(|b| *b == b'\n').map_or(bytes.len(), |p| from + p)
}

fn find(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    if from >= bytes.len() {
        return None;
    }
    bytes[from..].windows(needle.len()).position(|w| w == needle).map(|p| from + p)
}

fn quoted_end(bytes: &[u8], start: usize, quote: u8, multiline: bool) -> usize {
    let mut j = start + 1;
    while j < bytes.len() {
        match bytes[j] {
            b'\\' => j += 2,
            b'\n' if !multiline => return j,
            b if b == quote => return j + 1,
            _ => j += 1,
        }
    }
    if multiline {
        line_end(bytes, start)
    } else {
        bytes.len()
    }
}

fn verbatim_end(bytes: &[u8], start: usize) -> usize {
    let mut j = start + 2;
    while j < bytes.len() {
        if bytes[j] == b'"' {
            if bytes.get(j + 1) == Some(&b'"') {
                j += 2;
                continue;
            }
            return j + 1;
        }
        j += 1;
    }
    line_end(bytes, start)
}
