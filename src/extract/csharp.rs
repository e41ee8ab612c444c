//! XML doc (`///`) extraction for C#.

use regex::Regex;

use super::{classify, compile_patterns, DeclarationPattern, DocExtractor, RecordKind, TaggedRecord};
use crate::error::GleanError;
use crate::mask::{line_of, mask, QuoteStyle};

const PATTERNS: &[(&str, RecordKind)] = &[
    (r"public\s+class\s+(\w+)", RecordKind::Class),
    (r"public\s+interface\s+(\w+)", RecordKind::Interface),
    (r"public\s+enum\s+(\w+)", RecordKind::Enum),
    (r"public\s+struct\s+(\w+)", RecordKind::Struct),
    (r"public\s+(?:[\w<>\[\]]+\s+)+(\w+)\s*\(", RecordKind::Method),
    (r"public\s+(?:[\w<>\[\]]+\s+)+(\w+)\s*\{", RecordKind::Property),
];

/// Groups consecutive `///` lines into blocks and classifies each one.
#[derive(Debug, Clone)]
pub struct CSharpExtractor {
    run: Regex,
    patterns: Vec<DeclarationPattern>,
}

impl CSharpExtractor {
    /// Compiles the block and declaration patterns.
    ///
    /// # Errors
    ///
    /// Returns [`GleanError::Pattern`] if a pattern fails to compile.
    pub fn new() -> Result<Self, GleanError> {
        Ok(Self { run: Regex::new(r"(?m)(?:^[ \t]*///.*\n)+")?, patterns: compile_patterns(PATTERNS)? })
    }
}

impl DocExtractor for CSharpExtractor {
    fn extract(&self, source: &str, path: &str) -> Vec<TaggedRecord> {
        let masked = mask(source, QuoteStyle::CFamily);
        self.run
            .find_iter(&masked.text)
            .filter_map(|m| {
                let body = clean_run(&source[m.range()]);
                if body.is_empty() {
                    return None;
                }
                let (kind, name) = classify(source, m.start(), m.end(), &body, &self.patterns);
                Some(TaggedRecord {
                    kind,
                    name: Some(name),
                    body,
                    source: path.to_string(),
                    line: line_of(source, m.start()),
                })
            })
            .collect()
    }
}

/// Drops blank lines and the `///` prefix from each line of a run.
fn clean_run(run: &str) -> String {
    run.lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| {
            let line = l.trim_start();
            let rest = line.strip_prefix("///").unwrap_or(line);
            rest.strip_prefix(char::is_whitespace).unwrap_or(rest)
        })
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
