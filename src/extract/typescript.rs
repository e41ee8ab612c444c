//! JSDoc (`/** */`) extraction for TypeScript and JavaScript.

use super::{classify, compile_patterns, DeclarationPattern, DocExtractor, RecordKind, TaggedRecord};
use crate::error::GleanError;
use crate::mask::{line_of, mask, QuoteStyle};

const PATTERNS: &[(&str, RecordKind)] = &[
    (r"export\s+(?:default\s+)?(?:async\s+)?function\s+(\w+)", RecordKind::Function),
    (r"(?:async\s+)?function\s+(\w+)", RecordKind::Function),
    (r"export\s+(?:default\s+)?class\s+(\w+)", RecordKind::Class),
    (r"class\s+(\w+)", RecordKind::Class),
    (r"export\s+(?:default\s+)?interface\s+(\w+)", RecordKind::Interface),
    (r"interface\s+(\w+)", RecordKind::Interface),
    (r"export\s+const\s+(\w+)\s*[:=]", RecordKind::Variable),
    (r"const\s+(\w+)\s*[:=]", RecordKind::Variable),
    (r"export\s+let\s+(\w+)\s*[:=]", RecordKind::Variable),
    (r"let\s+(\w+)\s*[:=]", RecordKind::Variable),
    (r"export\s+var\s+(\w+)\s*[:=]", RecordKind::Variable),
    (r"var\s+(\w+)\s*[:=]", RecordKind::Variable),
];

/// Extracts `/** */` blocks and attaches them to the following declaration.
#[derive(Debug, Clone)]
pub struct TypeScriptExtractor {
    patterns: Vec<DeclarationPattern>,
}

impl TypeScriptExtractor {
    /// Compiles the declaration priority list.
    ///
    /// # Errors
    ///
    /// Returns [`GleanError::Pattern`] if a pattern fails to compile.
    pub fn new() -> Result<Self, GleanError> {
        Ok(Self { patterns: compile_patterns(PATTERNS)? })
    }
}

impl DocExtractor for TypeScriptExtractor {
    fn extract(&self, source: &str, path: &str) -> Vec<TaggedRecord> {
        let masked = mask(source, QuoteStyle::Script);
        let mut records = Vec::new();

        for range in &masked.comment_ranges {
            let block = &source[range.clone()];
            if block.len() < 5 || !block.starts_with("/**") || !block.ends_with("*/") {
                continue;
            }
            let body = clean_block(&block[3..block.len() - 2]);
            if body.is_empty() {
                continue;
            }

            let (kind, name) = if body.contains("@file") {
                (RecordKind::Module, "module".to_string())
            } else {
                let (kind, name) = classify(source, range.start, range.end, &body, &self.patterns);
                (promote_component(kind, &body), name)
            };
            records.push(TaggedRecord {
                kind,
                name: Some(name),
                body,
                source: path.to_string(),
                line: line_of(source, range.start),
            });
        }
        records
    }
}

/// Strips the leading `*` gutter from each line of a block's inner text.
#[must_use]
pub fn clean_block(inner: &str) -> String {
    inner.trim().lines().map(strip_gutter).collect::<Vec<_>>().join("\n").trim().to_string()
}

fn strip_gutter(line: &str) -> &str {
    let trimmed = line.trim_start();
    match trimmed.strip_prefix('*') {
        Some(rest) => rest.strip_prefix(char::is_whitespace).unwrap_or(rest),
        None => line,
    }
}

fn promote_component(kind: RecordKind, body: &str) -> RecordKind {
    let declared = matches!(kind, RecordKind::Function | RecordKind::Class | RecordKind::Variable);
    let tagged = body.lines().any(|l| l.trim_start().starts_with("@component"));
    if declared && tagged {
        RecordKind::Component
    } else {
        kind
    }
}
