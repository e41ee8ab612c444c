//! Client-side endpoint references.
//!
//! Two passes run over each file. The string pass looks inside every quoted
//! literal for the configured prefix; the loose pass matches the prefix
//! anywhere in the raw text. Both record every occurrence as a
//! [`DebugEntry`], and only `captured` occurrences reach the
//! [`EndpointMap`]. The passes overlap on purpose; set union makes the
//! duplicates harmless.

use std::collections::{BTreeMap, BTreeSet};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::EndpointsConfig;
use crate::error::GleanError;
use crate::mask::{line_of, literal_spans, mask, QuoteStyle};

/// Strips a query string and then any trailing slashes.
#[must_use]
pub fn normalize_endpoint(endpoint: &str) -> String {
    let path = endpoint.split_once('?').map_or(endpoint, |(path, _)| path);
    path.trim_end_matches('/').to_string()
}

/// Endpoint path mapped to the names of the files that reference it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointMap(BTreeMap<String, BTreeSet<String>>);

impl EndpointMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `file` to the set for `endpoint`.
    pub fn insert(&mut self, endpoint: impl Into<String>, file: impl Into<String>) {
        self.0.entry(endpoint.into()).or_default().insert(file.into());
    }

    /// Registers `endpoint` with no files yet.
    pub fn touch(&mut self, endpoint: impl Into<String>) {
        self.0.entry(endpoint.into()).or_default();
    }

    /// Files referencing `endpoint`.
    #[must_use]
    pub fn get(&self, endpoint: &str) -> Option<&BTreeSet<String>> {
        self.0.get(endpoint)
    }

    /// Number of distinct endpoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no endpoint was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &BTreeSet<String>)> {
        self.0.iter()
    }

    /// Number of distinct referencing files.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.0.values().flatten().collect::<BTreeSet<_>>().len()
    }

    /// Sum of per-endpoint file counts.
    #[must_use]
    pub fn reference_count(&self) -> usize {
        self.0.values().map(BTreeSet::len).sum()
    }
}

/// Which pass produced an occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMethod {
    /// Found inside a quoted literal.
    String,
    /// Found by the loose raw-text regex.
    Regex,
}

/// What happened to an occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Added to the endpoint map.
    Captured,
    /// Inside a comment.
    IgnoredComment,
    /// Nothing left after trimming at the terminators.
    Trimmed,
}

/// One raw prefix occurrence, written as a line of NDJSON in debug mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DebugEntry {
    /// File as displayed to the user.
    pub file: String,
    /// 1-based line of the literal or match.
    pub line: usize,
    /// Pass that found it.
    pub method: MatchMethod,
    /// Whether it sits in a comment.
    pub in_comment: bool,
    /// Text following the prefix before trimming.
    pub raw: String,
    /// Text kept after trimming at the first terminator.
    pub captured: String,
    /// Disposition.
    pub action: Action,
}

/// Finds prefix occurrences in TypeScript sources.
#[derive(Debug, Clone)]
pub struct EndpointExtractor {
    prefix: String,
    terminators: Vec<char>,
    loose: Regex,
}

impl EndpointExtractor {
    /// Creates an extractor for `prefix`, cutting captures at any char of
    /// `terminators` or at whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`GleanError::Setting`] for an empty prefix.
    pub fn new(prefix: &str, terminators: &str) -> Result<Self, GleanError> {
        if prefix.is_empty() {
            return Err(GleanError::Setting {
                key: "endpoints.prefix".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        let loose = Regex::new(&format!(r#"{}([^"'`\s)\];,]*)"#, regex::escape(prefix)))?;
        Ok(Self { prefix: prefix.to_string(), terminators: terminators.chars().collect(), loose })
    }

    /// Creates an extractor from the `endpoints` configuration section.
    ///
    /// # Errors
    ///
    /// See [`EndpointExtractor::new`].
    pub fn from_config(config: &EndpointsConfig) -> Result<Self, GleanError> {
        Self::new(&config.prefix, &config.terminators)
    }

    /// The configured prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Every prefix occurrence in `source`, string pass first.
    #[must_use]
    pub fn extract(&self, source: &str, file: &str) -> Vec<DebugEntry> {
        let masked = mask(source, QuoteStyle::Script);
        let mut entries = Vec::new();

        for span in literal_spans(source, QuoteStyle::Script) {
            let literal = &source[span.clone()];
            if literal.len() < 3 {
                continue;
            }
            let quote = &literal[..1];
            let inner = &literal[1..];
            let inner = inner.strip_suffix(quote).unwrap_or(inner);
            let in_comment = masked.in_comment(span.start);
            let line = line_of(source, span.start);

            let mut from = 0;
            while let Some(found) = inner[from..].find(&self.prefix) {
                let after = from + found + self.prefix.len();
                entries.push(self.entry(file, line, MatchMethod::String, in_comment, &inner[after..]));
                from = after;
            }
        }

        for caps in self.loose.captures_iter(source) {
            let (Some(whole), Some(raw)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let in_comment = masked.in_comment(whole.start());
            let line = line_of(source, whole.start());
            entries.push(self.entry(file, line, MatchMethod::Regex, in_comment, raw.as_str()));
        }
        entries
    }

    /// Folds the captured entries into `map` under `file_name`; returns how many were added.
    pub fn record(&self, entries: &[DebugEntry], file_name: &str, map: &mut EndpointMap) -> usize {
        let mut added = 0;
        for entry in entries.iter().filter(|e| e.action == Action::Captured) {
            map.insert(self.key(&entry.captured), file_name);
            added += 1;
        }
        added
    }

    /// Map key for a capture: the prefix plus the capture, normalized.
    #[must_use]
    pub fn key(&self, captured: &str) -> String {
        normalize_endpoint(&format!("{}{captured}", self.prefix))
    }

    fn entry(&self, file: &str, line: usize, method: MatchMethod, in_comment: bool, raw: &str) -> DebugEntry {
        let captured = self.trim(raw);
        let action = if in_comment {
            Action::IgnoredComment
        } else if captured.is_empty() {
            Action::Trimmed
        } else {
            Action::Captured
        };
        DebugEntry { file: file.to_string(), line, method, in_comment, raw: raw.to_string(), captured, action }
    }

    fn trim(&self, raw: &str) -> String {
        raw.split(|c: char| c.is_whitespace() || self.terminators.contains(&c))
            .next()
            .unwrap_or("")
            .trim()
            .to_string()
    }
}
