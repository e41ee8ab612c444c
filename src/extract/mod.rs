//! Tag extraction: doc comments, endpoint references, and controller routes.
//!
//! Every extractor is a best-effort textual scan over one file. Doc blocks
//! are attached to the nearest following declaration by trying an ordered
//! list of [`DeclarationPattern`]s over a fixed lookahead window; the first
//! pattern in list order that matches anywhere in the window wins.

pub mod csharp;
pub mod endpoints;
pub mod python;
pub mod routes;
pub mod typescript;

use regex::Regex;
use serde::Serialize;

use crate::error::GleanError;

pub use endpoints::{normalize_endpoint, DebugEntry, EndpointExtractor, EndpointMap};
pub use routes::{RouteExtractor, RouteHit};

/// Characters after a doc block searched for its declaration.
pub const LOOKAHEAD_WINDOW: usize = 1000;

/// A doc block starting within this many characters of the file start, with no
/// declaration, documents the file.
pub const MODULE_WINDOW: usize = 200;

/// What a tagged record documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum RecordKind {
    /// File-level documentation.
    Module,
    /// Class declaration.
    Class,
    /// Interface declaration.
    Interface,
    /// Enum declaration.
    Enum,
    /// Struct declaration.
    Struct,
    /// Free function.
    Function,
    /// Method on a type.
    Method,
    /// Property on a type.
    Property,
    /// `const`/`let`/`var` binding.
    Variable,
    /// UI component (declaration tagged `@component`).
    Component,
    /// Server route.
    Endpoint,
    /// Doc block with no recognizable declaration.
    Comment,
}

impl RecordKind {
    /// Upper-case tag, e.g. `FUNCTION`.
    #[must_use]
    pub const fn as_tag(self) -> &'static str {
        match self {
            Self::Module => "MODULE",
            Self::Class => "CLASS",
            Self::Interface => "INTERFACE",
            Self::Enum => "ENUM",
            Self::Struct => "STRUCT",
            Self::Function => "FUNCTION",
            Self::Method => "METHOD",
            Self::Property => "PROPERTY",
            Self::Variable => "VARIABLE",
            Self::Component => "COMPONENT",
            Self::Endpoint => "ENDPOINT",
            Self::Comment => "COMMENT",
        }
    }

    /// Singular heading label, e.g. `Function`.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Module => "Module",
            Self::Class => "Class",
            Self::Interface => "Interface",
            Self::Enum => "Enum",
            Self::Struct => "Struct",
            Self::Function => "Function",
            Self::Method => "Method",
            Self::Property => "Property",
            Self::Variable => "Variable",
            Self::Component => "Component",
            Self::Endpoint => "Endpoint",
            Self::Comment => "Comment",
        }
    }

    /// Plural heading label, e.g. `Classes`.
    #[must_use]
    pub const fn plural(self) -> &'static str {
        match self {
            Self::Module => "Modules",
            Self::Class => "Classes",
            Self::Interface => "Interfaces",
            Self::Enum => "Enums",
            Self::Struct => "Structs",
            Self::Function => "Functions",
            Self::Method => "Methods",
            Self::Property => "Properties",
            Self::Variable => "Variables",
            Self::Component => "Components",
            Self::Endpoint => "Endpoints",
            Self::Comment => "Comments",
        }
    }
}

/// One extracted finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaggedRecord {
    /// What the record documents.
    pub kind: RecordKind,
    /// Declared identifier, `module`, or a synthetic name for comments.
    pub name: Option<String>,
    /// Cleaned comment text (or route detail for endpoints).
    pub body: String,
    /// Source path relative to the scan root.
    pub source: String,
    /// 1-based line of the block start.
    pub line: usize,
}

impl TaggedRecord {
    /// Name for headings; empty when the record has none.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    /// Number of lines the body occupies.
    #[must_use]
    pub fn body_lines(&self) -> usize {
        self.body.lines().count().max(1)
    }
}

/// Regex for one declaration form and the kind it yields.
#[derive(Debug, Clone)]
pub struct DeclarationPattern {
    regex: Regex,
    kind: RecordKind,
}

impl DeclarationPattern {
    /// Compiles `pattern` anchored at a line start; group 1 must capture the name.
    ///
    /// # Errors
    ///
    /// Returns the regex compile error.
    pub fn new(pattern: &str, kind: RecordKind) -> Result<Self, regex::Error> {
        let regex = Regex::new(&format!(r"(?m)^\s*{pattern}"))?;
        Ok(Self { regex, kind })
    }

    /// Kind produced when this pattern wins.
    #[must_use]
    pub fn kind(&self) -> RecordKind {
        self.kind
    }
}

/// Compiles an ordered priority list.
///
/// # Errors
///
/// Returns [`GleanError::Pattern`] when any pattern fails to compile.
pub fn compile_patterns(specs: &[(&str, RecordKind)]) -> Result<Vec<DeclarationPattern>, GleanError> {
    specs
        .iter()
        .map(|(pattern, kind)| DeclarationPattern::new(pattern, *kind).map_err(GleanError::from))
        .collect()
}

/// Decides what the doc block at `block_start..block_end` documents.
///
/// Searches the [`LOOKAHEAD_WINDOW`] characters of `source` after the block. With
/// no declaration, blocks near the top of the file become [`RecordKind::Module`]
/// and everything else becomes [`RecordKind::Comment`] named after the first
/// three words of `body`.
#[must_use]
pub fn classify(
    source: &str,
    block_start: usize,
    block_end: usize,
    body: &str,
    patterns: &[DeclarationPattern],
) -> (RecordKind, String) {
    let start = floor_boundary(source, block_end);
    let window = &source[start..chars_after(source, start, LOOKAHEAD_WINDOW)];
    for pattern in patterns {
        if let Some(name) = pattern.regex.captures(window).and_then(|c| c.get(1)) {
            return (pattern.kind, name.as_str().to_string());
        }
    }
    if source[..floor_boundary(source, block_start)].chars().count() < MODULE_WINDOW {
        (RecordKind::Module, "module".to_string())
    } else {
        (RecordKind::Comment, first_words(body, 3))
    }
}

/// Byte offset `n` characters past `pos`, or the end of `text`.
///
/// `pos` must lie on a char boundary.
#[must_use]
pub fn chars_after(text: &str, pos: usize, n: usize) -> usize {
    text[pos..].char_indices().nth(n).map_or(text.len(), |(i, _)| pos + i)
}

/// Byte offset `n` characters before `pos`, or `0`.
///
/// `pos` must lie on a char boundary.
#[must_use]
pub fn chars_before(text: &str, pos: usize, n: usize) -> usize {
    if n == 0 {
        return pos;
    }
    text[..pos].char_indices().rev().nth(n - 1).map_or(0, |(i, _)| i)
}

fn floor_boundary(text: &str, pos: usize) -> usize {
    let mut pos = pos.min(text.len());
    while !text.is_char_boundary(pos) {
        pos -= 1;
    }
    pos
}

/// The first `n` whitespace-separated words joined by single spaces.
#[must_use]
pub fn first_words(text: &str, n: usize) -> String {
    text.split_whitespace().take(n).collect::<Vec<_>>().join(" ")
}

/// Source language of a doc extraction run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocLanguage {
    /// `/** */` JSDoc blocks in `.ts`/`.tsx`/`.js`/`.jsx`.
    TypeScript,
    /// `///` XML doc runs in `.cs`.
    CSharp,
    /// Docstrings in `.py`.
    Python,
}

impl DocLanguage {
    /// Builds the extractor for this language.
    ///
    /// # Errors
    ///
    /// Returns [`GleanError::Pattern`] if a built-in pattern fails to compile.
    pub fn extractor(self) -> Result<Box<dyn DocExtractor>, GleanError> {
        Ok(match self {
            Self::TypeScript => Box::new(typescript::TypeScriptExtractor::new()?),
            Self::CSharp => Box::new(csharp::CSharpExtractor::new()?),
            Self::Python => Box::new(python::PythonExtractor::new()?),
        })
    }

    /// Name shown in the page header for a file with `extension`.
    #[must_use]
    pub fn display_name(self, extension: &str) -> &'static str {
        match self {
            Self::TypeScript if matches!(extension, "js" | "jsx") => "JavaScript",
            Self::TypeScript => "TypeScript",
            Self::CSharp => "C#",
            Self::Python => "Python",
        }
    }

    /// Kinds rendered as sections, in page order. Comments always come last.
    #[must_use]
    pub fn section_order(self) -> &'static [RecordKind] {
        use RecordKind as K;
        match self {
            Self::TypeScript => &[K::Function, K::Class, K::Interface, K::Variable, K::Component],
            Self::CSharp => &[K::Class, K::Interface, K::Enum, K::Struct, K::Method, K::Property],
            Self::Python => &[K::Function, K::Class],
        }
    }

    /// Priority for the header's `File Type` line.
    #[must_use]
    pub fn file_type_priority(self) -> &'static [RecordKind] {
        use RecordKind as K;
        match self {
            Self::TypeScript => &[K::Component, K::Function, K::Class, K::Interface, K::Module],
            Self::CSharp => {
                &[K::Class, K::Interface, K::Enum, K::Struct, K::Method, K::Property, K::Module]
            }
            Self::Python => &[K::Class, K::Function, K::Module],
        }
    }

    /// What the "nothing found" placeholder calls a doc block.
    #[must_use]
    pub fn doc_noun(self) -> &'static str {
        match self {
            Self::TypeScript => "JSDoc comments",
            Self::CSharp => "XML doc comments",
            Self::Python => "docstrings",
        }
    }
}

/// Extracts tagged doc records from one file's text.
pub trait DocExtractor {
    /// Returns records in source order; `path` is stored as each record's source.
    fn extract(&self, source: &str, path: &str) -> Vec<TaggedRecord>;
}
