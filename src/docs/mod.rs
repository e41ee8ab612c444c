//! Doc-comment tag parsers and the per-language body formatters used by the
//! doc page renderer.

pub mod jsdoc;
pub mod xmldoc;

pub use jsdoc::JsDoc;
pub use xmldoc::{XmlDoc, XmlDocParser};

use crate::error::GleanError;
use crate::extract::{DocLanguage, RecordKind, TaggedRecord};

/// Turns record bodies into Markdown.
pub trait BodyFormatter {
    /// One-line summary for the index bullet of a multi-record section.
    fn summary(&self, record: &TaggedRecord) -> String;

    /// Full Markdown for a record.
    fn format(&self, record: &TaggedRecord) -> String;

    /// Description and metadata lines for a module-level record.
    fn module_info(&self, record: &TaggedRecord) -> String;
}

/// Builds the formatter for `language`.
///
/// # Errors
///
/// Returns [`GleanError::Pattern`] if a built-in pattern fails to compile.
pub fn formatter_for(language: DocLanguage) -> Result<Box<dyn BodyFormatter>, GleanError> {
    Ok(match language {
        DocLanguage::TypeScript => Box::new(JsDocFormatter),
        DocLanguage::CSharp => Box::new(XmlDocFormatter { parser: XmlDocParser::new()? }),
        DocLanguage::Python => Box::new(PlainFormatter),
    })
}

fn first_line(body: &str) -> String {
    body.lines().next().unwrap_or("").trim().to_string()
}

/// JSDoc: functions get the full tag rendering, other kinds keep their text.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsDocFormatter;

impl BodyFormatter for JsDocFormatter {
    fn summary(&self, record: &TaggedRecord) -> String {
        if record.kind == RecordKind::Function {
            JsDoc::parse(&record.body)
                .summary()
                .unwrap_or_else(|| format!("{} documentation", record.kind.label()))
        } else {
            first_line(&record.body)
        }
    }

    fn format(&self, record: &TaggedRecord) -> String {
        if record.kind == RecordKind::Function {
            JsDoc::parse(&record.body).to_markdown()
        } else {
            record.body.clone()
        }
    }

    fn module_info(&self, record: &TaggedRecord) -> String {
        let doc = JsDoc::parse(&record.body);
        let mut parts = Vec::new();
        if !doc.description.is_empty() {
            parts.push(doc.description.clone());
        }
        let meta: Vec<String> = doc
            .metadata
            .iter()
            .filter_map(|(key, value)| {
                let label = match key.as_str() {
                    "version" => "Version",
                    "author" => "Author",
                    "since" => "Since",
                    "file" => "File",
                    _ => return None,
                };
                Some(format!("**{label}**: {value}"))
            })
            .collect();
        if !meta.is_empty() {
            parts.push(meta.join("\n"));
        }
        parts.join("\n\n")
    }
}

/// C# XML docs: every kind is parsed and rendered by section.
#[derive(Debug, Clone)]
pub struct XmlDocFormatter {
    parser: XmlDocParser,
}

impl BodyFormatter for XmlDocFormatter {
    fn summary(&self, record: &TaggedRecord) -> String {
        first_line(&self.parser.parse(&record.body).summary)
    }

    fn format(&self, record: &TaggedRecord) -> String {
        self.parser.parse(&record.body).to_markdown()
    }

    fn module_info(&self, record: &TaggedRecord) -> String {
        self.parser.parse(&record.body).summary
    }
}

/// Python docstrings are already prose.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainFormatter;

impl BodyFormatter for PlainFormatter {
    fn summary(&self, record: &TaggedRecord) -> String {
        first_line(&record.body)
    }

    fn format(&self, record: &TaggedRecord) -> String {
        record.body.clone()
    }

    fn module_info(&self, record: &TaggedRecord) -> String {
        record.body.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(kind: RecordKind, body: &str) -> TaggedRecord {
        TaggedRecord { kind, name: Some("x".into()), body: body.into(), source: "a".into(), line: 1 }
    }

    #[test]
    fn jsdoc_functions_are_rendered_with_tags() {
        let f = formatter_for(DocLanguage::TypeScript).unwrap();
        let rec = record(RecordKind::Function, "Runs.\n@param {string} a");
        assert!(f.format(&rec).contains("## Parameters"));
        assert_eq!(f.summary(&rec), "Runs.");
        assert_eq!(f.summary(&record(RecordKind::Function, "@param a")), "Function documentation");
    }

    #[test]
    fn jsdoc_non_functions_keep_raw_text() {
        let f = formatter_for(DocLanguage::TypeScript).unwrap();
        let rec = record(RecordKind::Class, "A class.\n@param {string} a");
        assert_eq!(f.format(&rec), "A class.\n@param {string} a");
        assert_eq!(f.summary(&rec), "A class.");
    }

    #[test]
    fn module_info_lists_known_metadata() {
        let f = formatter_for(DocLanguage::TypeScript).unwrap();
        let rec = record(RecordKind::Module, "Helpers.\n@file util.ts\n@version 2\n@component Nope");
        assert_eq!(f.module_info(&rec), "Helpers.\n\n**File**: util.ts\n**Version**: 2");
    }

    #[test]
    fn xml_summary_is_first_line_of_summary() {
        let f = formatter_for(DocLanguage::CSharp).unwrap();
        let rec = record(RecordKind::Method, "<summary>Gets it.</summary>\n<returns>It.</returns>");
        assert_eq!(f.summary(&rec), "Gets it.");
        assert_eq!(f.format(&rec), "Gets it.\n\n## Returns\n\nIt.");
    }
}
