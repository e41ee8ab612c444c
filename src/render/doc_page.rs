//! One Markdown page per documented source file.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::docs::BodyFormatter;
use crate::extract::{DocLanguage, RecordKind, TaggedRecord};
use crate::scan::SourceFile;

/// Whether `records` serialize to more than `min_lines` lines.
///
/// Records are counted as if joined by blank lines, so each gap adds one.
#[must_use]
pub fn is_substantial(records: &[TaggedRecord], min_lines: usize) -> bool {
    if records.is_empty() {
        return false;
    }
    let lines: usize = records.iter().map(TaggedRecord::body_lines).sum::<usize>() + records.len() - 1;
    lines > min_lines
}

/// `<out>/<relative dir>/<stem>.md`.
#[must_use]
pub fn doc_page_path(out: &Path, file: &SourceFile) -> PathBuf {
    let mut path = out.to_path_buf();
    for part in file.relative_dir().split('/').filter(|p| !p.is_empty()) {
        path.push(part);
    }
    path.join(format!("{}.md", file.stem()))
}

/// Renders the doc page for one file.
pub struct DocPage<'a> {
    /// Project name shown in the front block.
    pub project: &'a str,
    /// Source language of the records.
    pub language: DocLanguage,
    /// Body formatter for that language.
    pub formatter: &'a dyn BodyFormatter,
}

impl DocPage<'_> {
    /// Renders `records` extracted from `file`.
    #[must_use]
    pub fn render(&self, file: &SourceFile, records: &[TaggedRecord]) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# {}\n", file.stem());
        out.push_str("---\n");
        let _ = writeln!(out, "Project: {}", self.project);
        let _ = writeln!(out, "Programming Language: {}", self.language.display_name(&file.extension));
        if let Some(kind) = self.file_type(records) {
            let _ = writeln!(out, "File Type: {}", kind.label());
        }
        out.push_str("---\n\n");

        out.push_str("## Info\n\n");
        if records.is_empty() {
            let _ = writeln!(out, "*No {} found*", self.language.doc_noun());
            return out;
        }

        for module in records.iter().filter(|r| r.kind == RecordKind::Module) {
            let info = self.formatter.module_info(module);
            if !info.is_empty() {
                let _ = write!(out, "{info}\n\n");
            }
        }

        for &kind in self.language.section_order() {
            let mut group: Vec<&TaggedRecord> = records.iter().filter(|r| r.kind == kind).collect();
            group.sort_by(|a, b| a.display_name().cmp(b.display_name()));
            self.render_section(&mut out, kind, &group);
        }

        let comments: Vec<&TaggedRecord> = records.iter().filter(|r| r.kind == RecordKind::Comment).collect();
        if !comments.is_empty() {
            out.push_str("**Documentation**:\n\n");
            for comment in comments {
                let _ = write!(out, "{}\n\n", self.formatter.format(comment));
            }
        }
        out
    }

    fn file_type(&self, records: &[TaggedRecord]) -> Option<RecordKind> {
        self.language.file_type_priority().iter().copied().find(|kind| records.iter().any(|r| r.kind == *kind))
    }

    fn render_section(&self, out: &mut String, kind: RecordKind, group: &[&TaggedRecord]) {
        match group {
            [] => {}
            [single] => {
                let _ = write!(out, "**{}**: `{}`\n\n", kind.label(), single.display_name());
                let _ = write!(out, "{}\n\n", self.formatter.format(single));
            }
            many => {
                let _ = writeln!(out, "**{}**:", kind.plural());
                for record in many {
                    let _ = writeln!(out, "- `{}`: {}", record.display_name(), self.formatter.summary(record));
                }
                out.push('\n');
                for record in many {
                    let _ = write!(out, "### `{}`\n\n", record.display_name());
                    let _ = write!(out, "{}\n\n", self.formatter.format(record));
                }
            }
        }
    }
}
