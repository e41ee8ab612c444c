//! Plain file listings: the per-directory checklist and the undocumented list.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::scan::SourceFile;

/// Heading used for the scan root when it has no name of its own (`.`).
pub const ROOT_HEADING: &str = "Root Directory";

/// Markdown checklist of `files` grouped under one heading per directory.
///
/// Directories appear depth-first in name order, each as a heading one
/// level deeper than its parent, and every ancestor of a directory holding
/// files gets a heading even when it holds none itself. The root heading is
/// `# <root_name>`. An empty `files` renders nothing.
#[must_use]
pub fn render_checklist(root_name: &str, files: &[SourceFile]) -> String {
    let mut dirs: BTreeMap<Vec<&str>, Vec<&str>> = BTreeMap::new();
    for file in files {
        let dir = file.relative_dir();
        let parts: Vec<&str> = if dir.is_empty() { Vec::new() } else { dir.split('/').collect() };
        for depth in 0..parts.len() {
            dirs.entry(parts[..depth].to_vec()).or_default();
        }
        dirs.entry(parts).or_default().push(file.file_name());
    }

    let mut out = String::new();
    for (parts, mut names) in dirs {
        match parts.last() {
            None => {
                let _ = writeln!(out, "# {root_name}\n");
            }
            Some(name) => {
                let _ = writeln!(out, "{} {name}\n", "#".repeat(parts.len() + 1));
            }
        }
        names.sort_unstable();
        for name in names {
            let _ = writeln!(out, "- [ ] {name}");
        }
        out.push('\n');
    }
    out
}

/// `# <title>` followed by one `- name: path` line per file.
#[must_use]
pub fn render_undocumented(title: &str, files: &[&SourceFile]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {title}\n");
    if files.is_empty() {
        out.push_str("*No undocumented files found*\n");
    }
    for file in files {
        let _ = writeln!(out, "- {}: {}", file.file_name(), file.relative_path);
    }
    out
}
