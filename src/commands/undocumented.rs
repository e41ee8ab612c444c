//! `glean undocumented` command.

use std::path::Path;

use super::{read_source, report_failures};
use crate::config::GleanConfig;
use crate::context::ServiceContext;
use crate::error::GleanError;
use crate::extract::DocLanguage;
use crate::render::{is_substantial, render_undocumented};
use crate::scan::Scanner;

/// Per-run counts and the listed files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UndocumentedSummary {
    /// Relative paths of listed files, in scan order.
    pub listed: Vec<String>,
    /// Files skipped by an excluded name pattern.
    pub excluded: usize,
    /// Files that could not be read.
    pub failed: usize,
}

/// Execute the `undocumented` command.
///
/// Lists every `.ts` file under `folder` whose JSDoc would not earn it a
/// page from `docs ts`, skipping names that contain an excluded pattern
/// such as `.module.ts`.
///
/// # Errors
///
/// Returns an error if `folder` is not a directory, a built-in pattern
/// fails to compile, or the report cannot be written.
pub fn run(
    ctx: &ServiceContext,
    config: &GleanConfig,
    folder: &Path,
    output: &Path,
) -> Result<UndocumentedSummary, GleanError> {
    let fs = ctx.fs.as_ref();
    let settings = &config.undocumented;
    println!("Scanning {} ...", folder.display());
    let files = Scanner::new(&["ts".to_string()], &config.docs.typescript.skip_dirs).scan(fs, folder)?;
    let extractor = DocLanguage::TypeScript.extractor()?;

    let mut summary = UndocumentedSummary::default();
    let mut listed = Vec::new();
    for file in &files {
        let name = file.file_name();
        if settings.excluded_patterns.iter().any(|pattern| name.contains(pattern.as_str())) {
            tracing::debug!(path = %file.relative_path, "skipped: excluded pattern");
            summary.excluded += 1;
            continue;
        }
        let Some(text) = read_source(fs, file, &mut summary.failed) else {
            continue;
        };
        let records = extractor.extract(&text, &file.relative_path);
        if !is_substantial(&records, config.docs.min_lines) {
            tracing::debug!(path = %file.relative_path, records = records.len(), "added to list");
            listed.push(file);
        }
    }

    fs.write(output, &render_undocumented(&settings.title, &listed)).map_err(|e| GleanError::write(output, e))?;
    summary.listed = listed.iter().map(|file| file.relative_path.clone()).collect();

    println!("Listed {} undocumented files ({} excluded).", summary.listed.len(), summary.excluded);
    report_failures(summary.failed);
    println!("Markdown file generated: {}", output.display());
    Ok(summary)
}
