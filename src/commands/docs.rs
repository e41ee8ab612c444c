//! `glean docs` command.

use std::path::Path;

use super::{read_source, report_failures};
use crate::config::GleanConfig;
use crate::context::ServiceContext;
use crate::docs::formatter_for;
use crate::error::GleanError;
use crate::extract::DocLanguage;
use crate::render::{doc_page_path, is_substantial, DocPage};
use crate::scan::Scanner;

/// One `docs` invocation.
#[derive(Debug, Clone, Copy)]
pub struct DocsJob<'a> {
    /// Language to extract.
    pub language: DocLanguage,
    /// Scan root.
    pub folder: &'a Path,
    /// Directory receiving the pages.
    pub output: &'a Path,
    /// Project name printed in every page header.
    pub project: &'a str,
}

/// Per-run counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocsSummary {
    /// Pages written.
    pub processed: usize,
    /// Files with no or too little documentation.
    pub skipped: usize,
    /// Files that could not be read.
    pub failed: usize,
}

/// Execute the `docs` command.
///
/// # Errors
///
/// Returns an error if the folder is not a directory, a built-in pattern
/// fails to compile, or a page cannot be written.
pub fn run(ctx: &ServiceContext, config: &GleanConfig, job: &DocsJob<'_>) -> Result<DocsSummary, GleanError> {
    let target = match job.language {
        DocLanguage::TypeScript => &config.docs.typescript,
        DocLanguage::CSharp => &config.docs.csharp,
        DocLanguage::Python => &config.docs.python,
    };
    let files = Scanner::for_target(target).scan(ctx.fs.as_ref(), job.folder)?;
    let mut summary = DocsSummary::default();
    if files.is_empty() {
        println!("No {} files found in '{}'", language_label(job.language), job.folder.display());
        return Ok(summary);
    }

    let extractor = job.language.extractor()?;
    let formatter = formatter_for(job.language)?;
    let page = DocPage { project: job.project, language: job.language, formatter: formatter.as_ref() };
    ctx.fs.create_dir_all(job.output).map_err(|e| GleanError::write(job.output, e))?;

    println!("Found {} {} files", files.len(), language_label(job.language));
    println!("Output directory: {}", job.output.display());
    println!("Project: {}", job.project);

    for file in &files {
        let Some(text) = read_source(ctx.fs.as_ref(), file, &mut summary.failed) else {
            continue;
        };
        let records = extractor.extract(&text, &file.relative_path);
        if !is_substantial(&records, config.docs.min_lines) {
            let reason = if records.is_empty() { "no doc comments" } else { "doc comments too short" };
            tracing::debug!(path = %file.relative_path, reason, "skipped");
            summary.skipped += 1;
            continue;
        }

        let path = doc_page_path(job.output, file);
        ctx.fs.write(&path, &page.render(file, &records)).map_err(|e| GleanError::write(&path, e))?;
        tracing::info!(path = %path.display(), records = records.len(), "created");
        summary.processed += 1;
    }

    println!("Processed {} files with substantial {}.", summary.processed, job.language.doc_noun());
    println!("Skipped {} files (none or too short).", summary.skipped);
    report_failures(summary.failed);
    Ok(summary)
}

fn language_label(language: DocLanguage) -> &'static str {
    match language {
        DocLanguage::TypeScript => "TypeScript/JavaScript",
        DocLanguage::CSharp => "C#",
        DocLanguage::Python => "Python",
    }
}
