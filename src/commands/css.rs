//! `glean css` command.

use std::path::Path;

use super::{read_source, report_failures};
use crate::config::GleanConfig;
use crate::context::ServiceContext;
use crate::css::report::{render_all, ReportHeader};
use crate::css::{PropertyClassifier, PropertyTally};
use crate::error::GleanError;
use crate::output::default_output_dir;
use crate::scan::Scanner;

/// Outcome of one `css` run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CssSummary {
    /// Counts over every readable stylesheet.
    pub tally: PropertyTally,
    /// Stylesheets that could not be read.
    pub failed: usize,
}

/// Execute the `css` command.
///
/// Reports go to `output`, or to `_outputs/lists/<MMDD>` under the project
/// root found from `cwd`.
///
/// # Errors
///
/// Returns an error if `path` is not a directory or a report cannot be written.
pub fn run(
    ctx: &ServiceContext,
    config: &GleanConfig,
    path: &Path,
    output: Option<&Path>,
    cwd: &Path,
) -> Result<CssSummary, GleanError> {
    let fs = ctx.fs.as_ref();
    let settings = &config.css;
    println!("Scanning: {}", path.display());
    let files = Scanner::new(&settings.extensions, &settings.skip_dirs).scan(fs, path)?;

    let classifier = PropertyClassifier::new(settings)?;
    let mut tally = PropertyTally::new();
    let mut failed = 0;
    for file in &files {
        if let Some(text) = read_source(fs, file, &mut failed) {
            tally.add_text(&text, &classifier);
        }
    }

    if tally.is_empty() {
        println!("No properties found in .scss/.css files.");
        report_failures(failed);
        return Ok(CssSummary { tally, failed });
    }

    let generated = ctx.clock.now();
    let out_dir = match output {
        Some(dir) => dir.to_path_buf(),
        None => default_output_dir(fs, cwd, "lists")?.join(generated.format("%m%d").to_string()),
    };
    fs.create_dir_all(&out_dir).map_err(|e| GleanError::write(&out_dir, e))?;

    let scanned = path.display().to_string();
    let header = ReportHeader { scanned: &scanned, generated };
    for (name, text) in render_all(&tally, header) {
        let target = out_dir.join(&name);
        fs.write(&target, &text).map_err(|e| GleanError::write(&target, e))?;
        println!("Written: {}", target.display());
    }

    println!("Total distinct properties: {}", tally.properties.len());
    println!("Total distinct colors: {}", tally.colors.len());
    report_failures(failed);
    Ok(CssSummary { tally, failed })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_summary_details_and_colors() {
        let dir = tempfile::tempdir().unwrap();
        let site = dir.path().join("site");
        std::fs::create_dir_all(site.join("node_modules/lib")).unwrap();
        std::fs::write(site.join("main.scss"), ".a {\n  color: red;\n  margin: 0;\n}\n").unwrap();
        std::fs::write(site.join("node_modules/lib/x.css"), "color: blue;\n").unwrap();
        let out = dir.path().join("reports");

        let summary = run(&ServiceContext::live(), &GleanConfig::default(), &site, Some(&out), dir.path()).unwrap();

        assert_eq!(summary.tally.colors.len(), 1);
        assert_eq!(summary.failed, 0);
        for name in ["summary.md", "color-details.md", "spacing-details.md", "used-colors.md"] {
            assert!(out.join(name).is_file(), "{name} missing");
        }
    }

    #[test]
    fn no_properties_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("empty.css"), "/* nothing */\n").unwrap();
        let out = dir.path().join("reports");
        let summary = run(&ServiceContext::live(), &GleanConfig::default(), dir.path(), Some(&out), dir.path()).unwrap();
        assert!(summary.tally.is_empty());
        assert!(!out.exists());
    }

    #[test]
    fn unreadable_stylesheet_is_counted_and_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.css"), "  color: red;\n").unwrap();
        std::fs::write(dir.path().join("b.css"), b"\xff\xfe  margin: 0;\n").unwrap();
        let out = dir.path().join("reports");

        let summary = run(&ServiceContext::live(), &GleanConfig::default(), dir.path(), Some(&out), dir.path()).unwrap();

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.tally.properties.get("color"), Some(&1));
        assert!(!summary.tally.properties.contains_key("margin"));
        assert!(out.join("summary.md").is_file());
    }
}
