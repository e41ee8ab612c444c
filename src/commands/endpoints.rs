//! `glean endpoints` command.

use std::path::Path;

use super::{read_source, report_failures};
use crate::config::GleanConfig;
use crate::context::ServiceContext;
use crate::error::GleanError;
use crate::extract::{DebugEntry, EndpointExtractor, EndpointMap};
use crate::render::render_endpoint_list;
use crate::scan::{prefer_subdir, Scanner};

/// Outcome of one `endpoints` run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointsSummary {
    /// Captured endpoints and their referencing files.
    pub endpoints: EndpointMap,
    /// Files that could not be read.
    pub failed: usize,
}

/// Execute the `endpoints` command.
///
/// Writes the endpoint list to `output` and, when `debug_output` is given,
/// every raw occurrence as NDJSON.
///
/// # Errors
///
/// Returns an error if `root` is not a directory, the prefix is empty, or
/// a report cannot be written.
pub fn run(
    ctx: &ServiceContext,
    config: &GleanConfig,
    root: &Path,
    output: &Path,
    debug_output: Option<&Path>,
) -> Result<EndpointsSummary, GleanError> {
    let fs = ctx.fs.as_ref();
    if !fs.is_dir(root) {
        return Err(GleanError::NotADirectory(root.to_path_buf()));
    }
    let settings = &config.endpoints;
    let extractor = EndpointExtractor::from_config(settings)?;
    let scan_root = prefer_subdir(fs, root, &settings.source_dir);
    let files = Scanner::new(&settings.extensions, &settings.skip_dirs).scan(fs, &scan_root)?;
    println!("Found {} TypeScript files to scan.", files.len());

    let mut map = EndpointMap::new();
    let mut debug_entries: Vec<DebugEntry> = Vec::new();
    let mut failed = 0;
    for file in &files {
        let Some(text) = read_source(fs, file, &mut failed) else {
            continue;
        };
        let entries = extractor.extract(&text, &file.relative_path);
        let added = extractor.record(&entries, file.file_name(), &mut map);
        tracing::debug!(path = %file.relative_path, occurrences = entries.len(), captured = added, "scanned");
        if debug_output.is_some() {
            debug_entries.extend(entries);
        }
    }

    if let Some(path) = debug_output {
        let mut log = String::new();
        for entry in &debug_entries {
            log.push_str(&serde_json::to_string(entry)?);
            log.push('\n');
        }
        fs.write(path, &log).map_err(|e| GleanError::write(path, e))?;
        println!("Debug log written: {} ({} entries)", path.display(), debug_entries.len());
    }

    fs.write(output, &render_endpoint_list(&map)).map_err(|e| GleanError::write(output, e))?;
    if map.is_empty() {
        println!("No endpoints starting with '{}' found.", extractor.prefix());
    } else {
        println!(
            "Found {} unique endpoints in {} files ({} total references).",
            map.len(),
            map.file_count(),
            map.reference_count()
        );
    }
    report_failures(failed);
    println!("Markdown file generated: {}", output.display());
    Ok(EndpointsSummary { endpoints: map, failed })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scans_src_and_writes_list_and_debug_log() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        std::fs::create_dir_all(src.join("node_modules/lib")).unwrap();
        std::fs::write(src.join("a.ts"), "fetch(\"/Api/users/123\");\n// \"/Api/old\"\n").unwrap();
        std::fs::write(src.join("b.ts"), "post('/Api/users/123/?x=1', body);\n").unwrap();
        std::fs::write(src.join("node_modules/lib/c.ts"), "get('/Api/hidden');\n").unwrap();
        std::fs::write(dir.path().join("outside.ts"), "get('/Api/outside');\n").unwrap();
        let output = dir.path().join("refs.md");
        let debug = dir.path().join("debug.log");

        let summary = run(&ServiceContext::live(), &GleanConfig::default(), dir.path(), &output, Some(&debug)).unwrap();

        assert_eq!(summary.endpoints.len(), 1);
        assert_eq!(summary.failed, 0);
        let report = std::fs::read_to_string(&output).unwrap();
        assert_eq!(report, "### /Api/users/123\n- `a.ts`\n- `b.ts`\n\n");
        let log = std::fs::read_to_string(&debug).unwrap();
        assert!(log.lines().all(|line| serde_json::from_str::<serde_json::Value>(line).is_ok()));
        assert!(log.contains("\"action\":\"ignored_comment\""));
    }

    #[test]
    fn zero_matches_still_writes_an_empty_report() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.ts"), "const x = 1;\n").unwrap();
        let output = dir.path().join("refs.md");
        let summary = run(&ServiceContext::live(), &GleanConfig::default(), dir.path(), &output, None).unwrap();
        assert!(summary.endpoints.is_empty());
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "");
    }

    #[test]
    fn undecodable_file_is_counted_and_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.ts"), "get('/Api/orders');\n").unwrap();
        std::fs::write(dir.path().join("b.ts"), b"\xff\xfe get('/Api/broken');").unwrap();
        std::fs::write(dir.path().join("c.ts"), "post('/Api/orders/new');\n").unwrap();
        let output = dir.path().join("refs.md");

        let summary = run(&ServiceContext::live(), &GleanConfig::default(), dir.path(), &output, None).unwrap();

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.endpoints.len(), 2);
        assert!(summary.endpoints.get("/Api/broken").is_none());
        let report = std::fs::read_to_string(&output).unwrap();
        assert!(report.contains("### /Api/orders\n- `a.ts`\n"));
        assert!(report.contains("### /Api/orders/new\n- `c.ts`\n"));
    }

    #[test]
    fn invalid_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result =
            run(&ServiceContext::live(), &GleanConfig::default(), &dir.path().join("nope"), &dir.path().join("o.md"), None);
        assert!(matches!(result, Err(GleanError::NotADirectory(_))));
    }
}
