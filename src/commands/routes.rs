//! `glean routes` command.

use std::path::Path;

use super::{read_source, report_failures};
use crate::config::GleanConfig;
use crate::context::ServiceContext;
use crate::error::GleanError;
use crate::extract::routes::collect;
use crate::extract::{EndpointMap, RouteExtractor};
use crate::render::{load_references, render_endpoint_list, RouteReport};
use crate::scan::Scanner;

/// Arguments of one `routes` run.
#[derive(Debug, Clone, Copy)]
pub struct RoutesOptions<'a> {
    /// Root searched for controllers.
    pub root: &'a Path,
    /// Report path.
    pub output: &'a Path,
    /// Endpoint list to cross-reference against.
    pub references: Option<&'a Path>,
    /// Combined report title; the configured title when absent.
    pub title: Option<&'a str>,
    /// Drop actions that require authentication.
    pub anonymous_only: bool,
}

/// Outcome of one `routes` run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutesSummary {
    /// Combined route to controller file names.
    pub routes: EndpointMap,
    /// Controllers that could not be read.
    pub failed: usize,
}

/// Execute the `routes` command.
///
/// # Errors
///
/// Returns an error if the root is not a directory, the references file
/// cannot be read, or the report cannot be written.
pub fn run(ctx: &ServiceContext, config: &GleanConfig, options: &RoutesOptions<'_>) -> Result<RoutesSummary, GleanError> {
    let fs = ctx.fs.as_ref();
    let settings = &config.routes;
    let files = Scanner::new(&["cs".to_string()], &settings.skip_dirs)
        .with_name_suffix(&settings.file_suffix)
        .scan(fs, options.root)?;
    println!("Found {} controller files to scan.", files.len());

    let extractor = RouteExtractor::new()?;
    let mut routes = EndpointMap::new();
    let mut failed = 0;
    for file in &files {
        let Some(text) = read_source(fs, file, &mut failed) else {
            continue;
        };
        let hits = extractor.extract(&text, &file.relative_path);
        let kept = collect(&hits, file.file_name(), options.anonymous_only, &mut routes);
        tracing::debug!(path = %file.relative_path, found = hits.len(), kept, "scanned controller");
    }

    let report = match options.references {
        Some(path) => {
            let markdown = fs.read_to_string(path).map_err(|e| GleanError::read(path, e))?;
            let references = load_references(&markdown);
            let title = options.title.unwrap_or(settings.title.as_str());
            RouteReport { title, prefix: &config.endpoints.prefix }.render(&routes, &references)
        }
        None => render_endpoint_list(&routes),
    };
    fs.write(options.output, &report).map_err(|e| GleanError::write(options.output, e))?;

    if routes.is_empty() {
        println!("No POST endpoints found.");
    }
    if options.references.is_some() {
        println!("Wrote combined report for {} POST endpoints to {}.", routes.len(), options.output.display());
    } else {
        println!("Wrote {} unique POST endpoints to {}.", routes.len(), options.output.display());
    }
    report_failures(failed);
    Ok(RoutesSummary { routes, failed })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTROLLER: &str = "[Route(\"api/[controller]\")]\npublic class UsersController : ControllerBase\n{\n    [HttpPost(\"create\")]\n    public IActionResult Create() { }\n}\n";

    fn options<'a>(root: &'a Path, output: &'a Path, references: Option<&'a Path>) -> RoutesOptions<'a> {
        RoutesOptions { root, output, references, title: Some("Usage"), anonymous_only: false }
    }

    #[test]
    fn lists_routes_from_controllers_only() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("Controllers")).unwrap();
        std::fs::create_dir_all(dir.path().join("bin")).unwrap();
        std::fs::write(dir.path().join("Controllers/UsersController.cs"), CONTROLLER).unwrap();
        std::fs::write(dir.path().join("bin/OldController.cs"), CONTROLLER.replace("Users", "Old")).unwrap();
        std::fs::write(dir.path().join("Service.cs"), CONTROLLER).unwrap();
        let output = dir.path().join("post.md");

        let summary = run(&ServiceContext::live(), &GleanConfig::default(), &options(dir.path(), &output, None)).unwrap();

        assert_eq!(summary.routes.len(), 1);
        assert_eq!(summary.failed, 0);
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "### api/Users/create\n- `UsersController.cs`\n\n");
    }

    #[test]
    fn references_switch_to_the_combined_report() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("UsersController.cs"), CONTROLLER).unwrap();
        let refs = dir.path().join("refs.md");
        std::fs::write(&refs, "### /Api/users/create\n- `signup.ts`\n\n").unwrap();
        let output = dir.path().join("report.md");

        run(&ServiceContext::live(), &GleanConfig::default(), &options(dir.path(), &output, Some(&refs))).unwrap();

        let report = std::fs::read_to_string(&output).unwrap();
        assert!(report.starts_with("# Usage\n\n## Referenced\n\n### api\n\n#### api/Users/create\n\nused in\n\n- `signup.ts`\n\n"));
        assert!(report.ends_with("## Unreferenced\n\n_No unreferenced POST endpoints found._\n\n"));
    }

    #[test]
    fn unreadable_controller_is_counted_and_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("UsersController.cs"), CONTROLLER).unwrap();
        std::fs::write(dir.path().join("BrokenController.cs"), b"\xff\xfe[HttpPost]").unwrap();
        let output = dir.path().join("post.md");

        let summary = run(&ServiceContext::live(), &GleanConfig::default(), &options(dir.path(), &output, None)).unwrap();

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.routes.len(), 1);
        assert!(summary.routes.get("api/Users/create").is_some());
    }

    #[test]
    fn missing_references_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.md");
        let output = dir.path().join("report.md");
        let result = run(&ServiceContext::live(), &GleanConfig::default(), &options(dir.path(), &output, Some(&missing)));
        assert!(matches!(result, Err(GleanError::Read { .. })));
    }
}
