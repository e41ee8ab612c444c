//! Command dispatch and handlers.

pub mod barrel;
pub mod css;
pub mod docs;
pub mod endpoints;
pub mod list;
pub mod routes;
pub mod undocumented;

use std::env;
use std::path::{Component, Path, PathBuf};

use crate::cli::{Command, DocsCommand};
use crate::config::GleanConfig;
use crate::context::ServiceContext;
use crate::error::GleanError;
use crate::extract::DocLanguage;
use crate::output::default_output_dir;
use crate::ports::FileSystem;
use crate::scan::SourceFile;

/// Records every port interaction of the run into this cassette file when set.
pub const RECORD_ENV: &str = "GLEAN_RECORD";

/// Dispatch a parsed command to its handler.
///
/// When `GLEAN_RECORD` is set to a file path, the run's port interactions
/// are written there as a cassette once the command finishes.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails or the
/// cassette cannot be written.
pub fn dispatch(command: &Command, config: &GleanConfig) -> Result<(), String> {
    let mut ctx = match env::var(RECORD_ENV) {
        Ok(path) if !path.is_empty() => {
            ServiceContext::recording(Path::new(&path), &format!("glean {}", command.name()))
        }
        _ => ServiceContext::live(),
    };
    let cwd = env::current_dir().map_err(|e| format!("cannot resolve working directory: {e}"))?;
    let result = dispatch_with_context(command, config, &ctx, &cwd).map_err(|e| e.to_string());

    if let Some(path) = ctx.finish_recording()? {
        eprintln!("Recording saved to: {}", path.display());
    }
    result
}

/// Dispatch a command with the given service context.
///
/// `cwd` anchors default output locations.
///
/// # Errors
///
/// Returns the handler's error.
pub fn dispatch_with_context(
    command: &Command,
    config: &GleanConfig,
    ctx: &ServiceContext,
    cwd: &Path,
) -> Result<(), GleanError> {
    match command {
        Command::Docs { language } => {
            let (lang, args) = language.parts();
            let output = match &args.output {
                Some(output) => output.clone(),
                None => default_docs_output(ctx, language, cwd)?,
            };
            let project = project_name(&args.folder, cwd);
            let job = docs::DocsJob { language: lang, folder: &args.folder, output: &output, project: &project };
            docs::run(ctx, config, &job).map(|_| ())
        }
        Command::Endpoints { root, output, debug, debug_output } => {
            let debug_output = debug.then_some(debug_output.as_path());
            endpoints::run(ctx, config, root, output, debug_output).map(|_| ())
        }
        Command::Routes { root, output, references, title, anonymous_only } => {
            let options = routes::RoutesOptions {
                root,
                output,
                references: references.as_deref(),
                title: title.as_deref(),
                anonymous_only: *anonymous_only,
            };
            routes::run(ctx, config, &options).map(|_| ())
        }
        Command::Css { path, output } => css::run(ctx, config, path, output.as_deref(), cwd).map(|_| ()),
        Command::Barrel { folder } => barrel::run(ctx, config, folder).map(|_| ()),
        Command::List { root, extensions, output } => {
            list::run(ctx, config, root, extensions, output.as_deref(), cwd).map(|_| ())
        }
        Command::Undocumented { folder, output } => undocumented::run(ctx, config, folder, output).map(|_| ()),
    }
}

/// Reads a scanned file; a read or decode failure is logged, counted in
/// `failed`, and skipped.
pub(crate) fn read_source(fs: &dyn FileSystem, file: &SourceFile, failed: &mut usize) -> Option<String> {
    match fs.read_to_string(&file.absolute_path) {
        Ok(text) => Some(text),
        Err(e) => {
            tracing::warn!(path = %file.absolute_path.display(), error = %e, "failed to read source file");
            *failed += 1;
            None
        }
    }
}

/// Prints the unreadable-file count when there is one.
pub(crate) fn report_failures(failed: usize) {
    if failed > 0 {
        println!("Failed to read {failed} files.");
    }
}

fn default_docs_output(ctx: &ServiceContext, language: &DocsCommand, cwd: &Path) -> Result<PathBuf, GleanError> {
    match language.parts().0 {
        DocLanguage::TypeScript => default_output_dir(ctx.fs.as_ref(), cwd, "docs"),
        DocLanguage::CSharp | DocLanguage::Python => Ok(cwd.join("extracted")),
    }
}

/// Last normal component of `folder` resolved against `cwd`; `project` when there is none.
pub(crate) fn project_name(folder: &Path, cwd: &Path) -> String {
    let full = if folder.is_absolute() { folder.to_path_buf() } else { cwd.join(folder) };
    let mut parts: Vec<String> = Vec::new();
    for component in full.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::ParentDir => {
                parts.pop();
            }
            _ => {}
        }
    }
    parts.pop().unwrap_or_else(|| "project".to_string())
}
