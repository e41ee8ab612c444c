//! `glean list` command.

use std::path::{Path, PathBuf};

use crate::config::GleanConfig;
use crate::context::ServiceContext;
use crate::error::GleanError;
use crate::output::default_output_dir;
use crate::render::{render_checklist, ROOT_HEADING};
use crate::scan::{Scanner, SourceFile};

/// Execute the `list` command.
///
/// `extensions` may carry a leading dot; when empty the configured set is
/// used. The checklist goes to `output`, or to `_outputs/lists/<file_name>`
/// under the project root found from `cwd`.
///
/// # Errors
///
/// Returns an error if `root` is not a directory or the report cannot be written.
pub fn run(
    ctx: &ServiceContext,
    config: &GleanConfig,
    root: &Path,
    extensions: &[String],
    output: Option<&Path>,
    cwd: &Path,
) -> Result<Vec<SourceFile>, GleanError> {
    let fs = ctx.fs.as_ref();
    let settings = &config.list;
    let extensions: Vec<String> = if extensions.is_empty() {
        settings.extensions.clone()
    } else {
        extensions.iter().map(|ext| ext.trim_start_matches('.').to_string()).collect()
    };
    let files = Scanner::new(&extensions, &settings.skip_dirs).scan(fs, root)?;

    let root_name = root
        .file_name()
        .map_or_else(|| ROOT_HEADING.to_string(), |name| name.to_string_lossy().into_owned());
    let target: PathBuf = match output {
        Some(path) => path.to_path_buf(),
        None => default_output_dir(fs, cwd, "lists")?.join(&settings.file_name),
    };
    fs.write(&target, &render_checklist(&root_name, &files)).map_err(|e| GleanError::write(&target, e))?;

    if files.is_empty() {
        println!("No .{} files found in '{}'.", extensions.join("/."), root.display());
    } else {
        println!("Listed {} files.", files.len());
    }
    println!("Markdown file generated: {}", target.display());
    Ok(files)
}
