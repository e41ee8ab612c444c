//! Default output locations under a project's `_outputs` directory.

use std::path::{Path, PathBuf};

use crate::error::GleanError;
use crate::ports::FileSystem;

/// Marker directory identifying a project root.
pub const OUTPUTS_DIR: &str = "_outputs";

/// Returns the first ancestor of `start` (inclusive) containing `_outputs`.
pub fn find_root(fs: &dyn FileSystem, start: &Path) -> Option<PathBuf> {
    start.ancestors().find(|dir| fs.exists(&dir.join(OUTPUTS_DIR))).map(Path::to_path_buf)
}

/// Returns `<root>/_outputs/<tool>`, creating it if needed.
///
/// Falls back to `<start>/_outputs/<tool>` when no ancestor has an
/// `_outputs` directory.
///
/// # Errors
///
/// Returns [`GleanError::Write`] when the directory cannot be created.
pub fn default_output_dir(fs: &dyn FileSystem, start: &Path, tool: &str) -> Result<PathBuf, GleanError> {
    let root = find_root(fs, start).unwrap_or_else(|| {
        tracing::debug!(start = %start.display(), "no _outputs root found; using the start directory");
        start.to_path_buf()
    });
    let dir = root.join(OUTPUTS_DIR).join(tool);
    fs.create_dir_all(&dir).map_err(|e| GleanError::write(&dir, e))?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::live::filesystem::LiveFileSystem;

    #[test]
    fn finds_nearest_ancestor_with_outputs() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("_outputs")).unwrap();
        let nested = dir.path().join("a/b");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_root(&LiveFileSystem, &nested), Some(dir.path().to_path_buf()));
    }

    #[test]
    fn default_dir_is_created_under_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("_outputs")).unwrap();
        let nested = dir.path().join("pkg");
        std::fs::create_dir_all(&nested).unwrap();

        let out = default_output_dir(&LiveFileSystem, &nested, "docs").unwrap();
        assert_eq!(out, dir.path().join("_outputs/docs"));
        assert!(out.is_dir());
    }

    #[test]
    fn default_dir_falls_back_to_start() {
        let dir = tempfile::tempdir().unwrap();
        let start = dir.path().join("lonely");
        std::fs::create_dir_all(&start).unwrap();
        // The tempdir may itself sit under an `_outputs` ancestor on odd hosts;
        // only assert the fallback when none exists.
        if find_root(&LiveFileSystem, &start).is_none() {
            let out = default_output_dir(&LiveFileSystem, &start, "css").unwrap();
            assert_eq!(out, start.join("_outputs/css"));
        }
    }
}
