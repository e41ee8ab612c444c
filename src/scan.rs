//! Source scanner: walks a tree and selects candidate files.

use std::path::{Component, Path, PathBuf};

use crate::config::ScanTarget;
use crate::error::GleanError;
use crate::ports::FileSystem;

/// A file selected for extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path as returned by the walk (root joined with the relative part).
    pub absolute_path: PathBuf,
    /// Path relative to the scan root, with `/` separators.
    pub relative_path: String,
    /// Lower-cased extension without the dot.
    pub extension: String,
}

impl SourceFile {
    /// File name component (`a.ts` for `src/a.ts`).
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.relative_path.rsplit('/').next().unwrap_or(&self.relative_path)
    }

    /// File name without its extension.
    #[must_use]
    pub fn stem(&self) -> &str {
        let name = self.file_name();
        name.rsplit_once('.').map_or(name, |(stem, _)| stem)
    }

    /// Directory part of the relative path; empty for files at the root.
    #[must_use]
    pub fn relative_dir(&self) -> &str {
        self.relative_path.rsplit_once('/').map_or("", |(dir, _)| dir)
    }
}

/// Selects files by extension while pruning skipped directories.
#[derive(Debug, Clone)]
pub struct Scanner {
    extensions: Vec<String>,
    skip_dirs: Vec<String>,
    name_suffix: Option<String>,
}

impl Scanner {
    /// Creates a scanner accepting `extensions` (no leading dot) and skipping
    /// any path containing a component listed in `skip_dirs`.
    #[must_use]
    pub fn new(extensions: &[String], skip_dirs: &[String]) -> Self {
        Self {
            extensions: extensions.iter().map(|e| e.trim_start_matches('.').to_lowercase()).collect(),
            skip_dirs: skip_dirs.to_vec(),
            name_suffix: None,
        }
    }

    /// Creates a scanner from a configured [`ScanTarget`].
    #[must_use]
    pub fn for_target(target: &ScanTarget) -> Self {
        Self::new(&target.extensions, &target.skip_dirs)
    }

    /// Additionally require the file name to end with `suffix` (case-insensitive).
    #[must_use]
    pub fn with_name_suffix(mut self, suffix: &str) -> Self {
        self.name_suffix = Some(suffix.to_lowercase());
        self
    }

    /// Lists matching files under `root`, sorted by relative path.
    ///
    /// # Errors
    ///
    /// Returns [`GleanError::NotADirectory`] when `root` is missing or not a
    /// directory, and [`GleanError::Read`] when the walk itself fails.
    pub fn scan(&self, fs: &dyn FileSystem, root: &Path) -> Result<Vec<SourceFile>, GleanError> {
        if !fs.is_dir(root) {
            return Err(GleanError::NotADirectory(root.to_path_buf()));
        }
        let entries = fs.walk(root, &self.skip_dirs).map_err(|e| GleanError::read(root, e))?;

        let mut files: Vec<SourceFile> = entries
            .into_iter()
            .filter(|entry| !entry.is_dir)
            .filter_map(|entry| {
                let relative = relative_to(&entry.path, root)?;
                if self.is_skipped(&relative) {
                    return None;
                }
                let relative_path = to_slash(&relative);
                let extension = relative.extension()?.to_str()?.to_lowercase();
                if !self.extensions.contains(&extension) {
                    return None;
                }
                if let Some(suffix) = &self.name_suffix {
                    let name = relative.file_name()?.to_str()?.to_lowercase();
                    if !name.ends_with(suffix.as_str()) {
                        return None;
                    }
                }
                Some(SourceFile { absolute_path: entry.path, relative_path, extension })
            })
            .collect();

        files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        tracing::debug!(root = %root.display(), count = files.len(), "scan complete");
        Ok(files)
    }

    fn is_skipped(&self, relative: &Path) -> bool {
        relative.components().any(|c| match c {
            Component::Normal(part) => {
                part.to_str().is_some_and(|p| self.skip_dirs.iter().any(|s| s == p))
            }
            _ => false,
        })
    }
}

/// Returns `root/<subdir>` when it is a directory, else `root` itself.
///
/// Endpoint scans prefer the `src` tree so build output and tooling
/// scripts do not contribute references.
pub fn prefer_subdir(fs: &dyn FileSystem, root: &Path, subdir: &str) -> PathBuf {
    let candidate = root.join(subdir);
    if !subdir.is_empty() && fs.is_dir(&candidate) {
        tracing::info!(dir = %candidate.display(), "scanning only the source subdirectory");
        candidate
    } else {
        tracing::warn!(
            root = %root.display(),
            "no '{subdir}' folder found; falling back to the entire tree"
        );
        root.to_path_buf()
    }
}

fn relative_to(path: &Path, root: &Path) -> Option<PathBuf> {
    let relative = path.strip_prefix(root).ok()?;
    if relative.as_os_str().is_empty() {
        return None;
    }
    Some(relative.to_path_buf())
}

fn to_slash(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
