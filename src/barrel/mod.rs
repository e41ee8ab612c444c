//! `index.ts` barrel files re-exporting every module in a directory.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::config::BarrelConfig;
use crate::error::GleanError;
use crate::ports::FileSystem;

/// Result for one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarrelOutcome {
    /// Barrel file path.
    pub path: PathBuf,
    /// `false` when the existing file already had the generated content.
    pub updated: bool,
}

#[derive(Debug, Default)]
struct DirListing {
    subdirs: BTreeSet<String>,
    modules: BTreeSet<String>,
}

/// Generates barrels below a root.
#[derive(Debug, Clone)]
pub struct BarrelGenerator {
    config: BarrelConfig,
}

impl BarrelGenerator {
    /// Creates a generator from the `barrel` configuration section.
    #[must_use]
    pub fn new(config: &BarrelConfig) -> Self {
        Self { config: config.clone() }
    }

    /// Barrel text for a directory's subdirectories and module stems.
    #[must_use]
    pub fn render(subdirs: &BTreeSet<String>, modules: &BTreeSet<String>) -> String {
        let mut lines: Vec<String> = subdirs.iter().map(|sub| format!("export * from \"./{sub}\";")).collect();
        lines.extend(modules.iter().map(|stem| format!("export * from \"./{stem}\";")));
        lines.join("\n") + "\n"
    }

    /// Writes a barrel into `root` and every non-hidden, non-skipped directory below it.
    ///
    /// # Errors
    ///
    /// Returns [`GleanError::NotADirectory`] for a bad root, [`GleanError::Read`]
    /// when the walk fails, and [`GleanError::Write`] when a barrel cannot be written.
    pub fn generate(&self, fs: &dyn FileSystem, root: &Path) -> Result<Vec<BarrelOutcome>, GleanError> {
        if !fs.is_dir(root) {
            return Err(GleanError::NotADirectory(root.to_path_buf()));
        }
        let entries = fs.walk(root, &self.config.skip_dirs).map_err(|e| GleanError::read(root, e))?;

        let mut dirs: BTreeMap<PathBuf, DirListing> = BTreeMap::new();
        dirs.insert(root.to_path_buf(), DirListing::default());
        for entry in &entries {
            let Ok(relative) = entry.path.strip_prefix(root) else {
                continue;
            };
            if relative.as_os_str().is_empty() || is_hidden(relative) {
                continue;
            }
            let (Some(parent), Some(name)) = (entry.path.parent(), entry.path.file_name()) else {
                continue;
            };
            let name = name.to_string_lossy().into_owned();
            if entry.is_dir {
                dirs.entry(entry.path.clone()).or_default();
                dirs.entry(parent.to_path_buf()).or_default().subdirs.insert(name);
            } else if let Some(stem) = self.module_stem(&name) {
                dirs.entry(parent.to_path_buf()).or_default().modules.insert(stem);
            }
        }

        let mut outcomes = Vec::with_capacity(dirs.len());
        for (dir, listing) in dirs {
            let path = dir.join(&self.config.index_file);
            let content = Self::render(&listing.subdirs, &listing.modules);
            let unchanged = fs.exists(&path) && fs.read_to_string(&path).is_ok_and(|old| old == content);
            if unchanged {
                tracing::debug!(path = %path.display(), "barrel unchanged");
            } else {
                fs.write(&path, &content).map_err(|e| GleanError::write(&path, e))?;
                tracing::debug!(path = %path.display(), "barrel written");
            }
            outcomes.push(BarrelOutcome { path, updated: !unchanged });
        }
        Ok(outcomes)
    }

    /// Stem of an exportable module file; `None` for barrels and other extensions.
    fn module_stem(&self, name: &str) -> Option<String> {
        let (stem, ext) = name.rsplit_once('.')?;
        if !self.config.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)) {
            return None;
        }
        let index_stem = self.config.index_file.rsplit_once('.').map_or(self.config.index_file.as_str(), |(s, _)| s);
        (stem != index_stem).then(|| stem.to_string())
    }
}

fn is_hidden(relative: &Path) -> bool {
    relative.components().any(|c| c.as_os_str().to_string_lossy().starts_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::live::filesystem::LiveFileSystem;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "export {};\n").unwrap();
    }

    #[test]
    fn render_lists_subdirectories_before_modules() {
        let subdirs: BTreeSet<String> = ["ui".to_string()].into_iter().collect();
        let modules: BTreeSet<String> = ["b".to_string(), "a".to_string()].into_iter().collect();
        assert_eq!(
            BarrelGenerator::render(&subdirs, &modules),
            "export * from \"./ui\";\nexport * from \"./a\";\nexport * from \"./b\";\n"
        );
    }

    #[test]
    fn writes_one_barrel_per_directory() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "util.ts");
        touch(dir.path(), "Button.tsx");
        touch(dir.path(), "index.tsx");
        touch(dir.path(), "readme.md");
        touch(dir.path(), "forms/Input.tsx");
        touch(dir.path(), ".hidden/secret.ts");
        touch(dir.path(), "node_modules/pkg/index.ts");

        let generator = BarrelGenerator::new(&BarrelConfig::default());
        let outcomes = generator.generate(&LiveFileSystem, dir.path()).unwrap();

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(|o| o.updated));
        let root_barrel = std::fs::read_to_string(dir.path().join("index.ts")).unwrap();
        assert_eq!(
            root_barrel,
            "export * from \"./forms\";\nexport * from \"./Button\";\nexport * from \"./util\";\n"
        );
        let forms_barrel = std::fs::read_to_string(dir.path().join("forms/index.ts")).unwrap();
        assert_eq!(forms_barrel, "export * from \"./Input\";\n");
        assert!(!dir.path().join(".hidden/index.ts").exists());
    }

    #[test]
    fn second_run_skips_unchanged_barrels() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a.ts");
        let generator = BarrelGenerator::new(&BarrelConfig::default());
        generator.generate(&LiveFileSystem, dir.path()).unwrap();
        let again = generator.generate(&LiveFileSystem, dir.path()).unwrap();
        assert_eq!(again.len(), 1);
        assert!(!again[0].updated);
    }

    #[test]
    fn missing_root_is_rejected() {
        let generator = BarrelGenerator::new(&BarrelConfig::default());
        let result = generator.generate(&LiveFileSystem, Path::new("/no/such/dir/for/glean"));
        assert!(matches!(result, Err(GleanError::NotADirectory(_))));
    }
}
