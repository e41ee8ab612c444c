//! Filesystem port for file I/O operations.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::PortError;

/// One entry produced by [`FileSystem::walk`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WalkEntry {
    /// Full path of the entry (root joined with the relative part).
    pub path: PathBuf,
    /// Whether the entry is a directory.
    pub is_dir: bool,
}

/// Provides filesystem access for reading, writing, and walking trees.
///
/// Abstracting the filesystem allows deterministic replay and testing
/// without touching the real disk.
pub trait FileSystem: Send + Sync {
    /// Reads the entire contents of a file as a UTF-8 string.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or is not valid UTF-8.
    fn read_to_string(&self, path: &Path) -> Result<String, PortError>;

    /// Writes the given contents to a file, creating parent directories and
    /// overwriting any existing file.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails (permissions, disk full, etc.).
    fn write(&self, path: &Path, contents: &str) -> Result<(), PortError>;

    /// Returns `true` if the path exists on the filesystem.
    fn exists(&self, path: &Path) -> bool;

    /// Returns `true` if the path exists and is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Creates a directory and all missing parents. Succeeds if it already exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    fn create_dir_all(&self, path: &Path) -> Result<(), PortError>;

    /// Recursively lists every entry below `root`, including `root` itself.
    ///
    /// Directories whose name appears in `skip_dirs` are not descended into
    /// and are omitted from the result. Entries are returned in a stable
    /// order (sorted by file name within each directory).
    ///
    /// # Errors
    ///
    /// Returns an error if `root` cannot be read.
    fn walk(&self, root: &Path, skip_dirs: &[String]) -> Result<Vec<WalkEntry>, PortError>;
}
