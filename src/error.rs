//! Error types shared across the scan, extract, and render stages.

use std::path::PathBuf;

/// Boxed error returned by port implementations.
pub type PortError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised while setting up or running a scan.
///
/// Per-file read failures are logged and skipped by the commands, so only
/// setup problems and output writes ever surface from a run.
#[derive(Debug, thiserror::Error)]
pub enum GleanError {
    /// The scan root does not exist or is not a directory.
    #[error("Invalid directory path: {}", .0.display())]
    NotADirectory(PathBuf),

    /// The configuration file could not be read or parsed.
    #[error("config error: {}: {reason}", path.display())]
    Config {
        /// Path of the configuration file.
        path: PathBuf,
        /// Why loading failed.
        reason: String,
    },

    /// A configuration value is unusable.
    #[error("invalid setting {key}: {reason}")]
    Setting {
        /// Dotted configuration key.
        key: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// A file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// Path that failed.
        path: PathBuf,
        /// Underlying port error.
        source: PortError,
    },

    /// A report or directory could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        /// Path that failed.
        path: PathBuf,
        /// Underlying port error.
        source: PortError,
    },

    /// A configured pattern failed to compile.
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// A debug record could not be serialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GleanError {
    /// Wraps a read failure for `path`.
    pub fn read(path: impl Into<PathBuf>, source: PortError) -> Self {
        Self::Read { path: path.into(), source }
    }

    /// Wraps a write failure for `path`.
    pub fn write(path: impl Into<PathBuf>, source: PortError) -> Self {
        Self::Write { path: path.into(), source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_a_directory_message_names_path() {
        let err = GleanError::NotADirectory(PathBuf::from("/nope"));
        assert_eq!(err.to_string(), "Invalid directory path: /nope");
    }

    #[test]
    fn read_error_includes_source_message() {
        let err = GleanError::read("/tmp/a.ts", "permission denied".into());
        let msg = err.to_string();
        assert!(msg.contains("/tmp/a.ts"));
        assert!(msg.contains("permission denied"));
    }
}
