//! Service context bundling all port trait objects.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::adapters::live::clock::LiveClock;
use crate::adapters::live::filesystem::LiveFileSystem;
use crate::adapters::recording::{RecordingClock, RecordingFileSystem};
use crate::adapters::replaying::{ReplayingClock, ReplayingFileSystem};
use crate::cassette::format::Cassette;
use crate::cassette::recorder::CassetteRecorder;
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::clock::Clock;
use crate::ports::filesystem::FileSystem;

/// Bundles all port trait objects into a single context.
///
/// Each field provides access to one external boundary. Constructors
/// wire up different adapter implementations (live, replaying, recording).
pub struct ServiceContext {
    /// Clock for report timestamps.
    pub clock: Box<dyn Clock>,
    /// Filesystem for walking, reading, and writing.
    pub fs: Box<dyn FileSystem>,
    /// Shared recorder; the cassette is written by [`Self::finish_recording`],
    /// or on drop when that was never called.
    recorder: Option<Arc<Mutex<CassetteRecorder>>>,
}

impl ServiceContext {
    /// Creates a live context backed by the real filesystem and system clock.
    #[must_use]
    pub fn live() -> Self {
        Self { clock: Box::new(LiveClock), fs: Box::new(LiveFileSystem), recorder: None }
    }

    /// Creates a recording context that writes a cassette to `path` on drop.
    ///
    /// Uses live adapters for the actual work and records every port call.
    /// This is the developer-only mechanism behind `GLEAN_RECORD=<file>`.
    #[must_use]
    pub fn recording(path: &Path, command: &str) -> Self {
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(path, "glean-session", command)));
        Self {
            clock: Box::new(RecordingClock::new(Box::new(LiveClock), Arc::clone(&recorder))),
            fs: Box::new(RecordingFileSystem::new(Box::new(LiveFileSystem), Arc::clone(&recorder))),
            recorder: Some(recorder),
        }
    }

    /// Creates a replaying context from a cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read cassette file {}: {e}", path.display()))?;
        let cassette: Cassette = serde_yaml::from_str(&content)
            .map_err(|e| format!("Failed to parse cassette file {}: {e}", path.display()))?;
        Ok(Self::replaying_cassette(&cassette))
    }

    /// Creates a replaying context from an in-memory cassette.
    ///
    /// Each port gets its own replayer so per-port cursors are independent.
    #[must_use]
    pub fn replaying_cassette(cassette: &Cassette) -> Self {
        Self {
            clock: Box::new(ReplayingClock::new(CassetteReplayer::new(cassette))),
            fs: Box::new(ReplayingFileSystem::new(CassetteReplayer::new(cassette))),
            recorder: None,
        }
    }
}

impl ServiceContext {
    /// Writes the cassette of a recording context.
    ///
    /// Returns the cassette path, or `None` for a context that does not record.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be written.
    pub fn finish_recording(&mut self) -> Result<Option<PathBuf>, String> {
        let Some(recorder) = self.recorder.take() else {
            return Ok(None);
        };
        let result = match recorder.lock() {
            Ok(mut guard) => guard.finish(),
            Err(poisoned) => poisoned.into_inner().finish(),
        };
        result.map(Some).map_err(|e| format!("failed to write cassette: {e}"))
    }
}

impl Drop for ServiceContext {
    fn drop(&mut self) {
        match self.finish_recording() {
            Ok(Some(path)) => eprintln!("Recording saved to: {}", path.display()),
            Ok(None) => {}
            Err(e) => eprintln!("Warning: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::Interaction;
    use serde_json::json;

    #[test]
    fn replaying_context_serves_both_ports() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("full.cassette.yaml");
        let cassette = Cassette::new(
            "test",
            vec![
                Interaction {
                    seq: 0,
                    port: "clock".into(),
                    method: "now".into(),
                    input: json!({}),
                    output: json!("2024-06-15T10:30:00Z"),
                },
                Interaction {
                    seq: 1,
                    port: "fs".into(),
                    method: "is_dir".into(),
                    input: json!({"path": "/project"}),
                    output: json!(true),
                },
            ],
        );
        std::fs::write(&path, serde_yaml::to_string(&cassette).unwrap()).unwrap();

        let ctx = ServiceContext::replaying(&path).unwrap();
        assert_eq!(ctx.clock.now().to_rfc3339(), "2024-06-15T10:30:00+00:00");
        assert!(ctx.fs.is_dir(Path::new("/project")));
    }

    #[test]
    fn replaying_missing_cassette_is_an_error() {
        let result = ServiceContext::replaying(Path::new("/definitely/not/here.yaml"));
        assert!(result.is_err());
    }

    #[test]
    fn recording_context_writes_cassette_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let cassette_path = dir.path().join("rec/session.cassette.yaml");
        {
            let ctx = ServiceContext::recording(&cassette_path, "glean test");
            assert!(ctx.fs.is_dir(dir.path()));
        }
        let cassette: Cassette =
            serde_yaml::from_str(&std::fs::read_to_string(&cassette_path).unwrap()).unwrap();
        assert_eq!(cassette.command, "glean test");
        assert_eq!(cassette.interactions.len(), 1);
        assert_eq!(cassette.interactions[0].method, "is_dir");
    }

    #[test]
    fn finish_recording_surfaces_write_failures() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();
        let mut ctx = ServiceContext::recording(&blocker.join("run.cassette.yaml"), "glean test");
        assert!(ctx.fs.is_dir(dir.path()));

        let err = ctx.finish_recording().unwrap_err();
        assert!(err.contains("failed to write cassette"));
        assert_eq!(ctx.finish_recording(), Ok(None));
    }

    #[test]
    fn live_context_has_nothing_to_finish() {
        assert_eq!(ServiceContext::live().finish_recording(), Ok(None));
    }
}
