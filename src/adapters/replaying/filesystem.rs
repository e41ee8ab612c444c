//! Replaying adapter for the `FileSystem` port.

use std::path::Path;
use std::sync::Mutex;

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::error::PortError;
use crate::ports::filesystem::{FileSystem, WalkEntry};

/// Replays recorded filesystem operations from a cassette.
///
/// Writes are checked: when the recorded `write` input carries a
/// `contents` field, the replayed contents must match it byte for byte.
pub struct ReplayingFileSystem {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingFileSystem {
    /// Creates a new replaying filesystem from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl FileSystem for ReplayingFileSystem {
    fn read_to_string(&self, _path: &Path) -> Result<String, PortError> {
        let (_, output) = next_output(&self.replayer, "fs", "read_to_string");
        replay_result(&output, "fs::read_to_string")
    }

    fn write(&self, path: &Path, contents: &str) -> Result<(), PortError> {
        let (input, output) = next_output(&self.replayer, "fs", "write");
        if let Some(expected) = input.get("contents").and_then(serde_json::Value::as_str) {
            assert!(
                expected == contents,
                "fs::write to {} diverged from the recording.\n--- recorded ---\n{expected}\n--- replayed ---\n{contents}",
                path.display()
            );
        }
        if let Some(err) = output.get("err") {
            let msg = err.as_str().unwrap_or("unknown error").to_string();
            return Err(msg.into());
        }
        Ok(())
    }

    fn exists(&self, _path: &Path) -> bool {
        let (_, output) = next_output(&self.replayer, "fs", "exists");
        output.as_bool().expect("fs::exists: expected boolean output")
    }

    fn is_dir(&self, _path: &Path) -> bool {
        let (_, output) = next_output(&self.replayer, "fs", "is_dir");
        output.as_bool().expect("fs::is_dir: expected boolean output")
    }

    fn create_dir_all(&self, _path: &Path) -> Result<(), PortError> {
        let (_, output) = next_output(&self.replayer, "fs", "create_dir_all");
        replay_result::<()>(&output, "fs::create_dir_all")
    }

    fn walk(&self, _root: &Path, _skip_dirs: &[String]) -> Result<Vec<WalkEntry>, PortError> {
        let (_, output) = next_output(&self.replayer, "fs", "walk");
        replay_result(&output, "fs::walk")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::{Cassette, Interaction};
    use serde_json::json;

    fn replaying(interactions: Vec<Interaction>) -> ReplayingFileSystem {
        ReplayingFileSystem::new(CassetteReplayer::new(&Cassette::new("fs", interactions)))
    }

    fn fs_call(seq: u64, method: &str, input: serde_json::Value, output: serde_json::Value) -> Interaction {
        Interaction { seq, port: "fs".into(), method: method.into(), input, output }
    }

    #[test]
    fn read_to_string_serves_ok_and_err() {
        let fs = replaying(vec![
            fs_call(0, "read_to_string", json!({"path": "/a"}), json!({"ok": "contents"})),
            fs_call(1, "read_to_string", json!({"path": "/b"}), json!({"err": "file not found"})),
        ]);
        assert_eq!(fs.read_to_string(Path::new("/a")).unwrap(), "contents");
        let err = fs.read_to_string(Path::new("/b")).unwrap_err();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn walk_deserializes_entries() {
        let fs = replaying(vec![fs_call(
            0,
            "walk",
            json!({"root": "/p"}),
            json!({"ok": [{"path": "/p", "is_dir": true}, {"path": "/p/a.ts", "is_dir": false}]}),
        )]);
        let entries = fs.walk(Path::new("/p"), &[]).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(!entries[1].is_dir);
    }

    #[test]
    fn matching_write_passes() {
        let fs = replaying(vec![fs_call(
            0,
            "write",
            json!({"path": "/out.md", "contents": "# a\n"}),
            json!({"ok": null}),
        )]);
        assert!(fs.write(Path::new("/out.md"), "# a\n").is_ok());
    }

    #[test]
    #[should_panic(expected = "diverged from the recording")]
    fn diverging_write_panics() {
        let fs = replaying(vec![fs_call(
            0,
            "write",
            json!({"path": "/out.md", "contents": "# a\n"}),
            json!({"ok": null}),
        )]);
        let _ = fs.write(Path::new("/out.md"), "# b\n");
    }
}
