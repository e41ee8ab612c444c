//! Integration tests for top-level CLI behavior.

use std::path::Path;
use std::process::{Command, Output};

fn run_glean(dir: &Path, args: &[&str]) -> Output {
    let bin = env!("CARGO_BIN_EXE_glean");
    Command::new(bin)
        .args(args)
        .current_dir(dir)
        .env_remove("GLEAN_RECORD")
        .env_remove("GLEAN_LOG")
        .output()
        .expect("failed to run glean binary")
}

#[test]
fn invalid_root_exits_with_failure() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_glean(dir.path(), &["endpoints", "missing-dir"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.contains("Invalid directory path"));
}

#[test]
fn zero_matches_still_succeed() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.ts"), "const x = 1;\n").unwrap();
    let output = run_glean(dir.path(), &["endpoints", "."]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("No endpoints starting with '/Api/' found."));
    assert!(dir.path().join("api_references.md").is_file());
}

#[test]
fn docs_py_writes_pages_under_extracted() {
    let dir = tempfile::tempdir().unwrap();
    let pkg = dir.path().join("pkg");
    std::fs::create_dir_all(&pkg).unwrap();
    std::fs::write(
        pkg.join("tools.py"),
        "\"\"\"Helper tools.\"\"\"\n\n\ndef greet(name):\n    \"\"\"Say hello.\n\n    Returns the greeting.\n    \"\"\"\n    return f\"hi {name}\"\n",
    )
    .unwrap();

    let output = run_glean(dir.path(), &["docs", "py", "pkg"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let page = std::fs::read_to_string(dir.path().join("extracted/tools.md")).unwrap();
    assert!(page.starts_with("# tools\n\n---\nProject: pkg\nProgramming Language: Python\nFile Type: Function\n---\n\n"));
    assert!(page.contains("## Info\n\nHelper tools.\n\n**Function**: `greet`\n\nSay hello.\n\nReturns the greeting.\n\n"));
}

#[test]
fn undocumented_defaults_to_src_and_docs_autodocs() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("src")).unwrap();
    std::fs::write(dir.path().join("src/app.ts"), "export const a = 1;\n").unwrap();
    std::fs::write(dir.path().join("src/app.module.ts"), "export class AppModule {}\n").unwrap();

    let output = run_glean(dir.path(), &["undocumented"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let report = std::fs::read_to_string(dir.path().join("docs/autodocs/not-documented.md")).unwrap();
    assert_eq!(report, "# Undocumented files\n\n- app.ts: app.ts\n");
}

#[test]
fn invalid_config_is_a_setup_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(".glean.yaml"), "docs: [not, a, map]\n").unwrap();
    let output = run_glean(dir.path(), &["barrel", "."]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.contains("config error"));
}

#[test]
fn record_env_writes_a_cassette() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.ts"), "export const a = 1;\n").unwrap();
    let cassette = dir.path().join("run.cassette.yaml");
    let bin = env!("CARGO_BIN_EXE_glean");
    let output = Command::new(bin)
        .args(["barrel", "."])
        .current_dir(dir.path())
        .env("GLEAN_RECORD", &cassette)
        .output()
        .expect("failed to run glean binary");
    assert!(output.status.success());
    let text = std::fs::read_to_string(&cassette).unwrap();
    assert!(text.contains("command: glean barrel"));
}

#[test]
fn unwritable_cassette_fails_the_run() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.ts"), "export const a = 1;\n").unwrap();
    std::fs::write(dir.path().join("blocker"), "plain file").unwrap();
    let bin = env!("CARGO_BIN_EXE_glean");
    let output = Command::new(bin)
        .args(["barrel", "."])
        .current_dir(dir.path())
        .env("GLEAN_RECORD", dir.path().join("blocker/run.cassette.yaml"))
        .output()
        .expect("failed to run glean binary");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.contains("failed to write cassette"));
}

#[test]
fn invalid_subcommand_exits_with_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_glean(dir.path(), &["nonsense"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("unrecognized subcommand"));
}
