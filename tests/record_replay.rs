//! Record-replay round trips through real commands.
//!
//! Each test runs a command against a scratch tree with a recording
//! context, deletes the tree, then replays the cassette. Replayed writes
//! are checked byte for byte against the recording, so a successful replay
//! proves the command's output depends only on its port interactions.

use std::path::Path;

use glean::cassette::format::Cassette;
use glean::commands::{barrel, docs, endpoints};
use glean::config::GleanConfig;
use glean::context::ServiceContext;
use glean::extract::DocLanguage;

fn load_cassette(path: &Path) -> Cassette {
    serde_yaml::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn docs_run_replays_without_the_source_tree() {
    let cassettes = tempfile::tempdir().unwrap();
    let cassette_path = cassettes.path().join("docs.cassette.yaml");
    let tree = tempfile::tempdir().unwrap();
    let src = tree.path().join("src");
    let out = tree.path().join("out");
    std::fs::create_dir_all(&src).unwrap();
    std::fs::write(
        src.join("math.ts"),
        "/**\n * Adds two numbers.\n * @param {number} a\n * @param {number} b\n * @returns {number} sum\n */\nexport function add(a, b) { return a + b; }\n",
    )
    .unwrap();

    let config = GleanConfig::default();
    let job = docs::DocsJob { language: DocLanguage::TypeScript, folder: &src, output: &out, project: "calc" };
    let recorded = {
        let ctx = ServiceContext::recording(&cassette_path, "glean docs ts");
        docs::run(&ctx, &config, &job).unwrap()
    };
    assert_eq!(recorded.processed, 1);

    let cassette = load_cassette(&cassette_path);
    assert_eq!(cassette.command, "glean docs ts");
    assert!(cassette.interactions.iter().any(|i| i.method == "walk"));
    assert!(cassette.interactions.iter().any(|i| i.method == "write"));

    let tree_path = tree.path().to_path_buf();
    drop(tree);
    assert!(!tree_path.exists());

    let ctx = ServiceContext::replaying(&cassette_path).unwrap();
    let replayed = docs::run(&ctx, &config, &job).unwrap();
    assert_eq!(replayed, recorded);
}

#[test]
fn endpoints_run_replays_identically_twice() {
    let cassettes = tempfile::tempdir().unwrap();
    let cassette_path = cassettes.path().join("endpoints.cassette.yaml");
    let tree = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(tree.path().join("src")).unwrap();
    std::fs::write(tree.path().join("src/a.ts"), "fetch('/Api/orders/list');\n").unwrap();
    let output = tree.path().join("refs.md");

    let config = GleanConfig::default();
    let recorded = {
        let ctx = ServiceContext::recording(&cassette_path, "glean endpoints");
        endpoints::run(&ctx, &config, tree.path(), &output, None).unwrap()
    };
    assert_eq!(recorded.endpoints.len(), 1);

    for _ in 0..2 {
        let ctx = ServiceContext::replaying(&cassette_path).unwrap();
        let replayed = endpoints::run(&ctx, &config, tree.path(), &output, None).unwrap();
        assert_eq!(replayed, recorded);
    }
}

#[test]
fn barrel_run_replays_skip_decisions() {
    let cassettes = tempfile::tempdir().unwrap();
    let cassette_path = cassettes.path().join("barrel.cassette.yaml");
    let tree = tempfile::tempdir().unwrap();
    std::fs::write(tree.path().join("a.ts"), "export const a = 1;\n").unwrap();
    std::fs::write(tree.path().join("index.ts"), "export * from \"./a\";\n").unwrap();

    let config = GleanConfig::default();
    let recorded = {
        let ctx = ServiceContext::recording(&cassette_path, "glean barrel");
        barrel::run(&ctx, &config, tree.path()).unwrap()
    };
    assert_eq!(recorded.len(), 1);
    assert!(!recorded[0].updated);

    std::fs::remove_file(tree.path().join("index.ts")).unwrap();
    let ctx = ServiceContext::replaying(&cassette_path).unwrap();
    let replayed = barrel::run(&ctx, &config, tree.path()).unwrap();
    assert_eq!(replayed, recorded);
}
