//! CLI subprocess integration tests.
//!
//! These tests invoke the `trex` binary as a subprocess against a temporary
//! project and store, using only local locations so no network is needed.

use std::path::Path;
use std::process::{Command, Output};

struct Project {
    dir: tempfile::TempDir,
}

impl Project {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn manifest(&self) -> std::path::PathBuf {
        self.dir.path().join("import_map.json")
    }

    fn trex(&self, args: &[&str]) -> Output {
        let path = |p: &Path| p.display().to_string();
        Command::new(env!("CARGO_BIN_EXE_trex"))
            .env("HOME", self.dir.path())
            .env_remove("TREX_LOG")
            .arg("--manifest")
            .arg(path(&self.manifest()))
            .arg("--store")
            .arg(path(&self.dir.path().join("state/storage.json")))
            .args(args)
            .output()
            .unwrap()
    }
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

#[test]
fn cli_version_exits_zero() {
    let out = Command::new(env!("CARGO_BIN_EXE_trex"))
        .arg("--version")
        .output()
        .unwrap();
    assert!(out.status.success());
    assert!(stdout(&out).contains("trex"));
}

#[test]
fn install_writes_sorted_manifest() {
    let project = Project::new();
    let out = project.trex(&["--json", "install", "zeta=./z.ts", "alpha=./a.ts"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let content = std::fs::read_to_string(project.manifest()).unwrap();
    assert_eq!(
        content,
        "{\n  \"imports\": {\n    \"alpha\": \"./a.ts\",\n    \"zeta\": \"./z.ts\"\n  }\n}\n"
    );

    let payload: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(payload["fingerprints"]["alpha"].as_str().unwrap().len(), 64);
}

#[test]
fn list_json_matches_manifest() {
    let project = Project::new();
    assert!(project.trex(&["install", "a=./a.ts"]).status.success());

    let out = project.trex(&["--json", "list"]);
    assert!(out.status.success());
    let payload: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(payload, serde_json::json!({"imports": {"a": "./a.ts"}}));
}

#[test]
fn verify_passes_after_install() {
    let project = Project::new();
    assert!(project.trex(&["install", "a=./a.ts"]).status.success());

    let out = project.trex(&["--json", "verify"]);
    assert_eq!(out.status.code(), Some(0));
    let payload: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(payload["passed"], 1);
    assert_eq!(payload["bootstrap"], false);
}

#[test]
fn verify_detects_modified_plain_file() {
    let project = Project::new();
    std::fs::write(project.dir.path().join("lib.ts"), "v1").unwrap();
    assert!(project.trex(&["install", "lib=lib.ts"]).status.success());

    std::fs::write(project.dir.path().join("lib.ts"), "v2").unwrap();
    let out = project.trex(&["verify"]);
    assert_eq!(out.status.code(), Some(4));
    assert!(stdout(&out).contains("FAIL"));
}

#[test]
fn uninstall_unknown_package_fails() {
    let project = Project::new();
    assert!(project.trex(&["install", "a=./a.ts"]).status.success());
    let out = project.trex(&["uninstall", "nope"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("nope"));
}

#[test]
fn malformed_manifest_exits_with_manifest_error() {
    let project = Project::new();
    std::fs::write(project.manifest(), "{ broken").unwrap();
    let out = project.trex(&["list"]);
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("valid format"));
}

#[test]
fn fingerprint_of_local_path_uses_sentinel() {
    let project = Project::new();
    let first = project.trex(&["fingerprint", "./mod.ts"]);
    std::fs::write(project.dir.path().join("mod.ts"), "changed").unwrap();
    let second = project.trex(&["fingerprint", "./mod.ts"]);
    assert!(first.status.success());
    assert_eq!(stdout(&first), stdout(&second));
}

#[test]
fn locate_std_module_appends_mod_ts() {
    let project = Project::new();
    assert!(project
        .trex(&["install", "fs/=/vendor/std/fs/"])
        .status
        .success());
    let out = project.trex(&["locate", "fs"]);
    assert!(out.status.success());
    assert_eq!(stdout(&out).trim(), "/vendor/std/fs/mod.ts");
}

#[test]
fn locate_std_module_uses_proxy_table() {
    let project = Project::new();
    let config_dir = project.dir.path().join(".config/trex");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.json"),
        r#"{"proxies": {"node": "https://proxy.test/node/module.ts"}}"#,
    )
    .unwrap();
    assert!(project
        .trex(&["install", "node/=/vendor/std/node/", "fs/=/vendor/std/fs/"])
        .status
        .success());

    let out = project.trex(&["locate", "node"]);
    assert!(out.status.success());
    assert_eq!(stdout(&out).trim(), "https://proxy.test/node/module.ts");

    let out = project.trex(&["locate", "node", "--proxy", "node=/local/node.ts"]);
    assert!(out.status.success());
    assert_eq!(stdout(&out).trim(), "/local/node.ts");

    let out = project.trex(&["locate", "fs"]);
    assert_eq!(stdout(&out).trim(), "/vendor/std/fs/mod.ts");
}
