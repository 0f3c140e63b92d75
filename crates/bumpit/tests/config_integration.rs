//! Configuration integration tests.
//!
//! These tests verify config discovery, format parsing, and precedence
//! against the environment from an end-to-end perspective.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Returns a Command configured to run our binary with a clean environment.
#[allow(deprecated)]
fn cmd(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap();
    cmd.env("XDG_CONFIG_HOME", home.join(".xdg"))
        .env_remove("GITHUB_OUTPUT")
        .env_remove("MAJOR_WORDING")
        .env_remove("MINOR_WORDING")
        .env_remove("PATCH_WORDING")
        .env_remove("RUST_LOG")
        .env_remove("BUMPIT_LOG_PATH")
        .env_remove("BUMPIT_LOG_DIR")
        .env_remove("FORCE_COLOR")
        .env_remove("CLICOLOR_FORCE");
    cmd
}

fn project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::create_dir(tmp.path().join(".git")).unwrap();
    fs::write(
        tmp.path().join("package.json"),
        r#"{"name":"demo","version":"1.2.3"}"#,
    )
    .unwrap();
    tmp
}

fn version_of(dir: &Path) -> String {
    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.join("package.json")).unwrap()).unwrap();
    value["version"].as_str().unwrap().to_owned()
}

// =============================================================================
// Config File Discovery
// =============================================================================

#[test]
fn runs_without_config_file() {
    let tmp = project();

    cmd(tmp.path())
        .args(["-C", tmp.path().to_str().unwrap(), "fix: it"])
        .assert()
        .success();

    assert_eq!(version_of(tmp.path()), "1.2.4");
}

#[test]
fn dotfile_keywords_are_used() {
    let tmp = project();
    fs::write(
        tmp.path().join(".bumpit.toml"),
        "[keywords]\nminor = [\"Add\"]\n",
    )
    .unwrap();

    cmd(tmp.path())
        .args(["-C", tmp.path().to_str().unwrap(), "add search page"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bump type: minor"));

    assert_eq!(version_of(tmp.path()), "1.3.0");
}

#[test]
fn config_found_from_nested_folder_invocation() {
    let tmp = project();
    let nested = tmp.path().join("packages").join("api");
    fs::create_dir_all(&nested).unwrap();
    fs::write(
        nested.join("package.json"),
        r#"{"name":"api","version":"3.1.4"}"#,
    )
    .unwrap();
    fs::write(
        tmp.path().join("bumpit.yaml"),
        "keywords:\n  major:\n    - drop\n",
    )
    .unwrap();

    cmd(tmp.path())
        .args(["-C", nested.to_str().unwrap(), "drop node 16"])
        .assert()
        .success();

    assert_eq!(version_of(&nested), "4.0.0");
}

#[test]
fn explicit_config_file_is_used() {
    let tmp = project();
    let config = tmp.path().join("custom.json");
    fs::write(&config, r#"{"keywords": {"patch": ["tweak"], "minor": ["tweak-more"]}}"#).unwrap();

    cmd(tmp.path())
        .args([
            "-C",
            tmp.path().to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
            "tweak-more: add option",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bump type: minor"));
}

#[test]
fn environment_overrides_config_file() {
    let tmp = project();
    fs::write(
        tmp.path().join(".bumpit.toml"),
        "[keywords]\nmajor = [\"epic\"]\n",
    )
    .unwrap();

    cmd(tmp.path())
        .env("MAJOR_WORDING", "giant")
        .args(["-C", tmp.path().to_str().unwrap(), "epic refactor"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bump type: patch"));

    assert_eq!(version_of(tmp.path()), "1.2.4");
}

// =============================================================================
// Config Errors
// =============================================================================

#[test]
fn invalid_config_fails_before_touching_manifest() {
    let tmp = project();
    fs::write(tmp.path().join(".bumpit.toml"), r#"log_level = "loud""#).unwrap();

    cmd(tmp.path())
        .args(["-C", tmp.path().to_str().unwrap(), "feat: x"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("failed to load configuration"));

    assert_eq!(version_of(tmp.path()), "1.2.3");
}

#[test]
fn missing_explicit_config_fails() {
    let tmp = project();

    cmd(tmp.path())
        .args([
            "-C",
            tmp.path().to_str().unwrap(),
            "--config",
            "does-not-exist.toml",
            "feat: x",
        ])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn log_dir_env_writes_jsonl() {
    let tmp = project();
    let logs = tmp.path().join("logs");

    cmd(tmp.path())
        .env("BUMPIT_LOG_DIR", &logs)
        .args(["-v", "-C", tmp.path().to_str().unwrap(), "fix: it"])
        .assert()
        .success();

    let log = fs::read_to_string(logs.join("bumpit.jsonl")).unwrap();
    assert!(log.contains("bump complete"), "log was: {log}");
}
