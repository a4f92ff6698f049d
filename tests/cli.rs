//! End-to-end checks of the `kodegen_bundler_gui` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

fn bin() -> Command {
    let mut cmd = Command::cargo_bin("kodegen_bundler_gui").unwrap();
    cmd.env_remove("KODEGEN_PYINSTALLER")
        .env_remove("KODEGEN_PYTHON")
        .env_remove("KODEGEN_BUNDLE_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

fn script_in(dir: &TempDir, name: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, "import tkinter\ntkinter.Tk().mainloop()\n").unwrap();
    path
}

#[test]
fn dry_run_json_describes_the_invocation() {
    let dir = TempDir::new().unwrap();
    let script = script_in(&dir, "app.py");

    let output = bin()
        .args(["build", "--toolkit", "plain", "--windowed", "--dry-run", "--json"])
        .args(["--bundler", "pyinstaller", "--script"])
        .arg(&script)
        .output()
        .unwrap();
    assert!(output.status.success(), "{output:?}");

    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    let arguments: Vec<&str> = report["descriptor"]["arguments"]
        .as_array()
        .unwrap()
        .iter()
        .map(|arg| arg.as_str().unwrap())
        .collect();

    assert_eq!(report["descriptor"]["executable"], "pyinstaller");
    assert!(arguments.contains(&"--windowed"));
    assert!(!arguments.contains(&"--onefile"));
    let import = arguments.iter().position(|a| *a == "--hidden-import").unwrap();
    assert_eq!(arguments[import + 1], "tkinter");
    assert!(arguments.last().unwrap().ends_with("app.py"));
}

#[test]
fn dry_run_prints_a_command_line() {
    let dir = TempDir::new().unwrap();
    let script = script_in(&dir, "editor.py");

    bin()
        .args(["build", "-t", "plain", "--name", "Editor", "--dry-run"])
        .args(["--bundler", "pyinstaller", "--script"])
        .arg(&script)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("pyinstaller"))
        .stdout(predicate::str::contains("--name Editor"));
}

#[test]
fn missing_script_is_a_configuration_error() {
    let dir = TempDir::new().unwrap();

    bin()
        .args(["build", "--toolkit", "plain", "--dry-run", "--bundler", "pyinstaller"])
        .arg("--script")
        .arg(dir.path().join("missing.py"))
        .assert()
        .code(78)
        .stderr(predicate::str::contains("missing.py"));
}

#[test]
fn wrong_extension_is_a_configuration_error() {
    let dir = TempDir::new().unwrap();
    let script = dir.path().join("notes.txt");
    fs::write(&script, "hello").unwrap();

    bin()
        .args(["build", "--toolkit", "plain", "--dry-run", "--bundler", "pyinstaller"])
        .arg("--script")
        .arg(&script)
        .assert()
        .code(78);
}

#[test]
fn json_without_dry_run_is_rejected() {
    bin()
        .args(["build", "--script", "app.py", "--toolkit", "plain", "--json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--dry-run"));
}

#[test]
fn unreadable_manifest_is_a_configuration_error() {
    let dir = TempDir::new().unwrap();

    bin()
        .args(["batch", "--manifest"])
        .arg(dir.path().join("bundle.toml"))
        .assert()
        .code(78)
        .stderr(predicate::str::contains("Invalid manifest"));
}

#[test]
fn manifest_without_targets_is_rejected() {
    let dir = TempDir::new().unwrap();
    let manifest = dir.path().join("bundle.toml");
    fs::write(&manifest, "[overrides]\nclean = true\n").unwrap();

    bin()
        .args(["batch", "--manifest"])
        .arg(&manifest)
        .assert()
        .code(78)
        .stderr(predicate::str::contains("no [[target]] tables"));
}

#[test]
fn config_overrides_apply_to_dry_run() {
    let dir = TempDir::new().unwrap();
    let script = script_in(&dir, "app.py");
    let manifest = dir.path().join("bundle.toml");
    fs::write(
        &manifest,
        "[overrides]\nonefile = true\nname = \"Renamed\"\nhidden_imports = [\"json\"]\n",
    )
    .unwrap();

    bin()
        .args(["build", "-t", "plain", "--dry-run", "--bundler", "pyinstaller"])
        .arg("--config")
        .arg(&manifest)
        .arg("--script")
        .arg(&script)
        .assert()
        .success()
        .stdout(predicate::str::contains("--onefile"))
        .stdout(predicate::str::contains("--name Renamed"))
        .stdout(predicate::str::contains("--hidden-import json"));
}
