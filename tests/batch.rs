//! `batch` runs against a shell stand-in for PyInstaller.

#![cfg(unix)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tempfile::TempDir;

/// Answers `--version`, then behaves according to the script name (last argument):
/// `*fail.py` exits 3, `*slow.py` sleeps, anything else succeeds.
///
/// Each run holds `<dir>/running` as a lock directory, so overlapping runs fail with 9.
const STAND_IN: &str = r#"#!/bin/sh
if [ "$1" = "--version" ]; then echo 6.5.0; exit 0; fi
for last; do :; done
dir=$(dirname "$0")
mkdir "$dir/running" 2>/dev/null || { echo "overlapping run"; exit 9; }
touch "$dir/started"
case "$last" in
  *fail.py) rmdir "$dir/running"; echo "build exploded"; exit 3 ;;
  *slow.py) exec sleep 30 ;;
esac
sleep 0.2
rmdir "$dir/running"
echo "built $last"
"#;

struct Workspace {
    dir: TempDir,
    bundler: PathBuf,
}

impl Workspace {
    fn new(scripts: &[&str]) -> Self {
        let dir = TempDir::new().unwrap();
        let bundler = dir.path().join("pyinstaller");
        fs::write(&bundler, STAND_IN).unwrap();
        fs::set_permissions(&bundler, fs::Permissions::from_mode(0o755)).unwrap();

        let mut manifest = String::new();
        for script in scripts {
            fs::write(dir.path().join(script), "import tkinter\n").unwrap();
            manifest.push_str(&format!(
                "[[target]]\nscript = \"{script}\"\ntoolkit = \"plain\"\n\n"
            ));
        }
        fs::write(dir.path().join("bundle.toml"), manifest).unwrap();

        Self { dir, bundler }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn args(&self, jobs: usize) -> Vec<String> {
        vec![
            "batch".into(),
            "--manifest".into(),
            self.path().join("bundle.toml").display().to_string(),
            "--jobs".into(),
            jobs.to_string(),
            "--bundler".into(),
            self.bundler.display().to_string(),
        ]
    }
}

fn bin() -> Command {
    let mut cmd = Command::cargo_bin("kodegen_bundler_gui").unwrap();
    cmd.env_remove("KODEGEN_PYINSTALLER")
        .env_remove("KODEGEN_PYTHON")
        .env_remove("KODEGEN_BUNDLE_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn all_targets_succeed() {
    let ws = Workspace::new(&["editor.py", "viewer.py", "convert.py"]);

    bin()
        .args(ws.args(1))
        .assert()
        .success()
        .stdout(predicate::str::contains("editor"))
        .stdout(predicate::str::contains("viewer"))
        .stdout(predicate::str::contains("convert"))
        .stdout(predicate::str::contains("All 3 target(s) built"));
}

#[test]
fn failing_target_sets_exit_code_and_summary() {
    let ws = Workspace::new(&["good.py", "fail.py"]);

    bin()
        .args(ws.args(1))
        .assert()
        .code(3)
        .stdout(predicate::str::contains("good"))
        .stdout(predicate::str::contains("build exploded"))
        .stderr(predicate::str::contains("fail: bundler exited with code 3"))
        .stderr(predicate::str::contains("1 of 2 batch targets failed"));
}

#[test]
fn job_limit_prevents_overlapping_runs() {
    let ws = Workspace::new(&["a.py", "b.py", "c.py", "d.py"]);

    bin()
        .args(ws.args(1))
        .assert()
        .success()
        .stdout(predicate::str::contains("overlapping run").not());
}

#[test]
fn interrupt_cancels_running_and_queued_targets() {
    use nix::sys::signal::{Signal, kill};
    use nix::unistd::Pid;

    let ws = Workspace::new(&["slow.py", "queued.py"]);
    let mut child = std::process::Command::new(assert_cmd::cargo::cargo_bin("kodegen_bundler_gui"))
        .args(ws.args(1))
        .env_remove("KODEGEN_BUNDLE_TIMEOUT")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn()
        .unwrap();

    let started = ws.path().join("started");
    let deadline = Instant::now() + Duration::from_secs(20);
    while !started.exists() {
        assert!(Instant::now() < deadline, "first target never started");
        std::thread::sleep(Duration::from_millis(20));
    }
    std::thread::sleep(Duration::from_millis(200));

    let interrupted = Instant::now();
    kill(Pid::from_raw(child.id() as i32), Signal::SIGINT).unwrap();
    let status = child.wait().unwrap();

    assert_eq!(status.code(), Some(130));
    assert!(interrupted.elapsed() < Duration::from_secs(10));
}
