use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

pub struct TestDir {
    dir: TempDir,
}

impl TestDir {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("failed to create tempdir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn tasks_file(&self) -> PathBuf {
        self.dir.path().join("tasks.json")
    }

    pub fn archive_file(&self) -> PathBuf {
        self.dir.path().join("archive.json")
    }

    pub fn disabled_flag(&self) -> PathBuf {
        self.dir.path().join(".disabled")
    }

    pub fn write_config(&self, contents: &str) -> std::io::Result<()> {
        fs::write(self.dir.path().join("config.toml"), contents)
    }

    /// Parse the live task document; an absent file reads as an empty array
    pub fn read_tasks(&self) -> Value {
        read_json_array(&self.tasks_file())
    }

    /// Parse the archive document; an absent file reads as an empty array
    pub fn read_archive(&self) -> Value {
        read_json_array(&self.archive_file())
    }
}

fn read_json_array(path: &Path) -> Value {
    if !path.exists() {
        return Value::Array(Vec::new());
    }
    let contents = fs::read_to_string(path).expect("read json document");
    serde_json::from_str(&contents).expect("parse json document")
}

/// A tt invocation pointed at the test directory
pub fn tt_cmd(dir: &TestDir) -> Command {
    let mut cmd = Command::cargo_bin("tt").expect("binary");
    cmd.env("TT_DIR", dir.path());
    cmd
}

/// Create a task via the CLI and return its assigned id
pub fn add_task(dir: &TestDir, args: &[&str]) -> u64 {
    let output = tt_cmd(dir)
        .arg("add")
        .args(args)
        .arg("--json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: Value = serde_json::from_slice(&output).expect("add json");
    value["data"]["id"].as_u64().expect("task id")
}

/// Run a command expecting success and return the parsed JSON envelope
pub fn json_output(cmd: &mut Command) -> Value {
    let output = cmd
        .arg("--json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    serde_json::from_slice(&output).expect("json envelope")
}
