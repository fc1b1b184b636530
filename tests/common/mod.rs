//! Shared test infrastructure for integration tests.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Scratch directory holding a sources file and a state file for one run.
pub struct Workspace {
    dir: TempDir,
}

/// Captured result of one `relwatch` invocation.
#[derive(Debug)]
pub struct RunResult {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl From<Output> for RunResult {
    fn from(output: Output) -> Self {
        Self {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    pub fn sources_path(&self) -> PathBuf {
        self.dir.path().join("sources.yaml")
    }

    pub fn state_path(&self) -> PathBuf {
        self.dir.path().join("state.json")
    }

    pub fn write_sources(&self, yaml: &str) {
        std::fs::write(self.sources_path(), yaml).expect("write sources");
    }

    pub fn write_state(&self, json: &str) {
        std::fs::write(self.state_path(), json).expect("write state");
    }

    pub fn read_state(&self) -> serde_json::Value {
        read_json(&self.state_path())
    }

    /// Runs the binary against this workspace with webhook env cleared.
    pub fn run(&self, extra_args: &[&str]) -> RunResult {
        let output = Command::new(env!("CARGO_BIN_EXE_relwatch"))
            .arg("--sources")
            .arg(self.sources_path())
            .arg("--state")
            .arg(self.state_path())
            .args(extra_args)
            .env_remove("WEBHOOK_URL")
            .env_remove("WEBHOOK_TOKEN")
            .env("RUST_LOG", "info")
            .output()
            .expect("run relwatch");
        output.into()
    }
}

pub fn read_json(path: &Path) -> serde_json::Value {
    let text = std::fs::read_to_string(path)
        .unwrap_or_else(|err| panic!("read {}: {err}", path.display()));
    serde_json::from_str(&text).unwrap_or_else(|err| panic!("parse {}: {err}", path.display()))
}
