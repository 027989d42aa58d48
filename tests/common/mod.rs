//! Common test utilities for canary integration tests

use std::path::PathBuf;

use assert_cmd::Command;
use tempfile::TempDir;

/// A scratch directory holding configs and the working root
pub struct TestWorkspace {
    #[allow(dead_code)]
    pub temp: TempDir,
    pub path: PathBuf,
}

impl TestWorkspace {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        Self { temp, path }
    }

    /// Working root passed through `--root`
    pub fn root(&self) -> PathBuf {
        self.path.join("test_modules")
    }

    /// Write a file in workspace
    pub fn write_file(&self, path: &str, content: &str) -> PathBuf {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
        file_path
    }

    /// canary command rooted in this workspace
    pub fn canary(&self) -> Command {
        let mut cmd = canary_cmd();
        cmd.current_dir(&self.path)
            .env("CANARY_ROOT", self.root())
            .env("NO_COLOR", "1");
        cmd
    }
}

// Temporary fix for deprecated cargo_bin - will be updated when build-dir issues are resolved
#[allow(deprecated)]
pub fn canary_cmd() -> Command {
    Command::cargo_bin("canary").expect("canary binary")
}
