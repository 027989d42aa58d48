//! Matrix command against config files

mod common;

use common::TestWorkspace;
use predicates::prelude::*;

#[test]
fn test_matrix_missing_config() {
    let workspace = TestWorkspace::new();

    workspace
        .canary()
        .arg("matrix")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration file not found"))
        .stderr(predicate::str::contains("canary.yaml"));
}

#[test]
fn test_matrix_malformed_config() {
    let workspace = TestWorkspace::new();
    workspace.write_file("canary.yaml", "matrix: [\n  - bundler: 4.1.0\n");

    workspace
        .canary()
        .arg("matrix")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse configuration file"));
}

#[test]
fn test_matrix_rejects_unknown_key() {
    let workspace = TestWorkspace::new();
    workspace.write_file(
        "other.yaml",
        "matrix:\n  - bundler: 4.1.0\n    dependencies:\n      - dependency: css-loader\n        retries: 3\n",
    );

    workspace
        .canary()
        .args(["matrix", "--config", "other.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("retries"));
}

#[test]
fn test_matrix_empty_config() {
    let workspace = TestWorkspace::new();
    workspace.write_file("canary.yaml", "matrix: []\n");

    workspace
        .canary()
        .arg("matrix")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"));
}

#[test]
fn test_matrix_reports_invalid_pairs() {
    let workspace = TestWorkspace::new();
    workspace.write_file(
        "canary.yaml",
        "matrix:\n  - bundler: 4.1.0\n    dependencies:\n      - dependency: foo@latest\n        package_manager: yarn\n",
    );

    workspace
        .canary()
        .arg("matrix")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Bundler 4.1.0"))
        .stdout(predicate::str::contains("Failed"))
        .stdout(predicate::str::contains(
            "canary run --bundler 4.1.0 --dependency foo@latest --package-manager yarn",
        ))
        .stdout(predicate::str::contains("Compilation failures"))
        .stderr(predicate::str::contains("1 of 1 pairs failed"));

    assert!(!workspace.root().join("package.json").exists());
}
