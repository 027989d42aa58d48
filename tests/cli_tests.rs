//! CLI integration tests using the REAL canary binary

mod common;

use common::{TestWorkspace, canary_cmd};
use predicates::prelude::*;

#[test]
fn test_help_output() {
    canary_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("bundler"))
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("matrix"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn test_run_help_lists_options() {
    canary_cmd()
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--bundler"))
        .stdout(predicate::str::contains("--dependency"))
        .stdout(predicate::str::contains("--package-manager"))
        .stdout(predicate::str::contains("--no-examples"));
}

#[test]
fn test_version_output() {
    canary_cmd()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("canary"))
        .stdout(predicate::str::contains("Build info"));
}

#[test]
fn test_run_requires_dependency() {
    canary_cmd()
        .args(["run", "--bundler", "4.1.0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--dependency"));
}

#[test]
fn test_run_rejects_invalid_dependency_without_installing() {
    let workspace = TestWorkspace::new();

    workspace
        .canary()
        .args(["run", "-b", "4.1.0", "-d", "foo@latest"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Errors have occurred running examples"))
        .stderr(predicate::str::contains(
            "Dependency details provided are not valid: 'foo@latest'",
        ));

    assert!(!workspace.root().join("package.json").exists());
}

#[test]
fn test_run_rejects_non_bundler() {
    let workspace = TestWorkspace::new();

    workspace
        .canary()
        .args(["run", "-b", "left-pad@1.0.0", "-d", "css-loader@1.0.0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Bundler version is not valid"));

    assert!(!workspace.root().exists());
}

#[test]
fn test_run_rejects_unknown_package_manager() {
    canary_cmd()
        .args(["run", "-b", "4.1.0", "-d", "css-loader", "-p", "pnpm"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("pnpm"));
}

#[test]
fn test_completions_bash() {
    canary_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("canary"));
}

#[test]
fn test_completions_unknown_shell() {
    canary_cmd()
        .args(["completions", "tcsh"])
        .assert()
        .failure();
}
