//! Running a dependency's own test suite against the installed bundler
//!
//! The dependency is moved out of `node_modules` into the working root's test
//! directory, the installed bundler is linked into its `node_modules`, and
//! the configured test command runs there. Test runners write progress to
//! stderr, so only the exit code decides the outcome.

use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

use crate::error::TestStageError;
use crate::installer::command::{StderrPolicy, run_command};
use crate::reference::DependencyReference;
use crate::workspace::WorkingRoot;

/// Result of the dependency test stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestOutcome {
    pub command: String,
    pub error: Option<TestStageError>,
}

impl TestOutcome {
    pub fn passed(&self) -> bool {
        self.error.is_none()
    }
}

/// Relocate the dependency, link the bundler and run `command`
pub fn run_dependency_tests(
    root: &WorkingRoot,
    bundler: &DependencyReference,
    dependency: &DependencyReference,
    command: &str,
    timeout: Duration,
) -> TestOutcome {
    let error = relocate(root, bundler, dependency)
        .and_then(|()| {
            run_command(command, &root.test_path(), timeout, StderrPolicy::Ignore)
                .map(|_| ())
                .map_err(TestStageError::from)
        })
        .err();

    TestOutcome {
        command: command.to_string(),
        error,
    }
}

fn relocate(
    root: &WorkingRoot,
    bundler: &DependencyReference,
    dependency: &DependencyReference,
) -> Result<(), TestStageError> {
    let test_path = root.test_path();
    let relocate_failed = |path: &Path, e: io::Error| TestStageError::Relocate {
        path: path.display().to_string(),
        reason: e.to_string(),
    };

    remove_existing(&test_path).map_err(|e| relocate_failed(&test_path, e))?;
    fs::rename(root.install_location(dependency), &test_path)
        .map_err(|e| relocate_failed(&test_path, e))?;

    let modules = test_path.join("node_modules");
    let link = modules.join(bundler.local_name());
    fs::create_dir_all(&modules).map_err(|e| relocate_failed(&modules, e))?;
    remove_existing(&link).map_err(|e| relocate_failed(&link, e))?;
    link_dir(&root.install_location(bundler), &link).map_err(|e| relocate_failed(&link, e))?;

    Ok(())
}

/// Remove a file, symlink or directory tree if present
fn remove_existing(path: &Path) -> io::Result<()> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(path),
        Ok(_) => fs::remove_file(path),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

#[cfg(unix)]
fn link_dir(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn link_dir(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_dir(target, link)
}

#[cfg(all(test, unix))]
#[allow(clippy::expect_used)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::error::CommandError;
    use crate::reference::{ReferenceRole, resolve};

    struct Fixture {
        _temp: TempDir,
        root: WorkingRoot,
        bundler: DependencyReference,
        dependency: DependencyReference,
    }

    fn installed_pair() -> Fixture {
        let temp = TempDir::new().expect("temp dir");
        let root = WorkingRoot::new(temp.path()).expect("root");
        let bundler = resolve(Some("4.1.0"), ReferenceRole::Bundler).expect("bundler");
        let dependency =
            resolve(Some("css-loader@1.0.0"), ReferenceRole::Dependency).expect("dependency");

        let bundler_dir = root.install_location(&bundler);
        fs::create_dir_all(bundler_dir.join("bin")).expect("bundler dir");
        fs::write(bundler_dir.join("bin").join("webpack.js"), "").expect("bundler bin");

        let dependency_dir = root.install_location(&dependency);
        fs::create_dir_all(&dependency_dir).expect("dependency dir");
        fs::write(dependency_dir.join("package.json"), "{}").expect("manifest");

        Fixture {
            _temp: temp,
            root,
            bundler,
            dependency,
        }
    }

    #[test]
    fn test_relocates_and_links_bundler() {
        let fixture = installed_pair();
        fs::write(
            fixture.root.install_location(&fixture.dependency).join("test.sh"),
            "echo 'lots of progress' >&2\ntest -f node_modules/webpack/bin/webpack.js\n",
        )
        .expect("write test script");

        let outcome = run_dependency_tests(
            &fixture.root,
            &fixture.bundler,
            &fixture.dependency,
            "sh test.sh",
            Duration::from_secs(5),
        );

        assert!(outcome.passed(), "{:?}", outcome.error);
        assert_eq!(outcome.command, "sh test.sh");
        assert!(!fixture.root.install_location(&fixture.dependency).exists());
        assert!(fixture.root.test_path().join("package.json").is_file());
    }

    #[test]
    fn test_failing_suite_is_reported() {
        let fixture = installed_pair();
        fs::write(
            fixture.root.install_location(&fixture.dependency).join("test.sh"),
            "exit 1\n",
        )
        .expect("write test script");

        let outcome = run_dependency_tests(
            &fixture.root,
            &fixture.bundler,
            &fixture.dependency,
            "sh test.sh",
            Duration::from_secs(5),
        );

        assert!(matches!(
            outcome.error,
            Some(TestStageError::Command(CommandError::Failed { code: Some(1), .. }))
        ));
    }

    #[test]
    fn test_replaces_previous_test_directory() {
        let fixture = installed_pair();
        let stale = fixture.root.test_path().join("stale.txt");
        fs::create_dir_all(fixture.root.test_path()).expect("test dir");
        fs::write(&stale, "").expect("stale file");
        fs::write(
            fixture.root.install_location(&fixture.dependency).join("test.sh"),
            "exit 0\n",
        )
        .expect("write test script");

        let outcome = run_dependency_tests(
            &fixture.root,
            &fixture.bundler,
            &fixture.dependency,
            "sh test.sh",
            Duration::from_secs(5),
        );

        assert!(outcome.passed());
        assert!(!stale.exists());
    }

    #[test]
    fn test_missing_dependency_fails_relocation() {
        let fixture = installed_pair();
        fs::remove_dir_all(fixture.root.install_location(&fixture.dependency)).expect("remove");

        let outcome = run_dependency_tests(
            &fixture.root,
            &fixture.bundler,
            &fixture.dependency,
            "sh test.sh",
            Duration::from_secs(5),
        );

        assert!(matches!(outcome.error, Some(TestStageError::Relocate { .. })));
    }
}
