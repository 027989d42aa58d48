//! Working root for installs
//!
//! All packages are installed into one directory that Canary owns. It holds a
//! minimal `package.json` so the package manager never walks up and installs
//! into an ancestor project. Layout:
//!
//! ```text
//! <root>/
//!   package.json
//!   node_modules/<bundler>
//!   node_modules/<dependency>
//!   test-dependency/        dependency moved here for its own tests
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;

use crate::error::{CanaryError, InstallError, Result};
use crate::reference::DependencyReference;

/// Name of the working root under the platform cache directory
pub const ROOT_DIR: &str = "test_modules";

const APP_DIR: &str = "canary";
const MANIFEST: &str = "package.json";
const MODULES_DIR: &str = "node_modules";
const TEST_DIR: &str = "test-dependency";

/// The directory packages are installed into
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingRoot {
    path: PathBuf,
}

impl WorkingRoot {
    /// Use `path` as the root; relative paths are resolved against the
    /// current directory
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = std::path::absolute(path.as_ref())?;
        Ok(Self { path })
    }

    /// The platform cache location, e.g. `~/.cache/canary/test_modules`
    pub fn default_location() -> Result<Self> {
        let base = dirs::cache_dir().ok_or(CanaryError::RootUnavailable)?;
        Self::new(base.join(APP_DIR).join(ROOT_DIR))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where the package manager puts installed packages
    pub fn modules(&self) -> PathBuf {
        self.path.join(MODULES_DIR)
    }

    /// Installed location of `reference`
    pub fn install_location(&self, reference: &DependencyReference) -> PathBuf {
        self.modules().join(reference.local_name())
    }

    /// Directory the dependency is moved to before its own tests run
    pub fn test_path(&self) -> PathBuf {
        self.path.join(TEST_DIR)
    }

    /// Create the root and its manifest if missing
    ///
    /// An existing manifest is left untouched so a previous install's
    /// `dependencies` entries survive.
    pub fn prepare(&self) -> std::result::Result<(), InstallError> {
        let prepare_failed = |e: std::io::Error| InstallError::Prepare {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        };

        fs::create_dir_all(&self.path).map_err(prepare_failed)?;

        let manifest = self.path.join(MANIFEST);
        if !manifest.is_file() {
            let contents = json!({
                "name": "canary-test-modules",
                "version": "0.0.0",
                "private": true,
                "description": "Packages installed by canary",
            });
            let text = serde_json::to_string_pretty(&contents).map_err(|e| InstallError::Prepare {
                path: manifest.display().to_string(),
                reason: e.to_string(),
            })?;
            fs::write(&manifest, format!("{text}\n")).map_err(prepare_failed)?;
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::reference::{ReferenceRole, resolve};

    #[test]
    fn test_layout() {
        let temp = TempDir::new().expect("temp dir");
        let root = WorkingRoot::new(temp.path()).expect("root");

        assert_eq!(root.modules(), temp.path().join("node_modules"));
        assert_eq!(root.test_path(), temp.path().join("test-dependency"));

        let dependency =
            resolve(Some("webpack-contrib/css-loader#master"), ReferenceRole::Dependency)
                .expect("valid reference");
        assert_eq!(
            root.install_location(&dependency),
            temp.path().join("node_modules").join("css-loader")
        );
    }

    #[test]
    fn test_relative_root_is_made_absolute() {
        let root = WorkingRoot::new("test_modules").expect("root");
        assert!(root.path().is_absolute());
        assert!(root.path().ends_with("test_modules"));
    }

    #[test]
    fn test_prepare_writes_manifest() {
        let temp = TempDir::new().expect("temp dir");
        let root = WorkingRoot::new(temp.path().join("nested").join("root")).expect("root");

        root.prepare().expect("prepare");

        let manifest = fs::read_to_string(root.path().join("package.json")).expect("manifest");
        let value: serde_json::Value = serde_json::from_str(&manifest).expect("valid json");
        assert_eq!(value["private"], true);
    }

    #[test]
    fn test_prepare_keeps_existing_manifest() {
        let temp = TempDir::new().expect("temp dir");
        let root = WorkingRoot::new(temp.path()).expect("root");
        fs::write(temp.path().join("package.json"), "{\"name\":\"mine\"}").expect("write");

        root.prepare().expect("prepare");

        let manifest = fs::read_to_string(temp.path().join("package.json")).expect("manifest");
        assert_eq!(manifest, "{\"name\":\"mine\"}");
    }

    #[test]
    fn test_prepare_fails_when_root_is_a_file() {
        let temp = TempDir::new().expect("temp dir");
        let file = temp.path().join("occupied");
        fs::write(&file, "").expect("write");

        let err = WorkingRoot::new(&file).expect("root").prepare().expect_err("not a dir");
        assert!(matches!(err, InstallError::Prepare { .. }));
    }
}
