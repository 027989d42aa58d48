//! Matrix configuration
//!
//! A `canary.yaml` lists bundler versions and, for each, the dependencies to
//! check against it:
//!
//! ```yaml
//! package_manager: yarn
//! matrix:
//!   - bundler: 4.1.0
//!     dependencies:
//!       - dependency: webpack-contrib/css-loader#master
//!         test: npm test
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Deserializer};

use crate::error::{CanaryError, Result};
use crate::installer::{DEFAULT_INSTALL_TIMEOUT, PackageManager};
use crate::runner::DEFAULT_EXAMPLE_TIMEOUT;
use crate::runner::patterns::OutputPatterns;
use crate::ui::LogLevel;

/// Config file looked up in the current directory
pub const DEFAULT_CONFIG_FILE: &str = "canary.yaml";

/// Top-level matrix configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MatrixConfig {
    /// Package manager for pairs that do not pick one
    #[serde(default)]
    pub package_manager: PackageManager,
    pub log_level: Option<LogLevel>,
    /// Per-example timeout in milliseconds
    pub example_timeout: Option<u64>,
    /// Per-command install and test timeout in milliseconds
    pub install_timeout: Option<u64>,
    pub open_url_command: Option<String>,
    /// Output classification table for every bundler without its own
    pub output_patterns: Option<OutputPatterns>,
    pub matrix: Vec<BundlerEntry>,
}

/// One bundler version and the dependencies to check with it
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BundlerEntry {
    #[serde(deserialize_with = "reference_string")]
    pub bundler: String,
    /// Output classification table for this bundler version
    pub output_patterns: Option<OutputPatterns>,
    #[serde(default)]
    pub dependencies: Vec<DependencyEntry>,
}

/// One dependency and its per-pair overrides
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DependencyEntry {
    #[serde(deserialize_with = "reference_string")]
    pub dependency: String,
    /// Folders searched for examples; absent means the defaults, empty skips
    /// discovery
    pub example_dirs: Option<Vec<String>>,
    pub test: Option<String>,
    /// Overrides `install_timeout` for this pair, in milliseconds
    pub timeout: Option<u64>,
    pub package_manager: Option<PackageManager>,
}

impl MatrixConfig {
    /// Read and validate the config at `path`
    pub fn load(path: &Path) -> Result<Self> {
        let label = path.display().to_string();
        let yaml = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CanaryError::ConfigNotFound {
                    path: label.clone(),
                }
            } else {
                CanaryError::ConfigReadFailed {
                    path: label.clone(),
                    reason: e.to_string(),
                }
            }
        })?;
        Self::from_yaml(&yaml, &label)
    }

    /// Parse and validate config text; `label` names it in errors
    pub fn from_yaml(yaml: &str, label: &str) -> Result<Self> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| CanaryError::ConfigParseFailed {
                path: label.to_string(),
                reason: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.matrix.iter().all(|entry| entry.dependencies.is_empty()) {
            return Err(CanaryError::ConfigInvalid {
                message: "matrix has no bundler and dependency pairs".to_string(),
            });
        }

        for entry in &self.matrix {
            if entry.bundler.trim().is_empty() {
                return Err(CanaryError::ConfigInvalid {
                    message: "bundler must not be empty".to_string(),
                });
            }
            if let Some(dependency) = entry
                .dependencies
                .iter()
                .find(|d| d.dependency.trim().is_empty())
            {
                return Err(CanaryError::ConfigInvalid {
                    message: format!(
                        "dependency must not be empty (bundler '{}'{})",
                        entry.bundler,
                        dependency
                            .test
                            .as_deref()
                            .map(|t| format!(", test '{t}'"))
                            .unwrap_or_default()
                    ),
                });
            }
        }

        Ok(())
    }

    pub fn example_timeout(&self) -> Duration {
        self.example_timeout
            .map_or(DEFAULT_EXAMPLE_TIMEOUT, Duration::from_millis)
    }

    pub fn install_timeout(&self) -> Duration {
        self.install_timeout
            .map_or(DEFAULT_INSTALL_TIMEOUT, Duration::from_millis)
    }

    /// Patterns for `entry`: its own table, then the top-level one
    pub fn output_patterns_for<'a>(
        &'a self,
        entry: &'a BundlerEntry,
    ) -> Option<&'a OutputPatterns> {
        entry
            .output_patterns
            .as_ref()
            .or(self.output_patterns.as_ref())
    }
}

impl DependencyEntry {
    /// Install and test timeout for this pair
    pub fn timeout_or(&self, default: Duration) -> Duration {
        self.timeout.map_or(default, Duration::from_millis)
    }

    pub fn package_manager_or(&self, default: PackageManager) -> PackageManager {
        self.package_manager.unwrap_or(default)
    }
}

/// Accept `4.1.0`, `"4.1.0"` and bare numbers such as `4`
fn reference_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Integer(u64),
        Float(f64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Integer(n) => n.to_string(),
        Raw::Float(f) => f.to_string(),
    })
}
