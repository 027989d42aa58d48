//! Dependency references
//!
//! This module turns the free-form strings an operator passes on the command
//! line into [`DependencyReference`] values. Supported formats:
//!
//! - `name` / `name@1.2.3` / `@scope/name@1.2.3` - registry package
//! - `owner/name` / `owner/name#branch` - repository shorthand
//! - `scheme://host/owner/name[/subpath][#branch]` - full remote URL
//!
//! For the bundler itself a bare version (`4.1.0`) is accepted as shorthand
//! for `<bundler>@4.1.0`.

pub mod parser;

use std::fmt;

use crate::bundler::BUNDLER_PACKAGE;

/// Which side of a pair a reference names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceRole {
    /// The bundler; bare versions resolve to the bundler package
    Bundler,
    /// The plugin or loader under test
    Dependency,
}

impl fmt::Display for ReferenceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceRole::Bundler => write!(f, "Bundler version"),
            ReferenceRole::Dependency => write!(f, "Dependency"),
        }
    }
}

/// Where an artifact is fetched from
#[allow(dead_code)] // used in tests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Registry,
    Repository,
    Unknown,
}

/// Source details, carrying only the fields meaningful for each kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Package registry, optionally pinned to a normalized version
    Registry { version: Option<semver::Version> },
    /// Remote repository
    Repository {
        /// Owner segment, preceded by `scheme://host` for full URLs
        prefix: String,
        branch: Option<String>,
        /// Sub-path inside the repository, e.g. a monorepo package
        suffix: Option<String>,
    },
    #[allow(dead_code)] // used in tests
    Unknown,
}

/// One installable artifact, resolved from a reference string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyReference {
    name: String,
    source: Source,
}

impl DependencyReference {
    /// Create a registry reference
    pub fn registry(name: impl Into<String>, version: Option<semver::Version>) -> Self {
        Self {
            name: name.into(),
            source: Source::Registry { version },
        }
    }

    /// Create a repository reference
    pub fn repository(
        prefix: impl Into<String>,
        name: impl Into<String>,
        branch: Option<String>,
        suffix: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            source: Source::Repository {
                prefix: prefix.into(),
                branch,
                suffix,
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[allow(dead_code)] // used in tests
    pub fn source(&self) -> &Source {
        &self.source
    }

    #[allow(dead_code)] // used in tests
    pub fn source_kind(&self) -> SourceKind {
        match self.source {
            Source::Registry { .. } => SourceKind::Registry,
            Source::Repository { .. } => SourceKind::Repository,
            Source::Unknown => SourceKind::Unknown,
        }
    }

    #[allow(dead_code)] // used in tests
    pub fn version(&self) -> Option<&semver::Version> {
        match &self.source {
            Source::Registry { version } => version.as_ref(),
            _ => None,
        }
    }

    #[allow(dead_code)] // used in tests
    pub fn branch(&self) -> Option<&str> {
        match &self.source {
            Source::Repository { branch, .. } => branch.as_deref(),
            _ => None,
        }
    }

    #[allow(dead_code)] // used in tests
    pub fn prefix(&self) -> Option<&str> {
        match &self.source {
            Source::Repository { prefix, .. } => Some(prefix),
            _ => None,
        }
    }

    #[allow(dead_code)] // used in tests
    pub fn suffix(&self) -> Option<&str> {
        match &self.source {
            Source::Repository { suffix, .. } => suffix.as_deref(),
            _ => None,
        }
    }

    /// The exact string handed to the package manager
    ///
    /// Registry references render as `name@version`, repository references as
    /// `prefix/name#branch/suffix`, each optional piece omitted when absent.
    pub fn install_specifier(&self) -> String {
        match &self.source {
            Source::Registry { version: Some(version) } => format!("{}@{version}", self.name),
            Source::Registry { version: None } | Source::Unknown => self.name.clone(),
            Source::Repository {
                prefix,
                branch,
                suffix,
            } => {
                let mut specifier = format!("{prefix}/{}", self.name);
                if let Some(branch) = branch {
                    specifier.push('#');
                    specifier.push_str(branch);
                }
                if let Some(suffix) = suffix {
                    specifier.push('/');
                    specifier.push_str(suffix);
                }
                specifier
            }
        }
    }

    /// The directory name the artifact is installed under
    pub fn local_name(&self) -> &str {
        &self.name
    }

    /// Whether this reference names the bundler package itself
    pub fn is_package(&self, package: &str) -> bool {
        self.name == package
    }
}

impl fmt::Display for DependencyReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.install_specifier())
    }
}

/// Resolve a reference string into a [`DependencyReference`]
///
/// Returns `None` for missing or empty input, for a repository reference
/// without an owner or name segment, and for a registry reference whose
/// version is present but not a valid semantic version.
pub fn resolve(input: Option<&str>, role: ReferenceRole) -> Option<DependencyReference> {
    let input = input.map(str::trim).filter(|s| !s.is_empty())?;

    if parser::is_repository_string(input) {
        return resolve_repository(input);
    }

    resolve_registry(input, role)
}

fn resolve_repository(input: &str) -> Option<DependencyReference> {
    let (main_part, branch) = parser::split_fragment(input);
    let (origin, path) = parser::split_origin(main_part);
    let pieces = parser::split_repository_path(path)?;

    let prefix = match origin {
        Some(origin) => format!("{origin}/{}", pieces.owner),
        None => pieces.owner.to_string(),
    };

    Some(DependencyReference::repository(
        prefix,
        pieces.name,
        branch.map(str::to_string),
        pieces.suffix,
    ))
}

fn resolve_registry(input: &str, role: ReferenceRole) -> Option<DependencyReference> {
    let (name, raw_version) = parser::split_version(input);
    if name.is_empty() {
        return None;
    }

    if let Some(raw_version) = raw_version {
        let version = parser::clean_version(raw_version)?;
        return Some(DependencyReference::registry(name, Some(version)));
    }

    if role == ReferenceRole::Bundler && name != BUNDLER_PACKAGE {
        if let Some(version) = parser::clean_version(name) {
            return Some(DependencyReference::registry(BUNDLER_PACKAGE, Some(version)));
        }
    }

    Some(DependencyReference::registry(name, None))
}
