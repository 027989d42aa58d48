//! Example discovery
//!
//! Finds bundler config files under the conventional example folders of an
//! installed dependency. Each candidate folder is searched on its own thread;
//! results are concatenated in candidate order, each folder's matches sorted
//! by path so runs are reproducible.
//!
//! Symlinked directories are not descended into, so a linked `node_modules`
//! pointing back at the package cannot loop. Entries that cannot be read are
//! skipped and logged at debug level.

use std::path::{Path, PathBuf};
use std::thread;

use walkdir::{DirEntry, WalkDir};
use wax::{CandidatePath, Glob, Pattern};

use crate::error::{CanaryError, Result};
use crate::orchestrator::ExampleEntry;
use crate::ui::Logger;

/// Folders searched when none are configured, in order
pub const DEFAULT_EXAMPLE_DIRS: &[&str] = &["examples", "example"];

/// Default candidate folders as owned strings
pub fn default_example_dirs() -> Vec<String> {
    DEFAULT_EXAMPLE_DIRS.iter().map(ToString::to_string).collect()
}

/// Find every example of the dependency installed as `local_name`
///
/// `modules` is the `node_modules` directory the dependency was installed
/// into. A candidate folder that does not exist contributes nothing.
pub fn discover(
    modules: &Path,
    local_name: &str,
    candidate_dirs: &[String],
    config_filename: &str,
    logger: &Logger,
) -> Result<Vec<ExampleEntry>> {
    let pattern = format!("**/{config_filename}");
    let package_dir = modules.join(local_name);

    let per_dir: Vec<Result<Search>> = thread::scope(|scope| {
        let searches: Vec<_> = candidate_dirs
            .iter()
            .map(|dir| {
                let search_root = package_dir.join(dir);
                let pattern = pattern.as_str();
                (
                    search_root.clone(),
                    scope.spawn(move || search(&search_root, pattern)),
                )
            })
            .collect();

        searches
            .into_iter()
            .map(|(search_root, handle)| {
                handle.join().unwrap_or_else(|_| {
                    Err(CanaryError::DiscoveryFailed {
                        path: search_root.display().to_string(),
                        reason: "search thread panicked".to_string(),
                    })
                })
            })
            .collect()
    });

    let mut entries = Vec::new();
    for found in per_dir {
        let found = found?;
        for skipped in &found.skipped {
            logger.debug(format_args!("Skipped while searching for examples: {skipped}"));
        }
        entries.extend(found.entries);
    }
    Ok(entries)
}

/// Matches under one candidate folder and the entries that could not be read
#[derive(Debug, Default)]
struct Search {
    entries: Vec<ExampleEntry>,
    skipped: Vec<String>,
}

/// Config files under one candidate folder, sorted by path
fn search(search_root: &Path, pattern: &str) -> Result<Search> {
    if !search_root.is_dir() {
        return Ok(Search::default());
    }

    let glob = Glob::new(pattern).map_err(|e| CanaryError::DiscoveryFailed {
        path: pattern.to_string(),
        reason: e.to_string(),
    })?;

    let mut found = Search::default();
    let walker = WalkDir::new(search_root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                found.skipped.push(err.to_string());
                continue;
            }
        };
        if !is_config_file(&entry) {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(search_root)
            .unwrap_or(entry.path());
        let relative = forward_slashes(relative);
        if glob.matched(&CandidatePath::from(relative.as_str())).is_none() {
            continue;
        }

        found.entries.push(ExampleEntry::new(
            example_name(&relative),
            PathBuf::from(entry.path()),
        ));
    }

    Ok(found)
}

/// A regular file, or a symlink that resolves to one
fn is_config_file(entry: &DirEntry) -> bool {
    let file_type = entry.file_type();
    file_type.is_file() || (file_type.is_symlink() && entry.path().is_file())
}

/// Folder of the match relative to the candidate folder, `None` at its root
fn example_name(relative_config: &str) -> Option<String> {
    relative_config
        .rsplit_once('/')
        .map(|(dir, _)| dir.to_string())
        .filter(|dir| !dir.is_empty())
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

fn forward_slashes(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
