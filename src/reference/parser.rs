//! Reference string parsing utilities
//!
//! Splits the URL-shaped and `name@version` forms into their pieces. Nothing
//! here touches the network or the filesystem.

/// Check if the input names a repository rather than a registry package
///
/// A leading `@` marks a scoped package name, where the `/` separates scope
/// from package rather than owner from repository.
pub fn is_repository_string(input: &str) -> bool {
    !input.starts_with('@') && input.contains('/')
}

/// Split off a `#fragment`, returning (main part, optional branch)
///
/// An empty fragment (`owner/repo#`) yields no branch.
pub fn split_fragment(input: &str) -> (&str, Option<&str>) {
    match input.find('#') {
        Some(hash_pos) => {
            let fragment = &input[hash_pos + 1..];
            let branch = if fragment.is_empty() {
                None
            } else {
                Some(fragment)
            };
            (&input[..hash_pos], branch)
        }
        None => (input, None),
    }
}

/// Split `scheme://host/path` into (`scheme://host`, `/path`)
///
/// Inputs without a scheme have no origin and are all path.
pub fn split_origin(main_part: &str) -> (Option<&str>, &str) {
    let Some(scheme_end) = main_part.find("://") else {
        return (None, main_part);
    };

    let after_scheme = scheme_end + "://".len();
    match main_part[after_scheme..].find('/') {
        Some(path_start) => {
            let split_at = after_scheme + path_start;
            (Some(&main_part[..split_at]), &main_part[split_at..])
        }
        None => (Some(main_part), ""),
    }
}

/// Pieces of a repository reference path
#[derive(Debug, PartialEq, Eq)]
pub struct RepositoryPath<'a> {
    pub owner: &'a str,
    pub name: &'a str,
    pub suffix: Option<String>,
}

/// Split a repository path into owner, name and sub-path
///
/// Returns `None` when the owner or name segment is missing.
pub fn split_repository_path(path: &str) -> Option<RepositoryPath<'_>> {
    let path = path.strip_prefix('/').unwrap_or(path);
    let mut segments = path.split('/');

    let owner = segments.next().filter(|s| !s.is_empty())?;
    let name = segments.next().filter(|s| !s.is_empty())?;
    let suffix = segments.collect::<Vec<_>>().join("/");

    Some(RepositoryPath {
        owner,
        name,
        suffix: if suffix.is_empty() { None } else { Some(suffix) },
    })
}

/// Split `name@version` on the last unescaped `@`
///
/// An `@` at position 0 starts a scoped name and is never a separator, nor is
/// one escaped as `\@`.
pub fn split_version(input: &str) -> (&str, Option<&str>) {
    input
        .match_indices('@')
        .rev()
        .find(|(pos, _)| *pos > 0 && !input[..*pos].ends_with('\\'))
        .map_or((input, None), |(pos, _)| {
            (&input[..pos], Some(&input[pos + 1..]))
        })
}

/// Normalize a version string the way npm's `semver.clean` does
///
/// Surrounding whitespace and any leading `=`/`v` markers are dropped, and the
/// rest must be a complete semantic version.
pub fn clean_version(raw: &str) -> Option<semver::Version> {
    let trimmed = raw.trim().trim_start_matches(['=', 'v']);
    semver::Version::parse(trimmed).ok()
}
