//! Output classification
//!
//! Bundlers give no machine-readable signal when a watch-mode or dev-server
//! build is done, so each stdout chunk is matched against a small table of
//! phrases. The table is per bundler version range; see
//! [`BundlerProfile`](crate::bundler::BundlerProfile).

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)https?://[-a-z0-9@:%._+~#=]{2,256}\b[-a-z0-9@:%_+.~#?&/=]*")
        .expect("URL pattern is valid")
});

/// What a stdout chunk tells us about the run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkVerdict {
    /// The chunk mentions an error; the run failed
    Error,
    /// A build-succeeded sentinel was printed
    Success,
    /// The example is serving on a loopback URL that should be opened
    LocalUrl(String),
    /// Size/timing stats and other chatter
    Info,
}

/// Phrases used to classify bundler output
///
/// Keys left out of a configured table keep their default values.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputPatterns {
    /// Case-insensitive substring that marks a failed build
    pub error_marker: String,
    /// Substrings that mark a finished, successful build
    pub success_sentinels: Vec<String>,
    /// Hostnames whose URLs are opened when they show up in output
    pub local_hosts: Vec<String>,
}

impl Default for OutputPatterns {
    fn default() -> Self {
        Self {
            error_marker: "error".to_string(),
            success_sentinels: vec![
                "webpack: bundle is now VALID".to_string(),
                "webpack: Compiled successfully".to_string(),
            ],
            local_hosts: vec!["localhost".to_string(), "127.0.0.1".to_string()],
        }
    }
}

impl OutputPatterns {
    /// Classify one chunk of stdout, checking error before success
    pub fn classify(&self, chunk: &str) -> ChunkVerdict {
        if chunk
            .to_lowercase()
            .contains(&self.error_marker.to_lowercase())
        {
            return ChunkVerdict::Error;
        }

        if self.contains_success_sentinel(chunk) {
            return ChunkVerdict::Success;
        }

        match self.local_url(chunk) {
            Some(url) => ChunkVerdict::LocalUrl(url),
            None => ChunkVerdict::Info,
        }
    }

    pub fn contains_success_sentinel(&self, chunk: &str) -> bool {
        self.success_sentinels
            .iter()
            .any(|sentinel| chunk.contains(sentinel.as_str()))
    }

    /// First URL in the chunk, if its host is one of the loopback hosts
    pub fn local_url(&self, chunk: &str) -> Option<String> {
        let found = URL_PATTERN.find(chunk)?.as_str();
        let host = url_hostname(found)?;

        self.local_hosts
            .iter()
            .any(|local| local.eq_ignore_ascii_case(&host))
            .then(|| found.to_string())
    }
}

/// Extract the hostname from an `http(s)://` URL, without userinfo or port
fn url_hostname(url: &str) -> Option<String> {
    let after_scheme = &url[url.find("://")? + "://".len()..];
    let authority = after_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or(after_scheme);
    let host_port = authority.rsplit('@').next().unwrap_or(authority);
    let host = host_port.split(':').next().unwrap_or(host_port);

    if host.is_empty() {
        None
    } else {
        Some(host.to_lowercase())
    }
}
