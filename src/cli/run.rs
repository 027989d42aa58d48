use clap::Parser;

use crate::installer::PackageManager;

/// Arguments for run command
#[derive(Parser, Debug)]
#[command(after_help = "REFERENCES:\n  \
                  name, name@1.2.3, @scope/name@1.2.3\n  \
                  owner/repo, owner/repo#branch\n  \
                  https://host/owner/repo/sub/path#branch\n\n\
                  A bare version such as 4.1.0 is accepted for --bundler.")]
pub struct RunArgs {
    /// Bundler version or reference
    #[arg(long, short = 'b', alias = "webpack", value_name = "REF")]
    pub bundler: String,

    /// Dependency reference
    #[arg(long, short = 'd', value_name = "REF")]
    pub dependency: String,

    /// Package manager used for installs
    #[arg(long, short = 'p', value_enum, default_value_t = PackageManager::Npm)]
    pub package_manager: PackageManager,

    /// Folder searched for examples (repeatable; default: examples, example)
    #[arg(long = "example-dir", value_name = "DIR", conflicts_with = "no_examples")]
    pub example_dirs: Vec<String>,

    /// Skip example discovery
    #[arg(long)]
    pub no_examples: bool,

    /// Time each example gets to build, in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 10_000)]
    pub timeout: u64,

    /// Time each package manager or test command gets, in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 60_000)]
    pub install_timeout: u64,

    /// Command that runs the dependency's own tests after the examples
    #[arg(long, value_name = "COMMAND")]
    pub test: Option<String>,

    /// Command that opens loopback URLs printed by examples (URL is appended)
    #[arg(long, value_name = "COMMAND")]
    pub open_url_command: Option<String>,
}
