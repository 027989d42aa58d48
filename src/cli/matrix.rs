use clap::Parser;
use std::path::PathBuf;

use crate::config::DEFAULT_CONFIG_FILE;

/// Arguments for matrix command
#[derive(Parser, Debug)]
#[command(after_help = "CONFIG:\n  \
                  matrix:\n    \
                  - bundler: 4.1.0\n      \
                  dependencies:\n        \
                  - dependency: css-loader@1.0.0\n        \
                  - dependency: webpack/webpack-dev-server#master\n          \
                  test: npm test")]
pub struct MatrixArgs {
    /// Matrix config file
    #[arg(long, short = 'c', value_name = "FILE", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,
}
