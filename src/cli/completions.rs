use clap::Parser;
use clap_complete::Shell;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    canary completions bash > ~/.bash_completion.d/canary\n\n\
                  Generate zsh completions:\n    canary completions zsh > ~/.zfunc/_canary\n\n\
                  Generate fish completions:\n    canary completions fish > ~/.config/fish/completions/canary.fish")]
pub struct CompletionsArgs {
    /// Shell type
    #[arg(value_enum, ignore_case = true)]
    pub shell: Shell,
}
