use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "deckhand")]
#[command(author, version, about)]
#[command(long_about = "A slide presentation controller.\n\n\
    Step through a deck with the keyboard, touch swipes or the edge arrows.\n\n\
    Examples:\n  \
    deckhand                     Present the built-in deck (fullscreen)\n  \
    deckhand talk.yaml           Present a deck file\n  \
    deckhand --windowed          Launch in a window\n  \
    deckhand config show         Print the current configuration")]
#[command(propagate_version = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// YAML deck file to present (defaults to the built-in deck)
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Launch in a window instead of fullscreen
    #[arg(long, global = false)]
    pub windowed: bool,

    /// Number of slides in the built-in deck
    #[arg(
        long,
        global = false,
        default_value_t = 12,
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    pub slides: u16,

    /// Do not show the onboarding hint
    #[arg(long, global = false)]
    pub no_hint: bool,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// View and modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Display current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g. defaults.theme, defaults.windowed, defaults.hint)
        key: String,

        /// Value to set
        value: String,
    },
}

#[derive(Clone, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

impl Cli {
    /// Log filter implied by `-v`/`-q`, used when `RUST_LOG` is not set.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "warn";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }

    pub fn run(self) -> anyhow::Result<()> {
        match self.command {
            Some(Commands::Config { command }) => crate::commands::config::run(command),
            Some(Commands::Completion { shell }) => {
                crate::commands::completion::run(shell);
                Ok(())
            }
            Some(Commands::Version) => {
                crate::commands::version::run();
                Ok(())
            }
            None => {
                if let Some(file) = &self.file {
                    if !file.exists() {
                        anyhow::bail!("File not found: {}", file.display());
                    }
                }
                crate::app::run(crate::app::Launch {
                    file: self.file,
                    slides: usize::from(self.slides),
                    windowed: self.windowed,
                    hint: !self.no_hint,
                })
            }
        }
    }
}
