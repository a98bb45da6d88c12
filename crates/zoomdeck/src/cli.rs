use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::app::ViewerOptions;
use crate::config::{Config, StartMode};

#[derive(Parser)]
#[command(name = "zoomdeck")]
#[command(author, version, about)]
#[command(long_about = "A zoomable markdown presentation canvas.\n\n\
    Slides are separated by `---` lines and laid out on a 2D canvas you can\n\
    zoom and pan. Headings form an outline overview.\n\n\
    Examples:\n  \
    zoomdeck                        Present the built-in sample deck\n  \
    zoomdeck talk.md                Present a file (fullscreen)\n  \
    zoomdeck talk.md --windowed     Present in a window\n  \
    zoomdeck outline talk.md        Print slides and outline")]
#[command(propagate_version = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Markdown file to present (defaults to the built-in sample)
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Launch in a window instead of fullscreen
    #[arg(long, global = false)]
    pub windowed: bool,

    /// Start on a specific slide (1-indexed)
    #[arg(long, global = false)]
    pub slide: Option<usize>,

    /// Start in outline overview mode
    #[arg(long, global = false)]
    pub overview: bool,

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
    /// Print the slides and heading outline of a file
    Outline {
        /// Markdown file to inspect
        file: PathBuf,
    },

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
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Display current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g. defaults.theme, defaults.start_mode, defaults.animation_ms)
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
    /// `tracing` filter directive for the verbosity flags.
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

    /// Combine the presentation flags with the config file; flags win.
    pub fn viewer_options(&self, config: &Config) -> ViewerOptions {
        let start = if self.overview {
            StartMode::Overview
        } else if let Some(n) = self.slide {
            StartMode::Slide(n)
        } else {
            config.start_mode()
        };
        ViewerOptions {
            windowed: self.windowed || config.windowed(),
            start,
            theme: config.theme().to_string(),
            animation_ms: config
                .animation_ms()
                .map(|ms| ms as f32)
                .unwrap_or(crate::animator::DEFAULT_DURATION_MS),
        }
    }

    pub fn run(self) -> anyhow::Result<()> {
        if self.no_color {
            colored::control::set_override(false);
        }
        match self.command {
            Some(Commands::Outline { ref file }) => crate::commands::outline::run(file),
            Some(Commands::Config { command }) => crate::commands::config::run(command),
            Some(Commands::Completion { shell }) => {
                crate::commands::completion::run(shell);
                Ok(())
            }
            None => {
                if let Some(file) = &self.file {
                    if !file.exists() {
                        anyhow::bail!("File not found: {}", file.display());
                    }
                }
                let options = self.viewer_options(&Config::load_or_default());
                crate::app::run(self.file, options)
            }
        }
    }
}
