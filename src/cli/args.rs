//! CLI argument parsing using clap

use crate::config::{CONFIG_FILE, ColorOption};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for rewire commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON Lines format (one JSON object per line)
    Jsonl,
}

impl From<crate::config::OutputFormat> for OutputFormat {
    fn from(format: crate::config::OutputFormat) -> Self {
        match format {
            crate::config::OutputFormat::Human => OutputFormat::Human,
            crate::config::OutputFormat::Jsonl => OutputFormat::Jsonl,
        }
    }
}

/// Color output choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Automatically detect if terminal supports color
    Auto,
    /// Always use color
    Always,
    /// Never use color
    Never,
}

impl From<ColorOption> for ColorChoice {
    fn from(color: ColorOption) -> Self {
        match color {
            ColorOption::Auto => ColorChoice::Auto,
            ColorOption::Always => ColorChoice::Always,
            ColorOption::Never => ColorChoice::Never,
        }
    }
}

/// Rewire CLI main entry point
#[derive(Parser, Debug)]
#[command(name = "rewire")]
#[command(about = "Rewrite import paths and call sites across a source tree")]
#[command(version)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Output coloring (overrides the configuration file)
    #[arg(long, global = true)]
    pub color: Option<ColorChoice>,

    /// Log every file and list unchanged files
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Arguments shared by commands that run a migration
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct RunArgs {
    /// Configuration file
    #[arg(short, long, default_value = CONFIG_FILE)]
    pub config: PathBuf,

    /// Directory to migrate (overrides `root` in the configuration file)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Output format (overrides the configuration file)
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Worker threads; 1 processes files sequentially, 0 uses every core
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,
}

/// Available rewire subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Rewrite matching files in place
    Apply(RunArgs),

    /// Report files that would change without writing them
    Check(RunArgs),

    /// Create a starter configuration file
    Init {
        /// Where to write the configuration
        #[arg(short, long, default_value = CONFIG_FILE)]
        config: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// List compiled rules in application order
    List {
        /// Configuration file
        #[arg(short, long, default_value = CONFIG_FILE)]
        config: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "human")]
        format: OutputFormat,
    },
}
