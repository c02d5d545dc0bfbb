//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};

use crate::cli::commands::{
    calc::CalcArgs, completions::CompletionsArgs, config::ConfigCommands, session::SessionArgs,
};

#[derive(Parser)]
#[command(name = "bft")]
#[command(author, version, about = "Bayes Factory Toolkit")]
#[command(long_about = "Work out which factory a defective (or sound) part most likely came from, \
given each factory's share of production and its defect rate.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output (debug logging on stderr)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Calculate P(F|D) and P(F|ND) for a set of factories
    Calc(CalcArgs),

    /// Edit a factory table interactively, recalculating after every change
    Session(SessionArgs),

    /// Describe the columns of the factory table
    Columns,

    /// View and modify configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Use the configured default, falling back to tsv
    #[default]
    Auto,
    /// Aligned columns for the terminal
    Tsv,
    /// JSON report (for programming)
    Json,
    /// YAML report
    Yaml,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown table
    Md,
}
