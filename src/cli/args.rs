//! Command line argument parsing for the shardlens CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// shardlens - inspect Lucene index shards without opening them
#[derive(Parser, Debug, Clone)]
#[command(name = "shardlens")]
#[command(about = "Structural reports for on-disk Lucene index shards")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct ShardlensArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Inspector configuration file (JSON)
    #[arg(long, value_name = "CONFIG_FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl ShardlensArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Build a structural report for one or more shards
    Inspect(InspectArgs),

    /// Show which commit file is current
    Resolve(ResolveArgs),
}

/// Arguments for inspecting shards
#[derive(Parser, Debug, Clone)]
pub struct InspectArgs {
    /// Index directories (or extraction roots with --locate)
    #[arg(value_name = "INDEX_PATH", required = true, num_args = 1..)]
    pub index_paths: Vec<PathBuf>,

    /// Walk each path to find the directory holding the commit files
    #[arg(long)]
    pub locate: bool,

    /// Require header labels, codec names, ids and suffixes to match
    #[arg(long, env = "SHARDLENS_STRICT")]
    pub strict: bool,
}

/// Arguments for resolving the current commit
#[derive(Parser, Debug, Clone)]
pub struct ResolveArgs {
    /// Index directory (or extraction root with --locate)
    #[arg(value_name = "INDEX_PATH")]
    pub index_path: PathBuf,

    /// Walk the path to find the directory holding the commit files
    #[arg(long)]
    pub locate: bool,
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable format
    Human,
    /// JSON format
    Json,
}
