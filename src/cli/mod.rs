//! CLI definitions.

pub mod commands;

use std::path::PathBuf;

use clap::Parser;

pub use commands::Commands;

#[derive(Parser, Debug)]
#[command(name = "ef", version, about = "Find the right people in your org directory")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file (default: <root>/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the directory database (default: <root>/directory.db)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Machine-readable JSON output
    #[arg(long, global = true)]
    pub robot: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all logging
    #[arg(short, long, global = true)]
    pub quiet: bool,
}
