//! CLI command implementations.
//!
//! Each subcommand has its own module with an Args struct and a run()
//! function.

use clap::Subcommand;

pub mod ask;
pub mod seed;
pub mod stats;

use crate::app::AppContext;
use crate::error::Result;

pub fn run(ctx: &AppContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Ask(args) => ask::run(ctx, args),
        Commands::Seed(args) => seed::run(ctx, args),
        Commands::Stats(args) => stats::run(ctx, args),
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ask who can help with something
    Ask(ask::AskArgs),
    /// Load a small demo directory for trying out queries
    Seed(seed::SeedArgs),
    /// Show directory row counts
    Stats(stats::StatsArgs),
}
