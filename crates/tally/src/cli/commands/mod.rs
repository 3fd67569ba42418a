//! Command implementations and dispatch.

pub mod config;
pub mod explain;
pub mod search;

use std::process::ExitCode;

use super::{args::Commands, context::CommandContext};

/// Dispatches to the selected subcommand.
pub fn run(command: Commands, ctx: &CommandContext, verbose: u8) -> ExitCode {
    match command {
        Commands::Search(cmd) => search::run(ctx, &cmd, verbose),
        Commands::Explain(cmd) => explain::run(ctx, &cmd),
        Commands::Config => config::run(ctx),
    }
}
