//! Command-line interface for `tally`.

use std::{io, process::ExitCode};

use tally::cli::{args::parse_cli, commands, context::CommandContext};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = parse_cli();
    init_logging(cli.verbose);

    let ctx = match CommandContext::load() {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    commands::run(cli.command, &ctx, cli.verbose)
}

/// Installs the stderr log subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `-v` selects debug and `-vv` trace.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
