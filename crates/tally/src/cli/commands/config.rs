//! Implementation of `tally config`.

use std::process::ExitCode;

use tally_config::discover_config_files;

use crate::cli::context::CommandContext;

/// Shows effective configuration settings as TOML.
///
/// The contributing files and the directory of the most specific one are listed first as
/// TOML comments, so the output is itself a valid config file.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let toml = match ctx.config.settings_to_toml() {
        Ok(toml) => toml,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let files = discover_config_files(&ctx.cwd);
    if files.is_empty() {
        println!("# no config files found, showing defaults");
    } else {
        println!("# config files (highest precedence first):");
        for path in &files {
            println!("#   {}", path.display());
        }
    }
    if let Some(root) = &ctx.config.config_root {
        println!("# config root: {}", root.display());
    }
    println!();
    print!("{toml}");

    ExitCode::SUCCESS
}
