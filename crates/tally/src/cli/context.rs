//! Shared context for running CLI commands.

use std::{
    env,
    path::{Path, PathBuf},
    process::ExitCode,
};

use tally_config::{CONFIG_FILENAME, Config};
use tally_search::{Ledger, SearchOptions};
use tracing::debug;

/// Command execution context built once per CLI invocation.
pub struct CommandContext {
    /// Current working directory.
    pub cwd: PathBuf,
    /// Loaded configuration (may be default if no config files found).
    pub config: Config,
}

impl CommandContext {
    /// Loads the current directory and configuration.
    pub fn load() -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        let config = load_config_or_failure(&cwd)?;
        Ok(Self { cwd, config })
    }

    /// Picks the ledger file: the command-line path (relative to the working directory) if
    /// given, otherwise the configured one.
    pub fn ledger_path(&self, flag: Option<&Path>) -> Result<PathBuf, ExitCode> {
        if let Some(path) = flag {
            return Ok(self.cwd.join(path));
        }
        self.config.settings.ledger.clone().ok_or_else(|| {
            eprintln!("error: no ledger file given");
            eprintln!("Pass --ledger <PATH>, or set `ledger` under [settings] in {CONFIG_FILENAME}.");
            ExitCode::FAILURE
        })
    }

    /// Loads the ledger selected by [`Self::ledger_path`].
    pub fn load_ledger(&self, flag: Option<&Path>) -> Result<Ledger, ExitCode> {
        let path = self.ledger_path(flag)?;
        let ledger = Ledger::load(&path).map_err(|e| {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        })?;
        debug!(
            path = %path.display(),
            transactions = ledger.transactions.len(),
            categories = ledger.categories.len(),
            "loaded ledger"
        );
        Ok(ledger)
    }

    /// Builds search options from configuration, applying `--no-implicit-and`.
    pub fn search_options(&self, no_implicit_and: bool) -> SearchOptions {
        SearchOptions {
            implicit_and: self.config.search.implicit_and && !no_implicit_and,
        }
    }
}

/// Returns the current working directory or exits with a consistent error.
fn current_dir_or_failure() -> Result<PathBuf, ExitCode> {
    env::current_dir().map_err(|e| {
        eprintln!("error: could not determine current directory: {e}");
        ExitCode::FAILURE
    })
}

/// Loads configuration from the provided directory or exits with an error.
fn load_config_or_failure(cwd: &Path) -> Result<Config, ExitCode> {
    Config::load(cwd).map_err(|e| {
        eprintln!("error: failed to load configuration: {e}");
        ExitCode::FAILURE
    })
}
