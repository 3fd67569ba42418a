//! Configuration system for tally.
//!
//! tally uses TOML configuration files named `.tally.toml`. Configuration is resolved by
//! walking up the directory tree from the current working directory, collecting any
//! `.tally.toml` files found, then loading `~/.tally.toml` as the global config with lowest
//! precedence. A file containing `root = true` ends the walk.
//!
//! ```toml
//! [settings]
//! ledger = "ledger.json"
//!
//! [search]
//! implicit_and = true
//! fallback = true
//! ```

#![warn(missing_docs)]

mod discovery;
mod error;
mod merge;
mod parse;
#[cfg(test)]
mod test_support;

use std::path::{Path, PathBuf};

pub use discovery::{CONFIG_FILENAME, discover_config_files, global_config_path, is_global_config};
pub use error::ConfigError;
pub use merge::{ParsedConfig, merge_configs};
pub use parse::{
    RawConfig, RawSearchSettings, RawSettings, is_root_config, parse_config_file,
    parse_config_str,
};
use serde::Serialize;

/// Top-level merged configuration for tally.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// General settings.
    pub settings: Settings,
    /// Query interpretation settings.
    pub search: SearchSettings,
    /// Directory containing the most specific config file.
    pub config_root: Option<PathBuf>,
}

impl Config {
    /// Loads configuration by discovering and merging all relevant `.tally.toml` files.
    ///
    /// Returns `Ok(Config::default())` if no configuration files are found.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        let config_files = discover_config_files(cwd);
        Self::load_from_files(&config_files)
    }

    /// Loads configuration from a specific list of config file paths.
    ///
    /// Files should be provided in precedence order: highest precedence first.
    pub fn load_from_files(files: &[PathBuf]) -> Result<Self, ConfigError> {
        let parsed = files
            .iter()
            .map(|path| {
                Ok(ParsedConfig {
                    path: path.clone(),
                    config: parse_config_file(path)?,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(merge_configs(&parsed))
    }

    /// Serializes the effective settings to TOML, in the same shape as a `.tally.toml` file.
    pub fn settings_to_toml(&self) -> Result<String, ConfigError> {
        let serializable = SerializableSettings {
            settings: &self.settings,
            search: &self.search,
        };
        Ok(toml::to_string_pretty(&serializable)?)
    }
}

/// General settings.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Settings {
    /// Resolved ledger path, if any config file names one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ledger: Option<PathBuf>,
}

/// Query interpretation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SearchSettings {
    /// Join adjacent terms with AND.
    pub implicit_and: bool,
    /// Retry malformed queries with the fallback search.
    pub fallback: bool,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            implicit_and: true,
            fallback: true,
        }
    }
}

/// Borrowed view of the settings sections for TOML output.
#[derive(Serialize)]
struct SerializableSettings<'a> {
    /// General settings.
    settings: &'a Settings,
    /// Search settings.
    search: &'a SearchSettings,
}
