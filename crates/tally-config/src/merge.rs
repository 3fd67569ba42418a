//! Configuration merging.
//!
//! Folds several `RawConfig` files into a single `Config`, applying precedence rules and
//! resolving the ledger path against the file that named it.

use std::path::{Path, PathBuf};

use crate::{
    Config, SearchSettings, Settings,
    parse::{RawConfig, RawSearchSettings},
};

/// A parsed config file with its source path.
#[derive(Debug, Clone)]
pub struct ParsedConfig {
    /// Path to the config file.
    pub path: PathBuf,
    /// Parsed raw configuration.
    pub config: RawConfig,
}

impl ParsedConfig {
    /// Directory containing the config file.
    fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }
}

/// Merges multiple configuration files into a single `Config`.
///
/// Configs should be provided in precedence order: highest precedence first (closest to the
/// working directory), global config last. Each field takes the value from the highest
/// precedence file that sets it.
pub fn merge_configs(configs: &[ParsedConfig]) -> Config {
    let Some(first) = configs.first() else {
        return Config::default();
    };

    Config {
        settings: merge_settings(configs),
        search: merge_search_settings(configs),
        config_root: Some(first.dir().to_path_buf()),
    }
}

/// Merges general settings, resolving the ledger path relative to its config file.
fn merge_settings(configs: &[ParsedConfig]) -> Settings {
    let mut result = Settings::default();

    // Lowest precedence first so closer files overwrite.
    for parsed in configs.iter().rev() {
        if let Some(ledger) = parsed
            .config
            .settings
            .as_ref()
            .and_then(|settings| settings.ledger.as_deref())
        {
            result.ledger = Some(parsed.dir().join(ledger));
        }
    }

    result
}

/// Merges search settings.
fn merge_search_settings(configs: &[ParsedConfig]) -> SearchSettings {
    let mut result = SearchSettings::default();

    // Lowest precedence first so closer files overwrite.
    for parsed in configs.iter().rev() {
        if let Some(ref search) = parsed.config.search {
            apply_raw_search(&mut result, search);
        }
    }

    result
}

/// Applies raw search settings to result.
fn apply_raw_search(result: &mut SearchSettings, raw: &RawSearchSettings) {
    if let Some(v) = raw.implicit_and {
        result.implicit_and = v;
    }
    if let Some(v) = raw.fallback {
        result.fallback = v;
    }
}
