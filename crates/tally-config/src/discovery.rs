//! Configuration file discovery.
//!
//! Walks up the directory tree from a starting point looking for `.tally.toml` files, then
//! appends the global `~/.tally.toml` if present.

use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::parse::is_root_config;

/// The configuration filename.
pub const CONFIG_FILENAME: &str = ".tally.toml";

/// Discovers all configuration files relevant to the given directory.
///
/// Returns paths in precedence order: closest to `cwd` first, global (`~/.tally.toml`) last.
///
/// The walk stops at the first file with `root = true`; in that case the global file is not
/// consulted either. Returns an empty vector if no configuration files are found.
pub fn discover_config_files(cwd: &Path) -> Vec<PathBuf> {
    let (mut configs, rooted) = local_config_files(cwd);
    if rooted {
        return configs;
    }

    // A cwd under the home directory already picked the global file up on the walk.
    if let Some(global) = global_config_path().filter(|path| path.is_file())
        && !configs.contains(&global)
    {
        configs.push(global);
    }
    configs
}

/// Collects `.tally.toml` files from `cwd` up to the filesystem root, nearest first.
///
/// The flag is true when the walk ended early on a `root = true` file.
fn local_config_files(cwd: &Path) -> (Vec<PathBuf>, bool) {
    let mut configs = Vec::new();
    for candidate in cwd.ancestors().map(|dir| dir.join(CONFIG_FILENAME)) {
        if !candidate.is_file() {
            continue;
        }
        let rooted = is_root_config(&candidate);
        configs.push(candidate);
        if rooted {
            return (configs, true);
        }
    }
    (configs, false)
}

/// Returns the path to the global configuration file (`~/.tally.toml`).
///
/// Returns `None` if the home directory cannot be determined.
pub fn global_config_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(CONFIG_FILENAME))
}

/// Checks if a path is the global configuration file.
pub fn is_global_config(path: &Path) -> bool {
    global_config_path().is_some_and(|global| path == global)
}
