//! Integration tests for tally-config.
//!
//! Tests the full configuration loading pipeline: discovery, parse, merge.

// Integration tests live outside cfg(test) by design
#![allow(clippy::tests_outside_test_module)]

use std::{
    fs,
    path::{Path, PathBuf},
};

use tally_config::{Config, ConfigError, SearchSettings};

/// Test helper to create a temporary directory structure for tests.
struct TestEnv {
    /// Owns the directory so it is removed on drop.
    root: tempfile::TempDir,
}

impl TestEnv {
    fn new() -> Self {
        Self {
            root: tempfile::tempdir().unwrap(),
        }
    }

    fn path(&self) -> &Path {
        self.root.path()
    }

    /// Creates a directory and returns its path.
    fn create_dir(&self, rel_path: &str) -> PathBuf {
        let path = self.root.path().join(rel_path);
        fs::create_dir_all(&path).unwrap();
        path
    }

    /// Creates a file with content and returns its path.
    fn create_file(&self, rel_path: &str, content: &str) -> PathBuf {
        let path = self.root.path().join(rel_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }
}

#[test]
fn test_load_root_config_only() {
    let env = TestEnv::new();
    env.create_file(".tally.toml", "root = true\n");

    let config = Config::load(env.path()).unwrap();
    assert!(config.settings.ledger.is_none());
    assert_eq!(config.search, SearchSettings::default());
    assert_eq!(config.config_root.as_deref(), Some(env.path()));
}

#[test]
fn test_load_nested_configs_merging() {
    let env = TestEnv::new();
    env.create_file(
        ".tally.toml",
        r#"
root = true

[settings]
ledger = "shared/ledger.json"

[search]
implicit_and = false
fallback = false
"#,
    );
    env.create_file(
        "personal/.tally.toml",
        r#"
[search]
fallback = true
"#,
    );
    let cwd = env.create_dir("personal/receipts");

    let config = Config::load(&cwd).unwrap();

    // Closest file wins for the fields it sets; the rest come from further up.
    assert!(config.search.fallback);
    assert!(!config.search.implicit_and);
    assert_eq!(
        config.settings.ledger,
        Some(env.path().join("shared/ledger.json"))
    );
    assert_eq!(config.config_root, Some(env.path().join("personal")));
}

#[test]
fn test_root_config_hides_outer_files() {
    let env = TestEnv::new();
    env.create_file(".tally.toml", "[search]\nimplicit_and = false\n");
    env.create_file("inner/.tally.toml", "root = true\n");

    let config = Config::load(&env.path().join("inner")).unwrap();
    assert!(config.search.implicit_and);
}

#[test]
fn test_load_error_invalid_toml() {
    let env = TestEnv::new();
    let path = env.create_file(".tally.toml", "root = true\n[search\n");

    let err = Config::load(env.path()).unwrap_err();
    match err {
        ConfigError::ParseToml { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("expected ParseToml, got {other:?}"),
    }
}

#[test]
fn test_load_from_missing_file() {
    let env = TestEnv::new();
    let err = Config::load_from_files(&[env.path().join(".tally.toml")]).unwrap_err();
    assert!(matches!(err, ConfigError::ReadFile { .. }));
}

#[test]
fn test_settings_round_trip_through_toml() {
    let env = TestEnv::new();
    env.create_file(
        ".tally.toml",
        "root = true\n[settings]\nledger = \"l.json\"\n[search]\nfallback = false\n",
    );
    let config = Config::load(env.path()).unwrap();
    let rendered = config.settings_to_toml().unwrap();

    // The rendered output is itself a valid config file.
    let copy = env.create_file("copy/.tally.toml", &format!("root = true\n{rendered}"));
    let reloaded = Config::load_from_files(&[copy]).unwrap();
    assert_eq!(reloaded.search, config.search);
    assert_eq!(reloaded.settings.ledger, Some(env.path().join("l.json")));
}
