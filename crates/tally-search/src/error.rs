//! Error types for the tally-search crate.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors that can occur when loading a ledger snapshot.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Failed to read the ledger file.
    #[error("failed to read ledger {path}: {source}")]
    Read {
        /// Path to the ledger file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The ledger file is not valid JSON for the expected schema.
    #[error("failed to parse ledger {path}: {source}")]
    Parse {
        /// Path to the ledger file.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
}
