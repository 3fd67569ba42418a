//! Owned ledger snapshots.
//!
//! The search functions borrow their inputs; [`Ledger`] is the owned form used when the data
//! comes from a JSON export instead of an in-process persistence layer.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    error::LedgerError,
    model::{Bank, BankAccount, Category, Tag, Transaction, Trip},
    search::SearchParams,
};

/// A complete snapshot of the transactions and their reference data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ledger {
    /// Transactions, in display order.
    pub transactions: Vec<Transaction>,
    /// Banks.
    pub banks: Vec<Bank>,
    /// Bank accounts.
    pub bank_accounts: Vec<BankAccount>,
    /// Categories (flat list, tree via `parent_id`).
    pub categories: Vec<Category>,
    /// Trips.
    pub trips: Vec<Trip>,
    /// Tags.
    pub tags: Vec<Tag>,
}

impl Ledger {
    /// Loads a ledger from a JSON file.
    pub fn load(path: &Path) -> Result<Self, LedgerError> {
        let contents = fs::read_to_string(path).map_err(|source| LedgerError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_json_str(&contents, path)
    }

    /// Parses a ledger from JSON text.
    ///
    /// The `path` parameter is used for error reporting.
    pub fn from_json_str(contents: &str, path: &Path) -> Result<Self, LedgerError> {
        serde_json::from_str(contents).map_err(|source| LedgerError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Borrows the ledger as search parameters for `query`.
    pub fn params<'a>(&'a self, query: &'a str) -> SearchParams<'a> {
        SearchParams {
            query,
            transactions: &self.transactions,
            banks: &self.banks,
            bank_accounts: &self.bank_accounts,
            categories: &self.categories,
            trips: &self.trips,
            tags: &self.tags,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn missing_collections_default_to_empty() {
        let ledger = Ledger::from_json_str(
            r#"{"transactions": [{"id": 1, "payee": "Costa"}]}"#,
            Path::new("test.json"),
        )
        .unwrap();
        assert_eq!(ledger.transactions.len(), 1);
        assert_eq!(ledger.transactions[0].payee.as_deref(), Some("Costa"));
        assert!(ledger.transactions[0].tag_ids.is_empty());
        assert!(ledger.banks.is_empty());
        assert!(ledger.categories.is_empty());
    }

    #[test]
    fn parse_error_names_path() {
        let err = Ledger::from_json_str("{", Path::new("broken.json")).unwrap_err();
        assert!(matches!(err, LedgerError::Parse { .. }));
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        fs::write(
            &path,
            r#"{"banks": [{"id": 1, "name": "HSBC"}], "categories": [{"id": 2, "name": "Food"}]}"#,
        )
        .unwrap();

        let ledger = Ledger::load(&path).unwrap();
        assert_eq!(ledger.banks[0].name, "HSBC");
        assert_eq!(ledger.categories[0].parent_id, None);
    }

    #[test]
    fn load_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Ledger::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, LedgerError::Read { .. }));
    }

    #[test]
    fn params_borrow_every_collection() {
        let ledger = Ledger {
            transactions: vec![Transaction::default()],
            ..Ledger::default()
        };
        let params = ledger.params("costa");
        assert_eq!(params.query, "costa");
        assert_eq!(params.transactions.len(), 1);
    }
}
