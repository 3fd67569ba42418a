//! In-memory transaction search for tally.
//!
//! Transactions are matched against the boolean query language from [`tally_query`]. Each
//! search call:
//!
//! 1. Parses the query once (empty queries match everything)
//! 2. Builds id lookups over the reference data (categories, banks, accounts, trips, tags)
//! 3. Projects every transaction into a [`SearchableDocument`] of text fragments
//! 4. Evaluates the expression per document and keeps matches in input order
//!
//! Nothing is cached between calls, so results always reflect the data passed in. When the
//! query is malformed, [`fallback_search`] gives a best-effort answer instead.
//!
//! # Example
//!
//! ```
//! use tally_search::{Ledger, Transaction, search};
//!
//! let ledger = Ledger {
//!     transactions: vec![
//!         Transaction { id: 1, payee: Some("Costa".into()), ..Transaction::default() },
//!         Transaction { id: 2, payee: Some("Tesco".into()), ..Transaction::default() },
//!     ],
//!     ..Ledger::default()
//! };
//!
//! let found = search(&ledger.params("NOT tesco")).unwrap();
//! assert_eq!(found.len(), 1);
//! assert_eq!(found[0].id, 1);
//! ```

#![warn(missing_docs)]

mod document;
mod error;
mod evaluate;
mod fallback;
mod ledger;
mod model;
mod search;

pub use document::{CategoryTree, Field, Fragment, ReferenceIndex, SearchableDocument, project};
pub use error::LedgerError;
pub use evaluate::{evaluate, matched_fields};
pub use fallback::{fallback_search, fallback_terms};
pub use ledger::Ledger;
pub use model::{Bank, BankAccount, Category, Id, Tag, Transaction, Trip};
pub use search::{
    SearchOptions, SearchOutcome, SearchParams, search, search_or_fallback, search_with,
};
pub use tally_query::{Expr, QuerySyntaxError, SyntaxErrorKind};
