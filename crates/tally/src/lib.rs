//! tally: transaction search from the command line.
//!
//! tally loads a JSON ledger snapshot (transactions plus their banks, accounts, categories,
//! trips and tags) and filters it with a small boolean query language:
//!
//! ```text
//! tally search "costa OR tesco AND amex"
//! tally search '(coffee OR food) AND NOT "gold card"'
//! ```
//!
//! Malformed queries fall back to a plain word search unless `--strict` is given.

#![warn(missing_docs)]

pub mod cli;
