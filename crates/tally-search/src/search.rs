//! Primary search and its fallback-aware wrapper.

use std::time::Instant;

use tally_query::{ParseOptions, QuerySyntaxError, parse_with};
use tracing::{debug, trace};

use crate::{
    document::ReferenceIndex,
    evaluate::evaluate,
    fallback::fallback_search,
    model::{Bank, BankAccount, Category, Tag, Transaction, Trip},
};

/// A query plus the data it runs over.
///
/// Everything is borrowed from the caller; search never copies or retains it.
#[derive(Debug, Clone, Copy)]
pub struct SearchParams<'a> {
    /// Raw query text as typed by the user.
    pub query: &'a str,
    /// Transactions to filter, in display order.
    pub transactions: &'a [Transaction],
    /// Banks.
    pub banks: &'a [Bank],
    /// Bank accounts.
    pub bank_accounts: &'a [BankAccount],
    /// Categories.
    pub categories: &'a [Category],
    /// Trips.
    pub trips: &'a [Trip],
    /// Tags.
    pub tags: &'a [Tag],
}

impl<'a> SearchParams<'a> {
    /// Builds the reference index for these parameters.
    pub fn reference_index(&self) -> ReferenceIndex<'a> {
        ReferenceIndex::new(
            self.categories,
            self.banks,
            self.bank_accounts,
            self.trips,
            self.tags,
        )
    }

    /// Returns a copy of these parameters with a different query.
    pub fn with_query(self, query: &'a str) -> Self {
        Self { query, ..self }
    }
}

/// Options that change how queries are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// Treat adjacent terms as joined by AND rather than as a syntax error.
    pub implicit_and: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self { implicit_and: true }
    }
}

impl From<SearchOptions> for ParseOptions {
    fn from(options: SearchOptions) -> Self {
        Self {
            implicit_and: options.implicit_and,
        }
    }
}

/// Searches transactions with the boolean query language using default options.
///
/// Returns matching transactions in input order. A malformed query yields a
/// [`QuerySyntaxError`]; callers wanting a best-effort result should use
/// [`fallback_search`] or [`search_or_fallback`].
pub fn search<'a>(params: &SearchParams<'a>) -> Result<Vec<&'a Transaction>, QuerySyntaxError> {
    search_with(params, &SearchOptions::default())
}

/// Searches transactions with the boolean query language.
pub fn search_with<'a>(
    params: &SearchParams<'a>,
    options: &SearchOptions,
) -> Result<Vec<&'a Transaction>, QuerySyntaxError> {
    let start = Instant::now();

    let expr = parse_with(params.query, (*options).into())?.fold_case();
    trace!(query = params.query, expr = %expr.to_query_string(), "parsed query");

    if expr.is_match_all() {
        debug!(
            total = params.transactions.len(),
            "empty query, returning all transactions"
        );
        return Ok(params.transactions.iter().collect());
    }

    let index = params.reference_index();
    let matches: Vec<&'a Transaction> = params
        .transactions
        .iter()
        .filter(|transaction| evaluate(&expr, &index.project(transaction)))
        .collect();

    debug!(
        total = params.transactions.len(),
        matched = matches.len(),
        elapsed_us = start.elapsed().as_micros() as u64,
        "search complete"
    );

    Ok(matches)
}

/// The result of [`search_or_fallback`].
#[derive(Debug, Clone)]
pub struct SearchOutcome<'a> {
    /// Matching transactions, in input order.
    pub transactions: Vec<&'a Transaction>,
    /// The syntax error that triggered the fallback, if any.
    pub syntax_error: Option<QuerySyntaxError>,
}

impl SearchOutcome<'_> {
    /// Returns true if the results came from the fallback search.
    pub fn is_fallback(&self) -> bool {
        self.syntax_error.is_some()
    }
}

/// Runs the primary search, falling back to plain substring matching if the query does
/// not parse.
///
/// Never fails: the syntax error, if any, is returned alongside the fallback results.
pub fn search_or_fallback<'a>(
    params: &SearchParams<'a>,
    options: &SearchOptions,
) -> SearchOutcome<'a> {
    match search_with(params, options) {
        Ok(transactions) => SearchOutcome {
            transactions,
            syntax_error: None,
        },
        Err(error) => {
            debug!(position = error.position, "query did not parse, using fallback search");
            SearchOutcome {
                transactions: fallback_search(params),
                syntax_error: Some(error),
            }
        }
    }
}
