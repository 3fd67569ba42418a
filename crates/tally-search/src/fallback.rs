//! Grammar-free fallback search.
//!
//! Used when a query does not parse. Every whitespace-separated word must appear somewhere
//! in the transaction; operators, quotes and parentheses are ignored.

use tally_query::is_keyword;
use tracing::debug;

use crate::{model::Transaction, search::SearchParams};

/// Splits a raw query into lower-cased fallback terms.
///
/// Quote and parenthesis characters are removed, operator keywords are dropped, and pieces
/// that end up empty are discarded.
pub fn fallback_terms(query: &str) -> Vec<String> {
    query
        .split_whitespace()
        .map(|word| word.replace(['"', '(', ')'], ""))
        .filter(|word| !word.is_empty() && !is_keyword(word))
        .map(|word| word.to_lowercase())
        .collect()
}

/// Searches with every query word as an implicit AND of substring matches.
///
/// Never fails. A query with no usable words returns every transaction, in order.
pub fn fallback_search<'a>(params: &SearchParams<'a>) -> Vec<&'a Transaction> {
    let terms = fallback_terms(params.query);

    if terms.is_empty() {
        return params.transactions.iter().collect();
    }

    let index = params.reference_index();
    let matches: Vec<&'a Transaction> = params
        .transactions
        .iter()
        .filter(|transaction| {
            let doc = index.project(transaction);
            terms.iter().all(|term| doc.contains(term))
        })
        .collect();

    debug!(
        terms = terms.len(),
        total = params.transactions.len(),
        matched = matches.len(),
        "fallback search complete"
    );

    matches
}
