//! Implementation of `tally search`.

use std::process::ExitCode;

use tally_query::parse_with;
use tally_search::{
    Expr, SearchOptions, SearchOutcome, fallback_terms, search_or_fallback, search_with,
};

use crate::cli::{
    args::SearchCommand,
    context::CommandContext,
    output::{SearchReport, print_fallback_warning},
};

/// Searches the ledger and prints matching transactions.
pub fn run(ctx: &CommandContext, cmd: &SearchCommand, verbose: u8) -> ExitCode {
    let ledger = match ctx.load_ledger(cmd.ledger.as_deref()) {
        Ok(ledger) => ledger,
        Err(code) => return code,
    };

    let query = cmd.query.joined();
    let options = ctx.search_options(cmd.query.no_implicit_and);
    let params = ledger.params(&query);

    let outcome = if cmd.strict || !ctx.config.search.fallback {
        match search_with(&params, &options) {
            Ok(transactions) => SearchOutcome {
                transactions,
                syntax_error: None,
            },
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        search_or_fallback(&params, &options)
    };

    if !cmd.json
        && let Some(error) = &outcome.syntax_error
    {
        print_fallback_warning(error);
    }

    let explain =
        (verbose > 0).then(|| match_expression(&query, options, outcome.is_fallback()));
    let index = params.reference_index();
    let report = SearchReport {
        query: &query,
        transactions: &outcome.transactions,
        total: ledger.transactions.len(),
        syntax_error: outcome.syntax_error.as_ref(),
        index: &index,
        explain: explain.as_ref(),
    };

    if cmd.json {
        report.print_json()
    } else {
        report.print_table()
    }
}

/// Returns the expression whose terms explain why results matched.
///
/// Fallback results are explained by their words joined with AND.
fn match_expression(query: &str, options: SearchOptions, fallback: bool) -> Expr {
    if !fallback && let Ok(expr) = parse_with(query, options.into()) {
        return expr;
    }
    fallback_terms(query)
        .into_iter()
        .map(Expr::term)
        .reduce(Expr::and)
        .unwrap_or(Expr::MatchAll)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parsed_query_explains_results() {
        let expr = match_expression("costa OR tesco", SearchOptions::default(), false);
        assert_eq!(expr, Expr::or(Expr::term("costa"), Expr::term("tesco")));
    }

    #[test]
    fn fallback_words_explain_results() {
        let expr = match_expression("(tesco AND", SearchOptions::default(), true);
        assert_eq!(expr, Expr::term("tesco"));

        let expr = match_expression("a b", SearchOptions::default(), true);
        assert_eq!(expr, Expr::and(Expr::term("a"), Expr::term("b")));

        assert!(match_expression("( )", SearchOptions::default(), true).is_match_all());
    }
}
