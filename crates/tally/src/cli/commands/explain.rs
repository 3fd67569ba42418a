//! Implementation of `tally explain`.

use std::process::ExitCode;

use tally_query::{lex, parse_tokens};
use tally_search::fallback_terms;

use crate::cli::{
    args::ExplainCommand,
    context::CommandContext,
    style::{dim, subheader},
};

/// Prints the tokens, syntax tree and canonical form of a query.
pub fn run(ctx: &CommandContext, cmd: &ExplainCommand) -> ExitCode {
    let query = cmd.query.joined();
    let options = ctx.search_options(cmd.query.no_implicit_and);

    println!("{}", subheader("Query:"));
    println!("   {query:?}");
    println!();

    let lexemes = lex(&query);
    println!("{}", subheader("Tokens:"));
    for (index, lexeme) in lexemes.iter().enumerate() {
        println!(
            "   {index:>3}  {} {}",
            lexeme.token,
            dim(&format!("@{}", lexeme.offset))
        );
    }
    println!();

    let expr = match parse_tokens(&query, lexemes, options.into()) {
        Ok(expr) => expr,
        Err(e) => {
            eprintln!("error: {e}");
            let terms = fallback_terms(&query);
            if !terms.is_empty() {
                eprintln!("fallback search would look for: {}", terms.join(", "));
            }
            return ExitCode::FAILURE;
        }
    };

    if expr.is_match_all() {
        println!("{}", dim("(empty query, matches every transaction)"));
        return ExitCode::SUCCESS;
    }

    println!("{}", subheader("Parsed AST:"));
    for line in expr.to_string().lines() {
        println!("   {line}");
    }
    println!();

    println!("{}", subheader("Canonical form:"));
    println!("   {}", expr.to_query_string());

    ExitCode::SUCCESS
}
