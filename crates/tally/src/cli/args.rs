//! Clap argument definitions for the `tally` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Query syntax summary appended to help output.
const QUERY_HELP: &str = "\
Query syntax:
  coffee tesco            both words (implicit AND)
  costa OR tesco AND amex AND binds tighter than OR
  (costa OR tesco) amex   parentheses group
  NOT tesco               negation
  \"gold card\"             quoted phrase; keywords inside quotes are literal

Every word is a case-insensitive substring match against the payee, counterparty,
description, category (and its parents), bank, account, trip and tags.";

/// Top-level CLI options.
#[derive(Parser, Debug)]
#[command(name = "tally")]
#[command(about = "Search a ledger of transactions with a boolean query language")]
#[command(after_help = QUERY_HELP)]
pub struct Cli {
    /// Verbosity level (-v for debug logging and matched fields, -vv for trace logging)
    #[arg(short = 'v', long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Query interpretation flags shared by `search` and `explain`.
#[derive(Args, Debug, Clone, Default)]
pub struct QueryArgs {
    /// Query words; multiple arguments are joined with spaces
    #[arg(required = true)]
    pub query: Vec<String>,

    /// Treat adjacent terms without an operator as a syntax error
    #[arg(long)]
    pub no_implicit_and: bool,
}

impl QueryArgs {
    /// Returns the query as a single string.
    pub fn joined(&self) -> String {
        self.query.join(" ")
    }
}

/// Arguments for `tally search`.
#[derive(Args, Debug, Clone)]
pub struct SearchCommand {
    #[command(flatten)]
    /// Query text and interpretation flags.
    pub query: QueryArgs,

    /// Ledger JSON file (defaults to `[settings] ledger` from .tally.toml)
    #[arg(short = 'l', long)]
    pub ledger: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,

    /// Fail on a malformed query instead of falling back to a plain word search
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for `tally explain`.
#[derive(Args, Debug, Clone)]
pub struct ExplainCommand {
    #[command(flatten)]
    /// Query text and interpretation flags.
    pub query: QueryArgs,
}

/// Supported `tally` subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search the ledger and print matching transactions
    Search(SearchCommand),

    /// Show how a query is tokenized and parsed, without searching
    Explain(ExplainCommand),

    /// Show effective configuration settings
    Config,
}

/// Parses CLI arguments from the process environment.
pub fn parse_cli() -> Cli {
    Cli::parse()
}
