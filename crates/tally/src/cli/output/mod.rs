//! Rendering and JSON serialization for CLI output.

use std::process::ExitCode;

use comfy_table::{Cell, CellAlignment, Table, presets::UTF8_FULL_CONDENSED};
use serde::Serialize;
use tally_search::{
    Expr, Field, QuerySyntaxError, ReferenceIndex, SearchableDocument, Transaction,
    matched_fields,
};

use crate::cli::style::{dim, warning};

/// Separator between category path segments in table output.
const PATH_SEPARATOR: &str = " > ";

/// JSON output for `tally search --json`.
#[derive(Serialize)]
struct JsonSearchOutput<'a> {
    /// The query as given.
    query: &'a str,
    /// Whether the results came from the fallback search.
    fallback: bool,
    /// The syntax error that triggered the fallback.
    error: Option<JsonSyntaxError<'a>>,
    /// Number of matching transactions.
    total_matches: usize,
    /// Matching transactions, in ledger order.
    transactions: Vec<JsonTransaction<'a>>,
}

/// A syntax error in JSON output.
#[derive(Serialize)]
struct JsonSyntaxError<'a> {
    /// One-line description of the error.
    message: String,
    /// Byte offset of the offending token.
    position: usize,
    /// Query text from the offending token onwards.
    near: &'a str,
    /// Suggested fix, if any.
    hint: Option<&'static str>,
}

impl<'a> From<&'a QuerySyntaxError> for JsonSyntaxError<'a> {
    fn from(error: &'a QuerySyntaxError) -> Self {
        Self {
            message: error.message(),
            position: error.position,
            near: error.near(),
            hint: error.suggestion(),
        }
    }
}

/// A transaction with its reference data resolved to names.
#[derive(Serialize)]
struct JsonTransaction<'a> {
    /// The transaction as stored in the ledger.
    #[serde(flatten)]
    transaction: &'a Transaction,
    /// Category names from the root down to the transaction's category.
    category_path: Vec<&'a str>,
    /// Bank name.
    bank: Option<&'a str>,
    /// Account name.
    account: Option<&'a str>,
    /// Trip name.
    trip: Option<&'a str>,
    /// Tag names.
    tags: Vec<&'a str>,
    /// Fields containing a query term (verbose only).
    #[serde(skip_serializing_if = "Option::is_none")]
    matched_fields: Option<Vec<Field>>,
}

/// A transaction paired with its searchable projection.
struct Row<'a> {
    /// The transaction.
    transaction: &'a Transaction,
    /// Its text fragments, used for display names.
    doc: SearchableDocument<'a>,
}

impl<'a> Row<'a> {
    /// Projects `transaction` through `index`.
    fn new(transaction: &'a Transaction, index: &ReferenceIndex<'a>) -> Self {
        Self {
            transaction,
            doc: index.project(transaction),
        }
    }

    /// First fragment of a field.
    fn first(&self, field: Field) -> Option<&'a str> {
        self.doc.texts(field).next()
    }

    /// Category names, root first.
    fn category_path(&self) -> Vec<&'a str> {
        let mut path: Vec<&'a str> = self.doc.texts(Field::Category).collect();
        path.reverse();
        path
    }

    /// Tag names.
    fn tags(&self) -> Vec<&'a str> {
        self.doc.texts(Field::Tag).collect()
    }

    /// Payee, or counterparty when there is no payee.
    fn party(&self) -> &'a str {
        self.first(Field::Payee)
            .or_else(|| self.first(Field::Counterparty))
            .unwrap_or_default()
    }

    /// "Bank / Account", or whichever part is known.
    fn account_label(&self) -> String {
        match (self.first(Field::Bank), self.first(Field::Account)) {
            (Some(bank), Some(account)) => format!("{bank} / {account}"),
            (bank, account) => account.or(bank).unwrap_or_default().to_string(),
        }
    }

    /// Names of the fields containing a term of `expr`.
    fn matched(&self, expr: &Expr) -> Vec<Field> {
        matched_fields(expr, &self.doc).into_iter().collect()
    }

    /// Converts to the JSON shape.
    fn into_json(self, explain: Option<&Expr>) -> JsonTransaction<'a> {
        JsonTransaction {
            transaction: self.transaction,
            category_path: self.category_path(),
            bank: self.first(Field::Bank),
            account: self.first(Field::Account),
            trip: self.first(Field::Trip),
            tags: self.tags(),
            matched_fields: explain.map(|expr| self.matched(expr)),
        }
    }
}

/// Search results ready for rendering.
pub struct SearchReport<'r, 'a> {
    /// The query as given.
    pub query: &'r str,
    /// Matching transactions, in ledger order.
    pub transactions: &'r [&'a Transaction],
    /// Number of transactions searched.
    pub total: usize,
    /// The syntax error if the fallback search produced the results.
    pub syntax_error: Option<&'r QuerySyntaxError>,
    /// Reference lookups for resolving names.
    pub index: &'r ReferenceIndex<'a>,
    /// Expression used to report matched fields, when verbose.
    pub explain: Option<&'r Expr>,
}

impl SearchReport<'_, '_> {
    /// Projects every matching transaction.
    fn rows(&self) -> impl Iterator<Item = Row<'_>> + '_ {
        self.transactions
            .iter()
            .map(|transaction| Row::new(transaction, self.index))
    }

    /// Prints the report as pretty JSON on stdout.
    pub fn print_json(&self) -> ExitCode {
        let output = JsonSearchOutput {
            query: self.query,
            fallback: self.syntax_error.is_some(),
            error: self.syntax_error.map(JsonSyntaxError::from),
            total_matches: self.transactions.len(),
            transactions: self
                .rows()
                .map(|row| row.into_json(self.explain))
                .collect(),
        };
        match serde_json::to_string_pretty(&output) {
            Ok(json_str) => println!("{json_str}"),
            Err(e) => {
                eprintln!("error: failed to serialize JSON: {e}");
                return ExitCode::FAILURE;
            }
        }
        ExitCode::SUCCESS
    }

    /// Prints the report as a table on stdout.
    pub fn print_table(&self) -> ExitCode {
        if self.transactions.is_empty() {
            println!("{}", dim("No matching transactions."));
            return ExitCode::SUCCESS;
        }

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);

        let mut columns = vec!["Date", "Amount", "Payee", "Category", "Account", "Tags"];
        if self.explain.is_some() {
            columns.push("Matched");
        }
        table.set_header(columns);

        for row in self.rows() {
            let mut cells = vec![
                Cell::new(&row.transaction.date),
                Cell::new(format!("{:.2}", row.transaction.amount))
                    .set_alignment(CellAlignment::Right),
                Cell::new(row.party()),
                Cell::new(row.category_path().join(PATH_SEPARATOR)),
                Cell::new(row.account_label()),
                Cell::new(row.tags().join(", ")),
            ];
            if let Some(expr) = self.explain {
                let fields: Vec<&str> = row.matched(expr).into_iter().map(Field::as_str).collect();
                cells.push(Cell::new(fields.join(", ")));
            }
            table.add_row(cells);
        }

        println!("{table}");
        println!(
            "{}",
            dim(&format!(
                "{} of {} transactions",
                self.transactions.len(),
                self.total
            ))
        );
        ExitCode::SUCCESS
    }
}

/// Prints the warning shown when a malformed query falls back to word search.
pub fn print_fallback_warning(error: &QuerySyntaxError) {
    eprintln!("{}", warning(&format!("warning: {error}")));
    eprintln!(
        "{}",
        dim("Showing results of a plain word search instead; use --strict to fail.")
    );
}
