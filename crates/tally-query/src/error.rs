//! Error types for query parsing.
//!
//! Lexing never fails, so the only error is [`QuerySyntaxError`], raised by the parser. It
//! carries the original query and the position of the offending token so that callers can
//! render a pointer into the query or decide to fall back to a degraded search.

use std::{error, fmt};

use thiserror::Error;

/// The specific kind of syntax error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxErrorKind {
    /// The query ended where a term or group was expected.
    #[error("unexpected end of query, expected a term after {after}")]
    UnexpectedEnd {
        /// Description of the last token before the end of input.
        after: String,
    },

    /// A closing parenthesis with no matching opening parenthesis.
    #[error("unmatched closing parenthesis")]
    UnmatchedClose,

    /// An opening parenthesis that is never closed.
    #[error("unclosed opening parenthesis")]
    UnclosedOpen,

    /// A token that cannot appear where an operand is expected.
    #[error("unexpected {found}, expected a term")]
    UnexpectedToken {
        /// Description of the token that was found.
        found: String,
    },

    /// Two operands appear next to each other without an operator.
    #[error("missing operator before {found}")]
    MissingOperator {
        /// Description of the operand that follows without an operator.
        found: String,
    },

    /// Parentheses or NOT operators nested beyond the supported depth.
    #[error("query is nested too deeply (limit {limit})")]
    TooDeep {
        /// The maximum supported nesting depth.
        limit: usize,
    },
}

/// A syntax error in a search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySyntaxError {
    /// The kind of error that occurred.
    pub kind: SyntaxErrorKind,
    /// The original query string.
    pub query: String,
    /// Index of the offending token in the token stream.
    pub token_index: usize,
    /// Byte offset of the offending token in the query.
    pub position: usize,
}

impl QuerySyntaxError {
    /// Creates a new syntax error.
    pub fn new(
        kind: SyntaxErrorKind,
        query: impl Into<String>,
        token_index: usize,
        position: usize,
    ) -> Self {
        Self {
            kind,
            query: query.into(),
            token_index,
            position,
        }
    }

    /// Returns the error message without context.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    /// Returns the remainder of the query starting at the offending token.
    ///
    /// Useful for messages of the form "couldn't understand your query near ...".
    pub fn near(&self) -> &str {
        let start = self.position.min(self.query.len());
        self.query.get(start..).unwrap_or_default().trim()
    }

    /// Returns a suggestion for common errors.
    pub fn suggestion(&self) -> Option<&'static str> {
        match &self.kind {
            SyntaxErrorKind::UnclosedOpen => {
                Some("Add a closing parenthesis ) to match the opening one")
            }
            SyntaxErrorKind::UnmatchedClose => {
                Some("Remove the extra ) or add a matching opening parenthesis")
            }
            SyntaxErrorKind::UnexpectedEnd { .. } => {
                Some("AND, OR and NOT need a term after them, e.g. 'coffee AND NOT costa'")
            }
            SyntaxErrorKind::UnexpectedToken { found } if found == "AND" || found == "OR" => {
                Some("AND and OR need terms on both sides, e.g. 'hsbc OR amex'")
            }
            SyntaxErrorKind::MissingOperator { .. } => {
                Some("Join terms with AND or OR, e.g. 'tesco AND food'")
            }
            SyntaxErrorKind::UnexpectedToken { .. } | SyntaxErrorKind::TooDeep { .. } => None,
        }
    }
}

impl fmt::Display for QuerySyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "query syntax error: {}", self.kind)?;
        writeln!(f, "  {}", self.query)?;

        let prefix = self.query.get(..self.position).unwrap_or(&self.query);
        write!(f, "  {}^", " ".repeat(prefix.chars().count()))?;

        if let Some(suggestion) = self.suggestion() {
            write!(f, "\nhint: {suggestion}")?;
        }

        Ok(())
    }
}

impl error::Error for QuerySyntaxError {}
