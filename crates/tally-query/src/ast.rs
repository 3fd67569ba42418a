//! Query abstract syntax tree.
//!
//! A parsed query is a closed tree of boolean operators over literal terms. The tree owns
//! all of its text and keeps no reference to the token stream it was parsed from.

use std::fmt;

/// A parsed query expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Matches every document. Produced by an empty or whitespace-only query.
    MatchAll,

    /// A literal term, matched as a case-insensitive substring.
    Term(String),

    /// Conjunction: both sides must match.
    And(Box<Self>, Box<Self>),

    /// Disjunction: at least one side must match.
    Or(Box<Self>, Box<Self>),

    /// Negation: the inner expression must NOT match.
    Not(Box<Self>),
}

impl Expr {
    /// Creates a term expression.
    pub fn term(text: impl Into<String>) -> Self {
        Self::Term(text.into())
    }

    /// Creates an And expression.
    pub fn and(left: Self, right: Self) -> Self {
        Self::And(Box::new(left), Box::new(right))
    }

    /// Creates an Or expression.
    pub fn or(left: Self, right: Self) -> Self {
        Self::Or(Box::new(left), Box::new(right))
    }

    /// Creates a negated expression.
    pub fn not(inner: Self) -> Self {
        Self::Not(Box::new(inner))
    }

    /// Returns true if this is the match-all expression.
    pub fn is_match_all(&self) -> bool {
        matches!(self, Self::MatchAll)
    }

    /// Returns a copy of the expression with every term lower-cased.
    pub fn fold_case(&self) -> Self {
        match self {
            Self::MatchAll => Self::MatchAll,
            Self::Term(text) => Self::Term(text.to_lowercase()),
            Self::And(l, r) => Self::and(l.fold_case(), r.fold_case()),
            Self::Or(l, r) => Self::or(l.fold_case(), r.fold_case()),
            Self::Not(inner) => Self::not(inner.fold_case()),
        }
    }

    /// Returns the terms that appear under an even number of negations.
    ///
    /// These are the terms whose presence can contribute to a match, in left-to-right order.
    pub fn terms(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_terms(false, &mut out);
        out
    }

    /// Accumulates terms for [`Expr::terms`].
    fn collect_terms<'a>(&'a self, negated: bool, out: &mut Vec<&'a str>) {
        match self {
            Self::MatchAll => {}
            Self::Term(text) => {
                if !negated {
                    out.push(text);
                }
            }
            Self::And(l, r) | Self::Or(l, r) => {
                l.collect_terms(negated, out);
                r.collect_terms(negated, out);
            }
            Self::Not(inner) => inner.collect_terms(!negated, out),
        }
    }

    /// Formats the expression as a tree structure with the given indentation level.
    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let prefix = "  ".repeat(indent);
        match self {
            Self::MatchAll => writeln!(f, "{prefix}MatchAll"),
            Self::Term(s) => writeln!(f, "{prefix}Term({s:?})"),
            Self::Not(inner) => {
                writeln!(f, "{prefix}Not")?;
                inner.fmt_tree(f, indent + 1)
            }
            Self::And(l, r) => {
                writeln!(f, "{prefix}And")?;
                l.fmt_tree(f, indent + 1)?;
                r.fmt_tree(f, indent + 1)
            }
            Self::Or(l, r) => {
                writeln!(f, "{prefix}Or")?;
                l.fmt_tree(f, indent + 1)?;
                r.fmt_tree(f, indent + 1)
            }
        }
    }

    /// Formats the expression as a canonical query string.
    ///
    /// Every binary operator is parenthesized and every term is quoted, so the output
    /// parses back to an identical tree. The match-all expression renders as an empty string.
    pub fn to_query_string(&self) -> String {
        match self {
            Self::MatchAll => String::new(),
            Self::Term(s) => format!("\"{s}\""),
            Self::Not(inner) => format!("NOT {}", inner.to_query_string()),
            Self::And(l, r) => format!("({} AND {})", l.to_query_string(), r.to_query_string()),
            Self::Or(l, r) => format!("({} OR {})", l.to_query_string(), r.to_query_string()),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_tree(f, 0)
    }
}
