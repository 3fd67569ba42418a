//! Query parser.
//!
//! Parses a token stream into a query AST using recursive descent.
//!
//! # Grammar
//!
//! ```text
//! query    → or_expr
//! or_expr  → and_expr ("OR" and_expr)*
//! and_expr → not_expr ("AND"? not_expr)*
//! not_expr → "NOT" not_expr | primary
//! primary  → TERM | QUOTED | "(" or_expr ")"
//! ```
//!
//! The optional `AND` is the implicit conjunction: two adjacent operands are joined with
//! `AND` unless [`ParseOptions::implicit_and`] is disabled, in which case adjacency is a
//! syntax error.
//!
//! # Precedence (highest to lowest)
//!
//! 1. Grouping: `(...)`
//! 2. Negation: `NOT`
//! 3. AND (explicit or implicit)
//! 4. OR
//!
//! Binary operators are left-associative.

use std::mem;

use crate::{
    ast::Expr,
    error::{QuerySyntaxError, SyntaxErrorKind},
    lexer::{Lexeme, Token, lex},
};

/// Maximum nesting of parentheses and NOT operators.
pub const MAX_DEPTH: usize = 256;

/// Token returned when peeking past the end of the stream.
static EOF: Token = Token::Eof;

/// Options controlling how queries are parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Join adjacent operands with AND instead of rejecting them.
    pub implicit_and: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { implicit_and: true }
    }
}

/// Recursive descent parser for query expressions.
struct Parser<'q> {
    /// The original query, kept for error reporting.
    query: &'q str,
    /// Lexeme stream to parse.
    lexemes: Vec<Lexeme>,
    /// Current position in the lexeme stream.
    position: usize,
    /// Number of currently open parenthesized groups.
    groups: usize,
    /// Current recursion depth through groups and negations.
    depth: usize,
    /// Parse options.
    options: ParseOptions,
}

impl<'q> Parser<'q> {
    /// Creates a new parser from a lexeme stream.
    fn new(query: &'q str, lexemes: Vec<Lexeme>, options: ParseOptions) -> Self {
        Self {
            query,
            lexemes,
            position: 0,
            groups: 0,
            depth: 0,
            options,
        }
    }

    /// Parses the lexeme stream into a query expression.
    fn parse(mut self) -> Result<Expr, QuerySyntaxError> {
        if self.check(&Token::Eof) {
            return Ok(Expr::MatchAll);
        }

        let expr = self.parse_or()?;

        match self.peek() {
            Token::Eof => Ok(expr),
            Token::RParen => Err(self.error(SyntaxErrorKind::UnmatchedClose)),
            other => {
                let found = other.to_string();
                Err(self.error(SyntaxErrorKind::UnexpectedToken { found }))
            }
        }
    }

    /// Parses: or_expr → and_expr ("OR" and_expr)*
    fn parse_or(&mut self) -> Result<Expr, QuerySyntaxError> {
        let mut left = self.parse_and()?;

        while self.check(&Token::Or) {
            self.advance(); // consume OR
            let right = self.parse_and()?;
            left = Expr::or(left, right);
        }

        Ok(left)
    }

    /// Parses: and_expr → not_expr ("AND"? not_expr)*
    fn parse_and(&mut self) -> Result<Expr, QuerySyntaxError> {
        let mut left = self.parse_not()?;

        loop {
            if self.check(&Token::And) {
                self.advance(); // consume AND
            } else if self.peek().starts_operand() {
                if !self.options.implicit_and {
                    let found = self.peek().to_string();
                    return Err(self.error(SyntaxErrorKind::MissingOperator { found }));
                }
            } else {
                break;
            }

            let right = self.parse_not()?;
            left = Expr::and(left, right);
        }

        Ok(left)
    }

    /// Parses: not_expr → "NOT" not_expr | primary
    fn parse_not(&mut self) -> Result<Expr, QuerySyntaxError> {
        if !self.check(&Token::Not) {
            return self.parse_primary();
        }

        self.advance(); // consume NOT
        self.descend()?;
        let inner = self.parse_not()?;
        self.depth -= 1;

        Ok(Expr::not(inner))
    }

    /// Parses: primary → TERM | QUOTED | "(" or_expr ")"
    fn parse_primary(&mut self) -> Result<Expr, QuerySyntaxError> {
        match self.peek() {
            Token::Term(text) | Token::Quoted(text) => {
                let expr = Expr::term(text.as_str());
                self.advance();
                Ok(expr)
            }
            Token::LParen => self.parse_group(),
            Token::Not => self.parse_not(),
            Token::RParen if self.groups == 0 => Err(self.error(SyntaxErrorKind::UnmatchedClose)),
            Token::RParen | Token::And | Token::Or => {
                let found = self.peek().to_string();
                Err(self.error(SyntaxErrorKind::UnexpectedToken { found }))
            }
            Token::Eof => {
                let after = self
                    .position
                    .checked_sub(1)
                    .and_then(|i| self.lexemes.get(i))
                    .map_or_else(|| "start of query".to_string(), |l| l.token.to_string());
                Err(self.error(SyntaxErrorKind::UnexpectedEnd { after }))
            }
        }
    }

    /// Parses a parenthesized group, consuming the surrounding parentheses.
    fn parse_group(&mut self) -> Result<Expr, QuerySyntaxError> {
        let open_index = self.position;
        self.advance(); // consume (
        self.descend()?;
        self.groups += 1;

        let inner = self.parse_or()?;

        if !self.check(&Token::RParen) {
            let offset = self.offset_of(open_index);
            return Err(QuerySyntaxError::new(
                SyntaxErrorKind::UnclosedOpen,
                self.query,
                open_index,
                offset,
            ));
        }
        self.advance(); // consume )

        self.groups -= 1;
        self.depth -= 1;
        Ok(inner)
    }

    /// Enters one level of nesting, failing past [`MAX_DEPTH`].
    fn descend(&mut self) -> Result<(), QuerySyntaxError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(self.error(SyntaxErrorKind::TooDeep { limit: MAX_DEPTH }));
        }
        Ok(())
    }

    /// Builds an error pointing at the current token.
    fn error(&self, kind: SyntaxErrorKind) -> QuerySyntaxError {
        QuerySyntaxError::new(
            kind,
            self.query,
            self.position,
            self.offset_of(self.position),
        )
    }

    /// Returns the byte offset of the token at `index`, or the end of the query.
    fn offset_of(&self, index: usize) -> usize {
        self.lexemes
            .get(index)
            .map_or(self.query.len(), |lexeme| lexeme.offset)
    }

    /// Returns the current token without consuming it.
    fn peek(&self) -> &Token {
        self.lexemes
            .get(self.position)
            .map_or(&EOF, |lexeme| &lexeme.token)
    }

    /// Checks if the current token has the same kind as the given token.
    fn check(&self, token: &Token) -> bool {
        mem::discriminant(self.peek()) == mem::discriminant(token)
    }

    /// Advances to the next token.
    fn advance(&mut self) {
        if self.position < self.lexemes.len() {
            self.position += 1;
        }
    }
}

/// Parses a query string into an AST using default options.
///
/// Returns [`Expr::MatchAll`] for empty or whitespace-only queries.
pub fn parse(query: &str) -> Result<Expr, QuerySyntaxError> {
    parse_with(query, ParseOptions::default())
}

/// Parses a query string into an AST.
pub fn parse_with(query: &str, options: ParseOptions) -> Result<Expr, QuerySyntaxError> {
    parse_tokens(query, lex(query), options)
}

/// Parses an already-lexed token stream.
///
/// `query` is the text the lexemes were produced from; it is only used for error reporting.
/// A stream that stops without an explicit `Eof` is treated as if it ended with one.
pub fn parse_tokens(
    query: &str,
    lexemes: Vec<Lexeme>,
    options: ParseOptions,
) -> Result<Expr, QuerySyntaxError> {
    Parser::new(query, lexemes, options).parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(s: &str) -> Expr {
        Expr::term(s)
    }

    fn not(e: Expr) -> Expr {
        Expr::not(e)
    }

    fn and(l: Expr, r: Expr) -> Expr {
        Expr::and(l, r)
    }

    fn or(l: Expr, r: Expr) -> Expr {
        Expr::or(l, r)
    }

    fn strict(query: &str) -> Result<Expr, QuerySyntaxError> {
        parse_with(
            query,
            ParseOptions {
                implicit_and: false,
            },
        )
    }

    #[test]
    fn empty_query_matches_all() {
        assert_eq!(parse("").unwrap(), Expr::MatchAll);
        assert_eq!(parse("   ").unwrap(), Expr::MatchAll);
        assert_eq!(strict("\t").unwrap(), Expr::MatchAll);
    }

    #[test]
    fn single_term() {
        assert_eq!(parse("costa").unwrap(), term("costa"));
    }

    #[test]
    fn quoted_term_keeps_text() {
        assert_eq!(parse("\"corner shop\"").unwrap(), term("corner shop"));
    }

    #[test]
    fn quoted_keyword_is_a_term() {
        assert_eq!(
            parse("\"and\" AND \"or\"").unwrap(),
            and(term("and"), term("or"))
        );
    }

    #[test]
    fn and_binds_tighter_than_or() {
        assert_eq!(
            parse("costa OR tesco AND amex").unwrap(),
            or(term("costa"), and(term("tesco"), term("amex")))
        );
        assert_eq!(
            parse("tesco AND amex OR costa").unwrap(),
            or(and(term("tesco"), term("amex")), term("costa"))
        );
    }

    #[test]
    fn parentheses_override_precedence() {
        assert_eq!(
            parse("(costa OR tesco) AND amex").unwrap(),
            and(or(term("costa"), term("tesco")), term("amex"))
        );
    }

    #[test]
    fn not_binds_to_single_primary() {
        assert_eq!(
            parse("NOT a AND b").unwrap(),
            and(not(term("a")), term("b"))
        );
        assert_eq!(
            parse("NOT (a AND b)").unwrap(),
            not(and(term("a"), term("b")))
        );
    }

    #[test]
    fn double_negation() {
        assert_eq!(parse("NOT NOT a").unwrap(), not(not(term("a"))));
    }

    #[test]
    fn left_associative() {
        assert_eq!(
            parse("a AND b AND c").unwrap(),
            and(and(term("a"), term("b")), term("c"))
        );
        assert_eq!(
            parse("a OR b OR c").unwrap(),
            or(or(term("a"), term("b")), term("c"))
        );
    }

    #[test]
    fn nested_groups() {
        assert_eq!(
            parse("tesco AND (hsbc OR (costa))").unwrap(),
            and(term("tesco"), or(term("hsbc"), term("costa")))
        );
    }

    #[test]
    fn keywords_case_insensitive() {
        assert_eq!(parse("a or b and not c").unwrap(), parse("a OR b AND NOT c").unwrap());
    }

    #[test]
    fn implicit_and_between_terms() {
        assert_eq!(
            parse("costa tesco").unwrap(),
            and(term("costa"), term("tesco"))
        );
    }

    #[test]
    fn implicit_and_has_and_precedence() {
        assert_eq!(
            parse("a b OR c").unwrap(),
            or(and(term("a"), term("b")), term("c"))
        );
        assert_eq!(
            parse("a NOT b (c)").unwrap(),
            and(and(term("a"), not(term("b"))), term("c"))
        );
    }

    #[test]
    fn implicit_and_disabled_rejects_adjacent_terms() {
        let err = strict("costa tesco").unwrap_err();
        assert_eq!(
            err.kind,
            SyntaxErrorKind::MissingOperator {
                found: "term 'tesco'".into()
            }
        );
        assert_eq!(err.token_index, 1);
        assert_eq!(err.position, 6);
        assert_eq!(strict("costa AND tesco").unwrap(), and(term("costa"), term("tesco")));
    }

    #[test]
    fn trailing_operator_is_error() {
        let err = parse("costa AND").unwrap_err();
        assert_eq!(
            err.kind,
            SyntaxErrorKind::UnexpectedEnd {
                after: "AND".into()
            }
        );
        assert_eq!(err.position, 9);
        assert_eq!(err.query, "costa AND");

        assert!(matches!(
            parse("NOT").unwrap_err().kind,
            SyntaxErrorKind::UnexpectedEnd { .. }
        ));
    }

    #[test]
    fn leading_operator_is_error() {
        let err = parse("AND costa").unwrap_err();
        assert_eq!(
            err.kind,
            SyntaxErrorKind::UnexpectedToken {
                found: "AND".into()
            }
        );
        assert_eq!(err.token_index, 0);
    }

    #[test]
    fn doubled_operator_is_error() {
        let err = parse("costa OR OR tesco").unwrap_err();
        assert_eq!(err.token_index, 2);
        assert_eq!(err.position, 9);
    }

    #[test]
    fn unmatched_close_is_error() {
        let err = parse("costa)").unwrap_err();
        assert_eq!(err.kind, SyntaxErrorKind::UnmatchedClose);
        assert_eq!(err.position, 5);

        let err = parse(")").unwrap_err();
        assert_eq!(err.kind, SyntaxErrorKind::UnmatchedClose);
    }

    #[test]
    fn unclosed_open_points_at_paren() {
        let err = parse("tesco AND (hsbc OR costa").unwrap_err();
        assert_eq!(err.kind, SyntaxErrorKind::UnclosedOpen);
        assert_eq!(err.token_index, 2);
        assert_eq!(err.position, 10);
    }

    #[test]
    fn empty_group_is_error() {
        let err = parse("()").unwrap_err();
        assert_eq!(
            err.kind,
            SyntaxErrorKind::UnexpectedToken {
                found: "')'".into()
            }
        );
    }

    #[test]
    fn lone_open_paren_is_error() {
        assert!(matches!(
            parse("(").unwrap_err().kind,
            SyntaxErrorKind::UnexpectedEnd { .. }
        ));
    }

    #[test]
    fn deep_nesting_is_rejected() {
        let query = format!("{}a{}", "(".repeat(MAX_DEPTH + 1), ")".repeat(MAX_DEPTH + 1));
        assert_eq!(
            parse(&query).unwrap_err().kind,
            SyntaxErrorKind::TooDeep { limit: MAX_DEPTH }
        );

        let query = format!("{}a", "NOT ".repeat(MAX_DEPTH + 1));
        assert!(parse(&query).is_err());

        let query = format!("{}a{}", "(".repeat(MAX_DEPTH), ")".repeat(MAX_DEPTH));
        assert_eq!(parse(&query).unwrap(), term("a"));
    }

    #[test]
    fn stream_without_eof_is_accepted() {
        let lexemes = vec![Lexeme {
            token: Token::Term("costa".into()),
            offset: 0,
        }];
        assert_eq!(
            parse_tokens("costa", lexemes, ParseOptions::default()).unwrap(),
            term("costa")
        );

        let lexemes = vec![Lexeme {
            token: Token::Or,
            offset: 0,
        }];
        let err = parse_tokens("OR", lexemes, ParseOptions::default()).unwrap_err();
        assert_eq!(err.position, 0);
    }

    #[test]
    fn canonical_string_round_trips() {
        for query in [
            "costa OR tesco AND amex",
            "(costa OR tesco) AND NOT \"and\"",
            "NOT NOT a b c",
            "\"\"",
        ] {
            let expr = parse(query).unwrap();
            assert_eq!(parse(&expr.to_query_string()).unwrap(), expr, "{query}");
        }
    }

    #[test]
    fn long_query_parses_quickly() {
        let query = (0..5000)
            .map(|i| format!("term{i}"))
            .collect::<Vec<_>>()
            .join(" OR ");
        assert!(parse(&query).is_ok());
    }
}
