//! Query language for tally transaction search.
//!
//! Users type free text with boolean operators to filter their transactions:
//!
//! - **Terms**: `costa` - must appear somewhere in the transaction (substring, any case)
//! - **Phrases**: `"corner shop"` - quoted text is a single literal term
//! - **AND**: `tesco AND amex` - both must match (also implied by adjacency: `tesco amex`)
//! - **OR**: `costa OR starbucks` - either may match
//! - **NOT**: `NOT groceries` - must not match
//! - **Grouping**: `(costa OR tesco) AND amex` - precedence control
//!
//! Keywords are case-insensitive. An empty query parses to [`Expr::MatchAll`].
//!
//! # Example
//!
//! ```
//! use tally_query::{Expr, parse};
//!
//! let expr = parse("costa OR tesco AND amex").unwrap();
//! assert_eq!(
//!     expr,
//!     Expr::or(Expr::term("costa"), Expr::and(Expr::term("tesco"), Expr::term("amex")))
//! );
//! ```

#![warn(missing_docs)]

mod ast;
mod error;
mod lexer;
mod parser;

pub use ast::Expr;
pub use error::{QuerySyntaxError, SyntaxErrorKind};
pub use lexer::{Lexeme, Token, is_keyword, lex, tokenize};
pub use parser::{MAX_DEPTH, ParseOptions, parse, parse_tokens, parse_with};
