//! Query lexer (tokenizer).
//!
//! Converts a query string into a stream of tokens for the parser. Lexing is total: every
//! input produces a token stream terminated by [`Token::Eof`], and only the parser reports
//! syntax errors.

use std::{fmt, iter::Peekable, str::Chars};

/// A token in the query language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A bare word (search term).
    Term(String),

    /// A quoted phrase (the quotes are stripped, inner whitespace preserved).
    Quoted(String),

    /// The AND keyword.
    And,

    /// The OR keyword.
    Or,

    /// The NOT keyword.
    Not,

    /// Left parenthesis.
    LParen,

    /// Right parenthesis.
    RParen,

    /// End of input.
    Eof,
}

impl Token {
    /// Returns true if this token can begin an operand (`NotExpr` in the grammar).
    pub fn starts_operand(&self) -> bool {
        matches!(
            self,
            Self::Term(_) | Self::Quoted(_) | Self::Not | Self::LParen
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Term(text) => write!(f, "term '{text}'"),
            Self::Quoted(text) => write!(f, "phrase \"{text}\""),
            Self::And => f.write_str("AND"),
            Self::Or => f.write_str("OR"),
            Self::Not => f.write_str("NOT"),
            Self::LParen => f.write_str("'('"),
            Self::RParen => f.write_str("')'"),
            Self::Eof => f.write_str("end of query"),
        }
    }
}

/// A token together with the byte offset where it starts in the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexeme {
    /// The token.
    pub token: Token,
    /// Byte offset of the token's first character in the input.
    pub offset: usize,
}

/// Tokenizes a query string.
struct Lexer<'a> {
    /// The original input string.
    input: &'a str,
    /// Character iterator with one-character lookahead.
    chars: Peekable<Chars<'a>>,
    /// Current byte position in input.
    position: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.chars().peekable(),
            position: 0,
        }
    }

    /// Tokenizes the entire input. The final lexeme is always `Eof`.
    fn tokenize(mut self) -> Vec<Lexeme> {
        let mut lexemes = Vec::new();

        while let Some(lexeme) = self.next_lexeme() {
            lexemes.push(lexeme);
        }

        lexemes.push(Lexeme {
            token: Token::Eof,
            offset: self.input.len(),
        });
        lexemes
    }

    /// Returns the next lexeme, or None if at end of input.
    fn next_lexeme(&mut self) -> Option<Lexeme> {
        self.skip_whitespace();

        let &ch = self.chars.peek()?;
        let offset = self.position;

        let token = match ch {
            '"' => self.read_quoted(),
            '(' => {
                self.advance();
                Token::LParen
            }
            ')' => {
                self.advance();
                Token::RParen
            }
            _ => self.read_word(),
        };

        Some(Lexeme { token, offset })
    }

    /// Reads a quoted phrase. An unterminated quote runs to the end of input.
    fn read_quoted(&mut self) -> Token {
        self.advance(); // consume opening quote

        let mut content = String::new();

        while let Some(&ch) = self.chars.peek() {
            self.advance();
            if ch == '"' {
                break;
            }
            content.push(ch);
        }

        Token::Quoted(content)
    }

    /// Reads a bare word, classifying it as a keyword or a term.
    fn read_word(&mut self) -> Token {
        let mut word = String::new();

        while let Some(&ch) = self.chars.peek() {
            if ch.is_whitespace() || ch == '(' || ch == ')' || ch == '"' {
                break;
            }
            word.push(ch);
            self.advance();
        }

        keyword(&word).unwrap_or(Token::Term(word))
    }

    /// Skips whitespace characters.
    fn skip_whitespace(&mut self) {
        while let Some(&ch) = self.chars.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Advances to the next character.
    fn advance(&mut self) {
        if let Some(ch) = self.chars.next() {
            self.position += ch.len_utf8();
        }
    }
}

/// Maps an unquoted word to its operator token, if it is a keyword.
fn keyword(word: &str) -> Option<Token> {
    if word.eq_ignore_ascii_case("AND") {
        Some(Token::And)
    } else if word.eq_ignore_ascii_case("OR") {
        Some(Token::Or)
    } else if word.eq_ignore_ascii_case("NOT") {
        Some(Token::Not)
    } else {
        None
    }
}

/// Returns true if `word` is one of the operator keywords, ignoring case.
pub fn is_keyword(word: &str) -> bool {
    keyword(word).is_some()
}

/// Tokenizes a query string into lexemes carrying byte offsets.
pub fn lex(input: &str) -> Vec<Lexeme> {
    Lexer::new(input).tokenize()
}

/// Tokenizes a query string.
pub fn tokenize(input: &str) -> Vec<Token> {
    lex(input).into_iter().map(|lexeme| lexeme.token).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(s: &str) -> Token {
        Token::Term(s.into())
    }

    fn quoted(s: &str) -> Token {
        Token::Quoted(s.into())
    }

    #[test]
    fn empty_input() {
        assert_eq!(tokenize(""), vec![Token::Eof]);
    }

    #[test]
    fn whitespace_only() {
        assert_eq!(tokenize("  \t\n "), vec![Token::Eof]);
    }

    #[test]
    fn single_term() {
        assert_eq!(tokenize("costa"), vec![term("costa"), Token::Eof]);
    }

    #[test]
    fn multiple_terms() {
        assert_eq!(
            tokenize("costa  coffee"),
            vec![term("costa"), term("coffee"), Token::Eof]
        );
    }

    #[test]
    fn keywords_case_insensitive() {
        assert_eq!(
            tokenize("a and b Or c nOt d"),
            vec![
                term("a"),
                Token::And,
                term("b"),
                Token::Or,
                term("c"),
                Token::Not,
                term("d"),
                Token::Eof
            ]
        );
    }

    #[test]
    fn keyword_prefix_is_a_term() {
        assert_eq!(
            tokenize("android order notes"),
            vec![term("android"), term("order"), term("notes"), Token::Eof]
        );
    }

    #[test]
    fn quoted_phrase_preserves_whitespace() {
        assert_eq!(
            tokenize("\"corner  shop\""),
            vec![quoted("corner  shop"), Token::Eof]
        );
    }

    #[test]
    fn quoted_keyword_is_literal() {
        assert_eq!(
            tokenize("\"and\" OR \"NOT\""),
            vec![quoted("and"), Token::Or, quoted("NOT"), Token::Eof]
        );
    }

    #[test]
    fn unterminated_quote_runs_to_end() {
        assert_eq!(
            tokenize("tesco \"extra AND (more"),
            vec![term("tesco"), quoted("extra AND (more"), Token::Eof]
        );
    }

    #[test]
    fn quote_inside_word_starts_phrase() {
        assert_eq!(
            tokenize("ab\"c d\"e"),
            vec![term("ab"), quoted("c d"), term("e"), Token::Eof]
        );
    }

    #[test]
    fn parentheses_split_from_words() {
        assert_eq!(
            tokenize("(hsbc OR amex)"),
            vec![
                Token::LParen,
                term("hsbc"),
                Token::Or,
                term("amex"),
                Token::RParen,
                Token::Eof
            ]
        );
    }

    #[test]
    fn parentheses_inside_quotes_are_literal() {
        assert_eq!(tokenize("\"(a)\""), vec![quoted("(a)"), Token::Eof]);
    }

    #[test]
    fn nested_parentheses_without_spaces() {
        assert_eq!(
            tokenize("((a))"),
            vec![
                Token::LParen,
                Token::LParen,
                term("a"),
                Token::RParen,
                Token::RParen,
                Token::Eof
            ]
        );
    }

    #[test]
    fn offsets_are_byte_positions() {
        let lexemes = lex("café (bar");
        let offsets: Vec<usize> = lexemes.iter().map(|l| l.offset).collect();
        assert_eq!(offsets, vec![0, 6, 7, 10]);
        assert_eq!(lexemes.last().unwrap().token, Token::Eof);
    }

    #[test]
    fn empty_quotes_yield_empty_phrase() {
        assert_eq!(tokenize("\"\""), vec![quoted(""), Token::Eof]);
    }

    #[test]
    fn is_keyword_checks() {
        assert!(is_keyword("and"));
        assert!(is_keyword("NOT"));
        assert!(!is_keyword("nor"));
        assert!(!is_keyword(""));
    }
}
