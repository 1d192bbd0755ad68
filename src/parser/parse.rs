//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including error types, helper methods, and the public entry points.
//!
//! # Parser Architecture
//!
//! - This module: Parser state, token pulling, `expect`, error types
//! - `expressions`: the grammar rules, one method per precedence level
//!
//! # Token pulling
//!
//! The parser does not require a pre-built token vector. It pulls tokens from
//! any [`TokenStream`]: a live [`Lexer`] or a [`TokenBuffer`] over tokens
//! produced earlier. It holds the current token plus at most one peeked token,
//! so every token is requested from the stream exactly once.

use crate::parser::ast::{AstNode, SourceLocation};
use crate::parser::lexer::{Dialect, LexError, Lexer, Token, TokenKind};
use std::fmt;

/// Maximum nesting of expressions (parenthesized groups and chained
/// assignments); keeps recursion off the end of the native stack.
pub const MAX_NESTING: usize = 64;

/// A source of tokens the parser can pull from.
pub trait TokenStream {
    type Error;

    /// Produce the next token. After `EndOfInput` has been returned, the
    /// parser does not call this again.
    fn next_token(&mut self) -> Result<Token, Self::Error>;
}

impl TokenStream for Lexer {
    type Error = ParseError;

    fn next_token(&mut self) -> Result<Token, ParseError> {
        Ok(Lexer::next_token(self)?)
    }
}

/// Pre-tokenized input.
///
/// If the tokens do not end with `EndOfInput`, one is synthesized at the
/// location of the last token. Tokens after the first `EndOfInput` are
/// never yielded.
pub struct TokenBuffer {
    tokens: std::vec::IntoIter<Token>,
    end: SourceLocation,
    finished: bool,
}

impl TokenBuffer {
    pub fn new(tokens: Vec<Token>) -> Self {
        let end = tokens
            .last()
            .map(Token::location)
            .unwrap_or_else(SourceLocation::start);
        Self {
            tokens: tokens.into_iter(),
            end,
            finished: false,
        }
    }
}

impl TokenStream for TokenBuffer {
    type Error = SyntaxError;

    fn next_token(&mut self) -> Result<Token, SyntaxError> {
        if self.finished {
            return Ok(Token::EndOfInput(self.end));
        }
        let token = self
            .tokens
            .next()
            .unwrap_or(Token::EndOfInput(self.end));
        if token.is_end() {
            self.finished = true;
            self.end = token.location();
        }
        Ok(token)
    }
}

/// The token stream did not match the grammar.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxError {
    /// The offending token (`EndOfInput` if the stream ran out early)
    pub found: Token,
    /// What the grammar would have accepted here
    pub expected: String,
    pub location: SourceLocation,
}

impl SyntaxError {
    pub fn new(found: Token, expected: impl Into<String>) -> Self {
        let location = found.location();
        Self {
            found,
            expected: expected.into(),
            location,
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Syntax error at {}: expected {}, found {}",
            self.location, self.expected, self.found
        )
    }
}

impl std::error::Error for SyntaxError {}

/// Parser error type
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    Lex(LexError),
    Syntax(SyntaxError),
}

impl ParseError {
    pub fn location(&self) -> SourceLocation {
        match self {
            ParseError::Lex(err) => err.location(),
            ParseError::Syntax(err) => err.location,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Lex(err) => write!(f, "{}", err),
            ParseError::Syntax(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Lex(err) => Some(err),
            ParseError::Syntax(err) => Some(err),
        }
    }
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError::Lex(err)
    }
}

impl From<SyntaxError> for ParseError {
    fn from(err: SyntaxError) -> Self {
        ParseError::Syntax(err)
    }
}

/// Recursive descent parser for arithmetic expressions
///
/// Errors are reported in the stream's error type; syntax errors are
/// converted into it, so a parser over a [`Lexer`] reports [`ParseError`]
/// and one over a [`TokenBuffer`] reports plain [`SyntaxError`]s.
pub struct Parser<S: TokenStream> {
    pub(crate) stream: S,
    pub(crate) current: Token,
    pub(crate) lookahead: Option<Token>,
    /// Open `expression` levels, bounded by [`MAX_NESTING`]
    pub(crate) nesting: usize,
}

impl<S> Parser<S>
where
    S: TokenStream,
    S::Error: From<SyntaxError>,
{
    /// Create a parser, pulling the first token from `stream`.
    pub fn new(mut stream: S) -> Result<Self, S::Error> {
        let current = stream.next_token()?;
        Ok(Self {
            stream,
            current,
            lookahead: None,
            nesting: 0,
        })
    }

    /// Parse one complete expression; the whole stream must be consumed.
    pub fn parse(&mut self) -> Result<AstNode, S::Error> {
        let ast = self.parse_expression()?;

        if !self.is_at_end() {
            return Err(SyntaxError::new(self.current.clone(), "end of input").into());
        }

        Ok(ast)
    }

    // ===== Helper methods =====

    pub(crate) fn current(&self) -> &Token {
        &self.current
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.current.kind() == kind
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.current.is_end()
    }

    /// Move to the next token and return the one just consumed.
    ///
    /// At end of input the current token stays `EndOfInput` and the stream
    /// is not asked again.
    pub(crate) fn advance(&mut self) -> Result<Token, S::Error> {
        if self.is_at_end() {
            return Ok(self.current.clone());
        }
        let next = match self.lookahead.take() {
            Some(token) => token,
            None => self.stream.next_token()?,
        };
        Ok(std::mem::replace(&mut self.current, next))
    }

    /// Look at the token after the current one without consuming anything.
    pub(crate) fn peek(&mut self) -> Result<&Token, S::Error> {
        if self.is_at_end() {
            return Ok(&self.current);
        }
        if self.lookahead.is_none() {
            self.lookahead = Some(self.stream.next_token()?);
        }
        Ok(self.lookahead.as_ref().unwrap_or(&self.current))
    }

    /// Consume the current token if it has the given kind; otherwise fail
    /// with a syntax error naming what was expected.
    pub(crate) fn expect(
        &mut self,
        kind: TokenKind,
        expected: &str,
    ) -> Result<Token, S::Error> {
        if self.check(kind) {
            self.advance()
        } else {
            Err(self.error(expected))
        }
    }

    pub(crate) fn error(&self, expected: &str) -> S::Error {
        SyntaxError::new(self.current.clone(), expected).into()
    }
}

/// Parse `source` with the default dialect.
pub fn parse(source: &str) -> Result<AstNode, ParseError> {
    parse_with(source, Dialect::default())
}

pub fn parse_with(source: &str, dialect: Dialect) -> Result<AstNode, ParseError> {
    let mut parser = Parser::new(Lexer::with_dialect(source, dialect))?;
    parser.parse()
}

/// Parse tokens produced by an earlier [`tokenize`](crate::parser::lexer::tokenize).
pub fn parse_tokens(tokens: Vec<Token>) -> Result<AstNode, SyntaxError> {
    let mut parser = Parser::new(TokenBuffer::new(tokens))?;
    parser.parse()
}

/// Check whether `source` is a valid expression, discarding the tree.
pub fn validate(source: &str) -> Result<(), ParseError> {
    parse(source).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::tokenize;

    /// Counts how many tokens the parser asks for.
    struct Counting {
        lexer: Lexer,
        pulled: usize,
    }

    impl TokenStream for Counting {
        type Error = ParseError;

        fn next_token(&mut self) -> Result<Token, ParseError> {
            self.pulled += 1;
            Ok(self.lexer.next_token()?)
        }
    }

    #[test]
    fn test_each_token_pulled_once() {
        let stream = Counting {
            lexer: Lexer::new("a = b = x + 1"),
            pulled: 0,
        };
        let mut parser = Parser::new(stream).unwrap();
        parser.parse().unwrap();

        // a = b = x + 1 <eof>
        assert_eq!(parser.stream.pulled, 8);
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut parser = Parser::new(Lexer::new("x = 1")).unwrap();

        assert!(matches!(parser.peek().unwrap(), Token::Equals(_)));
        assert!(matches!(parser.peek().unwrap(), Token::Equals(_)));
        assert!(matches!(parser.current(), Token::Identifier(ref s, _) if s == "x"));

        parser.advance().unwrap();
        assert!(matches!(parser.current(), Token::Equals(_)));
        assert!(parser.lookahead.is_none());
    }

    #[test]
    fn test_expect_mismatch() {
        let mut parser = Parser::new(Lexer::new("+")).unwrap();
        let err = parser.expect(TokenKind::RParen, "')'").unwrap_err();

        match err {
            ParseError::Syntax(err) => {
                assert_eq!(err.expected, "')'");
                assert!(matches!(err.found, Token::Plus(_)));
                assert_eq!(err.location.offset, 0);
            }
            other => panic!("Expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_token_buffer_without_end() {
        let mut tokens = tokenize("1 + 2").unwrap();
        tokens.pop();

        let ast = parse_tokens(tokens).unwrap();
        assert_eq!(ast.to_string(), "(+ 1 2)");
    }

    #[test]
    fn test_token_buffer_stops_at_first_end() {
        let mut tokens = tokenize("1").unwrap();
        tokens.extend(tokenize("+ 2").unwrap());

        let ast = parse_tokens(tokens).unwrap();
        assert_eq!(ast.to_string(), "1");
    }

    #[test]
    fn test_error_display() {
        let err = parse("(1 + 2").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Syntax error at line 1, column 7 (offset 6): expected ')', found end of input"
        );
    }
}
