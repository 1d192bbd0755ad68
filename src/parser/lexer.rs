//! Lexer (tokenizer) for arithmetic expressions
//!
//! Converts raw source text into a flat [`Token`] stream consumed by the parser.
//! The lexer can be driven in batch ([`Lexer::tokenize`]) or pulled one token at
//! a time ([`Lexer::next_token`]); both walk the same forward-only cursor.
//!
//! Identifiers that match the [`Dialect`]'s keyword set come out as
//! [`Token::Keyword`]. Keywords are recognized here and nowhere else; the
//! grammar has no production that accepts them.

use super::ast::SourceLocation;
use rustc_hash::FxHashSet;
use std::fmt;

/// Keyword set recognized by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// `var`, `if`, `else`
    Basic,
    /// [`Dialect::Basic`] plus `while` and `for`
    #[default]
    Extended,
}

impl Dialect {
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Dialect::Basic => &["var", "if", "else"],
            Dialect::Extended => &["var", "if", "else", "while", "for"],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Dialect::Basic => "basic",
            Dialect::Extended => "extended",
        }
    }

    /// The other dialect.
    pub fn toggled(self) -> Self {
        match self {
            Dialect::Basic => Dialect::Extended,
            Dialect::Extended => Dialect::Basic,
        }
    }
}

/// Token kinds without payload, used by the parser to match the grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Integer,
    Plus,
    Minus,
    Multiply,
    Divide,
    LParen,
    RParen,
    Identifier,
    Keyword,
    Equals,
    EndOfInput,
}

impl TokenKind {
    /// Upper-case name used in token tables.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Integer => "INTEGER",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Multiply => "MULTIPLY",
            TokenKind::Divide => "DIVIDE",
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Keyword => "KEYWORD",
            TokenKind::Equals => "EQUALS",
            TokenKind::EndOfInput => "EOF",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Integer => write!(f, "integer"),
            TokenKind::Identifier => write!(f, "identifier"),
            TokenKind::Keyword => write!(f, "keyword"),
            TokenKind::Plus => write!(f, "'+'"),
            TokenKind::Minus => write!(f, "'-'"),
            TokenKind::Multiply => write!(f, "'*'"),
            TokenKind::Divide => write!(f, "'/'"),
            TokenKind::LParen => write!(f, "'('"),
            TokenKind::RParen => write!(f, "')'"),
            TokenKind::Equals => write!(f, "'='"),
            TokenKind::EndOfInput => write!(f, "end of input"),
        }
    }
}

/// All token variants produced by the lexer.
///
/// Every variant carries a [`SourceLocation`] so that parse errors can report
/// an accurate position without a separate token→location table.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    Integer(u64, SourceLocation),

    // Names (raw lexeme)
    Identifier(String, SourceLocation),
    Keyword(String, SourceLocation),

    // Operators
    Plus(SourceLocation),     // +
    Minus(SourceLocation),    // -
    Multiply(SourceLocation), // *
    Divide(SourceLocation),   // /
    Equals(SourceLocation),   // =

    // Punctuation
    LParen(SourceLocation), // (
    RParen(SourceLocation), // )

    EndOfInput(SourceLocation),
}

impl Token {
    /// Returns the source location where this token appears.
    pub fn location(&self) -> SourceLocation {
        match self {
            Token::Integer(_, loc)
            | Token::Identifier(_, loc)
            | Token::Keyword(_, loc)
            | Token::Plus(loc)
            | Token::Minus(loc)
            | Token::Multiply(loc)
            | Token::Divide(loc)
            | Token::Equals(loc)
            | Token::LParen(loc)
            | Token::RParen(loc)
            | Token::EndOfInput(loc) => *loc,
        }
    }

    pub fn kind(&self) -> TokenKind {
        match self {
            Token::Integer(..) => TokenKind::Integer,
            Token::Identifier(..) => TokenKind::Identifier,
            Token::Keyword(..) => TokenKind::Keyword,
            Token::Plus(_) => TokenKind::Plus,
            Token::Minus(_) => TokenKind::Minus,
            Token::Multiply(_) => TokenKind::Multiply,
            Token::Divide(_) => TokenKind::Divide,
            Token::Equals(_) => TokenKind::Equals,
            Token::LParen(_) => TokenKind::LParen,
            Token::RParen(_) => TokenKind::RParen,
            Token::EndOfInput(_) => TokenKind::EndOfInput,
        }
    }

    /// The token's payload as text: the number, the lexeme, or the literal
    /// symbol. `None` for end of input.
    pub fn value(&self) -> Option<String> {
        match self {
            Token::Integer(n, _) => Some(n.to_string()),
            Token::Identifier(s, _) | Token::Keyword(s, _) => Some(s.clone()),
            Token::Plus(_) => Some("+".to_string()),
            Token::Minus(_) => Some("-".to_string()),
            Token::Multiply(_) => Some("*".to_string()),
            Token::Divide(_) => Some("/".to_string()),
            Token::Equals(_) => Some("=".to_string()),
            Token::LParen(_) => Some("(".to_string()),
            Token::RParen(_) => Some(")".to_string()),
            Token::EndOfInput(_) => None,
        }
    }

    pub fn is_end(&self) -> bool {
        matches!(self, Token::EndOfInput(_))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Integer(n, _) => write!(f, "integer {}", n),
            Token::Identifier(s, _) => write!(f, "identifier '{}'", s),
            Token::Keyword(s, _) => write!(f, "keyword '{}'", s),
            other => write!(f, "{}", other.kind()),
        }
    }
}

/// Lexer error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    /// A character outside the language's alphabet
    UnexpectedChar { ch: char, location: SourceLocation },

    /// A digit run too large for a `u64`
    IntegerOverflow {
        literal: String,
        location: SourceLocation,
    },
}

impl LexError {
    pub fn location(&self) -> SourceLocation {
        match self {
            LexError::UnexpectedChar { location, .. }
            | LexError::IntegerOverflow { location, .. } => *location,
        }
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexError::UnexpectedChar { ch, location } => write!(
                f,
                "Lexer error at {}: unexpected character '{}'",
                location,
                ch.escape_debug()
            ),
            LexError::IntegerOverflow { literal, location } => write!(
                f,
                "Lexer error at {}: integer literal {} is too large",
                location, literal
            ),
        }
    }
}

impl std::error::Error for LexError {}

/// Lexer for arithmetic expressions
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
    keywords: FxHashSet<&'static str>,
}

impl Lexer {
    /// Create a new lexer for the given source string using the default dialect.
    pub fn new(input: &str) -> Self {
        Self::with_dialect(input, Dialect::default())
    }

    pub fn with_dialect(input: &str, dialect: Dialect) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            keywords: dialect.keywords().iter().copied().collect(),
        }
    }

    /// Tokenize the entire input
    ///
    /// The result always ends with exactly one [`Token::EndOfInput`].
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token()?;
            let done = token.is_end();
            tokens.push(token);
            if done {
                break;
            }
        }

        Ok(tokens)
    }

    /// Scan the next token.
    ///
    /// Once the input is exhausted every call returns `EndOfInput` at the
    /// same location.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();

        let loc = self.current_location();
        let ch = match self.peek() {
            Some(ch) => ch,
            None => return Ok(Token::EndOfInput(loc)),
        };

        match ch {
            '0'..='9' => self.number_literal(),
            'a'..='z' | 'A'..='Z' | '_' => Ok(self.identifier_or_keyword()),
            _ => {
                let token = match ch {
                    '+' => Token::Plus(loc),
                    '-' => Token::Minus(loc),
                    '*' => Token::Multiply(loc),
                    '/' => Token::Divide(loc),
                    '=' => Token::Equals(loc),
                    '(' => Token::LParen(loc),
                    ')' => Token::RParen(loc),
                    _ => {
                        return Err(LexError::UnexpectedChar { ch, location: loc })
                    }
                };
                self.advance();
                Ok(token)
            }
        }
    }

    /// Parse numeric literal (maximal digit run)
    fn number_literal(&mut self) -> Result<Token, LexError> {
        let loc = self.current_location();
        let mut num_str = String::new();

        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                num_str.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        let value = num_str.parse::<u64>().map_err(|_| LexError::IntegerOverflow {
            literal: num_str.clone(),
            location: loc,
        })?;

        Ok(Token::Integer(value, loc))
    }

    /// Parse identifier or keyword
    fn identifier_or_keyword(&mut self) -> Token {
        let loc = self.current_location();
        let mut ident = String::new();

        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                ident.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        if self.keywords.contains(ident.as_str()) {
            Token::Keyword(ident, loc)
        } else {
            Token::Identifier(ident, loc)
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(' ' | '\t' | '\r' | '\n') = self.peek() {
            self.advance();
        }
    }

    /// Peek at current character without consuming
    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    /// Get current source location
    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.position, self.line, self.column)
    }
}

/// Tokenize `source` with the default dialect.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).tokenize()
}

pub fn tokenize_with(source: &str, dialect: Dialect) -> Result<Vec<Token>, LexError> {
    Lexer::with_dialect(source, dialect).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_tokens() {
        let tokens = tokenize("(10 + 2) * 5").unwrap();

        assert!(matches!(tokens[0], Token::LParen(_)));
        assert!(matches!(tokens[1], Token::Integer(10, _)));
        assert!(matches!(tokens[2], Token::Plus(_)));
        assert!(matches!(tokens[3], Token::Integer(2, _)));
        assert!(matches!(tokens[4], Token::RParen(_)));
        assert!(matches!(tokens[5], Token::Multiply(_)));
        assert!(matches!(tokens[6], Token::Integer(5, _)));
        assert!(matches!(tokens[7], Token::EndOfInput(_)));
        assert_eq!(tokens.len(), 8);
    }

    #[test]
    fn test_operators() {
        let tokens = tokenize("+ - * / ( ) =").unwrap();
        let kinds: Vec<TokenKind> = tokens.iter().map(Token::kind).collect();

        assert_eq!(
            kinds,
            vec![
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Multiply,
                TokenKind::Divide,
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::Equals,
                TokenKind::EndOfInput,
            ]
        );
    }

    #[test]
    fn test_multi_digit_integer() {
        let tokens = tokenize("123").unwrap();

        assert_eq!(tokens.len(), 2);
        assert!(matches!(tokens[0], Token::Integer(123, _)));
    }

    #[test]
    fn test_identifiers_and_keywords() {
        let tokens = tokenize("var my_var _tmp x1 while").unwrap();

        assert!(matches!(tokens[0], Token::Keyword(ref s, _) if s == "var"));
        assert!(matches!(tokens[1], Token::Identifier(ref s, _) if s == "my_var"));
        assert!(matches!(tokens[2], Token::Identifier(ref s, _) if s == "_tmp"));
        assert!(matches!(tokens[3], Token::Identifier(ref s, _) if s == "x1"));
        assert!(matches!(tokens[4], Token::Keyword(ref s, _) if s == "while"));
    }

    #[test]
    fn test_basic_dialect_keywords() {
        let tokens = tokenize_with("if while for", Dialect::Basic).unwrap();

        assert!(matches!(tokens[0], Token::Keyword(ref s, _) if s == "if"));
        assert!(matches!(tokens[1], Token::Identifier(ref s, _) if s == "while"));
        assert!(matches!(tokens[2], Token::Identifier(ref s, _) if s == "for"));
    }

    #[test]
    fn test_digit_then_letter_splits() {
        let tokens = tokenize("12ab").unwrap();

        assert!(matches!(tokens[0], Token::Integer(12, _)));
        assert!(matches!(tokens[1], Token::Identifier(ref s, _) if s == "ab"));
    }

    #[test]
    fn test_unexpected_character() {
        let err = tokenize("3 $ 4").unwrap_err();

        match err {
            LexError::UnexpectedChar { ch, location } => {
                assert_eq!(ch, '$');
                assert_eq!(location.offset, 2);
                assert_eq!(location.column, 3);
            }
            other => panic!("Expected unexpected character, got {:?}", other),
        }
    }

    #[test]
    fn test_integer_overflow() {
        let err = tokenize("99999999999999999999999").unwrap_err();
        assert!(matches!(err, LexError::IntegerOverflow { .. }));
    }

    #[test]
    fn test_locations_track_lines() {
        let tokens = tokenize("x\n  = 1").unwrap();

        assert_eq!(tokens[1].location(), SourceLocation::new(4, 2, 3));
        assert_eq!(tokens[2].location(), SourceLocation::new(6, 2, 5));
        assert_eq!(tokens[3].location(), SourceLocation::new(7, 2, 6));
    }

    #[test]
    fn test_end_of_input_repeats() {
        let mut lexer = Lexer::new(" 7 ");

        assert!(matches!(lexer.next_token().unwrap(), Token::Integer(7, _)));
        let first = lexer.next_token().unwrap();
        let second = lexer.next_token().unwrap();
        assert!(first.is_end());
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_input() {
        let tokens = tokenize("   \t\n").unwrap();

        assert_eq!(tokens.len(), 1);
        assert!(tokens[0].is_end());
    }
}
