//! # Introduction
//!
//! exparse is a recursive-descent front end for a small arithmetic language
//! with variables: integers, `+ - * /`, parentheses and assignment. It turns
//! source text into tokens and tokens into an abstract syntax tree, or
//! rejects the input with the first error found. Nothing is evaluated.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → Tokens → Parser → AST → (table / tree / TUI)
//! ```
//!
//! 1. [`parser`] — tokenises the source and builds an AST. Entry points:
//!    [`tokenize`], [`parse`], [`parse_tokens`], [`validate`].
//! 2. [`ui`] — plain-text formatting and a ratatui-based explorer; not part of
//!    the stable library API.
//!
//! ```
//! let ast = exparse::parse("y = x + 5").unwrap();
//! assert_eq!(ast.to_string(), "(= y (+ x 5))");
//! ```

pub mod parser;
pub mod ui;

pub use parser::ast::{AstNode, BinOp, SourceLocation};
pub use parser::lexer::{LexError, Token, TokenKind};
pub use parser::parse::{ParseError, SyntaxError, MAX_NESTING};
pub use parser::{parse, parse_tokens, parse_with, tokenize, tokenize_with, validate, Dialect};
