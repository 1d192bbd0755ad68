//! Expression front end
//!
//! This module transforms source text into an Abstract Syntax Tree (AST):
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`parse`]: Parser state, errors and entry points (tokens → AST)
//! - `expressions`: the grammar rules
//! - [`ast`]: AST node definitions
//!
//! # Language
//!
//! - Non-negative integer literals, identifiers (`[A-Za-z_][A-Za-z0-9_]*`)
//! - Binary `+ - * /` with the usual precedence, left-associative
//! - Parentheses for grouping
//! - Assignment `name = expression`, right-associative
//! - Keywords (`var`, `if`, `else`, and per [`lexer::Dialect`] `while`, `for`)
//!   are tokenized but rejected by the grammar
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser with one token of lookahead.
//! No external parser generator dependencies.

pub mod ast;
mod expressions;
pub mod lexer;
pub mod parse;

pub use lexer::{tokenize, tokenize_with, Dialect};
pub use parse::{parse, parse_tokens, parse_with, validate};
