//! Expression parsing implementation
//!
//! Grammar, lowest precedence first:
//!
//! ```text
//! expression     := assignment | additive
//! assignment     := IDENTIFIER '=' expression
//! additive       := multiplicative (('+' | '-') multiplicative)*
//! multiplicative := primary (('*' | '/') primary)*
//! primary        := INTEGER | IDENTIFIER | '(' expression ')'
//! ```
//!
//! Assignment is only taken when the identifier is directly followed by `=`;
//! that needs one token of lookahead, which [`Parser::peek`] provides. It is
//! right-associative, so `a = b = 1` nests to the right. The binary operators
//! are left-associative: each loop iteration folds the tree built so far
//! into the left child.
//!
//! Only nesting recurses, and it is capped at [`MAX_NESTING`] levels; long
//! operator chains are built iteratively.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::{Token, TokenKind};
use crate::parser::parse::{Parser, SyntaxError, TokenStream, MAX_NESTING};

/// Description used when an operand is missing.
pub(crate) const EXPECTED_OPERAND: &str = "integer, identifier, or '('";

impl<S> Parser<S>
where
    S: TokenStream,
    S::Error: From<SyntaxError>,
{
    /// Parse expression (top-level entry point)
    ///
    /// Every parenthesized group and chained assignment re-enters here, so
    /// this is where nesting is counted.
    pub(crate) fn parse_expression(&mut self) -> Result<AstNode, S::Error> {
        if self.nesting >= MAX_NESTING {
            return Err(self.error(&format!("at most {} levels of nesting", MAX_NESTING)));
        }

        self.nesting += 1;
        let result = self.parse_expression_inner();
        self.nesting -= 1;
        result
    }

    fn parse_expression_inner(&mut self) -> Result<AstNode, S::Error> {
        if self.check(TokenKind::Identifier)
            && matches!(self.peek()?, Token::Equals(_))
        {
            return self.parse_assignment();
        }

        self.parse_additive()
    }

    /// Parse assignment: IDENTIFIER '=' expression (right-associative)
    fn parse_assignment(&mut self) -> Result<AstNode, S::Error> {
        let (name, location) = match self.advance()? {
            Token::Identifier(name, loc) => (name, loc),
            other => return Err(SyntaxError::new(other, "identifier").into()),
        };
        self.expect(TokenKind::Equals, "'='")?;

        let value = Box::new(self.parse_expression()?);
        Ok(AstNode::Assignment {
            name,
            value,
            location,
        })
    }

    /// Parse additive (+, -)
    fn parse_additive(&mut self) -> Result<AstNode, S::Error> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let op = match self.current() {
                Token::Plus(_) => BinOp::Add,
                Token::Minus(_) => BinOp::Sub,
                _ => break,
            };
            let loc = self.advance()?.location();
            let right = Box::new(self.parse_multiplicative()?);
            left = AstNode::BinaryOp {
                op,
                left: Box::new(left),
                right,
                location: loc,
            };
        }

        Ok(left)
    }

    /// Parse multiplicative (*, /)
    fn parse_multiplicative(&mut self) -> Result<AstNode, S::Error> {
        let mut left = self.parse_primary()?;

        loop {
            let op = match self.current() {
                Token::Multiply(_) => BinOp::Mul,
                Token::Divide(_) => BinOp::Div,
                _ => break,
            };
            let loc = self.advance()?.location();
            let right = Box::new(self.parse_primary()?);
            left = AstNode::BinaryOp {
                op,
                left: Box::new(left),
                right,
                location: loc,
            };
        }

        Ok(left)
    }

    /// Parse primary: literals, variables, parenthesized expressions
    fn parse_primary(&mut self) -> Result<AstNode, S::Error> {
        match self.current() {
            Token::Integer(..) | Token::Identifier(..) => {}
            Token::LParen(_) => {
                self.advance()?;
                let expr = self.parse_expression()?;
                self.expect(TokenKind::RParen, "')'")?;
                return Ok(expr);
            }
            _ => return Err(self.error(EXPECTED_OPERAND)),
        }

        match self.advance()? {
            Token::Integer(n, loc) => Ok(AstNode::NumberLiteral(n, loc)),
            Token::Identifier(name, loc) => {
                Ok(AstNode::VariableReference(name, loc))
            }
            other => Err(SyntaxError::new(other, EXPECTED_OPERAND).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::lexer::Token;
    use crate::parser::parse::{parse, ParseError, MAX_NESTING};

    fn sexpr(source: &str) -> String {
        parse(source).unwrap().to_string()
    }

    fn syntax_error(source: &str) -> crate::parser::parse::SyntaxError {
        match parse(source) {
            Err(ParseError::Syntax(err)) => err,
            other => panic!("Expected syntax error for {:?}, got {:?}", source, other),
        }
    }

    #[test]
    fn test_precedence() {
        let ast = parse("2 + 3 * 4").unwrap();

        match &ast {
            AstNode::BinaryOp {
                op: BinOp::Add,
                left,
                right,
                ..
            } => {
                assert!(matches!(**left, AstNode::NumberLiteral(2, _)));
                match right.as_ref() {
                    AstNode::BinaryOp {
                        op: BinOp::Mul,
                        left,
                        right,
                        ..
                    } => {
                        assert!(matches!(**left, AstNode::NumberLiteral(3, _)));
                        assert!(matches!(**right, AstNode::NumberLiteral(4, _)));
                    }
                    other => panic!("Expected multiplication, got {:?}", other),
                }
            }
            other => panic!("Expected addition, got {:?}", other),
        }
    }

    #[test]
    fn test_left_associative() {
        assert_eq!(sexpr("10 - 3 - 2"), "(- (- 10 3) 2)");
        assert_eq!(sexpr("8 / 4 / 2"), "(/ (/ 8 4) 2)");
        assert_eq!(sexpr("1 - 2 + 3"), "(+ (- 1 2) 3)");
    }

    #[test]
    fn test_grouping() {
        assert_eq!(sexpr("(1 + 2) * 3"), "(* (+ 1 2) 3)");
        assert_eq!(sexpr("((42))"), "42");
        assert_eq!(sexpr("((1+2)*(3+4))"), "(* (+ 1 2) (+ 3 4))");
    }

    #[test]
    fn test_variable_reference() {
        let ast = parse("x").unwrap();
        assert!(matches!(ast, AstNode::VariableReference(ref s, _) if s == "x"));
    }

    #[test]
    fn test_assignment() {
        let ast = parse("x = 5").unwrap();

        match &ast {
            AstNode::Assignment { name, value, location } => {
                assert_eq!(name, "x");
                assert!(matches!(**value, AstNode::NumberLiteral(5, _)));
                assert_eq!(location.offset, 0);
            }
            other => panic!("Expected assignment, got {:?}", other),
        }

        assert_eq!(sexpr("y = x + 5"), "(= y (+ x 5))");
    }

    #[test]
    fn test_chained_assignment() {
        assert_eq!(sexpr("a = b = 3"), "(= a (= b 3))");
    }

    #[test]
    fn test_assignment_inside_parentheses() {
        assert_eq!(sexpr("(a = 2) * 3"), "(* (= a 2) 3)");
    }

    #[test]
    fn test_identifier_not_followed_by_equals() {
        assert_eq!(sexpr("x + y * z"), "(+ x (* y z))");
    }

    #[test]
    fn test_assignment_target_must_be_identifier() {
        let err = syntax_error("1 = 2");
        assert!(matches!(err.found, Token::Equals(_)));
        assert_eq!(err.expected, "end of input");

        let err = syntax_error("x + y = 2");
        assert!(matches!(err.found, Token::Equals(_)));
    }

    #[test]
    fn test_missing_operand() {
        let err = syntax_error("10 + * ");
        assert!(matches!(err.found, Token::Multiply(_)));
        assert_eq!(err.expected, "integer, identifier, or '('");
        assert_eq!(err.location.offset, 5);
    }

    #[test]
    fn test_unclosed_paren() {
        let err = syntax_error("(1 + 2");
        assert!(err.found.is_end());
        assert_eq!(err.expected, "')'");
    }

    #[test]
    fn test_trailing_rparen() {
        let err = syntax_error("10 + 2)");
        assert!(matches!(err.found, Token::RParen(_)));
        assert_eq!(err.expected, "end of input");
        assert_eq!(err.location.offset, 6);
    }

    #[test]
    fn test_empty_input() {
        for source in ["", "   "] {
            let err = syntax_error(source);
            assert!(err.found.is_end());
            assert_eq!(err.expected, "integer, identifier, or '('");
        }
    }

    #[test]
    fn test_keyword_is_not_an_operand() {
        let err = syntax_error("var x = 1");
        assert!(matches!(err.found, Token::Keyword(ref s, _) if s == "var"));
    }

    #[test]
    fn test_dangling_operator() {
        let err = syntax_error("10 +");
        assert!(err.found.is_end());
    }

    fn nested_parens(levels: usize) -> String {
        format!("{}1{}", "(".repeat(levels), ")".repeat(levels))
    }

    #[test]
    fn test_nesting_just_under_limit() {
        // The top-level expression counts as one level
        let ast = parse(&nested_parens(MAX_NESTING - 1)).unwrap();
        assert!(matches!(ast, AstNode::NumberLiteral(1, _)));
    }

    #[test]
    fn test_nesting_past_limit() {
        let err = syntax_error(&nested_parens(MAX_NESTING));
        assert_eq!(err.expected, "at most 64 levels of nesting");
        assert!(matches!(err.found, Token::Integer(1, _)));
        assert_eq!(err.location.offset, MAX_NESTING);

        // Far past the limit still fails cleanly
        syntax_error(&nested_parens(100_000));
    }

    #[test]
    fn test_chained_assignment_limit() {
        let chain = |links: usize| format!("{}1", "a = ".repeat(links));

        let ast = parse(&chain(MAX_NESTING - 1)).unwrap();
        assert_eq!(ast.depth(), MAX_NESTING - 1);

        let err = syntax_error(&chain(MAX_NESTING));
        assert!(matches!(err.found, Token::Integer(1, _)));
    }

    #[test]
    fn test_nesting_resets_between_groups() {
        let group = nested_parens(MAX_NESTING - 1);
        let source = format!("{} + {} * {}", group, group, group);
        assert_eq!(sexpr(&source), "(+ 1 (* 1 1))");
    }

    #[test]
    fn test_long_operator_chain() {
        let source = vec!["1"; 100_000].join("+");
        let ast = parse(&source).unwrap();

        assert_eq!(ast.depth(), 99_999);
        assert!(ast.to_string().starts_with(&"(+ ".repeat(10)));
        drop(ast);
    }
}
