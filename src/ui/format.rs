//! Plain-text renderings of tokens and trees
//!
//! Shared by the one-shot command line mode, which prints these strings, and
//! the explorer panes, which style the same rows.

use crate::parser::ast::AstNode;
use crate::parser::lexer::Token;
use rustc_hash::FxHashMap;

const RULE_WIDTH: usize = 40;

/// Table cell for a token's value: numbers bare, everything else quoted,
/// `None` for end of input.
pub fn token_value_cell(token: &Token) -> String {
    match (token, token.value()) {
        (Token::Integer(n, _), _) => n.to_string(),
        (_, Some(text)) => format!("'{}'", text),
        (_, None) => "None".to_string(),
    }
}

/// Numbered token table with `No.`, `Type` and `Value` columns.
pub fn token_table(tokens: &[Token]) -> String {
    let rule = "-".repeat(RULE_WIDTH);
    let mut out = String::new();

    out.push_str(&rule);
    out.push('\n');
    out.push_str(&format!("{:<5} {:<12} {}", "No.", "Type", "Value"));
    out.push('\n');
    out.push_str(&rule);
    out.push('\n');

    for (i, token) in tokens.iter().enumerate() {
        out.push_str(&format!(
            "{:<5} {:<12} {}",
            i + 1,
            token.kind().name(),
            token_value_cell(token)
        ));
        out.push('\n');
    }

    out.push_str(&rule);
    out
}

/// One row of an indented tree listing.
#[derive(Debug, Clone, Copy)]
pub struct TreeLine<'a> {
    pub depth: usize,
    pub node: &'a AstNode,
}

/// Pre-order listing of `root`, parents before children.
pub fn tree_lines(root: &AstNode) -> Vec<TreeLine<'_>> {
    let mut lines = Vec::new();
    let mut stack = vec![(0, root)];

    while let Some((depth, node)) = stack.pop() {
        lines.push(TreeLine { depth, node });
        // Reversed so the left child is listed first
        for child in node.children().into_iter().rev() {
            stack.push((depth + 1, child));
        }
    }

    lines
}

/// Indented tree, two spaces per level.
pub fn tree_string(root: &AstNode) -> String {
    tree_lines(root)
        .iter()
        .map(|line| format!("{}{}", "  ".repeat(line.depth), line.node.label()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// How one name is used within a single expression.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NameUsage {
    pub assigned: usize,
    pub read: usize,
}

/// Names appearing in `root`, sorted alphabetically.
pub fn name_summary(root: &AstNode) -> Vec<(String, NameUsage)> {
    let mut usage: FxHashMap<&str, NameUsage> = FxHashMap::default();

    for line in tree_lines(root) {
        match line.node {
            AstNode::VariableReference(name, _) => {
                usage.entry(name.as_str()).or_default().read += 1;
            }
            AstNode::Assignment { name, .. } => {
                usage.entry(name.as_str()).or_default().assigned += 1;
            }
            _ => {}
        }
    }

    let mut names: Vec<(String, NameUsage)> = usage
        .into_iter()
        .map(|(name, usage)| (name.to_string(), usage))
        .collect();
    names.sort_by(|a, b| a.0.cmp(&b.0));
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse, tokenize};

    #[test]
    fn test_token_table() {
        let tokens = tokenize("x = 10").unwrap();
        let table = token_table(&tokens);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines[1], "No.   Type         Value");
        assert_eq!(lines[3], "1     IDENTIFIER   'x'");
        assert_eq!(lines[4], "2     EQUALS       '='");
        assert_eq!(lines[5], "3     INTEGER      10");
        assert_eq!(lines[6], "4     EOF          None");
        assert_eq!(lines.len(), 8);
    }

    #[test]
    fn test_tree_string() {
        let ast = parse("y = x + 5").unwrap();

        assert_eq!(
            tree_string(&ast),
            "Assignment(y)\n  BinaryOp(+)\n    VariableReference(x)\n    NumberLiteral(5)"
        );
    }

    #[test]
    fn test_tree_lines_order() {
        let ast = parse("(1 + 2) * 3").unwrap();
        let labels: Vec<(usize, String)> = tree_lines(&ast)
            .iter()
            .map(|line| (line.depth, line.node.label()))
            .collect();

        assert_eq!(
            labels,
            vec![
                (0, "BinaryOp(*)".to_string()),
                (1, "BinaryOp(+)".to_string()),
                (2, "NumberLiteral(1)".to_string()),
                (2, "NumberLiteral(2)".to_string()),
                (1, "NumberLiteral(3)".to_string()),
            ]
        );
    }

    #[test]
    fn test_name_summary() {
        let ast = parse("b = a = a * c + a").unwrap();
        let names = name_summary(&ast);

        assert_eq!(
            names,
            vec![
                ("a".to_string(), NameUsage { assigned: 1, read: 2 }),
                ("b".to_string(), NameUsage { assigned: 1, read: 0 }),
                ("c".to_string(), NameUsage { assigned: 0, read: 1 }),
            ]
        );
    }
}
