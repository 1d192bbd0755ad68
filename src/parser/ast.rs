// AST (Abstract Syntax Tree) definitions for the expression language

use std::fmt;

/// Source location information for error reporting
///
/// `offset` is the zero-based character index into the source text;
/// `line` and `column` are one-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(offset: usize, line: usize, column: usize) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }

    /// Location of the first character of a source text.
    pub fn start() -> Self {
        Self::new(0, 1, 1)
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}, column {} (offset {})",
            self.line, self.column, self.offset
        )
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinOp {
    /// The operator as written in source.
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// AST nodes produced by the parser
///
/// The tree is closed over four variants. Parentheses never appear as
/// nodes; they only shape the tree.
///
/// Operator chains can be arbitrarily long, so dropping, comparing and
/// printing walk the tree with an explicit stack instead of recursing.
#[derive(Debug, Clone)]
pub enum AstNode {
    NumberLiteral(u64, SourceLocation),
    VariableReference(String, SourceLocation),
    BinaryOp {
        op: BinOp,
        left: Box<AstNode>,
        right: Box<AstNode>,
        location: SourceLocation, // operator token
    },
    Assignment {
        name: String,
        value: Box<AstNode>,
        location: SourceLocation, // assigned identifier
    },
}

impl AstNode {
    /// Get the source location of this node
    pub fn location(&self) -> &SourceLocation {
        match self {
            AstNode::NumberLiteral(_, loc) => loc,
            AstNode::VariableReference(_, loc) => loc,
            AstNode::BinaryOp { location, .. } => location,
            AstNode::Assignment { location, .. } => location,
        }
    }

    /// Direct children, left to right. Leaves return an empty list.
    pub fn children(&self) -> Vec<&AstNode> {
        match self {
            AstNode::NumberLiteral(..) | AstNode::VariableReference(..) => {
                Vec::new()
            }
            AstNode::BinaryOp { left, right, .. } => {
                vec![left.as_ref(), right.as_ref()]
            }
            AstNode::Assignment { value, .. } => vec![value.as_ref()],
        }
    }

    /// One-line description of this node alone, without its children.
    pub fn label(&self) -> String {
        match self {
            AstNode::NumberLiteral(n, _) => format!("NumberLiteral({})", n),
            AstNode::VariableReference(name, _) => {
                format!("VariableReference({})", name)
            }
            AstNode::BinaryOp { op, .. } => format!("BinaryOp({})", op),
            AstNode::Assignment { name, .. } => format!("Assignment({})", name),
        }
    }

    /// Number of edges on the longest path from this node to a leaf.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(0, self)];

        while let Some((depth, node)) = stack.pop() {
            deepest = deepest.max(depth);
            for child in node.children() {
                stack.push((depth + 1, child));
            }
        }

        deepest
    }

    fn is_leaf(&self) -> bool {
        matches!(
            self,
            AstNode::NumberLiteral(..) | AstNode::VariableReference(..)
        )
    }

    /// Move interior children onto `stack`, leaving leaves in their place.
    fn detach_subtrees(&mut self, stack: &mut Vec<AstNode>) {
        fn detach(child: &mut AstNode, stack: &mut Vec<AstNode>) {
            if !child.is_leaf() {
                let placeholder = AstNode::NumberLiteral(0, *child.location());
                stack.push(std::mem::replace(child, placeholder));
            }
        }

        match self {
            AstNode::NumberLiteral(..) | AstNode::VariableReference(..) => {}
            AstNode::BinaryOp { left, right, .. } => {
                detach(left, stack);
                detach(right, stack);
            }
            AstNode::Assignment { value, .. } => detach(value, stack),
        }
    }
}

impl Drop for AstNode {
    fn drop(&mut self) {
        let mut stack = Vec::new();
        self.detach_subtrees(&mut stack);

        // Each popped node has its subtrees detached before it is dropped,
        // so no drop recurses more than one level.
        while let Some(mut node) = stack.pop() {
            node.detach_subtrees(&mut stack);
        }
    }
}

impl PartialEq for AstNode {
    fn eq(&self, other: &Self) -> bool {
        let mut stack = vec![(self, other)];

        while let Some((a, b)) = stack.pop() {
            let same_node = match (a, b) {
                (AstNode::NumberLiteral(x, l1), AstNode::NumberLiteral(y, l2)) => {
                    x == y && l1 == l2
                }
                (
                    AstNode::VariableReference(x, l1),
                    AstNode::VariableReference(y, l2),
                ) => x == y && l1 == l2,
                (
                    AstNode::BinaryOp {
                        op: o1,
                        location: l1,
                        ..
                    },
                    AstNode::BinaryOp {
                        op: o2,
                        location: l2,
                        ..
                    },
                ) => o1 == o2 && l1 == l2,
                (
                    AstNode::Assignment {
                        name: n1,
                        location: l1,
                        ..
                    },
                    AstNode::Assignment {
                        name: n2,
                        location: l2,
                        ..
                    },
                ) => n1 == n2 && l1 == l2,
                _ => false,
            };
            if !same_node {
                return false;
            }
            // Same variant, so the child lists have the same length
            stack.extend(a.children().into_iter().zip(b.children()));
        }

        true
    }
}

/// Pending output while printing a tree.
enum Piece<'a> {
    Node(&'a AstNode),
    Text(&'static str),
}

/// Compact s-expression form, e.g. `(= y (+ x 5))`.
impl fmt::Display for AstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack = vec![Piece::Node(self)];

        while let Some(piece) = stack.pop() {
            match piece {
                Piece::Text(text) => f.write_str(text)?,
                Piece::Node(AstNode::NumberLiteral(n, _)) => write!(f, "{}", n)?,
                Piece::Node(AstNode::VariableReference(name, _)) => f.write_str(name)?,
                Piece::Node(AstNode::BinaryOp {
                    op, left, right, ..
                }) => {
                    write!(f, "({} ", op)?;
                    stack.push(Piece::Text(")"));
                    stack.push(Piece::Node(right.as_ref()));
                    stack.push(Piece::Text(" "));
                    stack.push(Piece::Node(left.as_ref()));
                }
                Piece::Node(AstNode::Assignment { name, value, .. }) => {
                    write!(f, "(= {} ", name)?;
                    stack.push(Piece::Text(")"));
                    stack.push(Piece::Node(value.as_ref()));
                }
            }
        }

        Ok(())
    }
}
