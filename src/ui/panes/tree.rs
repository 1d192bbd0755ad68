//! AST pane rendering
//!
//! Shows the tree for the current input, one node per row, indented by depth
//! with guide characters, followed by the names the expression assigns and
//! reads. When parsing fails the pane shows the error instead.

use crate::parser::ast::AstNode;
use crate::parser::parse::ParseError;
use crate::ui::format::{name_summary, tree_lines, NameUsage};
use crate::ui::panes::{clamp_scroll, pane_block};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Padding, Paragraph, Wrap},
    Frame,
};

/// Render the AST pane
pub fn render_tree_pane(
    frame: &mut Frame,
    area: Rect,
    ast: &Result<AstNode, ParseError>,
    input_is_empty: bool,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(" Syntax Tree ", is_focused);

    let root = match ast {
        Ok(root) => root,
        Err(_) if input_is_empty => {
            let paragraph = Paragraph::new("(no input)")
                .block(block)
                .style(Style::default().fg(DEFAULT_THEME.comment));
            frame.render_widget(paragraph, area);
            return;
        }
        Err(err) => {
            let paragraph = Paragraph::new(err.to_string())
                .block(block)
                .style(Style::default().fg(DEFAULT_THEME.error))
                .wrap(Wrap { trim: true });
            frame.render_widget(paragraph, area);
            return;
        }
    };

    let block = block.padding(Padding::new(1, 0, 0, 0));

    let lines = tree_lines(root);
    let names = name_summary(root);
    // Blank separator plus one row per name
    let name_rows = if names.is_empty() { 0 } else { names.len() + 1 };
    let total_rows = lines.len() + name_rows;

    let visible_height = clamp_scroll(total_rows, area, scroll_offset);
    let max_guides = usize::from(area.width) / 2;

    // Only the visible window is formatted; deep trees have long guides
    let visible_items: Vec<ListItem> = (*scroll_offset..total_rows)
        .take(visible_height)
        .map(|row| match lines.get(row) {
            Some(line) => node_row(line.depth, line.node, max_guides),
            None if row == lines.len() => ListItem::new(""),
            None => {
                let (name, usage) = &names[row - lines.len() - 1];
                name_row(name, *usage)
            }
        })
        .collect();

    let list = List::new(visible_items).block(block);
    frame.render_widget(list, area);
}

fn name_row(name: &str, usage: NameUsage) -> ListItem<'static> {
    ListItem::new(Line::from(vec![
        Span::styled(
            format!("{:<12}", name),
            Style::default().fg(DEFAULT_THEME.identifier),
        ),
        Span::styled(
            format!("assigned {}  read {}", usage.assigned, usage.read),
            Style::default().fg(DEFAULT_THEME.comment),
        ),
    ]))
}

fn node_row(depth: usize, node: &AstNode, max_guides: usize) -> ListItem<'static> {
    let guide = if depth == 0 {
        String::new()
    } else {
        format!("{}└ ", "│ ".repeat((depth - 1).min(max_guides)))
    };

    let (name, detail, color) = match node {
        AstNode::NumberLiteral(n, _) => ("NumberLiteral", n.to_string(), DEFAULT_THEME.number),
        AstNode::VariableReference(name, _) => {
            ("VariableReference", name.clone(), DEFAULT_THEME.identifier)
        }
        AstNode::BinaryOp { op, .. } => ("BinaryOp", op.to_string(), DEFAULT_THEME.operator),
        AstNode::Assignment { name, .. } => ("Assignment", name.clone(), DEFAULT_THEME.secondary),
    };

    ListItem::new(Line::from(vec![
        Span::styled(guide, Style::default().fg(DEFAULT_THEME.border_normal)),
        Span::styled(
            name,
            Style::default().fg(DEFAULT_THEME.fg).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" {}", detail), Style::default().fg(color)),
    ]))
}
