//! Token table pane

use crate::parser::lexer::{LexError, Token, TokenKind};
use crate::ui::format::token_value_cell;
use crate::ui::panes::{clamp_scroll, pane_block};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Padding, Paragraph, Wrap},
    Frame,
};

/// Render the token table pane
pub fn render_tokens_pane(
    frame: &mut Frame,
    area: Rect,
    tokens: &Result<Vec<Token>, LexError>,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(" Tokens ", is_focused);

    let tokens = match tokens {
        Ok(tokens) => tokens,
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

    let header = ListItem::new(Line::from(Span::styled(
        format!("{:<4} {:<11} {:<8} {}", "No.", "Type", "Value", "Pos"),
        Style::default()
            .fg(DEFAULT_THEME.comment)
            .add_modifier(Modifier::BOLD),
    )));

    // One row is taken by the header
    let visible_height = clamp_scroll(tokens.len() + 1, area, scroll_offset).saturating_sub(1);

    let rows = tokens
        .iter()
        .enumerate()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|(i, token)| token_row(i + 1, token));
    let visible_items: Vec<ListItem> = std::iter::once(header).chain(rows).collect();

    let list = List::new(visible_items).block(block);
    frame.render_widget(list, area);
}

fn token_row(number: usize, token: &Token) -> ListItem<'static> {
    let kind = token.kind();
    let color = match kind {
        TokenKind::Integer => DEFAULT_THEME.number,
        TokenKind::Identifier => DEFAULT_THEME.identifier,
        TokenKind::Keyword => DEFAULT_THEME.keyword,
        TokenKind::EndOfInput => DEFAULT_THEME.comment,
        TokenKind::LParen | TokenKind::RParen => DEFAULT_THEME.primary,
        _ => DEFAULT_THEME.operator,
    };

    ListItem::new(Line::from(vec![
        Span::styled(
            format!("{:<4} ", number),
            Style::default().fg(DEFAULT_THEME.comment),
        ),
        Span::styled(format!("{:<11} ", kind.name()), Style::default().fg(color)),
        Span::styled(
            format!("{:<8} ", token_value_cell(token)),
            Style::default().fg(DEFAULT_THEME.fg),
        ),
        Span::styled(
            token.location().offset.to_string(),
            Style::default().fg(DEFAULT_THEME.comment),
        ),
    ]))
}
