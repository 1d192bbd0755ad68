//! History pane: lines entered with Enter, newest last

use crate::ui::app::HistoryEntry;
use crate::ui::panes::{clamp_scroll, pane_block};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{List, ListItem, Padding, Paragraph},
    Frame,
};
use std::collections::VecDeque;

/// Render the history pane
pub fn render_history_pane(
    frame: &mut Frame,
    area: Rect,
    history: &VecDeque<HistoryEntry>,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(" History ", is_focused);

    if history.is_empty() {
        let paragraph = Paragraph::new("(press Enter to record an expression)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let block = block.padding(Padding::new(1, 0, 0, 0));

    let all_items: Vec<ListItem> = history
        .iter()
        .map(|entry| {
            let (mark, color) = if entry.valid {
                ("✓ ", DEFAULT_THEME.success)
            } else {
                ("✗ ", DEFAULT_THEME.error)
            };
            ListItem::new(Line::from(vec![
                Span::styled(mark, Style::default().fg(color)),
                Span::styled(entry.source.clone(), Style::default().fg(DEFAULT_THEME.fg)),
                Span::styled("  ⇒ ", Style::default().fg(DEFAULT_THEME.comment)),
                Span::styled(entry.summary.clone(), Style::default().fg(color)),
            ]))
        })
        .collect();

    let visible_height = clamp_scroll(all_items.len(), area, scroll_offset);
    let visible_items: Vec<ListItem> = all_items
        .into_iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .collect();

    let list = List::new(visible_items).block(block);
    frame.render_widget(list, area);
}
