//! TUI pane rendering modules
//!
//! Each pane module exports one stateless `render_*` function taking the
//! frame, its area, the data to show and (for scrollable panes) a mutable
//! scroll offset that the renderer clamps to the content height.
//!
//! # Pane Modules
//!
//! - [`input`]: single-line expression editor with the error position marked
//! - [`tokens`]: token table for the current input
//! - [`tree`]: indented AST with a name summary, or the parse error
//! - [`history`]: previously entered lines
//! - [`status`]: status bar with validity badge and keybindings

pub mod history;
pub mod input;
pub mod status;
pub mod tokens;
pub mod tree;

pub use history::render_history_pane;
pub use input::render_input_pane;
pub use status::render_status_bar;
pub use tokens::render_tokens_pane;
pub use tree::render_tree_pane;

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders},
};

/// Bordered block with the focus highlight applied
pub(crate) fn pane_block(title: &str, is_focused: bool) -> Block<'_> {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style)
}

/// Clamp `scroll_offset` so the last page stays full, and return how many
/// rows fit inside the bordered `area`.
pub(crate) fn clamp_scroll(total_items: usize, area: Rect, scroll_offset: &mut usize) -> usize {
    let visible_height = area.height.saturating_sub(2).max(1) as usize; // Account for borders, min 1

    if total_items > visible_height {
        let max_scroll = total_items - visible_height;
        *scroll_offset = (*scroll_offset).min(max_scroll);
    } else {
        *scroll_offset = 0;
    }

    visible_height
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_scroll() {
        let area = Rect::new(0, 0, 20, 7);

        let mut scroll = usize::MAX;
        assert_eq!(clamp_scroll(10, area, &mut scroll), 5);
        assert_eq!(scroll, 5);

        let mut scroll = 3;
        clamp_scroll(4, area, &mut scroll);
        assert_eq!(scroll, 0);
    }
}
