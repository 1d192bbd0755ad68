//! Expression input pane
//!
//! Shows the line being edited and places the terminal cursor. When the
//! current line fails to lex or parse, the offending character is underlined
//! in the error color (or a marker is drawn past the end for errors at end of
//! input).

use crate::parser::parse::ParseError;
use crate::ui::panes::pane_block;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Render the input pane
pub fn render_input_pane(
    frame: &mut Frame,
    area: Rect,
    input: &str,
    cursor: usize,
    error: Option<&ParseError>,
    is_focused: bool,
) {
    let block = pane_block(" Expression ", is_focused);

    let error_offset = if input.trim().is_empty() {
        None
    } else {
        error.map(|err| err.location().offset)
    };

    let inner_width = usize::from(area.width.saturating_sub(2));
    let offset = horizontal_offset(cursor, inner_width);

    let line = highlight_error(input, error_offset);
    let paragraph = Paragraph::new(line)
        .block(block)
        .scroll((0, u16::try_from(offset).unwrap_or(u16::MAX)));
    frame.render_widget(paragraph, area);

    if is_focused && inner_width > 0 {
        // Inside the border; the prompt adds no prefix
        let column = u16::try_from(cursor - offset).unwrap_or(u16::MAX);
        let x = area.x.saturating_add(1).saturating_add(column);
        let y = area.y.saturating_add(1);
        frame.set_cursor_position(Position::new(x, y));
    }
}

/// First visible column, scrolled just far enough to keep the cursor on
/// screen.
fn horizontal_offset(cursor: usize, inner_width: usize) -> usize {
    cursor.saturating_sub(inner_width.saturating_sub(1))
}

/// Split `input` into spans, marking the character at `error_offset`.
fn highlight_error(input: &str, error_offset: Option<usize>) -> Line<'static> {
    let normal = Style::default().fg(DEFAULT_THEME.fg);
    let marked = Style::default()
        .fg(DEFAULT_THEME.error)
        .add_modifier(Modifier::UNDERLINED | Modifier::BOLD);

    let chars: Vec<char> = input.chars().collect();
    let Some(offset) = error_offset else {
        return Line::from(Span::styled(input.to_string(), normal));
    };

    let before: String = chars.iter().take(offset).collect();
    let mut spans = vec![Span::styled(before, normal)];

    match chars.get(offset) {
        Some(ch) => {
            spans.push(Span::styled(ch.to_string(), marked));
            let after: String = chars.iter().skip(offset + 1).collect();
            spans.push(Span::styled(after, normal));
        }
        None => spans.push(Span::styled("␣", marked)),
    }

    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_marks_offending_char() {
        let line = highlight_error("1 $ 2", Some(2));

        assert_eq!(line.spans.len(), 3);
        assert_eq!(line.spans[0].content, "1 ");
        assert_eq!(line.spans[1].content, "$");
        assert_eq!(line.spans[2].content, " 2");
    }

    #[test]
    fn test_horizontal_offset_keeps_cursor_visible() {
        assert_eq!(horizontal_offset(5, 10), 0);
        assert_eq!(horizontal_offset(9, 10), 0);
        assert_eq!(horizontal_offset(10, 10), 1);
        assert_eq!(horizontal_offset(25, 10), 16);

        // Far past u16::MAX the cursor still lands in the last column
        let cursor = 200_000;
        assert_eq!(cursor - horizontal_offset(cursor, 80), 79);
        assert_eq!(horizontal_offset(3, 0), 3);
    }

    #[test]
    fn test_highlight_at_end_of_input() {
        let line = highlight_error("(1", Some(2));

        assert_eq!(line.spans.len(), 2);
        assert_eq!(line.spans[1].content, "␣");
    }
}
