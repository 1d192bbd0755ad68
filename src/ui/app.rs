//! Main TUI application state and logic

use crate::parser::ast::AstNode;
use crate::parser::lexer::{tokenize_with, Dialect, LexError, Token};
use crate::parser::parse::{parse_tokens, ParseError};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    Frame, Terminal,
    backend::Backend,
    layout::{Constraint, Direction, Layout},
};
use std::collections::VecDeque;
use std::io;
use std::time::Duration;

/// Entries kept in the history pane; the oldest is dropped first.
pub const HISTORY_CAPACITY: usize = 100;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Input,
    Tokens,
    Tree,
    History,
}

impl FocusedPane {
    /// Move focus to the next pane (input -> tokens -> tree -> history)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Input => FocusedPane::Tokens,
            FocusedPane::Tokens => FocusedPane::Tree,
            FocusedPane::Tree => FocusedPane::History,
            FocusedPane::History => FocusedPane::Input,
        }
    }

    /// Move focus to the previous pane
    pub fn prev(self) -> Self {
        match self {
            FocusedPane::Input => FocusedPane::History,
            FocusedPane::Tokens => FocusedPane::Input,
            FocusedPane::Tree => FocusedPane::Tokens,
            FocusedPane::History => FocusedPane::Tree,
        }
    }
}

/// Lexer and parser output for the current input line.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub tokens: Result<Vec<Token>, LexError>,
    pub ast: Result<AstNode, ParseError>,
}

impl Analysis {
    /// Tokenize once and parse the resulting tokens.
    pub fn run(source: &str, dialect: Dialect) -> Self {
        let tokens = tokenize_with(source, dialect);
        let ast = match &tokens {
            Ok(tokens) => parse_tokens(tokens.clone()).map_err(ParseError::from),
            Err(err) => Err(ParseError::from(err.clone())),
        };
        Analysis { tokens, ast }
    }

    pub fn is_valid(&self) -> bool {
        self.ast.is_ok()
    }
}

/// A line the user entered with Enter.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub source: String,
    pub valid: bool,
    /// S-expression of the tree, or the error message
    pub summary: String,
}

/// The main application state
pub struct App {
    /// Current input line
    pub input: String,

    /// Cursor position within `input`, in characters
    pub cursor: usize,

    pub dialect: Dialect,

    /// Result of analyzing `input`, refreshed on every edit
    pub analysis: Analysis,

    pub history: VecDeque<HistoryEntry>,

    /// Index into `history` while recalling entries with Up/Down
    pub history_cursor: Option<usize>,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Per-pane scroll offsets
    pub tokens_scroll: usize,
    pub tree_scroll: usize,
    pub history_scroll: usize,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,
}

impl App {
    pub fn new(dialect: Dialect) -> Self {
        App {
            input: String::new(),
            cursor: 0,
            dialect,
            analysis: Analysis::run("", dialect),
            history: VecDeque::new(),
            history_cursor: None,
            focused_pane: FocusedPane::Input,
            tokens_scroll: 0,
            tree_scroll: 0,
            history_scroll: 0,
            should_quit: false,
            status_message: String::from("Type an expression"),
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if event::poll(POLL_INTERVAL)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        // Input, body, history, status bar
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(8),
                Constraint::Length(1),
            ])
            .split(size);

        // Body: tokens (left) | tree (right)
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(rows[1]);

        super::panes::render_input_pane(
            frame,
            rows[0],
            &self.input,
            self.cursor,
            self.analysis.ast.as_ref().err(),
            self.focused_pane == FocusedPane::Input,
        );

        super::panes::render_tokens_pane(
            frame,
            columns[0],
            &self.analysis.tokens,
            self.focused_pane == FocusedPane::Tokens,
            &mut self.tokens_scroll,
        );

        super::panes::render_tree_pane(
            frame,
            columns[1],
            &self.analysis.ast,
            self.input.trim().is_empty(),
            self.focused_pane == FocusedPane::Tree,
            &mut self.tree_scroll,
        );

        super::panes::render_history_pane(
            frame,
            rows[2],
            &self.history,
            self.focused_pane == FocusedPane::History,
            &mut self.history_scroll,
        );

        super::panes::render_status_bar(
            frame,
            rows[3],
            &self.status_message,
            self.status(),
            self.dialect,
        );
    }

    /// Validity of the current input as shown in the status bar
    pub fn status(&self) -> InputStatus {
        if self.input.trim().is_empty() {
            InputStatus::Empty
        } else if self.analysis.is_valid() {
            InputStatus::Valid
        } else {
            InputStatus::Invalid
        }
    }

    /// Handle keyboard events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if ctrl => self.should_quit = true,
            KeyCode::Tab => self.focused_pane = self.focused_pane.next(),
            KeyCode::BackTab => self.focused_pane = self.focused_pane.prev(),
            KeyCode::F(2) => {
                self.dialect = self.dialect.toggled();
                self.reanalyze();
                self.status_message = format!("Dialect: {}", self.dialect.name());
            }
            _ if self.focused_pane == FocusedPane::Input => self.handle_input_key(key, ctrl),
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            KeyCode::Up => {
                let scroll = self.focused_scroll();
                *scroll = scroll.saturating_sub(1);
            }
            KeyCode::Down => {
                let scroll = self.focused_scroll();
                *scroll = scroll.saturating_add(1);
            }
            _ => {}
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent, ctrl: bool) {
        match key.code {
            KeyCode::Char(c) if !ctrl => {
                let at = self.byte_index();
                self.input.insert(at, c);
                self.cursor += 1;
                self.edited();
            }
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let at = self.byte_index();
                    self.input.remove(at);
                    self.edited();
                }
            }
            KeyCode::Delete => {
                if self.cursor < self.input.chars().count() {
                    let at = self.byte_index();
                    self.input.remove(at);
                    self.edited();
                }
            }
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(self.input.chars().count());
            }
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.input.chars().count(),
            KeyCode::Up => self.recall_previous(),
            KeyCode::Down => self.recall_next(),
            KeyCode::Enter => self.submit(),
            _ => {}
        }
    }

    /// Record the current line in history and start a fresh one.
    fn submit(&mut self) {
        let source = self.input.trim().to_string();

        if source.eq_ignore_ascii_case("exit") {
            self.should_quit = true;
            return;
        }
        if source.is_empty() {
            return;
        }

        let (valid, summary) = match &self.analysis.ast {
            Ok(ast) => (true, ast.to_string()),
            Err(err) => (false, err.to_string()),
        };
        self.status_message = if valid {
            format!("Recorded: {}", summary)
        } else {
            "Recorded invalid input".to_string()
        };

        self.history.push_back(HistoryEntry {
            source,
            valid,
            summary,
        });
        while self.history.len() > HISTORY_CAPACITY {
            self.history.pop_front();
        }
        // Keep the newest entry in view
        self.history_scroll = usize::MAX;

        self.set_input(String::new());
    }

    fn recall_previous(&mut self) {
        if self.history.is_empty() {
            return;
        }
        let index = match self.history_cursor {
            Some(i) => i.saturating_sub(1),
            None => self.history.len() - 1,
        };
        let source = self.history[index].source.clone();
        self.set_input(source);
        self.history_cursor = Some(index);
    }

    fn recall_next(&mut self) {
        match self.history_cursor {
            Some(i) if i + 1 < self.history.len() => {
                let source = self.history[i + 1].source.clone();
                self.set_input(source);
                self.history_cursor = Some(i + 1);
            }
            Some(_) => self.set_input(String::new()),
            None => {}
        }
    }

    fn set_input(&mut self, input: String) {
        self.cursor = input.chars().count();
        self.input = input;
        self.edited();
    }

    /// Called after every change to `input`
    fn edited(&mut self) {
        self.history_cursor = None;
        self.tokens_scroll = 0;
        self.tree_scroll = 0;
        self.reanalyze();
    }

    fn reanalyze(&mut self) {
        self.analysis = Analysis::run(&self.input, self.dialect);
    }

    fn byte_index(&self) -> usize {
        self.input
            .char_indices()
            .nth(self.cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.input.len())
    }

    fn focused_scroll(&mut self) -> &mut usize {
        match self.focused_pane {
            FocusedPane::Tree => &mut self.tree_scroll,
            FocusedPane::History => &mut self.history_scroll,
            FocusedPane::Tokens | FocusedPane::Input => &mut self.tokens_scroll,
        }
    }
}

/// Validity badge shown in the status bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputStatus {
    Empty,
    Valid,
    Invalid,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_typing_reanalyzes() {
        let mut app = App::new(Dialect::Extended);
        assert_eq!(app.status(), InputStatus::Empty);

        type_str(&mut app, "x = 1 +");
        assert_eq!(app.status(), InputStatus::Invalid);

        type_str(&mut app, " 2");
        assert_eq!(app.status(), InputStatus::Valid);
        assert_eq!(app.analysis.ast.as_ref().unwrap().to_string(), "(= x (+ 1 2))");
    }

    #[test]
    fn test_cursor_editing() {
        let mut app = App::new(Dialect::Extended);
        type_str(&mut app, "12");
        press(&mut app, KeyCode::Left);
        type_str(&mut app, "+");
        assert_eq!(app.input, "1+2");

        press(&mut app, KeyCode::Home);
        press(&mut app, KeyCode::Delete);
        assert_eq!(app.input, "+2");

        press(&mut app, KeyCode::End);
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.input, "+");
        assert_eq!(app.cursor, 1);
    }

    #[test]
    fn test_submit_and_recall() {
        let mut app = App::new(Dialect::Extended);
        type_str(&mut app, "a = 1");
        press(&mut app, KeyCode::Enter);
        type_str(&mut app, "(b");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.history.len(), 2);
        assert!(app.history[0].valid);
        assert_eq!(app.history[0].summary, "(= a 1)");
        assert!(!app.history[1].valid);
        assert!(app.input.is_empty());

        press(&mut app, KeyCode::Up);
        assert_eq!(app.input, "(b");
        press(&mut app, KeyCode::Up);
        assert_eq!(app.input, "a = 1");
        press(&mut app, KeyCode::Down);
        assert_eq!(app.input, "(b");
        press(&mut app, KeyCode::Down);
        assert!(app.input.is_empty());
    }

    #[test]
    fn test_history_is_bounded() {
        let mut app = App::new(Dialect::Extended);
        for i in 0..HISTORY_CAPACITY + 5 {
            type_str(&mut app, &i.to_string());
            press(&mut app, KeyCode::Enter);
        }

        assert_eq!(app.history.len(), HISTORY_CAPACITY);
        assert_eq!(app.history[0].source, "5");
    }

    #[test]
    fn test_exit_quits() {
        let mut app = App::new(Dialect::Extended);
        type_str(&mut app, "exit");
        press(&mut app, KeyCode::Enter);
        assert!(app.should_quit);
    }

    #[test]
    fn test_q_types_into_input_but_quits_elsewhere() {
        let mut app = App::new(Dialect::Extended);
        type_str(&mut app, "q");
        assert!(!app.should_quit);
        assert_eq!(app.input, "q");

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focused_pane, FocusedPane::Tokens);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_dialect_toggle() {
        let mut app = App::new(Dialect::Extended);
        type_str(&mut app, "while");
        assert_eq!(app.status(), InputStatus::Invalid);

        press(&mut app, KeyCode::F(2));
        assert_eq!(app.dialect, Dialect::Basic);
        assert_eq!(app.status(), InputStatus::Valid);
    }

    #[test]
    fn test_ctrl_c_quits() {
        let mut app = App::new(Dialect::Extended);
        app.handle_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
        assert!(app.input.is_empty());
    }
}
