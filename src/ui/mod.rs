//! Terminal user interface built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The UI is organized into four layers:
//!
//! - **[`app`]** — application state, keyboard event loop, pane focus, line editing
//! - **[`panes`]** — stateless render functions for each visible pane (input,
//!   tokens, tree, history, status bar)
//! - **[`format`]** — plain-text token tables and tree listings, also used by
//!   the one-shot command line mode
//! - **[`theme`]** — centralized color palette used by all panes
//!
//! The entry point for consumers is [`App`]: construct it with a
//! [`Dialect`](crate::parser::Dialect) and call [`App::run`] to start the
//! event loop.
//!
//! [`App::run`]: app::App::run

pub mod app;
pub mod format;
pub mod panes;
pub mod theme;

pub use app::App;
