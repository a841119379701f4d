//! Terminal UI: Elm-style event loop over a single search view.

pub mod app;
pub mod events;
pub mod layout;
pub mod services;
pub mod theme;
pub mod views;
pub mod widgets;

use std::io;

use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

use crate::config::AppConfig;
use app::AppState;
use services::Services;

/// Set up the terminal, run the app until quit, and restore the terminal.
///
/// The terminal is restored even when the loop returns an error.
pub async fn run(config: AppConfig) -> io::Result<()> {
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let services = Services::init(&config, event_tx);
    let mut app = AppState::new(event_rx, services, config.tui.annotate_by_default);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app.run(&mut terminal, config.tick_rate()).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}
