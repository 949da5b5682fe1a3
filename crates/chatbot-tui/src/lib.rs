//! chatbot-tui: Terminal conversation view for chatbot
//!
//! This crate provides the interactive layer on top of `chatbot-engine`:
//! - A message thread with edit and delete of user messages
//! - An input bar that locks while a reply is pending
//! - Background requests settled as they complete

mod app;
mod conversation;
mod event;
mod layout;
mod requests;
#[cfg(test)]
pub mod test_utils;
mod theme;
mod widgets;

pub use app::App;
pub use chatbot_engine;
pub use event::{key_to_action, Action, Event, EventHandler};
pub use layout::render_app;
pub use requests::PendingRequests;
pub use theme::{IconMode, IconSet, Theme};

use chatbot_engine::Backend;
use crossterm::{
    cursor::Show as ShowCursor,
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stdout};
use std::sync::Arc;
use tracing::info;

/// Tick rate of the event loop (4 Hz).
const TICK_RATE_MS: u64 = 250;

/// RAII guard for terminal state restoration.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), DisableBracketedPaste, LeaveAlternateScreen, ShowCursor);
    }
}

/// Run the TUI application against `backend`.
///
/// Sets up the terminal, starts a fresh conversation, runs the event loop
/// and restores the terminal on exit.
pub async fn run_tui(backend: Arc<dyn Backend>) -> Result<(), Box<dyn std::error::Error>> {
    // Setup terminal with RAII guard for cleanup
    enable_raw_mode()?;
    let _guard = TerminalGuard;

    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let mut app = App::new();
    let mut pending = PendingRequests::new(backend);
    let mut events = EventHandler::new(TICK_RATE_MS);

    // A conversation is started as soon as the view opens.
    info!("Starting conversation");
    pending.spawn(app.conversation.begin_start());

    let result = run_loop(&mut terminal, &mut app, &mut events, &mut pending).await;
    pending.abort_all();

    // Restore cursor before guard drops
    terminal.show_cursor()?;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &mut EventHandler,
    pending: &mut PendingRequests,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render_app(app, frame.area(), frame.buffer_mut()))?;

        if let Some(event) = events.next().await {
            match event {
                Event::Key(key) => {
                    if let Some(request) = app.handle_action(key_to_action(key)) {
                        pending.spawn(request);
                    }
                }
                Event::Paste(text) => app.paste(&text),
                Event::Tick => app.tick(),
                Event::Resize(_, _) => {
                    // Terminal will handle resize automatically
                }
            }
        }

        pending.settle_finished(app).await;

        if app.should_quit {
            info!(in_flight = pending.len(), "Quitting");
            break;
        }
    }

    Ok(())
}
