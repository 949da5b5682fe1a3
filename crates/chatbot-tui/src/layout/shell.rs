//! Main screen layout with 4 regions.
//!
//! Regions:
//! 1. Header (top, 1 line)
//! 2. Thread pane (expands)
//! 3. Input bar (3 lines)
//! 4. Footer hints (bottom, 1 line)

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::{Paragraph, Widget, Wrap},
};

use crate::app::App;
use crate::conversation::ThreadPane;
use crate::widgets::{hints_for_mode, FooterHints, Header, InputBar};

/// Minimum terminal width.
pub const MIN_WIDTH: u16 = 30;
/// Minimum terminal height.
pub const MIN_HEIGHT: u16 = 8;

/// Height of the bordered input bar.
const INPUT_HEIGHT: u16 = 3;

/// Render the whole app into `buf`.
pub fn render_app(app: &App, area: Rect, buf: &mut Buffer) {
    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        render_too_small(app, area, buf);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),            // Header
            Constraint::Min(0),               // Thread (expands)
            Constraint::Length(INPUT_HEIGHT), // Input
            Constraint::Length(1),            // Footer hints
        ])
        .split(area);

    let conversation = &app.conversation;
    let mode = app.input_mode();
    let has_session = conversation.conversation_id().is_some();

    Header::new(conversation.conversation_id(), &app.theme, &app.icons).render(chunks[0], buf);

    ThreadPane::new(conversation.messages(), &app.theme, &app.icons)
        .selected(app.selected)
        .editing(conversation.editing())
        .has_session(has_session)
        .render(chunks[1], buf);

    InputBar::new(&app.input, &app.theme, &app.icons)
        .mode(mode)
        .has_session(has_session)
        .tick(app.tick)
        .render(chunks[2], buf);

    let hints = hints_for_mode(mode, app.selected.is_some());
    FooterHints::new(mode, &hints, &app.theme).render(chunks[3], buf);
}

/// Render "terminal too small" warning.
fn render_too_small(app: &App, area: Rect, buf: &mut Buffer) {
    Paragraph::new(format!(
        "Terminal too small. Need at least {MIN_WIDTH}x{MIN_HEIGHT}."
    ))
    .style(Style::default().fg(app.theme.error))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .render(area, buf);
}
