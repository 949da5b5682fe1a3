//! Test utilities for chatbot-tui rendering and state tests.

use crate::app::App;
use crate::layout::render_app;
use crate::theme::{IconMode, IconSet, Theme};
use chatbot_engine::{Message, Reply, Request};
use ratatui::{backend::TestBackend, buffer::Buffer, layout::Rect, Terminal};

/// Default terminal width for tests.
pub const TEST_WIDTH: u16 = 80;

/// Default terminal height for tests.
pub const TEST_HEIGHT: u16 = 24;

/// Create a test terminal with custom dimensions.
pub fn create_test_terminal(width: u16, height: u16) -> Terminal<TestBackend> {
    let backend = TestBackend::new(width, height);
    Terminal::new(backend).expect("Failed to create test terminal")
}

/// The thread used by [`create_test_app`].
pub fn test_messages() -> Vec<Message> {
    vec![
        Message::user(0, "Hi there"),
        Message::bot(1, "Hello! How can I help?"),
        Message::user(2, "Tell me a joke"),
        Message::bot(3, "Why did the crab never share? Because it was shellfish."),
    ]
}

/// Backend reply carrying [`test_messages`].
pub fn conversation_reply() -> Reply {
    Reply::Messages(test_messages())
}

/// Create an app with no session, Unicode icons and the default theme.
pub fn create_empty_app() -> App {
    App::with_style(Theme::default(), IconSet::new(IconMode::Unicode))
}

/// Create an app with session `conv-test` holding [`test_messages`].
pub fn create_test_app() -> App {
    let mut app = create_empty_app();
    app.settle(&Request::Start, Ok(Reply::Started("conv-test".into())));
    let load = Request::Send {
        conversation_id: "conv-test".into(),
        text: String::new(),
    };
    app.conversation.settle(&load, Ok(conversation_reply()));
    app
}

/// Convert a buffer to a string, one line per row, trailing spaces trimmed.
pub fn buffer_to_string(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut result = String::new();

    for y in area.y..area.y + area.height {
        for x in area.x..area.x + area.width {
            let cell = buffer.cell((x, y)).unwrap();
            result.push_str(cell.symbol());
        }
        while result.ends_with(' ') {
            result.pop();
        }
        result.push('\n');
    }

    if result.ends_with('\n') {
        result.pop();
    }

    result
}

/// Render the whole app into a buffer of the given size.
pub fn render_app_to_string(app: &App, width: u16, height: u16) -> String {
    let area = Rect::new(0, 0, width, height);
    let mut buffer = Buffer::empty(area);
    render_app(app, area, &mut buffer);
    buffer_to_string(&buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_terminal() {
        let terminal = create_test_terminal(TEST_WIDTH, TEST_HEIGHT);
        let size = terminal.size().unwrap();
        assert_eq!(size.width, TEST_WIDTH);
        assert_eq!(size.height, TEST_HEIGHT);
    }

    #[test]
    fn test_create_test_app() {
        let app = create_test_app();
        assert_eq!(app.conversation.conversation_id(), Some("conv-test"));
        assert_eq!(app.conversation.messages(), test_messages().as_slice());
    }

    #[test]
    fn test_buffer_to_string() {
        let area = Rect::new(0, 0, 10, 3);
        let mut buffer = Buffer::empty(area);
        buffer.set_string(0, 0, "Hello", ratatui::style::Style::default());
        buffer.set_string(0, 1, "World", ratatui::style::Style::default());

        let result = buffer_to_string(&buffer);
        assert_eq!(result, "Hello\nWorld\n");
    }
}
