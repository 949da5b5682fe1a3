//! Event handling for the chatbot TUI.

use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;
use tokio::sync::mpsc;

/// Events that can occur in the TUI.
#[derive(Debug, Clone)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// A tick event for UI updates.
    Tick,
    /// Text pasted in one go (bracketed paste).
    Paste(String),
    /// Terminal was resized.
    Resize(u16, u16),
}

/// Event handler that runs in a background thread.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    _tx: mpsc::UnboundedSender<Event>,
}

impl EventHandler {
    /// Create a new event handler with the specified tick rate.
    pub fn new(tick_rate_ms: u64) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let tx_clone = tx.clone();

        // crossterm polling is blocking, so it gets its own thread
        std::thread::spawn(move || {
            let tick_rate = Duration::from_millis(tick_rate_ms);
            loop {
                let event = if event::poll(tick_rate).unwrap_or(false) {
                    match event::read() {
                        Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                            Some(Event::Key(key))
                        }
                        Ok(CrosstermEvent::Paste(text)) => Some(Event::Paste(text)),
                        Ok(CrosstermEvent::Resize(w, h)) => Some(Event::Resize(w, h)),
                        _ => None,
                    }
                } else {
                    Some(Event::Tick)
                };

                if let Some(e) = event {
                    if tx_clone.send(e).is_err() {
                        break;
                    }
                }
            }
        });

        Self { rx, _tx: tx }
    }

    /// Get the next event, waiting until one is available.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

/// Key action that can be performed in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    /// Send the input, or save it when editing.
    Submit,
    /// Cancel an edit, or clear the input.
    Cancel,
    /// Start a new conversation.
    Reset,
    /// Edit the selected message.
    Edit,
    /// Delete the selected message.
    Delete,
    SelectPrev,
    SelectNext,
    Insert(char),
    Backspace,
    DeleteChar,
    Left,
    Right,
    Home,
    End,
    None,
}

/// Convert a key event to an action.
pub fn key_to_action(key: KeyEvent) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Action::Quit,
            KeyCode::Char('r') => Action::Reset,
            KeyCode::Char('e') => Action::Edit,
            KeyCode::Char('d') => Action::Delete,
            _ => Action::None,
        };
    }

    match key.code {
        KeyCode::Enter => Action::Submit,
        KeyCode::Esc => Action::Cancel,
        KeyCode::Up => Action::SelectPrev,
        KeyCode::Down => Action::SelectNext,
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::ALT) => Action::Insert(c),
        KeyCode::Backspace => Action::Backspace,
        KeyCode::Delete => Action::DeleteChar,
        KeyCode::Left => Action::Left,
        KeyCode::Right => Action::Right,
        KeyCode::Home => Action::Home,
        KeyCode::End => Action::End,
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_control_shortcuts() {
        assert_eq!(key_to_action(ctrl('c')), Action::Quit);
        assert_eq!(key_to_action(ctrl('r')), Action::Reset);
        assert_eq!(key_to_action(ctrl('e')), Action::Edit);
        assert_eq!(key_to_action(ctrl('d')), Action::Delete);
        assert_eq!(key_to_action(ctrl('x')), Action::None);
    }

    #[test]
    fn test_plain_characters_are_text() {
        // Letters that are shortcuts with Ctrl are ordinary input without it.
        assert_eq!(key_to_action(key(KeyCode::Char('e'))), Action::Insert('e'));
        assert_eq!(key_to_action(key(KeyCode::Char('q'))), Action::Insert('q'));
        let shifted = KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT);
        assert_eq!(key_to_action(shifted), Action::Insert('A'));
    }

    #[test]
    fn test_alt_characters_ignored() {
        let alt = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::ALT);
        assert_eq!(key_to_action(alt), Action::None);
    }

    #[test]
    fn test_navigation_keys() {
        assert_eq!(key_to_action(key(KeyCode::Enter)), Action::Submit);
        assert_eq!(key_to_action(key(KeyCode::Esc)), Action::Cancel);
        assert_eq!(key_to_action(key(KeyCode::Up)), Action::SelectPrev);
        assert_eq!(key_to_action(key(KeyCode::Down)), Action::SelectNext);
        assert_eq!(key_to_action(key(KeyCode::Backspace)), Action::Backspace);
        assert_eq!(key_to_action(key(KeyCode::Delete)), Action::DeleteChar);
        assert_eq!(key_to_action(key(KeyCode::Home)), Action::Home);
        assert_eq!(key_to_action(key(KeyCode::End)), Action::End);
    }
}
