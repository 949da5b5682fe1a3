//! Mode-aware placeholder text for the input area.

use chatbot_engine::InputMode;

/// Get placeholder text for the input area.
///
/// The placeholder tells the user what Enter will do right now.
#[must_use]
pub fn input_placeholder(mode: InputMode, has_session: bool) -> &'static str {
    match mode {
        InputMode::Busy => "Waiting for reply...",
        _ if !has_session => "Waiting for a conversation...",
        InputMode::Editing(_) => "Rewrite your message...",
        InputMode::Composing => "Type your message...",
    }
}
