//! Conversation pane module.
//!
//! The message thread and the text the input area shows when it is empty.

mod placeholder;
mod widget;

pub use placeholder::input_placeholder;
pub use widget::ThreadPane;
