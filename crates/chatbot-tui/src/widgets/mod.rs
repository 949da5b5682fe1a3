//! UI widgets for the TUI.
//!
//! This module provides:
//! - [`Header`] - Title bar with the conversation id and reset hint
//! - [`InputBar`] - Message entry box
//! - [`FooterHints`] - Bottom keybinding hints
//! - [`TextInputState`] - Editable single-line buffer behind the input bar

mod footer_hints;
mod header;
mod input_bar;
mod text_input;

pub use footer_hints::{hints_for_mode, FooterHints};
pub use header::Header;
pub use input_bar::InputBar;
pub use text_input::TextInputState;
