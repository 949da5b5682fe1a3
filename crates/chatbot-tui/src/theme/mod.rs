//! Theme components for the TUI.
//!
//! This module provides:
//! - [`Theme`] - Color palette (Catppuccin Mocha, or plain for `NO_COLOR`)
//! - [`IconSet`] - Glyphs with Unicode/ASCII modes

mod colors;
mod icons;

pub use colors::Theme;
pub use icons::{IconMode, IconSet};
