//! Catppuccin Mocha color palette for the TUI.

use ratatui::style::Color;

/// Theme color palette.
#[derive(Debug, Clone)]
pub struct Theme {
    // Backgrounds
    pub base: Color,
    pub surface: Color,
    pub selection: Color,

    // Foregrounds
    pub text: Color,
    pub subtext: Color,
    pub muted: Color,

    // Accents
    pub primary: Color,
    pub secondary: Color,

    // Semantic
    pub success: Color,
    pub warning: Color,
    pub error: Color,

    // Message attribution
    pub user: Color,
    pub bot: Color,

    // Borders
    pub border: Color,
    pub border_focused: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::mocha()
    }
}

impl Theme {
    /// Catppuccin Mocha theme (default dark theme).
    pub fn mocha() -> Self {
        Self {
            // Backgrounds
            base: Color::Rgb(30, 30, 46),      // #1e1e2e
            surface: Color::Rgb(49, 50, 68),   // #313244
            selection: Color::Rgb(69, 71, 90), // #45475a

            // Foregrounds
            text: Color::Rgb(205, 214, 244),    // #cdd6f4
            subtext: Color::Rgb(166, 173, 200), // #a6adc8
            muted: Color::Rgb(108, 112, 134),   // #6c7086

            // Accents
            primary: Color::Rgb(180, 190, 254),   // #b4befe (lavender)
            secondary: Color::Rgb(148, 226, 213), // #94e2d5 (teal)

            // Semantic
            success: Color::Rgb(166, 227, 161), // #a6e3a1 (green)
            warning: Color::Rgb(249, 226, 175), // #f9e2af (yellow)
            error: Color::Rgb(243, 139, 168),   // #f38ba8 (red)

            // Message attribution
            user: Color::Rgb(203, 166, 247), // #cba6f7 (mauve)
            bot: Color::Rgb(186, 194, 222),  // #bac2de (subtext1)

            // Borders
            border: Color::Rgb(69, 71, 90),            // #45475a
            border_focused: Color::Rgb(180, 190, 254), // #b4befe (lavender)
        }
    }

    /// Terminal default colors only, for `NO_COLOR`.
    pub fn plain() -> Self {
        Self {
            base: Color::Reset,
            surface: Color::Reset,
            selection: Color::Reset,
            text: Color::Reset,
            subtext: Color::Reset,
            muted: Color::Reset,
            primary: Color::Reset,
            secondary: Color::Reset,
            success: Color::Reset,
            warning: Color::Reset,
            error: Color::Reset,
            user: Color::Reset,
            bot: Color::Reset,
            border: Color::Reset,
            border_focused: Color::Reset,
        }
    }

    /// Pick a theme from the environment, respecting `NO_COLOR`.
    pub fn from_env() -> Self {
        if std::env::var_os("NO_COLOR").is_some() {
            Self::plain()
        } else {
            Self::mocha()
        }
    }
}
