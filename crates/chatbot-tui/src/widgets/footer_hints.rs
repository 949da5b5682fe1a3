//! Footer hints widget.
//!
//! Format: `Send            [Enter] send │ [↑/↓] select │ [Ctrl+C] quit`
//!
//! The left label names the input mode; the hints on the right list the keys
//! that do something in it.

use chatbot_engine::InputMode;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::theme::Theme;

/// A single keybinding hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyHint {
    /// The key or key combination (e.g., "Enter", "Ctrl+E").
    pub key: String,
    /// The action description (e.g., "send", "edit").
    pub action: String,
}

impl KeyHint {
    /// Create a new key hint.
    pub fn new(key: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            action: action.into(),
        }
    }
}

/// Footer hints widget.
pub struct FooterHints<'a> {
    label: String,
    hints: &'a [KeyHint],
    theme: &'a Theme,
}

impl<'a> FooterHints<'a> {
    /// Create a new footer for `mode`.
    pub fn new(mode: InputMode, hints: &'a [KeyHint], theme: &'a Theme) -> Self {
        Self {
            label: mode_label(mode),
            hints,
            theme,
        }
    }
}

/// Short name of the input mode.
fn mode_label(mode: InputMode) -> String {
    match mode {
        InputMode::Composing => "Send".into(),
        InputMode::Editing(id) => format!("Edit #{id}"),
        InputMode::Busy => "Waiting".into(),
    }
}

/// Hints for the current input mode.
///
/// Edit and delete are offered only while a message is selected.
#[must_use]
pub fn hints_for_mode(mode: InputMode, has_selection: bool) -> Vec<KeyHint> {
    let mut hints = Vec::new();

    match mode {
        InputMode::Busy => {
            if has_selection {
                hints.push(KeyHint::new("Ctrl+D", "delete"));
            }
        }
        InputMode::Editing(_) => {
            hints.push(KeyHint::new("Enter", "save"));
            hints.push(KeyHint::new("Esc", "cancel"));
        }
        InputMode::Composing => {
            hints.push(KeyHint::new("Enter", "send"));
            hints.push(KeyHint::new("↑/↓", "select"));
            if has_selection {
                hints.push(KeyHint::new("Ctrl+E", "edit"));
                hints.push(KeyHint::new("Ctrl+D", "delete"));
            }
        }
    }

    hints.push(KeyHint::new("Ctrl+C", "quit"));
    hints
}

impl Widget for FooterHints<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut left_spans = vec![Span::styled(
            format!(" {}", self.label),
            Style::default().fg(self.theme.primary),
        )];
        let mut right_spans = Vec::new();

        for (i, hint) in self.hints.iter().enumerate() {
            if i > 0 {
                right_spans.push(Span::styled(" │ ", Style::default().fg(self.theme.muted)));
            }

            // Key in brackets
            right_spans.push(Span::styled("[", Style::default().fg(self.theme.muted)));
            right_spans.push(Span::styled(&hint.key, Style::default().fg(self.theme.primary)));
            right_spans.push(Span::styled("] ", Style::default().fg(self.theme.muted)));

            // Action
            right_spans.push(Span::styled(&hint.action, Style::default().fg(self.theme.subtext)));
        }
        right_spans.push(Span::raw(" "));

        // Calculate widths for alignment
        let left_width: usize = left_spans.iter().map(|s| s.content.width()).sum();
        let right_width: usize = right_spans.iter().map(|s| s.content.width()).sum();
        let padding = (area.width as usize).saturating_sub(left_width + right_width);
        if padding > 0 {
            left_spans.push(Span::raw(" ".repeat(padding)));
        }

        left_spans.extend(right_spans);

        let line = Line::from(left_spans);
        let paragraph = Paragraph::new(line).style(Style::default().bg(self.theme.surface));
        paragraph.render(area, buf);
    }
}
