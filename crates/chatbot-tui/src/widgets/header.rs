//! Header bar widget for the top of the TUI.
//!
//! Format: `Sample Chatbot │ ● conv-id                [Ctrl+R] Reset Conversation`

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::theme::{IconSet, Theme};

/// Title shown at the left of the header.
pub const APP_TITLE: &str = "Sample Chatbot";

/// Header bar widget.
pub struct Header<'a> {
    conversation_id: Option<&'a str>,
    theme: &'a Theme,
    icons: &'a IconSet,
}

impl<'a> Header<'a> {
    /// Create a new header widget.
    pub fn new(conversation_id: Option<&'a str>, theme: &'a Theme, icons: &'a IconSet) -> Self {
        Self {
            conversation_id,
            theme,
            icons,
        }
    }
}

impl Widget for Header<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut left = vec![
            Span::styled(
                format!(" {APP_TITLE}"),
                Style::default()
                    .fg(self.theme.primary)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" │ ", Style::default().fg(self.theme.muted)),
        ];

        match self.conversation_id {
            Some(id) => {
                left.push(Span::styled(
                    format!("{} ", self.icons.session()),
                    Style::default().fg(self.theme.success),
                ));
                left.push(Span::styled(id, Style::default().fg(self.theme.subtext)));
            }
            None => {
                left.push(Span::styled(
                    "no conversation",
                    Style::default().fg(self.theme.error),
                ));
            }
        }

        let right = vec![
            Span::styled("[", Style::default().fg(self.theme.muted)),
            Span::styled("Ctrl+R", Style::default().fg(self.theme.primary)),
            Span::styled("] ", Style::default().fg(self.theme.muted)),
            Span::styled(
                "Reset Conversation ",
                Style::default().fg(self.theme.subtext),
            ),
        ];

        let left_width: usize = left.iter().map(|s| s.content.width()).sum();
        let right_width: usize = right.iter().map(|s| s.content.width()).sum();
        let total_width = area.width as usize;

        // The reset hint is dropped rather than truncated when space runs out
        let mut spans = left;
        if left_width + right_width <= total_width {
            spans.push(Span::raw(" ".repeat(total_width - left_width - right_width)));
            spans.extend(right);
        }

        Paragraph::new(Line::from(spans))
            .style(Style::default().bg(self.theme.surface))
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::buffer_to_string;

    fn render(conversation_id: Option<&str>, width: u16) -> String {
        let theme = Theme::default();
        let icons = IconSet::default();
        let area = Rect::new(0, 0, width, 1);
        let mut buf = Buffer::empty(area);
        Header::new(conversation_id, &theme, &icons).render(area, &mut buf);
        buffer_to_string(&buf)
    }

    #[test]
    fn test_header_with_session() {
        let line = render(Some("abc-123"), 80);
        assert!(line.starts_with(" Sample Chatbot │ ● abc-123"));
        assert!(line.ends_with("[Ctrl+R] Reset Conversation"));
    }

    #[test]
    fn test_header_without_session() {
        let line = render(None, 80);
        assert!(line.contains("no conversation"));
    }

    #[test]
    fn test_header_drops_hint_when_narrow() {
        let line = render(Some("abc-123"), 30);
        assert!(line.starts_with(" Sample Chatbot"));
        assert!(!line.contains("Reset"));
    }
}
