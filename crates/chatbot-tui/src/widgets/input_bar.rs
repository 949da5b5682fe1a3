//! Full-width input bar widget.
//!
//! Single line of text entry at the bottom of the screen. Long input scrolls
//! horizontally so the cursor stays in view.

use chatbot_engine::InputMode;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use unicode_width::UnicodeWidthChar;

use crate::conversation::input_placeholder;
use crate::theme::{IconSet, Theme};
use crate::widgets::TextInputState;

const PROMPT: &str = "> ";

/// Input bar for composing and editing messages.
pub struct InputBar<'a> {
    input: &'a TextInputState,
    theme: &'a Theme,
    icons: &'a IconSet,
    mode: InputMode,
    has_session: bool,
    tick: usize,
}

impl<'a> InputBar<'a> {
    /// Create a new input bar widget.
    pub fn new(input: &'a TextInputState, theme: &'a Theme, icons: &'a IconSet) -> Self {
        Self {
            input,
            theme,
            icons,
            mode: InputMode::Composing,
            has_session: true,
            tick: 0,
        }
    }

    /// Set the input mode.
    #[must_use]
    pub fn mode(mut self, mode: InputMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set whether a conversation exists.
    #[must_use]
    pub fn has_session(mut self, has_session: bool) -> Self {
        self.has_session = has_session;
        self
    }

    /// Set the animation tick for the spinner.
    #[must_use]
    pub fn tick(mut self, tick: usize) -> Self {
        self.tick = tick;
        self
    }

    fn title(&self) -> String {
        match self.mode {
            InputMode::Editing(id) => format!(" Edit message #{id} "),
            _ => " Message ".to_string(),
        }
    }

    fn border_style(&self) -> Style {
        match self.mode {
            InputMode::Composing => Style::default().fg(self.theme.border_focused),
            InputMode::Editing(_) => Style::default().fg(self.theme.warning),
            InputMode::Busy => Style::default().fg(self.theme.border),
        }
    }

    /// Spans for the prompt line, scrolled to fit `width` columns.
    fn build_line(&self, width: usize) -> Line<'static> {
        let prompt = Span::styled(PROMPT, Style::default().fg(self.theme.primary));
        let cursor = Span::styled(
            self.icons.cursor(),
            Style::default().fg(self.theme.text),
        );

        if self.input.is_empty() {
            let placeholder = input_placeholder(self.mode, self.has_session);
            return Line::from(vec![
                prompt,
                cursor,
                Span::styled(placeholder, Style::default().fg(self.theme.muted)),
            ]);
        }

        let (before, after) = self.input.split_at_cursor();
        let room = width.saturating_sub(PROMPT.len() + 1);
        let before = visible_tail(before, room);

        let text = Style::default().fg(self.theme.text);
        Line::from(vec![
            prompt,
            Span::styled(before.to_string(), text),
            cursor,
            Span::styled(after.to_string(), text),
        ])
    }
}

/// Longest suffix of `text` that fits in `width` columns.
fn visible_tail(text: &str, width: usize) -> &str {
    let mut used = 0;
    for (idx, ch) in text.char_indices().rev() {
        used += ch.width().unwrap_or(0);
        if used > width {
            return &text[idx + ch.len_utf8()..];
        }
    }
    text
}

impl Widget for InputBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(self.title())
            .borders(Borders::ALL)
            .border_style(self.border_style());
        let inner = block.inner(area);

        let line = if self.mode == InputMode::Busy {
            Line::from(Span::styled(
                format!(
                    "{} {}",
                    self.icons.spinner(self.tick),
                    input_placeholder(self.mode, self.has_session)
                ),
                Style::default().fg(self.theme.secondary),
            ))
        } else {
            self.build_line(inner.width as usize)
        };

        Paragraph::new(line).block(block).render(area, buf);
    }
}
