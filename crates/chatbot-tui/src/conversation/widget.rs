//! Thread pane widget.
//!
//! Renders the message list inside a bordered pane. User messages sit on the
//! right, bot messages on the left, both wrapped to three quarters of the
//! pane width.

use chatbot_engine::{Message, MessageId};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::theme::{IconSet, Theme};

/// Shown when no conversation has been started.
pub const NO_CONVERSATION: &str = "No conversation. Press Ctrl+R to start one.";

/// Shown when the conversation has no messages.
pub const NO_MESSAGES: &str = "No messages yet. Say hello!";

/// Width of the selection/editing marker plus its trailing space.
const MARKER_WIDTH: usize = 2;

/// Scrollable view of the conversation.
///
/// ```text
/// ┌ Conversation ─────────────────────────────┐
/// │                                Hi there   │
/// │                                           │
/// │ Hello! How can I help?                    │
/// │                                           │
/// │                           ▶ Tell me a joke│
/// └───────────────────────────────────────────┘
/// ```
pub struct ThreadPane<'a> {
    messages: &'a [Message],
    selected: Option<MessageId>,
    editing: Option<MessageId>,
    has_session: bool,
    theme: &'a Theme,
    icons: &'a IconSet,
}

impl<'a> ThreadPane<'a> {
    /// Create a new thread pane.
    pub fn new(messages: &'a [Message], theme: &'a Theme, icons: &'a IconSet) -> Self {
        Self {
            messages,
            selected: None,
            editing: None,
            has_session: true,
            theme,
            icons,
        }
    }

    /// Highlight the selected message.
    #[must_use]
    pub fn selected(mut self, selected: Option<MessageId>) -> Self {
        self.selected = selected;
        self
    }

    /// Mark the message being edited.
    #[must_use]
    pub fn editing(mut self, editing: Option<MessageId>) -> Self {
        self.editing = editing;
        self
    }

    /// Whether a conversation has been started.
    #[must_use]
    pub fn has_session(mut self, has_session: bool) -> Self {
        self.has_session = has_session;
        self
    }

    /// Lay out every message, returning the lines and the line range of the
    /// selected message.
    fn build_lines(&self, width: usize) -> (Vec<Line<'static>>, Option<(usize, usize)>) {
        let bubble_width = (width * 3 / 4).max(1);
        let mut lines = Vec::new();
        let mut selected_range = None;

        for (i, message) in self.messages.iter().enumerate() {
            if i > 0 {
                lines.push(Line::default());
            }
            let start = lines.len();
            if message.sender.is_user() {
                self.push_user(&mut lines, message, width, bubble_width);
            } else {
                self.push_bot(&mut lines, message, bubble_width);
            }
            if self.selected == Some(message.id) {
                selected_range = Some((start, lines.len()));
            }
        }

        (lines, selected_range)
    }

    fn push_user(
        &self,
        lines: &mut Vec<Line<'static>>,
        message: &Message,
        width: usize,
        bubble_width: usize,
    ) {
        let wrapped = wrap(&message.text, bubble_width);
        let block_width = wrapped.iter().map(|l| l.width()).max().unwrap_or(0);
        let pad = width.saturating_sub(block_width);

        let selected = self.selected == Some(message.id);
        let editing = self.editing == Some(message.id);
        let mut style = Style::default().fg(self.theme.user);
        if selected {
            style = style.bg(self.theme.selection).add_modifier(Modifier::BOLD);
        }

        for (row, text) in wrapped.into_iter().enumerate() {
            let fill = block_width.saturating_sub(text.width());
            let mut spans = Vec::with_capacity(3);

            let marker = match (row, editing, selected) {
                (0, true, _) => Some((self.icons.editing(), self.theme.warning)),
                (0, false, true) => Some((self.icons.selected(), self.theme.primary)),
                _ => None,
            };
            match marker {
                Some((icon, color)) if pad >= MARKER_WIDTH => {
                    spans.push(Span::raw(" ".repeat(pad - MARKER_WIDTH)));
                    spans.push(Span::styled(format!("{icon} "), Style::default().fg(color)));
                }
                _ => spans.push(Span::raw(" ".repeat(pad))),
            }

            spans.push(Span::styled(format!("{text}{}", " ".repeat(fill)), style));
            lines.push(Line::from(spans));
        }
    }

    fn push_bot(&self, lines: &mut Vec<Line<'static>>, message: &Message, bubble_width: usize) {
        let style = Style::default().fg(self.theme.bot);
        for text in wrap(&message.text, bubble_width) {
            lines.push(Line::from(Span::styled(text, style)));
        }
    }

    fn render_notice(&self, text: &'static str, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        let middle = Rect::new(area.x, area.y + area.height / 2, area.width, 1);
        Paragraph::new(text)
            .style(Style::default().fg(self.theme.muted))
            .alignment(Alignment::Center)
            .render(middle, buf);
    }
}

/// Wrap `text` to `width` columns. Blank text still takes one line.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let wrapped: Vec<String> = textwrap::wrap(text, width)
        .into_iter()
        .map(std::borrow::Cow::into_owned)
        .collect();
    if wrapped.is_empty() {
        vec![String::new()]
    } else {
        wrapped
    }
}

/// First visible line, anchored to the bottom unless that would hide the
/// top of the selected message.
fn scroll_offset(total: usize, height: usize, selected: Option<(usize, usize)>) -> usize {
    let bottom = total.saturating_sub(height);
    match selected {
        Some((start, _)) if start < bottom => start,
        _ => bottom,
    }
}

impl Widget for ThreadPane<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Conversation ")
            .title_style(Style::default().fg(self.theme.text))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border))
            .style(Style::default().bg(self.theme.base));

        let inner = block.inner(area);
        block.render(area, buf);

        if !self.has_session {
            self.render_notice(NO_CONVERSATION, inner, buf);
            return;
        }
        if self.messages.is_empty() {
            self.render_notice(NO_MESSAGES, inner, buf);
            return;
        }

        let (lines, selected) = self.build_lines(inner.width as usize);
        let offset = scroll_offset(lines.len(), inner.height as usize, selected);

        Paragraph::new(lines)
            .scroll((u16::try_from(offset).unwrap_or(u16::MAX), 0))
            .render(inner, buf);
    }
}
