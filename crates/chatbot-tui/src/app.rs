//! Application state and update logic for the chatbot TUI.

use crate::event::Action;
use crate::theme::{IconMode, IconSet, Theme};
use crate::widgets::TextInputState;
use chatbot_engine::{BackendError, Conversation, InputMode, MessageId, Reply, Request};
use tracing::{debug, warn};

/// Application state.
#[derive(Debug)]
pub struct App {
    /// Conversation being displayed.
    pub conversation: Conversation,
    /// Text input box.
    pub input: TextInputState,
    /// Selected user message (target of edit/delete).
    pub selected: Option<MessageId>,
    /// Theme colors.
    pub theme: Theme,
    /// Icon set based on config.
    pub icons: IconSet,
    /// Tick counter for the spinner.
    pub tick: usize,
    /// Should the app quit?
    pub should_quit: bool,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    /// Create a new app, honoring `NO_COLOR`.
    pub fn new() -> Self {
        Self::with_style(Theme::from_env(), IconSet::new(IconMode::from_env()))
    }

    /// Create a new app with an explicit theme and icon set.
    pub fn with_style(theme: Theme, icons: IconSet) -> Self {
        Self {
            conversation: Conversation::new(),
            input: TextInputState::new(),
            selected: None,
            theme,
            icons,
            tick: 0,
            should_quit: false,
        }
    }

    /// Advance animations.
    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    /// Mode the input box is in.
    pub fn input_mode(&self) -> InputMode {
        self.conversation.input_mode()
    }

    /// Handle an action, returning a request to issue if one is due.
    pub fn handle_action(&mut self, action: Action) -> Option<Request> {
        let busy = self.conversation.is_busy();
        match action {
            Action::Quit => {
                self.should_quit = true;
                None
            }
            Action::Reset => Some(self.conversation.begin_start()),
            Action::Submit => self.submit(),
            Action::Cancel => {
                if !busy {
                    if self.conversation.editing().is_some() {
                        self.conversation.cancel_edit();
                    }
                    self.input.clear();
                }
                None
            }
            Action::Edit => {
                self.edit_selected();
                None
            }
            Action::Delete => self.delete_selected(),
            Action::SelectPrev => {
                self.select_prev();
                None
            }
            Action::SelectNext => {
                self.select_next();
                None
            }
            _ if busy => None,
            Action::Insert(c) => {
                self.input.insert(c);
                None
            }
            Action::Backspace => {
                self.input.backspace();
                None
            }
            Action::DeleteChar => {
                self.input.delete();
                None
            }
            Action::Left => {
                self.input.move_left();
                None
            }
            Action::Right => {
                self.input.move_right();
                None
            }
            Action::Home => {
                self.input.move_home();
                None
            }
            Action::End => {
                self.input.move_end();
                None
            }
            Action::None => None,
        }
    }

    /// Insert pasted text at the cursor. Line breaks become spaces since
    /// Enter submits.
    pub fn paste(&mut self, text: &str) {
        if self.conversation.is_busy() {
            return;
        }
        let flat: String = text
            .chars()
            .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
            .collect();
        self.input.insert_str(&flat);
    }

    /// Apply a finished request.
    pub fn settle(&mut self, request: &Request, result: Result<Reply, BackendError>) {
        let was_editing = self.conversation.editing().is_some();
        let started = matches!(result, Ok(Reply::Started(_)));

        self.conversation.settle(request, result);

        match request {
            Request::Send { .. } | Request::Update { .. } => self.input.clear(),
            Request::Start if started && was_editing => self.input.clear(),
            _ => {}
        }
        self.fix_selection();
    }

    fn submit(&mut self) -> Option<Request> {
        if self.input.is_blank() {
            return None;
        }
        let text = self.input.content().to_string();
        let result = match self.input_mode() {
            InputMode::Busy => return None,
            InputMode::Editing(_) => self.conversation.begin_save_edit(&text),
            InputMode::Composing => self.conversation.begin_send(&text),
        };
        match result {
            Ok(request) => {
                debug!(endpoint = request.endpoint(), "Dispatching");
                Some(request)
            }
            Err(e) => {
                warn!(error = %e, "Nothing sent");
                None
            }
        }
    }

    fn edit_selected(&mut self) {
        if self.conversation.is_busy() {
            return;
        }
        if let Some(id) = self.selected {
            if let Some(text) = self.conversation.begin_edit(id) {
                self.input.set(text);
            }
        }
    }

    fn delete_selected(&mut self) -> Option<Request> {
        let id = self.selected?;
        match self.conversation.begin_delete(id) {
            Ok(request) => Some(request),
            Err(e) => {
                warn!(message_id = id, error = %e, "Nothing deleted");
                None
            }
        }
    }

    /// Ids of messages that can be selected, in display order.
    fn selectable(&self) -> Vec<MessageId> {
        self.conversation
            .messages()
            .iter()
            .filter(|m| m.sender.is_user())
            .map(|m| m.id)
            .collect()
    }

    fn select_prev(&mut self) {
        let ids = self.selectable();
        self.selected = match self.selected.and_then(|id| ids.iter().position(|&i| i == id)) {
            Some(0) => ids.first().copied(),
            Some(pos) => Some(ids[pos - 1]),
            None => ids.last().copied(),
        };
    }

    fn select_next(&mut self) {
        let ids = self.selectable();
        self.selected = self
            .selected
            .and_then(|id| ids.iter().position(|&i| i == id))
            .and_then(|pos| ids.get(pos + 1).copied());
    }

    /// Drop the selection if its message is gone.
    fn fix_selection(&mut self) {
        if let Some(id) = self.selected {
            if !self.selectable().contains(&id) {
                self.selected = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{conversation_reply, create_test_app};
    use chatbot_engine::testing::unavailable;
    use chatbot_engine::Message;

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_action(Action::Insert(c));
        }
    }

    #[test]
    fn test_reset_issues_start() {
        let mut app = App::default();
        assert_eq!(app.handle_action(Action::Reset), Some(Request::Start));
    }

    #[test]
    fn test_quit() {
        let mut app = App::default();
        assert!(app.handle_action(Action::Quit).is_none());
        assert!(app.should_quit);
    }

    #[test]
    fn test_blank_input_not_sent() {
        let mut app = create_test_app();
        type_text(&mut app, "   ");
        assert!(app.handle_action(Action::Submit).is_none());
        assert!(!app.conversation.is_busy());
    }

    #[test]
    fn test_submit_sends_and_locks_input() {
        let mut app = create_test_app();
        type_text(&mut app, "more");

        let request = app.handle_action(Action::Submit).unwrap();
        assert!(matches!(request, Request::Send { ref text, .. } if text == "more"));
        assert_eq!(app.input_mode(), InputMode::Busy);

        // Typing is ignored while busy.
        app.handle_action(Action::Insert('x'));
        assert_eq!(app.input.content(), "more");
        assert!(app.handle_action(Action::Submit).is_none());
    }

    #[test]
    fn test_settle_clears_input_on_success_and_failure() {
        let mut app = create_test_app();
        type_text(&mut app, "ok");
        let request = app.handle_action(Action::Submit).unwrap();
        app.settle(&request, Ok(conversation_reply()));
        assert!(app.input.is_empty());

        type_text(&mut app, "fails");
        let request = app.handle_action(Action::Submit).unwrap();
        app.settle(&request, Err(unavailable("send_message")));
        assert!(app.input.is_empty());
        assert_eq!(app.input_mode(), InputMode::Composing);
    }

    #[test]
    fn test_selection_moves_over_user_messages_only() {
        let mut app = create_test_app();
        // Test thread: user 0, bot 1, user 2, bot 3.
        app.handle_action(Action::SelectPrev);
        assert_eq!(app.selected, Some(2));
        app.handle_action(Action::SelectPrev);
        assert_eq!(app.selected, Some(0));
        app.handle_action(Action::SelectPrev);
        assert_eq!(app.selected, Some(0));
        app.handle_action(Action::SelectNext);
        assert_eq!(app.selected, Some(2));
        app.handle_action(Action::SelectNext);
        assert_eq!(app.selected, None);
    }

    #[test]
    fn test_edit_loads_text_and_save_updates() {
        let mut app = create_test_app();
        app.handle_action(Action::SelectPrev);
        app.handle_action(Action::SelectPrev);
        app.handle_action(Action::Edit);

        assert_eq!(app.input_mode(), InputMode::Editing(0));
        assert_eq!(app.input.content(), "Hi there");

        app.handle_action(Action::End);
        type_text(&mut app, "!");
        let request = app.handle_action(Action::Submit).unwrap();
        assert_eq!(
            request,
            Request::Update {
                conversation_id: "conv-test".into(),
                message_id: 0,
                text: "Hi there!".into()
            }
        );
    }

    #[test]
    fn test_cancel_edit_restores_compose_mode() {
        let mut app = create_test_app();
        let before = app.conversation.messages().to_vec();
        app.handle_action(Action::SelectPrev);
        app.handle_action(Action::Edit);
        assert!(!app.input.is_empty());

        app.handle_action(Action::Cancel);
        assert_eq!(app.input_mode(), InputMode::Composing);
        assert!(app.input.is_empty());
        assert_eq!(app.conversation.messages(), before.as_slice());
    }

    #[test]
    fn test_delete_selected() {
        let mut app = create_test_app();
        assert!(app.handle_action(Action::Delete).is_none());

        app.handle_action(Action::SelectPrev);
        let request = app.handle_action(Action::Delete).unwrap();
        assert_eq!(
            request,
            Request::Delete {
                conversation_id: "conv-test".into(),
                message_id: 2
            }
        );

        app.settle(
            &request,
            Ok(Reply::Messages(vec![
                Message::user(0, "Hi there"),
                Message::bot(1, "Hello! How can I help?"),
            ])),
        );
        assert_eq!(app.selected, None);
        assert_eq!(app.conversation.messages().len(), 2);
    }

    #[test]
    fn test_reset_settle_exits_edit_mode() {
        let mut app = create_test_app();
        app.handle_action(Action::SelectPrev);
        app.handle_action(Action::Edit);

        let request = app.handle_action(Action::Reset).unwrap();
        app.settle(&request, Ok(Reply::Started("conv-new".into())));

        assert_eq!(app.conversation.conversation_id(), Some("conv-new"));
        assert!(app.conversation.messages().is_empty());
        assert!(app.input.is_empty());
        assert_eq!(app.selected, None);
    }

    #[test]
    fn test_paste_flattens_lines() {
        let mut app = create_test_app();
        app.paste("one\ntwo");
        assert_eq!(app.input.content(), "one two");
    }

    #[test]
    fn test_paste_ignored_while_busy() {
        let mut app = create_test_app();
        type_text(&mut app, "x");
        app.handle_action(Action::Submit);
        app.paste("more");
        assert_eq!(app.input.content(), "x");
    }

    #[test]
    fn test_tick_advances() {
        let mut app = App::default();
        app.tick();
        app.tick();
        assert_eq!(app.tick, 2);
    }
}
