//! Conversation view state and its reconciliation with the backend.
//!
//! Every user operation is split in two:
//!
//! - a *begin* step that checks preconditions, applies the optimistic local
//!   change, and returns the [`Request`] to issue;
//! - [`Conversation::settle`], which applies the backend's answer once the
//!   request completes.
//!
//! The local list is replaced wholesale by whatever the backend returns, so
//! after a request settles it matches the backend again. Overlapping requests
//! settle in completion order; nothing reorders or discards stale replies.
//!
//! Failures are logged and otherwise dropped: the busy flag is cleared, the
//! optimistic change stays until the next successful reply replaces it.

use crate::backend::{Backend, BackendError, Reply, Request};
use crate::message::{Message, MessageId, Sender};
use tracing::{info, warn};

/// What the input box is currently for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Typing a new message.
    Composing,
    /// Rewriting the given message.
    Editing(MessageId),
    /// A send or save is in flight; input is locked.
    Busy,
}

/// Reasons a begin step refuses to produce a request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversationError {
    /// No conversation has been started yet.
    #[error("No conversation in progress")]
    NoSession,

    /// A send or save is already in flight.
    #[error("A request is already in flight")]
    Busy,

    /// Save requested with no message selected for editing.
    #[error("No message is being edited")]
    NotEditing,
}

/// Local state of a single conversation.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    conversation_id: Option<String>,
    messages: Vec<Message>,
    editing: Option<MessageId>,
    busy: bool,
}

impl Conversation {
    /// Create an empty conversation with no session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current session id, once the backend has issued one.
    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id.as_deref()
    }

    /// Messages in display order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Look up a message by id.
    pub fn message(&self, id: MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    /// Id of the message being edited, if any.
    pub fn editing(&self) -> Option<MessageId> {
        self.editing
    }

    /// Whether a send or save is in flight.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Mode the input box should be in.
    pub fn input_mode(&self) -> InputMode {
        if self.busy {
            InputMode::Busy
        } else if let Some(id) = self.editing {
            InputMode::Editing(id)
        } else {
            InputMode::Composing
        }
    }

    /// Request a fresh conversation. Local state changes only when it settles.
    pub fn begin_start(&self) -> Request {
        Request::Start
    }

    /// Optimistically append `text` and mark busy.
    pub fn begin_send(&mut self, text: &str) -> Result<Request, ConversationError> {
        if self.busy {
            return Err(ConversationError::Busy);
        }
        let conversation_id = self.session()?;

        let placeholder = self.placeholder(text);
        self.messages.push(placeholder);
        self.busy = true;

        Ok(Request::Send {
            conversation_id,
            text: text.to_string(),
        })
    }

    /// Enter edit mode for `id`, returning the text to load into the input.
    ///
    /// Unknown ids leave the state untouched.
    pub fn begin_edit(&mut self, id: MessageId) -> Option<String> {
        let text = self.message(id)?.text.clone();
        self.editing = Some(id);
        Some(text)
    }

    /// Optimistically replace the edited message and everything after it.
    pub fn begin_save_edit(&mut self, text: &str) -> Result<Request, ConversationError> {
        let message_id = self.editing.ok_or(ConversationError::NotEditing)?;
        if self.busy {
            return Err(ConversationError::Busy);
        }
        let conversation_id = self.session()?;

        let placeholder = self.placeholder(text);
        if let Some(position) = self.messages.iter().position(|m| m.id == message_id) {
            self.messages.truncate(position);
        }
        self.messages.push(placeholder);
        self.editing = None;
        self.busy = true;

        Ok(Request::Update {
            conversation_id,
            message_id,
            text: text.to_string(),
        })
    }

    /// Leave edit mode without touching the backend.
    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Request deletion of `id`. No optimistic change is made.
    pub fn begin_delete(&self, id: MessageId) -> Result<Request, ConversationError> {
        Ok(Request::Delete {
            conversation_id: self.session()?,
            message_id: id,
        })
    }

    /// Apply the outcome of `request`.
    pub fn settle(&mut self, request: &Request, result: Result<Reply, BackendError>) {
        if matches!(request, Request::Send { .. } | Request::Update { .. }) {
            self.busy = false;
        }

        match (request, result) {
            (Request::Start, Ok(Reply::Started(id))) => {
                info!(conversation_id = %id, "Conversation started");
                self.conversation_id = Some(id);
                self.messages.clear();
                self.editing = None;
            }
            (Request::Start, Ok(Reply::Messages(_)))
            | (
                Request::Send { .. } | Request::Update { .. } | Request::Delete { .. },
                Ok(Reply::Started(_)),
            ) => {
                warn!(endpoint = request.endpoint(), "Ignoring reply of the wrong kind");
            }
            (_, Ok(Reply::Messages(messages))) => {
                self.messages = messages;
            }
            (_, Err(e)) => {
                warn!(endpoint = request.endpoint(), error = %e, "Backend request failed");
            }
        }
    }

    fn session(&self) -> Result<String, ConversationError> {
        self.conversation_id
            .clone()
            .ok_or(ConversationError::NoSession)
    }

    /// Locally synthesized user message; its id is overwritten by the backend.
    fn placeholder(&self, text: &str) -> Message {
        Message {
            id: self.messages.len() as MessageId,
            sender: Sender::User,
            text: text.to_string(),
        }
    }
}

/// A [`Conversation`] wired to a [`Backend`], awaiting each request inline.
///
/// Suitable for headless callers; the terminal view drives [`Conversation`]
/// directly so that requests run concurrently with input handling.
pub struct ConversationView<B> {
    backend: B,
    state: Conversation,
}

impl<B: Backend> ConversationView<B> {
    /// Create a view with no session.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: Conversation::new(),
        }
    }

    /// Current state.
    pub fn state(&self) -> &Conversation {
        &self.state
    }

    /// Backend in use.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Start (or restart) the conversation.
    pub async fn start_conversation(&mut self) {
        let request = self.state.begin_start();
        self.run(request).await;
    }

    /// Send a new user message.
    pub async fn send(&mut self, text: &str) {
        match self.state.begin_send(text) {
            Ok(request) => self.run(request).await,
            Err(e) => warn!(error = %e, "Send skipped"),
        }
    }

    /// Enter edit mode for `id`, returning the text to edit.
    pub fn edit(&mut self, id: MessageId) -> Option<String> {
        self.state.begin_edit(id)
    }

    /// Save the message currently being edited.
    pub async fn save_edit(&mut self, text: &str) {
        match self.state.begin_save_edit(text) {
            Ok(request) => self.run(request).await,
            Err(e) => warn!(error = %e, "Save skipped"),
        }
    }

    /// Leave edit mode.
    pub fn cancel_edit(&mut self) {
        self.state.cancel_edit();
    }

    /// Delete message `id`.
    pub async fn delete(&mut self, id: MessageId) {
        match self.state.begin_delete(id) {
            Ok(request) => self.run(request).await,
            Err(e) => warn!(error = %e, "Delete skipped"),
        }
    }

    async fn run(&mut self, request: Request) {
        let result = self.backend.dispatch(&request).await;
        self.state.settle(&request, result);
    }
}
