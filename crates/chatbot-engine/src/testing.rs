//! In-memory backend for tests.
//!
//! Replies are queued up front and handed out in order; every call is
//! recorded as a [`Request`] so tests can assert on what was issued.

use crate::backend::{Backend, BackendError, Request};
use crate::message::{Message, MessageId};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Backend that returns queued replies.
#[derive(Debug, Default)]
pub struct MockBackend {
    starts: Mutex<VecDeque<Result<String, BackendError>>>,
    lists: Mutex<VecDeque<Result<Vec<Message>, BackendError>>>,
    requests: Mutex<Vec<Request>>,
}

impl MockBackend {
    /// Create a mock with nothing queued.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a conversation id for the next `start_conversation`.
    pub fn queue_start(&self, conversation_id: impl Into<String>) {
        self.starts
            .lock()
            .unwrap()
            .push_back(Ok(conversation_id.into()));
    }

    /// Queue a failure for the next `start_conversation`.
    pub fn queue_start_error(&self, error: BackendError) {
        self.starts.lock().unwrap().push_back(Err(error));
    }

    /// Queue a message list for the next send/update/delete.
    pub fn queue_messages(&self, messages: Vec<Message>) {
        self.lists.lock().unwrap().push_back(Ok(messages));
    }

    /// Queue a failure for the next send/update/delete.
    pub fn queue_error(&self, error: BackendError) {
        self.lists.lock().unwrap().push_back(Err(error));
    }

    /// Requests issued so far, in call order.
    pub fn recorded_requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    fn record(&self, request: Request) {
        self.requests.lock().unwrap().push(request);
    }

    fn next_list(&self, endpoint: &'static str) -> Result<Vec<Message>, BackendError> {
        self.lists
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(unavailable(endpoint)))
    }
}

/// A 503 error, for simulating a backend that is down.
pub fn unavailable(endpoint: &'static str) -> BackendError {
    BackendError::Status {
        endpoint,
        status: StatusCode::SERVICE_UNAVAILABLE,
        body: "no mock reply queued".into(),
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn start_conversation(&self) -> Result<String, BackendError> {
        self.record(Request::Start);
        self.starts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(unavailable(crate::backend::START_CONVERSATION)))
    }

    async fn send_message(
        &self,
        conversation_id: &str,
        text: &str,
    ) -> Result<Vec<Message>, BackendError> {
        self.record(Request::Send {
            conversation_id: conversation_id.into(),
            text: text.into(),
        });
        self.next_list(crate::backend::SEND_MESSAGE)
    }

    async fn update_message(
        &self,
        conversation_id: &str,
        message_id: MessageId,
        text: &str,
    ) -> Result<Vec<Message>, BackendError> {
        self.record(Request::Update {
            conversation_id: conversation_id.into(),
            message_id,
            text: text.into(),
        });
        self.next_list(crate::backend::UPDATE_MESSAGE)
    }

    async fn delete_message(
        &self,
        conversation_id: &str,
        message_id: MessageId,
    ) -> Result<Vec<Message>, BackendError> {
        self.record(Request::Delete {
            conversation_id: conversation_id.into(),
            message_id,
        });
        self.next_list(crate::backend::DELETE_MESSAGE)
    }
}
