//! Backend client.
//!
//! The backend owns the conversation: every mutating endpoint answers with the
//! full, authoritative message list. [`Backend`] is the seam the conversation
//! view talks to; [`HttpBackend`] is the JSON-over-HTTP implementation.

use crate::config::{Config, ConfigError};
use crate::message::{Message, MessageId};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::debug;

/// Endpoint that opens a new conversation.
pub const START_CONVERSATION: &str = "start_conversation";
/// Endpoint that appends a user message.
pub const SEND_MESSAGE: &str = "send_message";
/// Endpoint that replaces a user message (and everything after it).
pub const UPDATE_MESSAGE: &str = "update_message";
/// Endpoint that removes a message.
pub const DELETE_MESSAGE: &str = "delete_message";

/// A request the conversation view wants issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Open a new conversation.
    Start,
    /// Append a user message.
    Send {
        conversation_id: String,
        text: String,
    },
    /// Replace an existing user message.
    Update {
        conversation_id: String,
        message_id: MessageId,
        text: String,
    },
    /// Remove a message.
    Delete {
        conversation_id: String,
        message_id: MessageId,
    },
}

impl Request {
    /// Endpoint path (without leading slash) this request is posted to.
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::Start => START_CONVERSATION,
            Self::Send { .. } => SEND_MESSAGE,
            Self::Update { .. } => UPDATE_MESSAGE,
            Self::Delete { .. } => DELETE_MESSAGE,
        }
    }
}

/// Successful backend answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// New conversation id from `start_conversation`.
    Started(String),
    /// Authoritative message list from any other endpoint.
    Messages(Vec<Message>),
}

/// Body of `POST /send_message`.
#[derive(Debug, Serialize)]
pub struct SendMessageBody<'a> {
    pub conversation_id: &'a str,
    pub text: &'a str,
}

/// Body of `POST /update_message`.
#[derive(Debug, Serialize)]
pub struct UpdateMessageBody<'a> {
    pub conversation_id: &'a str,
    pub text: &'a str,
    pub message_id: MessageId,
}

/// Body of `POST /delete_message`.
#[derive(Debug, Serialize)]
pub struct DeleteMessageBody<'a> {
    pub conversation_id: &'a str,
    pub message_id: MessageId,
}

#[derive(Debug, Deserialize)]
struct StartConversationResponse {
    conversation_id: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    response: Vec<Message>,
}

/// Operations offered by the chat backend.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Open a conversation and return its id.
    async fn start_conversation(&self) -> Result<String, BackendError>;

    /// Append `text` as a user message.
    async fn send_message(
        &self,
        conversation_id: &str,
        text: &str,
    ) -> Result<Vec<Message>, BackendError>;

    /// Replace message `message_id` with `text`.
    async fn update_message(
        &self,
        conversation_id: &str,
        message_id: MessageId,
        text: &str,
    ) -> Result<Vec<Message>, BackendError>;

    /// Delete message `message_id`.
    async fn delete_message(
        &self,
        conversation_id: &str,
        message_id: MessageId,
    ) -> Result<Vec<Message>, BackendError>;

    /// Issue `request` through the matching typed call.
    async fn dispatch(&self, request: &Request) -> Result<Reply, BackendError> {
        match request {
            Request::Start => self.start_conversation().await.map(Reply::Started),
            Request::Send {
                conversation_id,
                text,
            } => self
                .send_message(conversation_id, text)
                .await
                .map(Reply::Messages),
            Request::Update {
                conversation_id,
                message_id,
                text,
            } => self
                .update_message(conversation_id, *message_id, text)
                .await
                .map(Reply::Messages),
            Request::Delete {
                conversation_id,
                message_id,
            } => self
                .delete_message(conversation_id, *message_id)
                .await
                .map(Reply::Messages),
        }
    }
}

/// JSON-over-HTTP backend.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// Create a backend rooted at `base_url`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, BackendError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|_| BackendError::InvalidUrl(base_url.clone()))?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(BackendError::Request)?;

        Ok(Self { client, base_url })
    }

    /// Create a backend from resolved configuration.
    pub fn from_config(config: &Config) -> Result<Self, BackendError> {
        Self::new(config.base_url()?, config.request_timeout())
    }

    /// Base URL requests are posted under.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{endpoint}", self.base_url)
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        request: RequestBuilder,
    ) -> Result<T, BackendError> {
        let start = Instant::now();
        let response = request.send().await.map_err(BackendError::Request)?;

        let status = response.status();
        #[allow(clippy::cast_possible_truncation)]
        let elapsed_ms = start.elapsed().as_millis() as u64;
        debug!(endpoint, status = status.as_u16(), elapsed_ms, "Backend replied");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                endpoint,
                status,
                body,
            });
        }

        let body = response.text().await.map_err(BackendError::Request)?;
        serde_json::from_str(&body).map_err(|source| BackendError::Decode { endpoint, source })
    }

    async fn post_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        body: &B,
    ) -> Result<T, BackendError> {
        let request = self.client.post(self.url(endpoint)).json(body);
        self.execute(endpoint, request).await
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn start_conversation(&self) -> Result<String, BackendError> {
        let request = self.client.post(self.url(START_CONVERSATION));
        let reply: StartConversationResponse = self.execute(START_CONVERSATION, request).await?;
        Ok(reply.conversation_id)
    }

    async fn send_message(
        &self,
        conversation_id: &str,
        text: &str,
    ) -> Result<Vec<Message>, BackendError> {
        let body = SendMessageBody {
            conversation_id,
            text,
        };
        let reply: MessagesResponse = self.post_json(SEND_MESSAGE, &body).await?;
        Ok(reply.response)
    }

    async fn update_message(
        &self,
        conversation_id: &str,
        message_id: MessageId,
        text: &str,
    ) -> Result<Vec<Message>, BackendError> {
        let body = UpdateMessageBody {
            conversation_id,
            text,
            message_id,
        };
        let reply: MessagesResponse = self.post_json(UPDATE_MESSAGE, &body).await?;
        Ok(reply.response)
    }

    async fn delete_message(
        &self,
        conversation_id: &str,
        message_id: MessageId,
    ) -> Result<Vec<Message>, BackendError> {
        let body = DeleteMessageBody {
            conversation_id,
            message_id,
        };
        let reply: MessagesResponse = self.post_json(DELETE_MESSAGE, &body).await?;
        Ok(reply.response)
    }
}

/// Errors from talking to the backend.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// Transport failure (connect, timeout, body read).
    #[error("Request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("{endpoint} returned {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: StatusCode,
        body: String,
    },

    /// Response body did not match the expected shape.
    #[error("Malformed {endpoint} response: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Base URL could not be parsed.
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),

    /// The task running the request died before producing a reply.
    #[error("Request task failed: {0}")]
    Task(String),

    /// Configuration did not yield a usable backend.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
