//! Message types shared by the backend client and the conversation view.

use serde::{Deserialize, Serialize};

/// Message identifier. Canonical ids are assigned by the backend.
pub type MessageId = u64;

/// Author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// Typed by the person using this client.
    User,
    /// Produced by the backend.
    Bot,
}

impl Sender {
    /// Whether this is a user message (the only kind that can be edited or deleted).
    pub fn is_user(self) -> bool {
        self == Self::User
    }
}

impl std::fmt::Display for Sender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Bot => write!(f, "bot"),
        }
    }
}

/// A single message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Identifier, unique within the conversation.
    pub id: MessageId,
    /// Who wrote the message.
    pub sender: Sender,
    /// Message body.
    pub text: String,
}

impl Message {
    /// Create a user message.
    pub fn user(id: MessageId, text: impl Into<String>) -> Self {
        Self {
            id,
            sender: Sender::User,
            text: text.into(),
        }
    }

    /// Create a bot message.
    pub fn bot(id: MessageId, text: impl Into<String>) -> Self {
        Self {
            id,
            sender: Sender::Bot,
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_wire_format() {
        let msg = Message::user(0, "hi");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 0, "sender": "user", "text": "hi"})
        );
    }

    #[test]
    fn test_parse_backend_list() {
        let raw = r#"[{"id":0,"sender":"user","text":"hi"},{"id":1,"sender":"bot","text":"hello"}]"#;
        let messages: Vec<Message> = serde_json::from_str(raw).unwrap();
        assert_eq!(
            messages,
            vec![Message::user(0, "hi"), Message::bot(1, "hello")]
        );
    }

    #[test]
    fn test_unknown_sender_rejected() {
        let raw = r#"{"id":0,"sender":"system","text":"x"}"#;
        assert!(serde_json::from_str::<Message>(raw).is_err());
    }

    #[test]
    fn test_sender_display() {
        assert_eq!(Sender::User.to_string(), "user");
        assert_eq!(Sender::Bot.to_string(), "bot");
        assert!(Sender::User.is_user());
        assert!(!Sender::Bot.is_user());
    }
}
