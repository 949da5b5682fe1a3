//! chatbot-engine: Headless core of the chatbot client
//!
//! This crate provides everything that does not touch the terminal:
//! - Message and sender types matching the backend's wire format
//! - Configuration loading (file, environment)
//! - The [`Backend`] trait and its HTTP implementation
//! - Conversation state with optimistic updates and reconciliation

pub mod backend;
pub mod config;
pub mod conversation;
pub mod message;
#[cfg(any(test, feature = "test-util"))]
pub mod testing;

// Re-export commonly used types
pub use backend::{Backend, BackendError, HttpBackend, Reply, Request};
pub use config::{Config, ConfigError};
pub use conversation::{Conversation, ConversationError, ConversationView, InputMode};
pub use message::{Message, MessageId, Sender};
