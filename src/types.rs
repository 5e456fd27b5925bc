//! Wire types for the SA-AI chat service
//!
//! This module defines the JSON shapes exchanged with the chat gateway:
//! chats, messages, and the lightweight chat summary used for list
//! rendering.

use serde::{Deserialize, Serialize};

/// Role of a message author
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Message written by the authenticated user
    User,
    /// Message produced by the remote assistant
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single message within a chat
///
/// Ordering within a chat is append-only and significant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Author of the message
    pub role: Role,
    /// Plain-text content; the client never interprets it beyond
    /// substring search and truncation
    pub content: String,
}

impl Message {
    /// Creates a new user message
    ///
    /// # Examples
    ///
    /// ```
    /// use sachat::types::{Message, Role};
    ///
    /// let msg = Message::user("Hello, assistant!");
    /// assert_eq!(msg.role, Role::User);
    /// ```
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Creates a new assistant message
    ///
    /// # Examples
    ///
    /// ```
    /// use sachat::types::{Message, Role};
    ///
    /// let msg = Message::assistant("Hello, user!");
    /// assert_eq!(msg.role, Role::Assistant);
    /// ```
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A persisted conversation thread
///
/// The unit of the gateway's read/update/delete operations. The backend is
/// Mongo-shaped and reports the identifier as `_id`; both spellings are
/// accepted on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    /// Server-assigned chat identifier
    #[serde(alias = "_id")]
    pub id: String,
    /// Stored title; the backend assigns a placeholder for new chats
    #[serde(default)]
    pub title: String,
    /// Conversation messages in append order
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl Chat {
    /// Returns the most recent message, if any
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Projects this chat into a list-rendering summary
    pub fn summary(&self) -> ChatSummary {
        ChatSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            last_message_preview: self
                .last_message()
                .map(|m| crate::view::truncate_title(&m.content)),
        }
    }
}

/// Lightweight projection of a chat, sufficient for list rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSummary {
    /// Chat identifier
    pub id: String,
    /// Stored title
    pub title: String,
    /// Last message content truncated for display, if the chat has messages
    pub last_message_preview: Option<String>,
}
