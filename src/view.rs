//! Derived view state
//!
//! Pure functions computing everything the presentation layer renders from
//! the cached chats plus local filter text: the active chat's display
//! title, the ordered message projection, and the filtered chat list.
//! Nothing here performs I/O or mutates state.

use crate::types::{Chat, Role};

/// Fixed product name shown when no chat is active
pub const PRODUCT_NAME: &str = "SA-AI";

/// Placeholder title the backend assigns to freshly created chats
pub const DEFAULT_TITLE: &str = "New Chat";

/// Label for an active chat with no stored title and no messages
pub const UNTITLED: &str = "Untitled";

/// Maximum derived-title length in characters
pub const TITLE_MAX_CHARS: usize = 50;

/// Two-valued sender tag for display records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    /// The authenticated user
    User,
    /// The remote assistant
    Assistant,
}

impl std::fmt::Display for Sender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "you"),
            Self::Assistant => write!(f, "ai"),
        }
    }
}

/// A message projected for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayMessage {
    /// Who authored the message
    pub sender: Sender,
    /// Raw message text; markdown rendering is the presentation layer's job
    pub text: String,
}

/// Truncates text to the derived-title length
///
/// Returns the first `min(len, 50)` characters with a trailing `...`
/// marker iff the input was longer than 50 characters. Counts characters,
/// not bytes, so multi-byte input is never split mid code point.
///
/// # Examples
///
/// ```
/// use sachat::view::truncate_title;
///
/// assert_eq!(truncate_title("short"), "short");
/// assert_eq!(truncate_title(&"a".repeat(60)), format!("{}...", "a".repeat(50)));
/// ```
pub fn truncate_title(text: &str) -> String {
    let truncated: String = text.chars().take(TITLE_MAX_CHARS).collect();
    if text.chars().count() > TITLE_MAX_CHARS {
        format!("{}...", truncated)
    } else {
        truncated
    }
}

/// Computes the display title for the active chat
///
/// With no active chat this is the fixed product name. An active chat with
/// a non-placeholder stored title uses it verbatim; otherwise the first
/// message's content is truncated; an empty chat shows the untitled label.
pub fn display_title(active: Option<&Chat>) -> String {
    let Some(chat) = active else {
        return PRODUCT_NAME.to_string();
    };
    if !chat.title.is_empty() && chat.title != DEFAULT_TITLE {
        return chat.title.clone();
    }
    match chat.messages.first() {
        Some(first) => truncate_title(&first.content),
        None => UNTITLED.to_string(),
    }
}

/// Returns true if a chat still carries the backend's placeholder title
///
/// The auto-title rule only fires for such chats; once a real title is
/// stored the rule is a no-op.
pub fn has_placeholder_title(chat: &Chat) -> bool {
    chat.title == DEFAULT_TITLE
}

/// Derives a title for a chat that qualifies for auto-titling
///
/// Qualifies when the stored title is still the placeholder, the chat has
/// at least two messages, and the first one was authored by the user.
/// Returns `None` otherwise.
pub fn auto_title(chat: &Chat) -> Option<String> {
    if !has_placeholder_title(chat) {
        return None;
    }
    if chat.messages.len() < 2 {
        return None;
    }
    let first = &chat.messages[0];
    if first.role != Role::User {
        return None;
    }
    Some(truncate_title(&first.content))
}

/// Projects a chat's messages into ordered display records
pub fn project_messages(chat: &Chat) -> Vec<DisplayMessage> {
    chat.messages
        .iter()
        .map(|m| DisplayMessage {
            sender: match m.role {
                Role::User => Sender::User,
                Role::Assistant => Sender::Assistant,
            },
            text: m.content.clone(),
        })
        .collect()
}

/// Filters chats by a free-text query
///
/// A chat matches if the query is a case-insensitive substring of its
/// title or of its most recent message's content; an empty (or
/// whitespace-only) query matches everything. A non-blank query is
/// matched verbatim, surrounding whitespace included. Gateway ordering
/// is preserved; the presentation layer reverses for most-recent-first
/// display.
pub fn filter_chats<'a>(chats: &'a [Chat], query: &str) -> Vec<&'a Chat> {
    if query.trim().is_empty() {
        return chats.iter().collect();
    }
    let query = query.to_lowercase();
    chats
        .iter()
        .filter(|chat| {
            if chat.title.to_lowercase().contains(&query) {
                return true;
            }
            chat.last_message()
                .map(|m| m.content.to_lowercase().contains(&query))
                .unwrap_or(false)
        })
        .collect()
}
