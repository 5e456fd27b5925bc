//! Mutation coordinator
//!
//! Orchestrates every read and mutation against the chat gateway, keeps
//! the chat cache consistent through explicit invalidation, applies the
//! optimistic-update/rollback transaction for sends, and owns the small
//! pieces of UI-adjacent state the presentation layer reflects: the active
//! chat id, the draft input, the sending flag, title-edit and
//! delete-confirmation state, and a queue of transient notifications.
//!
//! Every operation catches its own failure, performs any required
//! rollback, and converts the failure into a notification; nothing
//! propagates past the operation boundary. Any authentication failure
//! (HTTP 401), regardless of which operation detected it, runs the shared
//! forced-logout procedure: session cleared, all cache entries cleared,
//! active selection reset.

use crate::cache::ChatCache;
use crate::error::is_auth_failure;
use crate::gateway::{ChatGateway, UpdateChatRequest};
use crate::session::SessionStore;
use crate::types::{Chat, Message};
use crate::view;

/// Severity of a transient notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Informational (chat created, deleted, logged out)
    Info,
    /// A mutation completed successfully
    Success,
    /// An operation failed
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Success => write!(f, "success"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A transient user-visible notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Message text for display
    pub message: String,
    /// Display severity
    pub severity: Severity,
}

/// Coordinates gateway mutations, cache invalidation, and derived state
pub struct Coordinator {
    gateway: ChatGateway,
    sessions: SessionStore,
    cache: ChatCache,
    active_chat: Option<String>,
    draft: String,
    sending: bool,
    editing_chat: Option<String>,
    pending_delete: Option<String>,
    notifications: Vec<Notification>,
    logged_out: bool,
}

impl Coordinator {
    /// Creates a coordinator with default cache thresholds
    pub fn new(gateway: ChatGateway, sessions: SessionStore) -> Self {
        Self::with_cache(gateway, sessions, ChatCache::new())
    }

    /// Creates a coordinator with an explicit cache
    ///
    /// Used by tests to inject short staleness/retention windows.
    pub fn with_cache(gateway: ChatGateway, sessions: SessionStore, cache: ChatCache) -> Self {
        Self {
            gateway,
            sessions,
            cache,
            active_chat: None,
            draft: String::new(),
            sending: false,
            editing_chat: None,
            pending_delete: None,
            notifications: Vec::new(),
            logged_out: false,
        }
    }

    // ---- state exposed to the presentation layer ----

    /// Currently active chat id, if any
    pub fn active_chat_id(&self) -> Option<&str> {
        self.active_chat.as_deref()
    }

    /// Makes a chat the active one (list selection)
    pub fn select_chat(&mut self, id: impl Into<String>) {
        self.active_chat = Some(id.into());
    }

    /// True while a send is awaiting the gateway
    pub fn is_sending(&self) -> bool {
        self.sending
    }

    /// Pending input not yet sent
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Replaces the pending input
    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.draft = draft.into();
    }

    /// Chat whose title is being edited, if any
    pub fn editing_chat_id(&self) -> Option<&str> {
        self.editing_chat.as_deref()
    }

    /// Marks a chat's title as being edited
    pub fn begin_title_edit(&mut self, id: impl Into<String>) {
        self.editing_chat = Some(id.into());
    }

    /// Abandons an in-progress title edit
    pub fn cancel_title_edit(&mut self) {
        self.editing_chat = None;
    }

    /// Chat awaiting delete confirmation, if any
    pub fn pending_delete_id(&self) -> Option<&str> {
        self.pending_delete.as_deref()
    }

    /// Opens the delete-confirmation prompt for a chat
    pub fn request_delete(&mut self, id: impl Into<String>) {
        self.pending_delete = Some(id.into());
    }

    /// Dismisses the delete-confirmation prompt
    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// True once a forced logout has run; the session is gone
    pub fn is_logged_out(&self) -> bool {
        self.logged_out
    }

    /// Takes all queued notifications, oldest first
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// Cached payload for a chat, fresh or stale, without network access
    ///
    /// Lets callers (and tests) observe rollback results directly.
    pub fn cached_chat(&self, id: &str) -> Option<Chat> {
        self.cache.snapshot_chat(id)
    }

    // ---- reads ----

    /// Returns the chat list, serving from cache when fresh
    ///
    /// A missing or stale aggregate entry triggers a refetch; a refetch
    /// failure falls back to whatever payload is still cached (possibly
    /// stale) and queues an error notification. 401 forces logout.
    pub async fn chats(&mut self) -> Vec<Chat> {
        self.cache.evict_expired();
        if let Some((chats, false)) = self.cache.chats() {
            return chats.to_vec();
        }
        match self.gateway.list_chats().await {
            Ok(chats) => {
                self.cache.set_chats(chats.clone());
                chats
            }
            Err(err) => {
                self.handle_failure("Error loading chats", err);
                self.cache
                    .chats()
                    .map(|(chats, _)| chats.to_vec())
                    .unwrap_or_default()
            }
        }
    }

    /// Returns the active chat, serving from cache when fresh
    ///
    /// After a successful read the auto-title rule is applied: a chat
    /// still carrying the placeholder title, with two or more messages and
    /// a user-authored first message, gets its title set from the first
    /// message. The rule is idempotent because it only fires while the
    /// placeholder is in place.
    pub async fn active_chat(&mut self) -> Option<Chat> {
        let id = self.active_chat.clone()?;
        self.cache.evict_expired();
        let cached = match self.cache.chat(&id) {
            Some((chat, false)) => Some(chat.clone()),
            _ => None,
        };
        let chat = match cached {
            Some(chat) => chat,
            None => match self.gateway.get_chat(&id).await {
                Ok(chat) => {
                    self.cache.set_chat(chat.clone());
                    chat
                }
                Err(err) => {
                    self.handle_failure("Error loading chat", err);
                    return self.cache.snapshot_chat(&id);
                }
            },
        };
        self.maybe_auto_title(&chat).await;
        Some(chat)
    }

    /// Establishes the initial selection after login
    ///
    /// Selects the most recently created chat (last in gateway order), or
    /// auto-creates one empty chat when the list is empty.
    pub async fn select_initial_chat(&mut self) {
        let chats = self.chats().await;
        if self.logged_out || self.active_chat.is_some() {
            return;
        }
        match chats.last() {
            Some(last) => self.active_chat = Some(last.id.clone()),
            None => {
                self.create_chat().await;
            }
        }
    }

    // ---- mutations ----

    /// Creates an empty chat and makes it active
    ///
    /// Returns the new chat id on success.
    pub async fn create_chat(&mut self) -> Option<String> {
        match self.gateway.create_chat("", &[]).await {
            Ok(chat) => {
                let id = chat.id.clone();
                self.cache.invalidate_chats();
                self.cache.set_chat(chat);
                self.active_chat = Some(id.clone());
                self.notify(Severity::Info, "New chat started");
                Some(id)
            }
            Err(err) => {
                self.handle_failure("Create chat failed", err);
                None
            }
        }
    }

    /// Renames a chat
    pub async fn update_chat_title(&mut self, id: &str, title: &str) {
        let update = UpdateChatRequest {
            title: Some(title.to_string()),
            messages: None,
        };
        match self.gateway.update_chat(id, &update).await {
            Ok(_) => {
                self.cache.invalidate_chat(id);
                self.editing_chat = None;
                self.notify(Severity::Success, "Title updated");
            }
            Err(err) => self.handle_failure("Update failed", err),
        }
    }

    /// Clears a chat's messages
    pub async fn clear_chat_messages(&mut self, id: &str) {
        let update = UpdateChatRequest {
            title: None,
            messages: Some(vec![]),
        };
        match self.gateway.update_chat(id, &update).await {
            Ok(_) => {
                self.cache.invalidate_chat(id);
                self.draft.clear();
                self.notify(Severity::Info, "Conversation cleared");
            }
            Err(err) => self.handle_failure("Clear failed", err),
        }
    }

    /// Deletes a chat
    ///
    /// If the deleted chat was active, the selection and any pending
    /// input are cleared even though other chats may remain. The
    /// delete-confirmation prompt closes on success; on failure its state
    /// is left for the presentation layer to decide.
    pub async fn delete_chat(&mut self, id: &str) {
        match self.gateway.delete_chat(id).await {
            Ok(()) => {
                self.cache.invalidate_chat(id);
                if self.active_chat.as_deref() == Some(id) {
                    self.active_chat = None;
                    self.draft.clear();
                }
                self.pending_delete = None;
                self.notify(Severity::Info, "Chat deleted");
            }
            Err(err) => self.handle_failure("Delete failed", err),
        }
    }

    /// Deletes the chat awaiting confirmation, if any
    pub async fn confirm_delete(&mut self) {
        if let Some(id) = self.pending_delete.clone() {
            self.delete_chat(&id).await;
        }
    }

    /// Sends a user message to the active chat
    ///
    /// The one operation with an optimistic phase: the cached chat (if
    /// present) gets the user message appended before the request goes
    /// out, and the pre-append snapshot is restored if the request fails.
    /// On success the chat's cache entry is invalidated so the next read
    /// reconciles with server truth, which may already include the
    /// assistant reply.
    ///
    /// With no active chat, a chat is created first and the send targets
    /// the new id; the two steps are sequenced, not concurrent. If the
    /// create succeeds but the send fails, the empty chat remains — an
    /// accepted degraded state, not data loss.
    pub async fn send_message(&mut self, content: &str) {
        let content = content.trim();
        if content.is_empty() || self.sending {
            return;
        }
        let id = match self.active_chat.clone() {
            Some(id) => id,
            None => match self.create_chat().await {
                Some(id) => id,
                None => return,
            },
        };
        self.send_to(&id, content).await;
    }

    async fn send_to(&mut self, id: &str, content: &str) {
        let snapshot = self.cache.snapshot_chat(id);
        let appended = self.cache.append_message(id, Message::user(content));
        self.sending = true;

        match self.gateway.send_message(id, content).await {
            Ok(()) => {
                self.sending = false;
                self.draft.clear();
                // Force the next read to reconcile the optimistic copy
                // with server truth.
                self.cache.invalidate_chat(id);
            }
            Err(err) => {
                if appended {
                    if let Some(previous) = snapshot {
                        self.cache.restore_chat(previous);
                    }
                }
                self.sending = false;
                self.handle_failure("Send failed", err);
            }
        }
    }

    // ---- auth ----

    /// User-initiated logout: clears session, caches, and selection
    pub fn logout(&mut self) {
        self.reset_authenticated_state();
        self.notify(Severity::Info, "Logged out");
    }

    /// Shared forced-logout procedure for authentication failures
    ///
    /// Runs at most once; cleanup failures are logged, never cascaded
    /// into further error handling.
    fn force_logout(&mut self) {
        if self.logged_out {
            return;
        }
        tracing::warn!("Authentication failure, clearing session");
        self.reset_authenticated_state();
        self.notify(Severity::Info, "Logged out");
    }

    fn reset_authenticated_state(&mut self) {
        if let Err(err) = self.sessions.clear() {
            tracing::warn!("Failed to clear session file: {}", err);
        }
        self.cache.clear();
        self.active_chat = None;
        self.draft.clear();
        self.editing_chat = None;
        self.pending_delete = None;
        self.sending = false;
        self.logged_out = true;
    }

    // ---- internals ----

    async fn maybe_auto_title(&mut self, chat: &Chat) {
        if let Some(title) = view::auto_title(chat) {
            tracing::debug!("Auto-assigning title to chat {}", chat.id);
            self.update_chat_title(&chat.id, &title).await;
        }
    }

    fn handle_failure(&mut self, what: &str, err: anyhow::Error) {
        tracing::error!("{}: {:#}", what, err);
        if is_auth_failure(&err) {
            self.force_logout();
        }
        self.notify(Severity::Error, format!("{}: {}", what, err));
    }

    fn notify(&mut self, severity: Severity, message: impl Into<String>) {
        self.notifications.push(Notification {
            message: message.into(),
            severity,
        });
    }
}
