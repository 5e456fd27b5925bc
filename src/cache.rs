//! In-memory chat cache with staleness and retention thresholds
//!
//! Keyed store for fetched chat data: one aggregate entry for the full
//! chat list and one entry per individual chat. A read that finds no
//! entry, or an entry older than the staleness threshold, signals the
//! caller to refetch; entries untouched for longer than the retention
//! threshold are evicted. This module performs no network I/O.
//!
//! Any mutation affecting a chat's title or message set must invalidate
//! both its individual entry and the aggregate entry, since a chat's
//! title and preview also appear in the aggregate; `invalidate_chat`
//! enforces that pairing.

use crate::types::{Chat, Message};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Maximum age of a cached read before a refetch is required
pub const STALE_AFTER: Duration = Duration::from_secs(5 * 60);

/// Age past which an unused entry may be evicted
pub const EVICT_AFTER: Duration = Duration::from_secs(10 * 60);

#[derive(Debug, Clone)]
struct Entry<T> {
    payload: T,
    fetched_at: Instant,
    last_access: Instant,
}

impl<T> Entry<T> {
    fn new(payload: T) -> Self {
        let now = Instant::now();
        Self {
            payload,
            fetched_at: now,
            last_access: now,
        }
    }
}

/// Keyed cache of chat data
///
/// Thresholds are injectable so tests can use short windows; production
/// code uses [`ChatCache::new`] with the 5/10-minute defaults.
#[derive(Debug)]
pub struct ChatCache {
    staleness: Duration,
    retention: Duration,
    all_chats: Option<Entry<Vec<Chat>>>,
    by_id: HashMap<String, Entry<Chat>>,
}

impl Default for ChatCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatCache {
    /// Creates a cache with the default staleness and retention thresholds
    pub fn new() -> Self {
        Self::with_thresholds(STALE_AFTER, EVICT_AFTER)
    }

    /// Creates a cache with explicit thresholds
    ///
    /// # Arguments
    ///
    /// * `staleness` - age past which a read signals refetch
    /// * `retention` - age past which an unused entry is evicted
    pub fn with_thresholds(staleness: Duration, retention: Duration) -> Self {
        Self {
            staleness,
            retention,
            all_chats: None,
            by_id: HashMap::new(),
        }
    }

    /// Reads the aggregate chat list
    ///
    /// Returns the cached payload and whether it is stale. `None` means
    /// no entry exists and the caller must fetch.
    pub fn chats(&mut self) -> Option<(&[Chat], bool)> {
        let staleness = self.staleness;
        let entry = self.all_chats.as_mut()?;
        entry.last_access = Instant::now();
        let stale = entry.fetched_at.elapsed() > staleness;
        Some((&entry.payload, stale))
    }

    /// Stores the aggregate chat list, refreshing its timestamps
    pub fn set_chats(&mut self, chats: Vec<Chat>) {
        self.all_chats = Some(Entry::new(chats));
    }

    /// Reads a single chat by id
    ///
    /// Same contract as [`ChatCache::chats`]: `None` means fetch, a
    /// `true` staleness flag means refetch.
    pub fn chat(&mut self, id: &str) -> Option<(&Chat, bool)> {
        let staleness = self.staleness;
        let entry = self.by_id.get_mut(id)?;
        entry.last_access = Instant::now();
        let stale = entry.fetched_at.elapsed() > staleness;
        Some((&entry.payload, stale))
    }

    /// Stores a single chat, refreshing its timestamps
    pub fn set_chat(&mut self, chat: Chat) {
        self.by_id.insert(chat.id.clone(), Entry::new(chat));
    }

    /// Invalidates a chat's entry and the aggregate entry
    ///
    /// The aggregate is always dropped alongside the individual entry
    /// because the chat's title or preview may appear in the list.
    pub fn invalidate_chat(&mut self, id: &str) {
        tracing::debug!("Invalidating cache entry for chat {}", id);
        self.by_id.remove(id);
        self.all_chats = None;
    }

    /// Invalidates the aggregate chat-list entry only
    pub fn invalidate_chats(&mut self) {
        tracing::debug!("Invalidating aggregate chat-list entry");
        self.all_chats = None;
    }

    /// Drops every entry (forced logout path)
    pub fn clear(&mut self) {
        self.all_chats = None;
        self.by_id.clear();
    }

    /// Evicts entries that have not been accessed within the retention window
    pub fn evict_expired(&mut self) {
        let retention = self.retention;
        if let Some(entry) = &self.all_chats {
            if entry.last_access.elapsed() > retention {
                tracing::debug!("Evicting unused aggregate entry");
                self.all_chats = None;
            }
        }
        self.by_id
            .retain(|_, entry| entry.last_access.elapsed() <= retention);
    }

    /// Clones the cached chat for rollback snapshots
    ///
    /// Does not count as an access for retention purposes.
    pub fn snapshot_chat(&self, id: &str) -> Option<Chat> {
        self.by_id.get(id).map(|entry| entry.payload.clone())
    }

    /// Restores a chat payload captured by [`ChatCache::snapshot_chat`]
    ///
    /// Keeps the existing entry's fetch timestamp so a rollback does not
    /// masquerade as a fresh fetch.
    pub fn restore_chat(&mut self, chat: Chat) {
        match self.by_id.get_mut(&chat.id) {
            Some(entry) => entry.payload = chat,
            None => self.set_chat(chat),
        }
    }

    /// Appends a message to the cached chat, if present
    ///
    /// The optimistic phase of a send. Returns true if a cached entry was
    /// updated; false means nothing to roll back later.
    pub fn append_message(&mut self, id: &str, message: Message) -> bool {
        match self.by_id.get_mut(id) {
            Some(entry) => {
                entry.payload.messages.push(message);
                true
            }
            None => false,
        }
    }
}
