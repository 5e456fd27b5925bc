/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

It exposes three top-level command modules:

- `chat`  — Interactive chat session
- `auth`  — Login, signup, and logout
- `chats` — One-shot chat management (list, rename, delete, clear)

These handlers are the presentation layer: they build a coordinator from
the loaded configuration and stored session, invoke its operations, and
render the outputs (chat lists, message projections, notifications) as
plain terminal text.
*/

use crate::config::Config;
use crate::coordinator::{Coordinator, Notification, Severity};
use crate::error::{Result, SachatError};
use crate::gateway::ChatGateway;
use crate::session::SessionStore;
use colored::Colorize;
use std::time::Duration;

pub mod auth;
pub mod chat;
pub mod chats;

/// Builds a coordinator for the stored session
///
/// Fails with [`SachatError::NotLoggedIn`] when no session exists.
pub fn build_coordinator(config: &Config) -> Result<Coordinator> {
    let sessions = SessionStore::new()?;
    let session = sessions.load()?.ok_or(SachatError::NotLoggedIn)?;
    let gateway = ChatGateway::with_timeout(
        &config.gateway.base_url,
        &session.token,
        Duration::from_secs(config.gateway.timeout_seconds),
    )?;
    Ok(Coordinator::new(gateway, sessions))
}

/// Prints queued notifications with severity coloring
pub fn print_notifications(notifications: Vec<Notification>) {
    for notification in notifications {
        match notification.severity {
            Severity::Info => println!("{}", notification.message.yellow()),
            Severity::Success => println!("{}", notification.message.green()),
            Severity::Error => eprintln!("{}", notification.message.red()),
        }
    }
}
