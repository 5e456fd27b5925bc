//! One-shot chat management handlers
//!
//! Non-interactive equivalents of the in-session slash commands: list,
//! rename, delete, and clear a chat, then exit.

use crate::commands::{build_coordinator, print_notifications};
use crate::config::Config;
use crate::error::Result;
use crate::view;
use colored::Colorize;
use rustyline::DefaultEditor;

/// List chats, most recent first, optionally filtered
pub async fn run_list(config: Config, query: Option<String>) -> Result<()> {
    let mut coordinator = build_coordinator(&config)?;
    let chats = coordinator.chats().await;
    let query = query.unwrap_or_default();
    let filtered = view::filter_chats(&chats, &query);

    if filtered.is_empty() {
        if query.trim().is_empty() {
            println!("{}", "No chats".yellow());
        } else {
            println!("{}", "No chats found".yellow());
        }
    }

    // Matching preserves gateway order; display is most-recent-first.
    for chat in filtered.iter().rev() {
        let summary = chat.summary();
        let title = if summary.title.is_empty() {
            view::UNTITLED.to_string()
        } else {
            summary.title
        };
        match summary.last_message_preview {
            Some(preview) => println!(
                "{}  {}  {}",
                summary.id.cyan(),
                title.bold(),
                preview.dimmed()
            ),
            None => println!("{}  {}", summary.id.cyan(), title.bold()),
        }
    }

    print_notifications(coordinator.drain_notifications());
    Ok(())
}

/// Rename a chat
pub async fn run_rename(config: Config, id: String, title: String) -> Result<()> {
    let mut coordinator = build_coordinator(&config)?;
    coordinator.begin_title_edit(&id);
    coordinator.update_chat_title(&id, title.trim()).await;
    print_notifications(coordinator.drain_notifications());
    Ok(())
}

/// Delete a chat, confirming first unless `--yes` was passed
pub async fn run_delete(config: Config, id: String, yes: bool) -> Result<()> {
    let mut coordinator = build_coordinator(&config)?;
    coordinator.request_delete(&id);

    if !yes {
        let mut editor = DefaultEditor::new()?;
        let answer = editor.readline(&format!("Delete chat {}? [y/N] ", id))?;
        if !answer.trim().eq_ignore_ascii_case("y") {
            coordinator.cancel_delete();
            println!("{}", "Cancelled".yellow());
            return Ok(());
        }
    }

    coordinator.confirm_delete().await;
    print_notifications(coordinator.drain_notifications());
    Ok(())
}

/// Clear a chat's messages
pub async fn run_clear(config: Config, id: String) -> Result<()> {
    let mut coordinator = build_coordinator(&config)?;
    coordinator.clear_chat_messages(&id).await;
    print_notifications(coordinator.drain_notifications());
    Ok(())
}
