//! Interactive chat session handler
//!
//! A readline-based loop that submits user input to the coordinator and
//! renders the active chat's projected messages. Lines starting with `/`
//! are session commands; anything else is sent as a message. Message text
//! is rendered verbatim; markdown stays plain.

use crate::commands::{build_coordinator, print_notifications};
use crate::config::Config;
use crate::coordinator::Coordinator;
use crate::error::Result;
use crate::types::{Chat, Role};
use crate::view::{self, Sender};
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// Start an interactive chat session
///
/// # Arguments
///
/// * `config` - loaded configuration
/// * `chat_id` - open this chat instead of the most recent one
pub async fn run_chat(config: Config, chat_id: Option<String>) -> Result<()> {
    let mut coordinator = build_coordinator(&config)?;

    match chat_id {
        Some(id) => coordinator.select_chat(id),
        None => coordinator.select_initial_chat().await,
    }
    print_notifications(coordinator.drain_notifications());
    if coordinator.is_logged_out() {
        return Ok(());
    }

    if let Some(chat) = coordinator.active_chat().await {
        println!("{}", view::display_title(Some(&chat)).bold());
        render_messages(&chat);
    }
    print_notifications(coordinator.drain_notifications());

    let mut editor = DefaultEditor::new()?;
    loop {
        if coordinator.is_logged_out() {
            println!("{}", "Session expired, please log in again".yellow());
            break;
        }

        let line = match editor.readline(">> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }
        let _ = editor.add_history_entry(&line);

        if let Some(rest) = line.strip_prefix('/') {
            if handle_command(&mut coordinator, rest).await? {
                break;
            }
        } else {
            send_and_render(&mut coordinator, &line).await;
        }
        print_notifications(coordinator.drain_notifications());
    }

    Ok(())
}

/// Handles a `/command`; returns true when the session should end
async fn handle_command(coordinator: &mut Coordinator, input: &str) -> Result<bool> {
    let (command, rest) = match input.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (input, ""),
    };

    match command {
        "help" => print_help(),
        "quit" | "exit" => return Ok(true),
        "new" => {
            coordinator.create_chat().await;
        }
        "list" | "search" => {
            let chats = coordinator.chats().await;
            let filtered = view::filter_chats(&chats, rest);
            if filtered.is_empty() {
                println!("{}", "No chats found".yellow());
            }
            for chat in filtered.iter().rev() {
                let marker = if coordinator.active_chat_id() == Some(chat.id.as_str()) {
                    "*"
                } else {
                    " "
                };
                let title = if chat.title.is_empty() {
                    view::UNTITLED.to_string()
                } else {
                    chat.title.clone()
                };
                println!("{} {}  {}", marker, chat.id.cyan(), title);
            }
        }
        "open" => {
            if rest.is_empty() {
                println!("{}", "Usage: /open <chat-id>".yellow());
            } else {
                coordinator.select_chat(rest);
                if let Some(chat) = coordinator.active_chat().await {
                    println!("{}", view::display_title(Some(&chat)).bold());
                    render_messages(&chat);
                }
            }
        }
        "title" => {
            let id = coordinator.active_chat_id().map(str::to_string);
            match id {
                Some(id) if !rest.is_empty() => {
                    coordinator.begin_title_edit(&id);
                    coordinator.update_chat_title(&id, rest).await;
                }
                Some(_) => println!("{}", "Usage: /title <new title>".yellow()),
                None => println!("{}", "No active chat".yellow()),
            }
        }
        "clear" => {
            let id = coordinator.active_chat_id().map(str::to_string);
            match id {
                Some(id) => coordinator.clear_chat_messages(&id).await,
                None => println!("{}", "No active chat".yellow()),
            }
        }
        "delete" => {
            let id = coordinator.active_chat_id().map(str::to_string);
            match id {
                Some(id) => {
                    coordinator.request_delete(&id);
                    coordinator.confirm_delete().await;
                }
                None => println!("{}", "No active chat".yellow()),
            }
        }
        other => println!(
            "{}",
            format!("Unknown command: /{} (try /help)", other).yellow()
        ),
    }
    Ok(false)
}

async fn send_and_render(coordinator: &mut Coordinator, content: &str) {
    coordinator.set_draft(content);
    coordinator.send_message(content).await;
    if coordinator.is_sending() || coordinator.is_logged_out() {
        return;
    }
    // The send invalidated the chat entry; this read reconciles with
    // server truth and may already include the assistant reply.
    if let Some(chat) = coordinator.active_chat().await {
        if let Some(last) = chat.messages.last() {
            if last.role == Role::Assistant {
                print_message(Sender::Assistant, &last.content);
            }
        }
    }
}

fn render_messages(chat: &Chat) {
    for message in view::project_messages(chat) {
        print_message(message.sender, &message.text);
    }
}

fn print_message(sender: Sender, text: &str) {
    let tag = match sender {
        Sender::User => format!("[{}]", sender).green(),
        Sender::Assistant => format!("[{}]", sender).cyan(),
    };
    println!("{} {}", tag, text);
}

fn print_help() {
    println!("Session commands:");
    println!("  /new              start a new chat");
    println!("  /list [query]     list chats, optionally filtered");
    println!("  /search <query>   alias for /list with a query");
    println!("  /open <id>        switch to another chat");
    println!("  /title <text>     rename the current chat");
    println!("  /clear            clear the current chat's messages");
    println!("  /delete           delete the current chat");
    println!("  /quit             leave the session");
    println!("Anything else is sent to the assistant.");
}
