//! Login, signup, and logout handlers
//!
//! These run without a coordinator: they talk to the gateway's auth
//! endpoints directly and manage the persisted session.

use crate::config::Config;
use crate::error::Result;
use crate::gateway::ChatGateway;
use crate::session::{Session, SessionStore};
use colored::Colorize;
use rustyline::DefaultEditor;

/// Log in and persist the session
pub async fn run_login(config: Config, email: Option<String>) -> Result<()> {
    let mut editor = DefaultEditor::new()?;
    let email = match email {
        Some(email) => email,
        None => editor.readline("email: ")?.trim().to_string(),
    };
    let password = editor.readline("password: ")?;

    let auth = ChatGateway::login(&config.gateway.base_url, &email, &password).await?;
    let sessions = SessionStore::new()?;
    sessions.save(&Session::new(auth.user.id, &auth.user.name, auth.token))?;

    println!("{}", format!("Logged in as {}", auth.user.name).green());
    Ok(())
}

/// Create an account and persist the session
pub async fn run_signup(
    config: Config,
    name: Option<String>,
    email: Option<String>,
) -> Result<()> {
    let mut editor = DefaultEditor::new()?;
    let name = match name {
        Some(name) => name,
        None => editor.readline("name: ")?.trim().to_string(),
    };
    let email = match email {
        Some(email) => email,
        None => editor.readline("email: ")?.trim().to_string(),
    };
    let password = editor.readline("password: ")?;

    let auth = ChatGateway::signup(&config.gateway.base_url, &name, &email, &password).await?;
    let sessions = SessionStore::new()?;
    sessions.save(&Session::new(auth.user.id, &auth.user.name, auth.token))?;

    println!("{}", format!("Welcome, {}", auth.user.name).green());
    Ok(())
}

/// Remove the stored session
pub fn run_logout() -> Result<()> {
    let sessions = SessionStore::new()?;
    sessions.clear()?;
    println!("{}", "Logged out".yellow());
    Ok(())
}
