//! Command-line interface definition for sachat
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for the interactive chat session, authentication,
//! and one-shot chat management.

use clap::{Parser, Subcommand};

/// sachat - terminal client for the SA-AI chat service
#[derive(Parser, Debug, Clone)]
#[command(name = "sachat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: String,

    /// Override the gateway base URL from config
    #[arg(long, env = "SACHAT_API_BASE")]
    pub api_base: Option<String>,

    /// Override the session file location
    #[arg(long)]
    pub session_file: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for sachat
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive chat session
    Chat {
        /// Open a specific chat instead of the most recent one
        #[arg(long)]
        id: Option<String>,
    },

    /// Log in and store a session
    Login {
        /// Account email; prompted for if omitted
        #[arg(long)]
        email: Option<String>,
    },

    /// Create an account and store a session
    Signup {
        /// Display name; prompted for if omitted
        #[arg(long)]
        name: Option<String>,

        /// Account email; prompted for if omitted
        #[arg(long)]
        email: Option<String>,
    },

    /// Remove the stored session
    Logout,

    /// Manage chats without entering the interactive session
    Chats {
        /// Chat management subcommand
        #[command(subcommand)]
        command: ChatsCommand,
    },
}

/// Chat management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ChatsCommand {
    /// List chats, most recent first
    List {
        /// Filter by a case-insensitive substring of title or last message
        #[arg(short, long)]
        query: Option<String>,
    },

    /// Rename a chat
    Rename {
        /// Chat id
        id: String,
        /// New title
        title: String,
    },

    /// Delete a chat
    Delete {
        /// Chat id
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Clear a chat's messages
    Clear {
        /// Chat id
        id: String,
    },
}

impl Cli {
    /// Parses command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
