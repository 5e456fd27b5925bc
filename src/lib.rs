//! sachat - terminal client for the SA-AI chat service
//!
//! This library provides the client-side data-synchronization layer for
//! the SA-AI chat service and the CLI presentation on top of it.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `session`: durable session store (identity + bearer token)
//! - `gateway`: REST client for the chat service
//! - `cache`: keyed in-memory chat cache with staleness and retention
//! - `coordinator`: mutation coordinator (optimistic send, invalidation,
//!   forced logout, notifications)
//! - `view`: pure derived view state (titles, projections, filtering)
//! - `config`: configuration management and validation
//! - `error`: error types and result aliases
//! - `cli`: command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use sachat::gateway::ChatGateway;
//! use sachat::session::SessionStore;
//! use sachat::Coordinator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let sessions = SessionStore::new()?;
//!     let gateway = ChatGateway::new("https://api.example.com/api", "token")?;
//!     let mut coordinator = Coordinator::new(gateway, sessions);
//!     coordinator.select_initial_chat().await;
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod cli;
pub mod commands;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod gateway;
pub mod session;
pub mod types;
pub mod view;

// Re-export commonly used types
pub use cache::ChatCache;
pub use config::Config;
pub use coordinator::{Coordinator, Notification, Severity};
pub use error::{Result, SachatError};
pub use gateway::ChatGateway;
pub use session::{Session, SessionStore};
pub use types::{Chat, ChatSummary, Message, Role};
