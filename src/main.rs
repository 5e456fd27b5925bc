//! sachat - terminal client for the SA-AI chat service
//!
//! Main entry point: initializes tracing, loads configuration, and
//! dispatches to the command handlers.

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sachat::cli::{ChatsCommand, Cli, Commands};
use sachat::commands;
use sachat::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    init_tracing(cli.verbose);

    // Mirror a CLI session-file override into the environment so the
    // session store picks it up wherever it is constructed.
    if let Some(path) = &cli.session_file {
        std::env::set_var("SACHAT_SESSION_FILE", path);
        tracing::info!("Using session file override from CLI: {}", path);
    }

    let config = Config::load(&cli.config, &cli)?;
    config.validate()?;

    match cli.command {
        Commands::Chat { id } => {
            tracing::info!("Starting interactive chat session");
            commands::chat::run_chat(config, id).await
        }
        Commands::Login { email } => commands::auth::run_login(config, email).await,
        Commands::Signup { name, email } => commands::auth::run_signup(config, name, email).await,
        Commands::Logout => commands::auth::run_logout(),
        Commands::Chats { command } => match command {
            ChatsCommand::List { query } => commands::chats::run_list(config, query).await,
            ChatsCommand::Rename { id, title } => {
                commands::chats::run_rename(config, id, title).await
            }
            ChatsCommand::Delete { id, yes } => commands::chats::run_delete(config, id, yes).await,
            ChatsCommand::Clear { id } => commands::chats::run_clear(config, id).await,
        },
    }
}

/// Initializes the tracing subscriber
///
/// `RUST_LOG` takes precedence; `--verbose` raises the default level to
/// debug for this crate.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "sachat=debug" } else { "sachat=info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}
