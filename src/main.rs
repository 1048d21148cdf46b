use anyhow::Result;
use clap::{Parser, Subcommand};

mod app;
mod client;
mod commands;
mod config;
mod error;
mod events;
mod logging;
mod tui;
mod turn;
mod ui;

use config::Config;
use logging::LogTarget;

#[derive(Parser)]
#[command(name = "asked")]
#[command(version)]
#[command(about = "Chat with the AskEd student services assistant", long_about = None)]
struct Cli {
    /// Base URL of the chat backend [env: ASKED_BACKEND_URL]
    #[arg(long, global = true)]
    backend_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive chat (default)
    Chat,
    /// Send one message and print the reply
    Send {
        message: String,
        /// Continue an existing conversation
        #[arg(long)]
        conversation_id: Option<String>,
    },
    /// Print usage analytics from the backend
    Analytics,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::load(cli.backend_url)?;

    match cli.command {
        None | Some(Commands::Chat) => {
            logging::init(&config, LogTarget::File)?;
            app::run(&config).await
        }
        Some(Commands::Send { message, conversation_id }) => {
            logging::init(&config, LogTarget::Stderr)?;
            commands::send_message(&config, &message, conversation_id.as_deref()).await
        }
        Some(Commands::Analytics) => {
            logging::init(&config, LogTarget::Stderr)?;
            commands::show_analytics(&config).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_url_flag_works_after_the_subcommand() {
        let cli = Cli::try_parse_from(["asked", "send", "hi", "--backend-url", "http://cli:9000"])
            .unwrap();
        assert_eq!(cli.backend_url.as_deref(), Some("http://cli:9000"));
        assert!(matches!(cli.command, Some(Commands::Send { .. })));

        let cli = Cli::try_parse_from(["asked"]).unwrap();
        assert!(cli.backend_url.is_none());
        assert!(cli.command.is_none());
    }
}
