use crate::client::ChatClient;
use crate::config::Config;
use anyhow::{Context, Result, bail};
use tracing::info;

/// Send a single message without starting the terminal UI
pub async fn send_message(config: &Config, message: &str, conversation_id: Option<&str>) -> Result<()> {
    if message.trim().is_empty() {
        bail!("Message cannot be empty");
    }

    let client = ChatClient::new(&config.backend_url)?;
    info!(backend_url = client.base_url(), "sending one-shot message");

    let reply = client.send_message(message, conversation_id).await?;

    println!("🤖 Response:");
    println!("{}", reply.response);

    // The id to pass back with --conversation-id on the next call.
    if let Some(id) = reply.conversation_id().or(conversation_id) {
        println!();
        println!("🧵 Conversation: {}", id);
    }

    Ok(())
}

/// Print the backend's analytics as pretty JSON
pub async fn show_analytics(config: &Config) -> Result<()> {
    let client = ChatClient::new(&config.backend_url)?;
    info!(backend_url = client.base_url(), "fetching analytics");

    let analytics = client.get_analytics().await?;
    let pretty = serde_json::to_string_pretty(&analytics)
        .context("Failed to format analytics")?;

    println!("📊 AskEd analytics");
    println!("{}", "=".repeat(40));
    println!("{}", pretty);

    Ok(())
}
