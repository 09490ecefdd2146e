// This is the entry point of the terminal chat demo.
//
// **Architecture Overview:**
// - `core/` = Business logic (auto-moderation pipeline, message-send flow)
// - `infra/` = Implementations of core traits (local publisher, policy files)
// - `terminal/` = Terminal-specific adapter (commands, feedback)
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize services (dependency injection)
// 3. Start the subscriber that prints incoming messages
// 4. Feed stdin lines to the terminal layer

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
mod core;
#[path = "infra/infra_layer.rs"]
mod infra;
#[path = "terminal/terminal_layer.rs"]
mod terminal;

mod config;

use crate::config::AppConfig;
use crate::core::chat::ChatService;
use crate::core::moderation::ModerationPipeline;
use crate::infra::chat::LocalPublisher;
use crate::terminal::formatter::format_message;
use crate::terminal::{handle_line, Data, LineResult, Session};
use anyhow::Context;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging so we can see what's happening
    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env().context("Invalid configuration")?;
    tracing::info!(
        sender_id = %config.sender_id,
        channel = %config.channel,
        scope = ?config.scope,
        blocked_terms = config.moderation.blocked_terms.len(),
        "Starting chat demo"
    );

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================
    // This is the "composition root" where we wire everything together.

    let moderation = Arc::new(ModerationPipeline::new(config.moderation.clone()));
    let publisher = Arc::new(LocalPublisher::new());
    let chat = Arc::new(ChatService::new(
        Arc::clone(&moderation),
        Arc::clone(&publisher),
        config.scope,
    ));

    let data = Data {
        chat: Arc::clone(&chat),
        publisher: Arc::clone(&publisher),
    };

    // Print everything that gets published, like a second client would see it
    let mut incoming = publisher.subscribe();
    tokio::spawn(async move {
        loop {
            match incoming.recv().await {
                Ok(message) => println!("{}", format_message(&message)),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Subscriber fell behind, skipped {} messages", skipped);
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    let mut session = Session {
        sender_id: config.sender_id,
        channel: config.channel,
    };

    println!(
        "💬 Chatting as {} in #{}. Type /help for commands.",
        session.sender_id, session.channel
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        match handle_line(&data, &mut session, &line).await {
            Ok(LineResult::Output(output)) => {
                for line in output {
                    println!("{}", line);
                }
            }
            Ok(LineResult::Quit) => break,
            Err(e) => tracing::error!("Error handling input: {}", e),
        }
    }

    println!("👋 Bye!");
    Ok(())
}
