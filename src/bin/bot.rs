use anyhow::Result;
use dotenvy::dotenv;
use log::{debug, error, info, warn};
use std::sync::Arc;
use std::time::Duration;

use libergpt::commands::{CommandContext, CommandHandler, IncomingMessage};
use libergpt::core::Config;
use libergpt::features::{CompletionClient, ConversationMemory, LiberGptClient, RateLimiter};
use libergpt::telegram::{TelegramApi, Update};

/// Long-poll timeout passed to getUpdates
const POLL_TIMEOUT_SECS: u64 = 30;

/// Back-off after a failed poll
const POLL_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Hand each message update to its own task so slow completions don't block polling
fn dispatch(update: Update, handler: &CommandHandler, api: &TelegramApi) {
    let Some(message) = update.message else {
        debug!("Skipping update {} without a message", update.update_id);
        return;
    };
    if message.from.as_ref().is_some_and(|u| u.is_bot) {
        return;
    }
    let Some(incoming) = IncomingMessage::from_telegram(&message) else {
        debug!("Skipping non-text message {}", message.message_id);
        return;
    };

    let handler = handler.clone();
    let api = api.clone();
    tokio::spawn(async move {
        if let Err(e) = handler.handle_message(&api, &incoming).await {
            error!(
                "Exception while handling message from user {}: {e:#}",
                incoming.user_id
            );
            let _ = api
                .send_message(
                    incoming.chat_id,
                    "❌ An unexpected error occurred. Please try again later.",
                    None,
                )
                .await
                .map_err(|e| error!("Failed to send error message to user: {e}"));
        }
    });
}

async fn poll_updates(api: TelegramApi, handler: CommandHandler) -> Result<()> {
    let mut offset = api.drop_pending_updates().await?;
    info!("Bot is polling for updates...");

    loop {
        match api.get_updates(offset, POLL_TIMEOUT_SECS).await {
            Ok(updates) => {
                for update in updates {
                    offset = Some(update.update_id + 1);
                    dispatch(update, &handler, &api);
                }
            }
            Err(e) => {
                warn!("Polling failed: {e:#}. Retrying in {POLL_RETRY_DELAY:?}");
                tokio::time::sleep(POLL_RETRY_DELAY).await;
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting LiberGPT Telegram Bot...");
    info!("Debug mode: {}", config.debug);
    info!("API URL: {}", config.full_api_url());
    info!(
        "Rate limit: {} msgs/{}s",
        config.rate_limit_messages, config.rate_limit_window
    );
    info!(
        "Memory: {} conversations per user, {} as context",
        config.memory_conversations, config.memory_context_size
    );

    let rate_limiter = Arc::new(RateLimiter::new(
        config.rate_limit_messages,
        Duration::from_secs(config.rate_limit_window),
    )?);
    let memory = Arc::new(ConversationMemory::new(config.memory_conversations)?);
    let completion = Arc::new(LiberGptClient::new(
        config.full_api_url(),
        Duration::from_secs(config.api_timeout),
    )?);

    let api = TelegramApi::new(&config.bot_token)?;
    let me = api.get_me().await.map_err(|e| {
        error!("Failed to reach Telegram: {e:#}");
        error!("This could indicate:");
        error!("  - Invalid bot token");
        error!("  - Network issues reaching api.telegram.org");
        e
    })?;
    info!(
        "Logged in as @{}",
        me.username.as_deref().unwrap_or(&me.first_name)
    );

    if completion.health_check().await {
        info!("API health check passed - bot is ready");
    } else {
        warn!("API health check failed - bot may not function properly");
    }

    let ctx = CommandContext::new(
        rate_limiter,
        memory,
        completion,
        config.max_message_length,
        config.memory_context_size,
    );
    let handler = CommandHandler::new(ctx);

    tokio::select! {
        result = poll_updates(api, handler) => {
            if let Err(e) = &result {
                error!("Fatal error: {e:#}");
            }
            result
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal, stopping...");
            info!("Bot shutdown completed");
            Ok(())
        }
    }
}
