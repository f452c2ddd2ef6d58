//! # Message Dispatcher
//!
//! Routes every inbound chat message: `/commands` go to their registered handler,
//! everything else is relayed to the completion service under the per-user rate
//! limit, with recent conversation memory prepended as context.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Conversation memory context and recording of completed exchanges
//! - 1.0.0: Initial relay with rate limiting

use anyhow::Result;
use log::{debug, error, info, warn};
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use crate::commands::context::CommandContext;
use crate::commands::handler::{IncomingMessage, Reply, ReplySink};
use crate::commands::registry::CommandRegistry;
use crate::core::{format_error_message, truncate_reply};

/// Characters of message text included in log lines
const LOG_PREVIEW_CHARS: usize = 50;

#[derive(Clone)]
pub struct CommandHandler {
    ctx: Arc<CommandContext>,
    registry: CommandRegistry,
}

impl CommandHandler {
    pub fn new(ctx: CommandContext) -> Self {
        Self::with_registry(ctx, CommandRegistry::with_defaults())
    }

    pub fn with_registry(ctx: CommandContext, registry: CommandRegistry) -> Self {
        Self {
            ctx: Arc::new(ctx),
            registry,
        }
    }

    pub fn context(&self) -> &CommandContext {
        &self.ctx
    }

    /// Handle one inbound message, delivering any replies through `sink`
    pub async fn handle_message(&self, sink: &dyn ReplySink, msg: &IncomingMessage) -> Result<()> {
        if let Some((name, _args)) = msg.command() {
            debug!("User {} issued /{name}", msg.user_id);
            return match self.registry.get(name) {
                Some(handler) => handler.handle(self.ctx.clone(), sink, msg, name).await,
                None => {
                    sink.send_reply(
                        msg.chat_id,
                        &Reply::plain(format!("Unknown command /{name}. Send /help to see what I can do.")),
                    )
                    .await
                }
            };
        }

        self.handle_chat(sink, msg).await
    }

    /// Relay a plain text message to the completion service
    async fn handle_chat(&self, sink: &dyn ReplySink, msg: &IncomingMessage) -> Result<()> {
        let request_id = Uuid::new_v4();
        let start_time = Instant::now();
        let user_id = msg.user_id;

        info!(
            "[{request_id}] Message from user {user_id} ({}): {}...",
            msg.display_name(),
            msg.text.chars().take(LOG_PREVIEW_CHARS).collect::<String>()
        );

        if !self.ctx.rate_limiter.is_allowed(user_id) {
            let remaining = self.ctx.rate_limiter.get_remaining_time(user_id);
            warn!("[{request_id}] Rate limit exceeded for user {user_id}, {remaining}s remaining");
            return sink
                .send_reply(msg.chat_id, &Reply::markdown(rate_limit_message(remaining)))
                .await;
        }

        if let Err(e) = sink.send_typing(msg.chat_id).await {
            // Typing indicator is cosmetic
            debug!("[{request_id}] Failed to send typing action: {e}");
        }

        let prompt = self.ctx.build_prompt(user_id, &msg.text);
        debug!("[{request_id}] Prompt built | Length: {} chars", prompt.len());

        match self.ctx.completion.get_response(&prompt).await {
            Ok(response) => {
                self.ctx
                    .memory
                    .add_conversation(user_id, &msg.text, &response);

                let reply = truncate_reply(&response, self.ctx.max_message_length);
                sink.send_reply(msg.chat_id, &Reply::plain(reply.as_str()))
                    .await?;

                info!(
                    "[{request_id}] Responded to user {user_id} with {} characters in {:?}",
                    reply.chars().count(),
                    start_time.elapsed()
                );
                Ok(())
            }
            Err(e) => {
                error!("[{request_id}] Error processing message from user {user_id}: {e:#}");
                sink.send_reply(msg.chat_id, &Reply::plain(format_error_message(&e)))
                    .await
            }
        }
    }
}

fn rate_limit_message(remaining_secs: u64) -> String {
    format!(
        "⏳ *Rate Limit Exceeded*\n\n\
         You've sent too many messages recently\\. Please wait *{remaining_secs} seconds* before sending another message\\.\n\n\
         This helps ensure fair usage for all users\\. Thank you for understanding\\! 🙏"
    )
}
