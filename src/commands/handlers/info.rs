//! Informational command handlers
//!
//! Handles: start, help, status
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 1.1.0: /status reports memory usage and no longer spends rate limit quota
//! - 1.0.0: Initial welcome, help and status commands

use anyhow::Result;
use async_trait::async_trait;
use log::{debug, info};
use std::sync::Arc;

use crate::commands::context::CommandContext;
use crate::commands::handler::{BotCommandHandler, IncomingMessage, Reply, ReplySink};
use crate::core::escape_markdown;

const WELCOME_MESSAGE: &str = r"🤖 *Welcome to LiberGPT\!*

I'm your free AI assistant powered by advanced language models\. I can help you with:

✨ *Questions & Answers* \- Ask me anything\!
📚 *Explanations* \- Get detailed explanations on topics
💡 *Creative Tasks* \- Writing, brainstorming, and more
🔧 *Problem Solving* \- Help with coding, math, and logic

*Commands:*
• `/help` \- Show the help message
• `/status` \- Check bot status
• `/memory` \- Show what I remember about our chat
• `/clear` \- Make me forget our conversation
• Just send me any message to start chatting\!

*Note:* This bot has rate limiting to ensure fair usage for everyone\.

Ready to chat? Send me a message\! 🚀";

const HELP_MESSAGE: &str = r"🤖 *LiberGPT Help*

*Available Commands:*
• `/start` \- Welcome message and introduction
• `/help` \- Show this help message
• `/status` \- Check bot and API status
• `/memory` \- Show conversation memory stats
• `/clear` \- Forget our conversation history

*How to Use:*
1\. Simply send me any message or question
2\. I'll process it and respond with an AI\-generated answer
3\. I remember our recent messages, so you can ask follow\-up questions

*Examples:*
• What is Rust programming?
• Explain quantum physics
• Write a short story about space
• Help me with this math problem: 2x \+ 5 \= 15

*Rate Limits:*
To ensure fair usage, there are rate limits in place\. If you hit the limit, you'll be told when you can send messages again\.

Need more help? Just ask me anything\! 💬";

/// Handler for informational commands: start, help, status
pub struct InfoHandler;

#[async_trait]
impl BotCommandHandler for InfoHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["start", "help", "status"]
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        sink: &dyn ReplySink,
        msg: &IncomingMessage,
        name: &str,
    ) -> Result<()> {
        match name {
            "start" => {
                info!(
                    "User {} ({}) started the bot",
                    msg.user_id,
                    msg.display_name()
                );
                sink.send_reply(msg.chat_id, &Reply::markdown(WELCOME_MESSAGE))
                    .await
            }
            "help" => sink.send_reply(msg.chat_id, &Reply::markdown(HELP_MESSAGE)).await,
            "status" => self.handle_status(&ctx, sink, msg).await,
            _ => Ok(()),
        }
    }
}

impl InfoHandler {
    /// Handle /status command
    async fn handle_status(
        &self,
        ctx: &CommandContext,
        sink: &dyn ReplySink,
        msg: &IncomingMessage,
    ) -> Result<()> {
        info!("Status check requested by user {}", msg.user_id);

        if let Err(e) = sink.send_typing(msg.chat_id).await {
            // Typing indicator is cosmetic
            debug!("Failed to send typing action for /status: {e}");
        }
        let api_healthy = ctx.completion.health_check().await;

        let text = render_status(ctx, msg.user_id, api_healthy);
        sink.send_reply(msg.chat_id, &Reply::markdown(text)).await
    }
}

/// Build the MarkdownV2 status report for `user_id`
pub(crate) fn render_status(ctx: &CommandContext, user_id: i64, api_healthy: bool) -> String {
    let (api_emoji, api_status) = if api_healthy {
        ("🟢", "Online")
    } else {
        ("🔴", "Offline")
    };

    let limiter = &ctx.rate_limiter;
    let remaining_quota = limiter.remaining_quota(user_id);
    let availability = if remaining_quota > 0 {
        format!("✅ Available \\({remaining_quota} left\\)")
    } else {
        format!(
            "⏳ Rate limited for {}s",
            limiter.get_remaining_time(user_id)
        )
    };

    let user_memory = ctx.memory.get_memory_stats(user_id);
    let totals = ctx.memory.get_total_stats();
    let uptime = ctx.start_time.elapsed().as_secs();

    format!(
        "🤖 *LiberGPT Status*\n\n\
         *Bot:* 🟢 Online\n\
         *API:* {api_emoji} {api_status}\n\
         *Version:* {version}\n\
         *Uptime:* {uptime}s\n\n\
         *Rate Limiting:*\n\
         • Max messages: {max} per {window}s\n\
         • Your status: {availability}\n\n\
         *Memory:*\n\
         • Your conversations: {mine}/{cap}\n\
         • Active users: {users}\n\
         • Stored conversations: {total}",
        version = escape_markdown(env!("CARGO_PKG_VERSION")),
        max = limiter.max_messages(),
        window = limiter.time_window().as_secs(),
        mine = user_memory.conversation_count,
        cap = totals.max_conversations_per_user,
        users = totals.active_users,
        total = totals.total_conversations,
    )
}
