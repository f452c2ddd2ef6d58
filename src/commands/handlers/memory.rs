//! Conversation memory command handlers
//!
//! Handles: clear, memory
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::info;
use std::sync::Arc;

use crate::commands::context::CommandContext;
use crate::commands::handler::{BotCommandHandler, IncomingMessage, Reply, ReplySink};
use crate::core::escape_markdown;
use crate::features::MemoryStats;

/// Handler for memory commands: clear, memory
pub struct MemoryHandler;

#[async_trait]
impl BotCommandHandler for MemoryHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["clear", "memory"]
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        sink: &dyn ReplySink,
        msg: &IncomingMessage,
        name: &str,
    ) -> Result<()> {
        let reply = match name {
            "clear" => {
                let cleared = ctx.memory.clear_user_memory(msg.user_id);
                info!("User {} cleared {cleared} conversations", msg.user_id);
                render_cleared(cleared)
            }
            "memory" => render_memory(&ctx.memory.get_memory_stats(msg.user_id)),
            _ => return Ok(()),
        };

        sink.send_reply(msg.chat_id, &Reply::markdown(reply)).await
    }
}

fn render_cleared(cleared: usize) -> String {
    match cleared {
        0 => "🗑️ There was nothing to forget\\.".to_string(),
        1 => "🗑️ Forgot *1* conversation\\. Let's start fresh\\!".to_string(),
        n => format!("🗑️ Forgot *{n}* conversations\\. Let's start fresh\\!"),
    }
}

fn format_timestamp(ts: Option<DateTime<Utc>>) -> String {
    match ts {
        Some(ts) => escape_markdown(&ts.format("%Y-%m-%d %H:%M:%S UTC").to_string()),
        None => "\\-".to_string(),
    }
}

fn render_memory(stats: &MemoryStats) -> String {
    if stats.conversation_count == 0 {
        return "🧠 *Conversation Memory*\n\nI don't remember any conversations with you yet\\."
            .to_string();
    }

    format!(
        "🧠 *Conversation Memory*\n\n\
         • Conversations remembered: {}\n\
         • Oldest: {}\n\
         • Newest: {}\n\n\
         Use /clear to make me forget\\.",
        stats.conversation_count,
        format_timestamp(stats.oldest_conversation),
        format_timestamp(stats.newest_conversation),
    )
}
