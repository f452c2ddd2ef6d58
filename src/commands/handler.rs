//! Bot command handler trait and reply plumbing
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 1.0.0: Initial implementation for modular command handling

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use super::context::CommandContext;
use crate::features::UserId;
use crate::telegram::{Message, ParseMode};

/// A chat message reduced to what the handlers need
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    pub user_id: UserId,
    pub username: Option<String>,
    pub chat_id: i64,
    pub text: String,
}

impl IncomingMessage {
    /// Build from a Telegram message; `None` for non-text or anonymous messages
    pub fn from_telegram(msg: &Message) -> Option<Self> {
        let from = msg.from.as_ref()?;
        let text = msg.text.as_ref()?;

        Some(Self {
            user_id: from.id,
            username: from.username.clone(),
            chat_id: msg.chat.id,
            text: text.clone(),
        })
    }

    /// Name for log lines
    pub fn display_name(&self) -> &str {
        self.username.as_deref().unwrap_or("unknown")
    }

    /// `("command", "args")` when the text is a `/command`
    pub fn command(&self) -> Option<(&str, &str)> {
        let rest = self.text.trim_start().strip_prefix('/')?;
        let (head, args) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
        let name = head.split('@').next().unwrap_or(head);
        Some((name, args.trim()))
    }
}

/// A reply ready to deliver to a chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub parse_mode: Option<ParseMode>,
}

impl Reply {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            parse_mode: None,
        }
    }

    /// Text that is already MarkdownV2-escaped where needed
    pub fn markdown(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            parse_mode: Some(ParseMode::MarkdownV2),
        }
    }
}

/// Where handlers deliver their output
///
/// Implemented by the Telegram transport; tests use a recording sink.
#[async_trait]
pub trait ReplySink: Send + Sync {
    /// Show the "typing..." indicator in the chat
    async fn send_typing(&self, chat_id: i64) -> Result<()>;

    async fn send_reply(&self, chat_id: i64, reply: &Reply) -> Result<()>;
}

/// Trait for bot command handlers
///
/// Each handler processes one or more `/commands`. Handlers are registered with a
/// CommandRegistry and dispatched based on command name.
#[async_trait]
pub trait BotCommandHandler: Send + Sync {
    /// Command name(s) this handler processes, without the leading slash
    fn command_names(&self) -> &'static [&'static str];

    /// Handle the command
    ///
    /// # Arguments
    ///
    /// * `ctx` - Shared services (rate limiter, memory, completion client)
    /// * `sink` - Reply delivery
    /// * `msg` - The message that carried the command
    /// * `name` - The command name that matched
    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        sink: &dyn ReplySink,
        msg: &IncomingMessage,
        name: &str,
    ) -> Result<()>;
}
