//! Shared context for command handlers
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 1.0.0: Initial implementation with core shared state

use std::sync::Arc;

use crate::features::{CompletionClient, ConversationMemory, RateLimiter};

/// Shared context for all command handlers
///
/// Contains the services every handler may consult:
/// - RateLimiter for per-user admission
/// - ConversationMemory for recent exchanges
/// - CompletionClient for generating replies
/// - Reply limits and context size
/// - Bot start time for uptime display
#[derive(Clone)]
pub struct CommandContext {
    pub rate_limiter: Arc<RateLimiter>,
    pub memory: Arc<ConversationMemory>,
    pub completion: Arc<dyn CompletionClient>,
    pub max_message_length: usize,
    pub context_size: usize,
    pub start_time: std::time::Instant,
}

impl CommandContext {
    /// Create a new CommandContext with the given services
    pub fn new(
        rate_limiter: Arc<RateLimiter>,
        memory: Arc<ConversationMemory>,
        completion: Arc<dyn CompletionClient>,
        max_message_length: usize,
        context_size: usize,
    ) -> Self {
        Self {
            rate_limiter,
            memory,
            completion,
            max_message_length,
            context_size,
            start_time: std::time::Instant::now(),
        }
    }

    /// Prepend recent history for `user_id` to `message`, if there is any
    pub fn build_prompt(&self, user_id: i64, message: &str) -> String {
        let context = self.memory.get_context_string(user_id, self.context_size);
        if context.is_empty() {
            message.to_string()
        } else {
            format!("{context}\n{message}")
        }
    }
}
