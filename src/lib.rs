// Core layer - configuration and reply text utilities
pub mod core;

// Features layer - rate limiting, conversation memory, completion client
pub mod features;

// Transport layer - Telegram Bot API
pub mod telegram;

// Application layer
pub mod command_handler;
pub mod commands;

pub use crate::core::Config;

pub use features::{
    // Completion
    CompletionClient, LiberGptClient,
    // Memory
    Conversation, ConversationMemory, MemoryStats, TotalStats,
    // Rate limiting
    RateLimiter, UserId,
};

pub use commands::{CommandContext, CommandHandler, IncomingMessage, Reply, ReplySink};
pub use telegram::TelegramApi;
