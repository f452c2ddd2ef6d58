//! # Features
//!
//! Feature modules consulted by the command handler on every message.

pub mod completion;
pub mod memory;
pub mod rate_limiting;

pub use completion::{CompletionClient, LiberGptClient};
pub use memory::{Conversation, ConversationMemory, MemoryStats, TotalStats};
pub use rate_limiting::RateLimiter;

/// Telegram user id, the key for every per-user store
pub type UserId = i64;
