//! # Conversation Memory Feature
//!
//! Bounded per-user history that gives the stateless completion service
//! conversational continuity.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

pub mod store;

pub use store::{Conversation, ConversationMemory, MemoryStats, TotalStats};
