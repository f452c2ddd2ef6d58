//! # Command System
//!
//! `/command` handling for Telegram chats.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Add /memory and /clear for conversation memory
//! - 1.0.0: Modular handler infrastructure (handler trait, context, registry)

pub mod context;
pub mod handler;
pub mod handlers;
pub mod registry;

// Re-export the CommandHandler from the dispatcher module
pub use crate::command_handler::CommandHandler;

// Re-export handler infrastructure
pub use context::CommandContext;
pub use handler::{BotCommandHandler, IncomingMessage, Reply, ReplySink};
pub use registry::CommandRegistry;
