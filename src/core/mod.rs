//! # Core Module
//!
//! Configuration and reply text utilities shared by the bot.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Add response module with truncation, escaping and error messages
//! - 1.0.0: Initial creation with config module

pub mod config;
pub mod response;

// Re-export commonly used items
pub use config::Config;
pub use response::{
    escape_markdown, format_error_message, truncate_message, truncate_reply, MESSAGE_LIMIT,
    TRUNCATION_NOTE,
};
