//! # Telegram Module
//!
//! Bot API transport: long polling for updates and delivering replies.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod api;
pub mod types;

pub use api::TelegramApi;
pub use types::{Chat, Message, ParseMode, Update, User};
