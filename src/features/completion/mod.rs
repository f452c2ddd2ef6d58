//! # Completion Feature
//!
//! Remote AI completion service used to answer chat messages.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod client;

pub use client::{CompletionClient, LiberGptClient};
