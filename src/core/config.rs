//! Environment-driven bot configuration
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use anyhow::{anyhow, bail, Context, Result};
use std::str::FromStr;

const DEFAULT_API_BASE_URL: &str = "https://api.zpi.my.id/v1/ai/copilot";
const DEFAULT_CORS_PROXY: &str = "https://cors.fadel.web.id/";

#[derive(Debug, Clone)]
pub struct Config {
    pub bot_token: String,
    pub api_base_url: String,
    /// Empty when requests go straight to the API
    pub cors_proxy: String,
    pub debug: bool,
    pub log_level: String,
    pub max_message_length: usize,
    pub rate_limit_messages: usize,
    pub rate_limit_window: u64,
    pub memory_conversations: usize,
    pub memory_context_size: usize,
    pub api_timeout: u64,
}

impl Config {
    /// Load configuration from the process environment (after `dotenv()`).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bot_token = lookup("BOT_TOKEN")
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| anyhow!("BOT_TOKEN is required. Please set it in your .env file"))?;

        let api_base_url =
            lookup("API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        if api_base_url.trim().is_empty() {
            bail!("API_BASE_URL is required. Please set it in your .env file");
        }

        let cors_proxy = lookup("CORS_PROXY").unwrap_or_else(|| DEFAULT_CORS_PROXY.to_string());

        let debug = lookup("DEBUG")
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        let log_level = lookup("LOG_LEVEL")
            .unwrap_or_else(|| if debug { "debug" } else { "info" }.to_string());

        let config = Config {
            bot_token,
            api_base_url,
            cors_proxy,
            debug,
            log_level,
            max_message_length: parse_var(&lookup, "MAX_MESSAGE_LENGTH", 4096)?,
            rate_limit_messages: parse_var(&lookup, "RATE_LIMIT_MESSAGES", 10)?,
            rate_limit_window: parse_var(&lookup, "RATE_LIMIT_WINDOW", 60)?,
            memory_conversations: parse_var(&lookup, "MEMORY_CONVERSATIONS", 20)?,
            memory_context_size: parse_var(&lookup, "MEMORY_CONTEXT_SIZE", 5)?,
            api_timeout: parse_var(&lookup, "API_TIMEOUT", 30)?,
        };

        // Leave room for "..." and the truncation note
        if config.max_message_length < 64 {
            bail!(
                "MAX_MESSAGE_LENGTH must be at least 64, got {}",
                config.max_message_length
            );
        }
        if config.api_timeout == 0 {
            bail!("API_TIMEOUT must be positive");
        }

        Ok(config)
    }

    /// Completion endpoint, routed through the CORS proxy when one is configured.
    pub fn full_api_url(&self) -> String {
        if self.cors_proxy.is_empty() {
            self.api_base_url.clone()
        } else {
            format!(
                "{}/{}",
                self.cors_proxy.trim_end_matches('/'),
                self.api_base_url
            )
        }
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a number, got '{raw}'")),
        None => Ok(default),
    }
}
