//! # Telegram Bot API Client
//!
//! Thin reqwest wrapper over the HTTPS Bot API: long polling for updates and
//! sending replies back to chats.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use crate::commands::{Reply, ReplySink};
use crate::telegram::types::{
    ApiResponse, GetUpdatesRequest, ParseMode, SendChatActionRequest, SendMessageRequest, Update,
    User,
};

const API_ROOT: &str = "https://api.telegram.org";

/// Extra slack on top of the long-poll timeout before reqwest gives up
const POLL_GRACE: Duration = Duration::from_secs(10);

/// Only message updates are processed
const ALLOWED_UPDATES: &[&str] = &["message"];

#[derive(Clone)]
pub struct TelegramApi {
    client: reqwest::Client,
    base_url: String,
}

impl TelegramApi {
    pub fn new(token: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .context("Failed to build Telegram HTTP client")?;

        Ok(Self {
            client,
            base_url: format!("{API_ROOT}/bot{token}"),
        })
    }

    async fn call<B, T>(&self, method: &str, body: &B, timeout: Option<Duration>) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut request = self
            .client
            .post(format!("{}/{method}", self.base_url))
            .json(body);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response: ApiResponse<T> = request
            .send()
            .await
            .with_context(|| format!("Telegram {method} request failed"))?
            .json()
            .await
            .with_context(|| format!("Telegram {method} returned an unreadable body"))?;

        if !response.ok {
            return Err(anyhow!(
                "Telegram {method} failed ({}): {}",
                response.error_code.unwrap_or_default(),
                response.description.unwrap_or_else(|| "no description".to_string())
            ));
        }

        response
            .result
            .ok_or_else(|| anyhow!("Telegram {method} returned no result"))
    }

    /// Identify the bot account behind the token
    pub async fn get_me(&self) -> Result<User> {
        self.call("getMe", &serde_json::json!({}), None).await
    }

    /// Long-poll for updates newer than `offset`
    pub async fn get_updates(&self, offset: Option<i64>, timeout_secs: u64) -> Result<Vec<Update>> {
        let request = GetUpdatesRequest {
            offset,
            timeout: timeout_secs,
            allowed_updates: ALLOWED_UPDATES,
        };
        let updates: Vec<Update> = self
            .call(
                "getUpdates",
                &request,
                Some(Duration::from_secs(timeout_secs) + POLL_GRACE),
            )
            .await?;

        if !updates.is_empty() {
            debug!("Received {} updates", updates.len());
        }
        Ok(updates)
    }

    /// Discard everything queued while the bot was offline; returns the next offset
    pub async fn drop_pending_updates(&self) -> Result<Option<i64>> {
        let pending = self.get_updates(Some(-1), 0).await?;
        Ok(pending.last().map(|u| u.update_id + 1))
    }

    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        parse_mode: Option<ParseMode>,
    ) -> Result<()> {
        let request = SendMessageRequest {
            chat_id,
            text,
            parse_mode,
        };
        let _: serde_json::Value = self.call("sendMessage", &request, None).await?;
        Ok(())
    }

    pub async fn send_chat_action(&self, chat_id: i64, action: &str) -> Result<()> {
        let request = SendChatActionRequest { chat_id, action };
        let _: bool = self.call("sendChatAction", &request, None).await?;
        Ok(())
    }
}

#[async_trait]
impl ReplySink for TelegramApi {
    async fn send_typing(&self, chat_id: i64) -> Result<()> {
        self.send_chat_action(chat_id, "typing").await
    }

    async fn send_reply(&self, chat_id: i64, reply: &Reply) -> Result<()> {
        self.send_message(chat_id, &reply.text, reply.parse_mode)
            .await
    }
}
