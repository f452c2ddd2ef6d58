//! # LiberGPT Completion Client
//!
//! HTTP client for the LiberGPT Copilot endpoint. The endpoint takes a single
//! prompt and answers with `{"code": 200, "response": {"content": "..."}}`.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use log::{debug, error, warn};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

const SYSTEM_PROMPT: &str = "You are LiberGPT";
const USER_AGENT: &str = "LiberGPT-Telegram-Bot/1.0";

/// A service that turns a prompt into generated text
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Generate a reply for `prompt`
    async fn get_response(&self, prompt: &str) -> Result<String>;

    /// Whether the service currently answers a trivial prompt
    async fn health_check(&self) -> bool {
        match self.get_response("Hello").await {
            Ok(_) => true,
            Err(e) => {
                warn!("API health check failed: {e:#}");
                false
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    /// The endpoint expects the string form
    stream: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

fn build_payload(prompt: &str) -> CompletionRequest<'_> {
    CompletionRequest {
        stream: "false",
        messages: vec![
            ChatMessage {
                role: "system",
                content: SYSTEM_PROMPT,
            },
            ChatMessage {
                role: "user",
                content: prompt,
            },
        ],
    }
}

/// Pull the generated text out of a decoded response body
fn extract_content(body: &Value) -> Result<String> {
    let object = body
        .as_object()
        .ok_or_else(|| anyhow!("API response is not a JSON object"))?;

    if object.get("code").and_then(Value::as_i64) != Some(200) {
        let message = object
            .get("message")
            .or_else(|| object.get("error"))
            .map(|v| match v.as_str() {
                Some(s) => s.to_string(),
                None => v.to_string(),
            })
            .unwrap_or_else(|| "Unknown API error".to_string());
        bail!("API error: {message}");
    }

    match body
        .get("response")
        .and_then(|r| r.get("content"))
        .and_then(Value::as_str)
    {
        Some(content) if !content.is_empty() => Ok(content.to_string()),
        _ => bail!("API response missing content field"),
    }
}

/// Client for the LiberGPT Copilot API
#[derive(Clone)]
pub struct LiberGptClient {
    client: reqwest::Client,
    url: String,
}

impl LiberGptClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build completion HTTP client")?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl CompletionClient for LiberGptClient {
    async fn get_response(&self, prompt: &str) -> Result<String> {
        debug!("Making API request to: {}", self.url);

        let response = self
            .client
            .post(&self.url)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&build_payload(prompt))
            .send()
            .await
            .map_err(|e| {
                error!("HTTP error during API request: {e}");
                e
            })?;

        let response = response.error_for_status().map_err(|e| {
            error!("API returned error status: {e}");
            e
        })?;

        let body: Value = response.json().await?;
        let content = extract_content(&body)?;

        debug!("Received API response: {} characters", content.len());
        Ok(content)
    }
}
