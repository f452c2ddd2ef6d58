//! # Telegram Bot API Types
//!
//! The subset of Bot API objects the relay needs. Unknown fields are ignored.

use serde::{Deserialize, Serialize};

// ============================================================================
// Envelope
// ============================================================================

/// Every Bot API response is wrapped in this envelope
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
    pub error_code: Option<i64>,
}

// ============================================================================
// Incoming objects
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub from: Option<User>,
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    pub first_name: String,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

// ============================================================================
// Outgoing requests
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParseMode {
    MarkdownV2,
}

#[derive(Debug, Serialize)]
pub struct SendMessageRequest<'a> {
    pub chat_id: i64,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<ParseMode>,
}

#[derive(Debug, Serialize)]
pub struct GetUpdatesRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    pub timeout: u64,
    pub allowed_updates: &'a [&'a str],
}

#[derive(Debug, Serialize)]
pub struct SendChatActionRequest<'a> {
    pub chat_id: i64,
    pub action: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_update() {
        let json = r#"{
            "update_id": 9001,
            "message": {
                "message_id": 5,
                "date": 1700000000,
                "from": {"id": 42, "is_bot": false, "first_name": "Ada", "username": "ada"},
                "chat": {"id": 42, "type": "private"},
                "text": "hi"
            }
        }"#;

        let update: Update = serde_json::from_str(json).unwrap();
        let msg = update.message.unwrap();
        assert_eq!(update.update_id, 9001);
        assert_eq!(msg.from.unwrap().username.as_deref(), Some("ada"));
        assert_eq!(msg.chat.id, 42);
        assert_eq!(msg.text.as_deref(), Some("hi"));
    }

    #[test]
    fn test_parse_error_envelope() {
        let json = r#"{"ok": false, "error_code": 401, "description": "Unauthorized"}"#;
        let response: ApiResponse<Vec<Update>> = serde_json::from_str(json).unwrap();
        assert!(!response.ok);
        assert!(response.result.is_none());
        assert_eq!(response.description.as_deref(), Some("Unauthorized"));
    }

    #[test]
    fn test_send_message_omits_missing_parse_mode() {
        let plain = serde_json::to_value(SendMessageRequest {
            chat_id: 1,
            text: "x",
            parse_mode: None,
        })
        .unwrap();
        assert!(plain.get("parse_mode").is_none());

        let markdown = serde_json::to_value(SendMessageRequest {
            chat_id: 1,
            text: "x",
            parse_mode: Some(ParseMode::MarkdownV2),
        })
        .unwrap();
        assert_eq!(markdown["parse_mode"], "MarkdownV2");
    }
}
