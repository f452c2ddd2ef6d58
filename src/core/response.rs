//! Reply text utilities for Telegram
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Classify completion errors into user-facing messages
//! - 1.0.0: Sentence-aware truncation and MarkdownV2 escaping

/// Telegram message text limit
pub const MESSAGE_LIMIT: usize = 4096;

/// Appended to replies that had to be shortened
pub const TRUNCATION_NOTE: &str = "\n\n[Message truncated due to length]";

/// Characters that must be escaped in MarkdownV2 text
const MARKDOWN_V2_SPECIAL: &[char] = &[
    '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
];

/// Escape MarkdownV2 special characters so `text` renders literally
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if MARKDOWN_V2_SPECIAL.contains(&ch) {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Truncate text to at most `max_length` characters, adding an ellipsis if needed
///
/// Prefers cutting at the last sentence end or line break when that still keeps
/// more than 80% of the allowed length. Lengths are counted in characters so the
/// cut never lands inside a multi-byte character.
pub fn truncate_message(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        return text.to_string();
    }

    let keep = max_length.saturating_sub(3);
    let truncated: String = text.chars().take(keep).collect();

    // (char position, byte offset) of the last sentence end or line break
    let cut_point = truncated
        .char_indices()
        .enumerate()
        .filter(|&(_, (_, ch))| ch == '.' || ch == '\n')
        .map(|(pos, (idx, _))| (pos, idx))
        .last();

    if let Some((pos, idx)) = cut_point {
        if pos * 5 > max_length * 4 {
            return format!("{}...", &truncated[..=idx]);
        }
    }

    format!("{truncated}...")
}

/// Fit a completion response into a single Telegram message
pub fn truncate_reply(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        return text.to_string();
    }

    let budget = max_length.saturating_sub(TRUNCATION_NOTE.chars().count());
    format!("{}{TRUNCATION_NOTE}", truncate_message(text, budget))
}

/// Turn a failed completion into a message suitable for the user
pub fn format_error_message(error: &anyhow::Error) -> String {
    if let Some(e) = error.downcast_ref::<reqwest::Error>() {
        if e.is_timeout() {
            return "⏱️ Request timed out. Please try again.".to_string();
        }
        if e.is_connect() {
            return "🔌 Connection error. Please try again later.".to_string();
        }
        if e.is_decode() {
            return "📝 Invalid response format. Please try again.".to_string();
        }
        if e.is_status() {
            return "🌐 Server error. Please try again later.".to_string();
        }
    }

    if error.downcast_ref::<serde_json::Error>().is_some() {
        return "📝 Invalid response format. Please try again.".to_string();
    }

    format!("❌ An error occurred: {error}")
}
