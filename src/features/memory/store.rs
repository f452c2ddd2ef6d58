//! # Conversation Memory Store
//!
//! Per-user ring buffers of recent message/response pairs, rendered as a context
//! transcript for the next completion request.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.0.0: Initial release with FIFO eviction, context rendering and stats

use anyhow::{ensure, Result};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use log::{debug, info};
use serde::Serialize;
use std::collections::VecDeque;

use crate::features::UserId;

/// Header placed before the rendered transcript
const CONTEXT_HEADER: &str = "Previous conversation context:";
/// Trailer placed after the rendered transcript
const CONTEXT_TRAILER: &str = "Current message:";

/// One stored exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conversation {
    pub timestamp: DateTime<Utc>,
    pub user_message: String,
    pub bot_response: String,
}

/// Memory statistics for a single user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemoryStats {
    pub conversation_count: usize,
    pub oldest_conversation: Option<DateTime<Utc>>,
    pub newest_conversation: Option<DateTime<Utc>>,
}

/// Memory statistics across every tracked user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TotalStats {
    pub active_users: usize,
    pub total_conversations: usize,
    pub max_conversations_per_user: usize,
}

pub struct ConversationMemory {
    conversations: DashMap<UserId, VecDeque<Conversation>>,
    max_conversations: usize,
}

impl ConversationMemory {
    /// Create a store remembering at most `max_conversations` exchanges per user.
    pub fn new(max_conversations: usize) -> Result<Self> {
        ensure!(
            max_conversations > 0,
            "max_conversations must be positive, got {max_conversations}"
        );

        info!("ConversationMemory initialized with max {max_conversations} conversations per user");

        Ok(Self {
            conversations: DashMap::new(),
            max_conversations,
        })
    }

    pub fn max_conversations(&self) -> usize {
        self.max_conversations
    }

    /// Record an exchange, evicting the user's oldest one when at capacity.
    pub fn add_conversation(&self, user_id: UserId, user_message: &str, bot_response: &str) {
        let mut entry = self.conversations.entry(user_id).or_default();

        while entry.len() >= self.max_conversations {
            entry.pop_front();
        }

        entry.push_back(Conversation {
            timestamp: Utc::now(),
            user_message: user_message.to_string(),
            bot_response: bot_response.to_string(),
        });

        debug!(
            "Added conversation for user {user_id}. Total: {}",
            entry.len()
        );
    }

    /// Copy of the user's history, oldest first.
    ///
    /// With `limit`, only the most recent `limit` exchanges are returned.
    pub fn get_conversation_history(
        &self,
        user_id: UserId,
        limit: Option<usize>,
    ) -> Vec<Conversation> {
        let Some(entry) = self.conversations.get(&user_id) else {
            return Vec::new();
        };

        let skip = match limit {
            Some(limit) => entry.len().saturating_sub(limit),
            None => 0,
        };

        entry.iter().skip(skip).cloned().collect()
    }

    /// Render the last `include_last_n` exchanges as a prompt prefix.
    ///
    /// Returns an empty string when there is nothing to include; callers must
    /// check before prepending.
    pub fn get_context_string(&self, user_id: UserId, include_last_n: usize) -> String {
        let conversations = self.get_conversation_history(user_id, Some(include_last_n));

        if conversations.is_empty() {
            return String::new();
        }

        let context = conversations
            .iter()
            .map(|conv| {
                format!(
                    "User: {}\nAssistant: {}",
                    conv.user_message, conv.bot_response
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        format!("{CONTEXT_HEADER}\n{context}\n\n{CONTEXT_TRAILER}")
    }

    /// Forget everything stored for the user; returns how many exchanges were removed.
    pub fn clear_user_memory(&self, user_id: UserId) -> usize {
        match self.conversations.remove(&user_id) {
            Some((_, conversations)) => {
                let count = conversations.len();
                info!("Cleared {count} conversations for user {user_id}");
                count
            }
            None => 0,
        }
    }

    pub fn get_memory_stats(&self, user_id: UserId) -> MemoryStats {
        match self.conversations.get(&user_id) {
            Some(entry) => MemoryStats {
                conversation_count: entry.len(),
                oldest_conversation: entry.front().map(|c| c.timestamp),
                newest_conversation: entry.back().map(|c| c.timestamp),
            },
            None => MemoryStats {
                conversation_count: 0,
                oldest_conversation: None,
                newest_conversation: None,
            },
        }
    }

    pub fn get_total_stats(&self) -> TotalStats {
        let (active_users, total_conversations) = self
            .conversations
            .iter()
            .filter(|entry| !entry.is_empty())
            .fold((0, 0), |(users, total), entry| (users + 1, total + entry.len()));

        TotalStats {
            active_users,
            total_conversations,
            max_conversations_per_user: self.max_conversations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::sync::Barrier;

    fn messages(history: &[Conversation]) -> Vec<&str> {
        history.iter().map(|c| c.user_message.as_str()).collect()
    }

    #[test]
    fn test_rejects_zero_capacity() {
        assert!(ConversationMemory::new(0).is_err());
    }

    #[test]
    fn test_capacity_evicts_oldest_first() {
        let memory = ConversationMemory::new(3).unwrap();

        memory.add_conversation(7, "Hello", "Hi there! How can I help you?");
        memory.add_conversation(7, "What's Python?", "Python is a programming language...");
        memory.add_conversation(7, "How do I learn it?", "Start with the basics...");
        assert_eq!(memory.get_conversation_history(7, None).len(), 3);

        memory.add_conversation(7, "Tell me more", "Sure, here's more info...");
        let history = memory.get_conversation_history(7, None);
        assert_eq!(history.len(), 3);
        assert_eq!(
            messages(&history),
            vec!["What's Python?", "How do I learn it?", "Tell me more"]
        );
    }

    #[test]
    fn test_reads_do_not_affect_eviction() {
        let memory = ConversationMemory::new(2).unwrap();

        memory.add_conversation(1, "a", "1");
        memory.add_conversation(1, "b", "2");
        // Reading the oldest entry must not refresh it
        let _ = memory.get_conversation_history(1, None);
        let _ = memory.get_context_string(1, 1);
        memory.add_conversation(1, "c", "3");

        assert_eq!(messages(&memory.get_conversation_history(1, None)), vec!["b", "c"]);
    }

    #[test]
    fn test_history_limit_returns_most_recent() {
        let memory = ConversationMemory::new(10).unwrap();
        for i in 0..5 {
            memory.add_conversation(1, &format!("m{i}"), &format!("r{i}"));
        }

        assert_eq!(messages(&memory.get_conversation_history(1, Some(2))), vec!["m3", "m4"]);
        assert_eq!(memory.get_conversation_history(1, Some(50)).len(), 5);
        assert!(memory.get_conversation_history(1, Some(0)).is_empty());
        assert!(memory.get_conversation_history(2, None).is_empty());
    }

    #[test]
    fn test_context_string_empty_without_history() {
        let memory = ConversationMemory::new(3).unwrap();
        assert_eq!(memory.get_context_string(12345, 5), "");
    }

    #[test]
    fn test_context_string_format() {
        let memory = ConversationMemory::new(5).unwrap();
        memory.add_conversation(1, "Hello", "Hi!");
        memory.add_conversation(1, "What's Rust?", "A systems language.");
        memory.add_conversation(1, "Is it fast?", "Yes.");

        let context = memory.get_context_string(1, 2);
        assert_eq!(
            context,
            "Previous conversation context:\n\
             User: What's Rust?\n\
             Assistant: A systems language.\n\
             User: Is it fast?\n\
             Assistant: Yes.\n\
             \n\
             Current message:"
        );
    }

    #[test]
    fn test_clear_user_memory() {
        let memory = ConversationMemory::new(3).unwrap();
        memory.add_conversation(1, "a", "1");
        memory.add_conversation(1, "b", "2");
        memory.add_conversation(2, "c", "3");

        assert_eq!(memory.clear_user_memory(1), 2);
        assert!(memory.get_conversation_history(1, None).is_empty());
        assert_eq!(memory.clear_user_memory(1), 0);

        // Other users are untouched
        assert_eq!(memory.get_conversation_history(2, None).len(), 1);
    }

    #[test]
    fn test_memory_stats() {
        let memory = ConversationMemory::new(3).unwrap();

        let empty = memory.get_memory_stats(1);
        assert_eq!(empty.conversation_count, 0);
        assert!(empty.oldest_conversation.is_none());
        assert!(empty.newest_conversation.is_none());

        memory.add_conversation(1, "a", "1");
        memory.add_conversation(1, "b", "2");

        let stats = memory.get_memory_stats(1);
        let history = memory.get_conversation_history(1, None);
        assert_eq!(stats.conversation_count, 2);
        assert_eq!(stats.oldest_conversation, Some(history[0].timestamp));
        assert_eq!(stats.newest_conversation, Some(history[1].timestamp));
        assert!(stats.oldest_conversation <= stats.newest_conversation);
    }

    #[test]
    fn test_total_stats() {
        let memory = ConversationMemory::new(2).unwrap();
        memory.add_conversation(1, "a", "1");
        memory.add_conversation(1, "b", "2");
        memory.add_conversation(1, "c", "3");
        memory.add_conversation(2, "d", "4");
        memory.add_conversation(3, "e", "5");
        memory.clear_user_memory(3);

        assert_eq!(
            memory.get_total_stats(),
            TotalStats {
                active_users: 2,
                total_conversations: 3,
                max_conversations_per_user: 2,
            }
        );

        memory.add_conversation(3, "f", "6");
        assert_eq!(memory.get_total_stats().active_users, 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_adds_respect_capacity() {
        let memory = Arc::new(ConversationMemory::new(5).unwrap());
        let barrier = Arc::new(Barrier::new(40));

        let handles: Vec<_> = (0..40)
            .map(|i| {
                let memory = memory.clone();
                let barrier = barrier.clone();
                tokio::spawn(async move {
                    barrier.wait().await;
                    memory.add_conversation(i % 2, &format!("m{i}"), "r");
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        let totals = memory.get_total_stats();
        assert_eq!(totals.active_users, 2);
        assert_eq!(totals.total_conversations, 10);
    }
}
