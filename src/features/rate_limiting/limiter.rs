//! # Feature: Rate Limiting
//!
//! Prevents spam with a configurable message quota per user. Uses a sliding window
//! with DashMap for thread-safe concurrent access: each user id owns its own queue of
//! accepted-message instants, so concurrent checks for different users only contend
//! when they land in the same shard.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Non-consuming quota view for /status, wait time prunes before reading
//! - 1.0.0: Initial release with per-user sliding window rate limiting

use anyhow::{ensure, Result};
use dashmap::DashMap;
use log::debug;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::features::UserId;

pub struct RateLimiter {
    requests: DashMap<UserId, VecDeque<Instant>>,
    max_messages: usize,
    time_window: Duration,
}

impl RateLimiter {
    /// Create a limiter admitting `max_messages` per sliding `time_window`.
    ///
    /// Fails if either limit is zero.
    pub fn new(max_messages: usize, time_window: Duration) -> Result<Self> {
        ensure!(
            max_messages > 0,
            "rate limit max_messages must be positive, got {max_messages}"
        );
        ensure!(
            !time_window.is_zero(),
            "rate limit time_window must be positive, got {time_window:?}"
        );

        Ok(RateLimiter {
            requests: DashMap::new(),
            max_messages,
            time_window,
        })
    }

    pub fn max_messages(&self) -> usize {
        self.max_messages
    }

    pub fn time_window(&self) -> Duration {
        self.time_window
    }

    /// Drop every instant that has aged out of the window.
    fn prune(queue: &mut VecDeque<Instant>, now: Instant, window: Duration) {
        while let Some(&oldest) = queue.front() {
            if now.duration_since(oldest) > window {
                queue.pop_front();
            } else {
                break;
            }
        }
    }

    /// Check whether `user_id` may send a message now, recording it if so.
    ///
    /// Blocked attempts are not recorded and do not extend the wait.
    pub fn is_allowed(&self, user_id: UserId) -> bool {
        let now = Instant::now();
        let mut entry = self.requests.entry(user_id).or_default();

        Self::prune(&mut entry, now, self.time_window);

        if entry.len() >= self.max_messages {
            debug!(
                "User {user_id} rate limited ({} messages in {:?})",
                entry.len(),
                self.time_window
            );
            false
        } else {
            entry.push_back(now);
            true
        }
    }

    /// Time until the oldest tracked message leaves the window and frees a slot.
    ///
    /// Zero when the user is under quota or unknown.
    pub fn remaining_duration(&self, user_id: UserId) -> Duration {
        let now = Instant::now();
        let Some(mut entry) = self.requests.get_mut(&user_id) else {
            return Duration::ZERO;
        };

        Self::prune(&mut entry, now, self.time_window);

        if entry.len() < self.max_messages {
            return Duration::ZERO;
        }

        match entry.front() {
            Some(&oldest) => self
                .time_window
                .saturating_sub(now.duration_since(oldest)),
            None => Duration::ZERO,
        }
    }

    /// Whole seconds until the user can send again (truncated).
    pub fn get_remaining_time(&self, user_id: UserId) -> u64 {
        self.remaining_duration(user_id).as_secs()
    }

    /// Number of messages the user could send right now, without consuming any.
    pub fn remaining_quota(&self, user_id: UserId) -> usize {
        let now = Instant::now();
        match self.requests.get_mut(&user_id) {
            Some(mut entry) => {
                Self::prune(&mut entry, now, self.time_window);
                self.max_messages.saturating_sub(entry.len())
            }
            None => self.max_messages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Barrier;
    use tokio::time::sleep;

    #[test]
    fn test_rate_limiter_rejects_zero_limits() {
        assert!(RateLimiter::new(0, Duration::from_secs(60)).is_err());
        assert!(RateLimiter::new(3, Duration::ZERO).is_err());

        let err = RateLimiter::new(0, Duration::from_secs(60))
            .err()
            .unwrap()
            .to_string();
        assert!(err.contains("max_messages"));
    }

    #[test]
    fn test_rate_limiter_allows_under_limit() {
        let limiter = RateLimiter::new(3, Duration::from_secs(1)).unwrap();

        assert!(limiter.is_allowed(1));
        assert!(limiter.is_allowed(1));
        assert!(limiter.is_allowed(1));
    }

    #[test]
    fn test_rate_limiter_blocks_over_limit() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60)).unwrap();

        let results: Vec<bool> = (0..3).map(|_| limiter.is_allowed(42)).collect();
        assert_eq!(results, vec![true, true, true]);
        assert!(!limiter.is_allowed(42));

        let remaining = limiter.get_remaining_time(42);
        assert!(remaining <= 60);
        assert!(remaining > 55);
    }

    #[test]
    fn test_blocked_attempts_do_not_consume_quota() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60)).unwrap();

        assert!(limiter.is_allowed(1));
        for _ in 0..5 {
            assert!(!limiter.is_allowed(1));
        }
        assert_eq!(limiter.requests.get(&1).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_rate_limiter_resets_after_window() {
        let limiter = RateLimiter::new(1, Duration::from_millis(100)).unwrap();

        assert!(limiter.is_allowed(1));
        assert!(!limiter.is_allowed(1));

        sleep(Duration::from_millis(150)).await;
        assert!(limiter.is_allowed(1));
    }

    #[tokio::test]
    async fn test_window_slides_one_slot_at_a_time() {
        let limiter = RateLimiter::new(2, Duration::from_millis(200)).unwrap();

        assert!(limiter.is_allowed(1));
        sleep(Duration::from_millis(120)).await;
        assert!(limiter.is_allowed(1));
        assert!(!limiter.is_allowed(1));

        // Only the first message has aged out
        sleep(Duration::from_millis(120)).await;
        assert!(limiter.is_allowed(1));
        assert!(!limiter.is_allowed(1));
    }

    #[tokio::test]
    async fn test_remaining_time_decreases_to_zero() {
        let limiter = RateLimiter::new(1, Duration::from_millis(300)).unwrap();

        assert!(limiter.is_allowed(1));
        assert!(!limiter.is_allowed(1));

        let first = limiter.remaining_duration(1);
        assert!(first > Duration::ZERO);
        assert!(first <= Duration::from_millis(300));

        sleep(Duration::from_millis(100)).await;
        let second = limiter.remaining_duration(1);
        assert!(second < first);

        sleep(Duration::from_millis(250)).await;
        assert_eq!(limiter.remaining_duration(1), Duration::ZERO);
        assert_eq!(limiter.get_remaining_time(1), 0);
    }

    #[test]
    fn test_remaining_time_zero_under_quota_or_unknown() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60)).unwrap();

        assert_eq!(limiter.get_remaining_time(7), 0);
        assert!(limiter.is_allowed(7));
        assert_eq!(limiter.get_remaining_time(7), 0);
    }

    #[test]
    fn test_remaining_quota_is_read_only() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60)).unwrap();

        assert_eq!(limiter.remaining_quota(5), 3);
        assert!(limiter.is_allowed(5));
        assert_eq!(limiter.remaining_quota(5), 2);
        assert_eq!(limiter.remaining_quota(5), 2);
        assert!(limiter.is_allowed(5));
        assert!(limiter.is_allowed(5));
        assert_eq!(limiter.remaining_quota(5), 0);
    }

    #[test]
    fn test_rate_limiter_per_user() {
        let limiter = RateLimiter::new(1, Duration::from_secs(1)).unwrap();

        assert!(limiter.is_allowed(1));
        assert!(limiter.is_allowed(2));
        assert!(!limiter.is_allowed(1));
        assert!(!limiter.is_allowed(2));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_checks_never_exceed_quota() {
        let limiter = Arc::new(RateLimiter::new(10, Duration::from_secs(60)).unwrap());
        let barrier = Arc::new(Barrier::new(50));

        let handles: Vec<_> = (0..50)
            .map(|_| {
                let limiter = limiter.clone();
                let barrier = barrier.clone();
                tokio::spawn(async move {
                    barrier.wait().await;
                    limiter.is_allowed(99)
                })
            })
            .collect();

        let mut admitted = 0;
        for handle in handles {
            if handle.await.unwrap() {
                admitted += 1;
            }
        }

        assert_eq!(admitted, 10);
        assert_eq!(limiter.remaining_quota(99), 0);
    }
}
