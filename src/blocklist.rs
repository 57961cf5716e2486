// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Time-bounded identity blocklist.
//!
//! An identity is blocked while `now - blocked_at < block_duration`. The
//! window is anchored to the first blocking event: re-blocking an already
//! blocked identity leaves the original window untouched.

use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::info;

/// Thread-safe blocklist with per-entry expiry.
#[derive(Debug)]
pub struct Blocklist {
    entries: RwLock<HashMap<String, Instant>>,
    block_duration: Duration,
}

impl Blocklist {
    /// Create an empty blocklist with the given block duration.
    pub fn new(block_duration: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            block_duration,
        }
    }

    /// Block an identity from now.
    ///
    /// A no-op while an unexpired entry exists; an expired entry is
    /// replaced with a fresh window.
    pub async fn block(&self, identity: &str) {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        match entries.get(identity) {
            Some(blocked_at) if now.duration_since(*blocked_at) < self.block_duration => {}
            _ => {
                entries.insert(identity.to_string(), now);
                info!(identity, "identity blocked");
            }
        }
    }

    /// Whether an identity is currently blocked.
    pub async fn is_blocked(&self, identity: &str) -> bool {
        let entries = self.entries.read().await;
        match entries.get(identity) {
            Some(blocked_at) => Instant::now().duration_since(*blocked_at) < self.block_duration,
            None => false,
        }
    }

    /// Drop entries whose block window has elapsed.
    pub async fn sweep(&self) {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        entries.retain(|_, blocked_at| now.duration_since(*blocked_at) < self.block_duration);
    }

    /// Number of entries, expired or not.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the blocklist holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_block_and_check() {
        let blocklist = Blocklist::new(Duration::from_secs(3600));

        assert!(!blocklist.is_blocked("203.0.113.9").await);
        blocklist.block("203.0.113.9").await;
        assert!(blocklist.is_blocked("203.0.113.9").await);
        assert!(!blocklist.is_blocked("203.0.113.10").await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_block_expires() {
        let blocklist = Blocklist::new(Duration::from_secs(60));
        blocklist.block("203.0.113.9").await;

        tokio::time::advance(Duration::from_secs(59)).await;
        assert!(blocklist.is_blocked("203.0.113.9").await);

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(!blocklist.is_blocked("203.0.113.9").await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reblock_does_not_extend_window() {
        let blocklist = Blocklist::new(Duration::from_secs(60));
        blocklist.block("203.0.113.9").await;

        tokio::time::advance(Duration::from_secs(45)).await;
        blocklist.block("203.0.113.9").await;

        // 61s after the original block the window must be over, even though
        // the second trigger was only 16s ago.
        tokio::time::advance(Duration::from_secs(16)).await;
        assert!(!blocklist.is_blocked("203.0.113.9").await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_can_be_reblocked() {
        let blocklist = Blocklist::new(Duration::from_secs(60));
        blocklist.block("203.0.113.9").await;

        tokio::time::advance(Duration::from_secs(61)).await;
        assert!(!blocklist.is_blocked("203.0.113.9").await);

        blocklist.block("203.0.113.9").await;
        assert!(blocklist.is_blocked("203.0.113.9").await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_drops_expired() {
        let blocklist = Blocklist::new(Duration::from_secs(60));
        blocklist.block("203.0.113.9").await;
        tokio::time::advance(Duration::from_secs(30)).await;
        blocklist.block("203.0.113.10").await;

        tokio::time::advance(Duration::from_secs(31)).await;
        blocklist.sweep().await;

        assert_eq!(blocklist.len().await, 1);
        assert!(blocklist.is_blocked("203.0.113.10").await);
    }
}
