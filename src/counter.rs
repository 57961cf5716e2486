// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Per-identity request counters.
//!
//! Fixed-window counting since first seen: the count only grows until the
//! sweep evicts the entry after a period of inactivity. All mutation happens
//! under the store's own lock.

use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

#[derive(Debug)]
struct CounterEntry {
    count: u32,
    last_seen: Instant,
}

/// Thread-safe request counter store.
#[derive(Debug, Default)]
pub struct RequestCounters {
    entries: RwLock<HashMap<String, CounterEntry>>,
}

impl RequestCounters {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one request for an identity and return the new count.
    ///
    /// Creates the entry on first sight; refreshes `last_seen` either way.
    pub async fn record(&self, identity: &str) -> u32 {
        let mut entries = self.entries.write().await;
        let now = Instant::now();
        let entry = entries
            .entry(identity.to_string())
            .or_insert(CounterEntry { count: 0, last_seen: now });
        entry.count += 1;
        entry.last_seen = now;
        entry.count
    }

    /// Current count for an identity without mutating anything.
    pub async fn current(&self, identity: &str) -> u32 {
        self.entries
            .read()
            .await
            .get(identity)
            .map(|e| e.count)
            .unwrap_or(0)
    }

    /// Drop entries whose last request is older than `idle_after`.
    pub async fn sweep(&self, idle_after: Duration) {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| now.duration_since(entry.last_seen) <= idle_after);
        let evicted = before - entries.len();
        if evicted > 0 {
            debug!(evicted, "evicted idle request counters");
        }
    }

    /// Number of tracked identities.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the store is empty.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
