//! Process-local result cache for product listings.
//!
//! Entries are keyed by [`crate::domain::QueryFilter::cache_key`] and are
//! valid for a fixed TTL measured from insertion. After every insert the
//! cache is trimmed to the newest `max_entries` by insertion time; reads do
//! not refresh recency and do not remove expired entries.
//!
//! The cache is not shared across processes. Concurrent misses on the same
//! key both fetch and both insert; the last write wins.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use crate::api::dto::ProductListResponse;

/// A cached listing with its insertion time.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Cached response payload.
    pub payload: Arc<ProductListResponse>,
    /// When the entry was inserted.
    pub inserted_at: Instant,
    /// Insertion order, used to break ties on identical instants.
    pub sequence: u64,
}

impl CacheEntry {
    /// Returns `true` while `now - inserted_at < ttl`.
    #[must_use]
    pub fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.inserted_at) < ttl
    }
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<String, CacheEntry>,
    next_sequence: u64,
}

/// TTL-bounded, size-capped listing cache.
#[derive(Debug)]
pub struct ResultCache {
    ttl: Duration,
    max_entries: usize,
    state: RwLock<CacheState>,
}

impl ResultCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            ttl,
            max_entries,
            state: RwLock::new(CacheState::default()),
        }
    }

    /// Entry lifetime.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the payload for `key` if present and fresh.
    pub async fn get(&self, key: &str) -> Option<Arc<ProductListResponse>> {
        self.get_at(key, Instant::now()).await
    }

    /// [`ResultCache::get`] evaluated at `now`.
    pub async fn get_at(&self, key: &str, now: Instant) -> Option<Arc<ProductListResponse>> {
        let state = self.state.read().await;
        state
            .entries
            .get(key)
            .filter(|entry| entry.is_fresh(now, self.ttl))
            .map(|entry| Arc::clone(&entry.payload))
    }

    /// Stores `payload` under `key`, replacing any previous entry, then
    /// evicts the oldest entries beyond the cap.
    pub async fn put(&self, key: String, payload: Arc<ProductListResponse>) {
        self.put_at(key, payload, Instant::now()).await;
    }

    /// [`ResultCache::put`] with an explicit insertion time.
    pub async fn put_at(&self, key: String, payload: Arc<ProductListResponse>, now: Instant) {
        let mut state = self.state.write().await;
        let sequence = state.next_sequence;
        state.next_sequence = state.next_sequence.wrapping_add(1);
        state.entries.insert(
            key,
            CacheEntry {
                payload,
                inserted_at: now,
                sequence,
            },
        );

        if state.entries.len() > self.max_entries {
            let mut by_recency: Vec<(Instant, u64, String)> = state
                .entries
                .iter()
                .map(|(k, e)| (e.inserted_at, e.sequence, k.clone()))
                .collect();
            by_recency.sort_unstable_by(|a, b| (b.0, b.1).cmp(&(a.0, a.1)));
            let evicted = by_recency.len().saturating_sub(self.max_entries);
            for (_, _, stale) in by_recency.into_iter().skip(self.max_entries) {
                state.entries.remove(&stale);
            }
            tracing::debug!(evicted, "result cache trimmed");
        }
    }

    /// Number of stored entries, fresh or expired.
    pub async fn len(&self) -> usize {
        self.state.read().await.entries.len()
    }

    /// Returns `true` if the cache holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.state.read().await.entries.is_empty()
    }

    /// Drops every entry.
    pub async fn clear(&self) {
        self.state.write().await.entries.clear();
    }
}
