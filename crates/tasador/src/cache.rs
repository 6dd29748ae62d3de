//! In-memory, time-bounded cache of per-ticker results.
//!
//! Entries are never deleted when they expire; an expired entry simply stops
//! being served and is replaced by the next successful fetch for its ticker.
//! Concurrent requests for the same ticker may both miss and both fetch; the
//! last write wins.

use crate::clock::{Clock, SystemClock};
use std::collections::HashMap;
use tasador_traits::normalize_symbol;
use tokio::sync::RwLock;
use tracing::trace;

/// Default time to live, in seconds.
pub const DEFAULT_TTL_SECS: u64 = 3600;

/// A cached value and when it was fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<T> {
    /// The cached result.
    pub data: T,
    /// Fetch time in epoch seconds.
    pub fetched_at_epoch_secs: i64,
}

/// Ticker-keyed cache with a fixed TTL and an injected clock.
#[derive(Debug)]
pub struct TtlCache<T, C = SystemClock> {
    entries: RwLock<HashMap<String, CacheEntry<T>>>,
    ttl_secs: u64,
    clock: C,
}

impl<T: Clone> TtlCache<T, SystemClock> {
    /// Cache on wall-clock time.
    #[must_use]
    pub fn new(ttl_secs: u64) -> Self {
        Self::with_clock(ttl_secs, SystemClock)
    }
}

impl<T: Clone, C: Clock> TtlCache<T, C> {
    /// Cache on the given clock.
    #[must_use]
    pub fn with_clock(ttl_secs: u64, clock: C) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl_secs,
            clock,
        }
    }

    /// Time to live in seconds.
    #[must_use]
    pub const fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    /// Whether an entry has reached its TTL.
    ///
    /// An entry is expired once its age is at least the TTL, so a zero TTL
    /// disables caching. A fetch time in the future counts as fresh.
    pub fn is_expired(&self, entry: &CacheEntry<T>) -> bool {
        let age = self.clock.now_epoch_secs() - entry.fetched_at_epoch_secs;
        age >= 0 && age.unsigned_abs() >= self.ttl_secs
    }

    /// The fresh value for a ticker, if any.
    pub async fn get(&self, key: &str) -> Option<T> {
        let key = normalize_symbol(key);
        let entries = self.entries.read().await;
        let entry = entries.get(&key)?;
        if self.is_expired(entry) {
            trace!(key = %key, "cache entry expired");
            return None;
        }
        Some(entry.data.clone())
    }

    /// The stored entry for a ticker, expired or not.
    pub async fn entry(&self, key: &str) -> Option<CacheEntry<T>> {
        let entries = self.entries.read().await;
        entries.get(&normalize_symbol(key)).cloned()
    }

    /// Store a value stamped with the current time, replacing any entry.
    pub async fn put(&self, key: &str, data: T) {
        let entry = CacheEntry {
            data,
            fetched_at_epoch_secs: self.clock.now_epoch_secs(),
        };
        let mut entries = self.entries.write().await;
        entries.insert(normalize_symbol(key), entry);
    }

    /// Number of stored entries, including expired ones.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Drop every entry.
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}

impl<T: Clone> Default for TtlCache<T, SystemClock> {
    fn default() -> Self {
        Self::new(DEFAULT_TTL_SECS)
    }
}
