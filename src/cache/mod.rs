//! Freshness cache for parsed leaderboard entries
//!
//! A single slot holds the most recent non-empty result together with the
//! time it was fetched. Empty results never overwrite the slot, so stale data
//! survives failed or empty refreshes.

use crate::entry::LeaderboardEntry;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Cached entries and the moment they were fetched
#[derive(Debug, Clone)]
pub struct CacheSlot {
    /// Entries in rank order
    pub entries: Arc<Vec<LeaderboardEntry>>,

    /// When the entries were fetched
    pub fetched_at: DateTime<Utc>,
}

impl CacheSlot {
    /// Returns how long ago the entries were fetched
    pub fn age(&self) -> Duration {
        self.age_at(Utc::now())
    }

    pub fn age_at(&self, now: DateTime<Utc>) -> Duration {
        now - self.fetched_at
    }

    /// Checks whether the slot may be served without refetching
    ///
    /// # Arguments
    ///
    /// * `window` - Freshness window
    /// * `now` - Reference time
    ///
    /// # Returns
    ///
    /// * `true` - Non-empty and younger than `window`
    /// * `false` - Empty or expired
    pub fn is_fresh_at(&self, window: std::time::Duration, now: DateTime<Utc>) -> bool {
        // A clock that stepped backwards yields a negative age; count it as zero
        let age = self.age_at(now).to_std().unwrap_or_default();
        !self.entries.is_empty() && age < window
    }
}

/// Single-slot, time-bounded cache
#[derive(Debug)]
pub struct FreshnessCache {
    slot: RwLock<Option<CacheSlot>>,
    freshness: std::time::Duration,
}

impl FreshnessCache {
    /// Creates an empty cache with the given freshness window
    pub fn new(freshness: std::time::Duration) -> Self {
        Self {
            slot: RwLock::new(None),
            freshness,
        }
    }

    pub fn freshness(&self) -> std::time::Duration {
        self.freshness
    }

    /// Returns the current slot contents, fresh or not
    pub async fn get(&self) -> Option<CacheSlot> {
        self.slot.read().await.clone()
    }

    /// Returns the cached entries only if they are still fresh
    pub async fn fresh(&self) -> Option<Arc<Vec<LeaderboardEntry>>> {
        let now = Utc::now();
        let slot = self.slot.read().await;
        slot.as_ref()
            .filter(|slot| slot.is_fresh_at(self.freshness, now))
            .map(|slot| Arc::clone(&slot.entries))
    }

    /// Stores entries fetched now
    ///
    /// Returns `false` and leaves the slot untouched when `entries` is empty.
    pub async fn put(&self, entries: Arc<Vec<LeaderboardEntry>>) -> bool {
        self.put_at(entries, Utc::now()).await
    }

    /// Stores entries with an explicit fetch time
    pub async fn put_at(&self, entries: Arc<Vec<LeaderboardEntry>>, fetched_at: DateTime<Utc>) -> bool {
        if entries.is_empty() {
            return false;
        }

        *self.slot.write().await = Some(CacheSlot {
            entries,
            fetched_at,
        });
        true
    }
}
