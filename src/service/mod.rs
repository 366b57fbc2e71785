//! Request orchestration for the leaderboard endpoint
//!
//! Every request goes through the same sequence:
//! 1. Rate limit check for the client key (rejects before any other work)
//! 2. Freshness cache lookup
//! 3. On a miss, a coalesced fetch + parse of the upstream page
//! 4. Cache write (non-empty results only)
//! 5. Response entries: fresh, stale, or empty

mod refresh;
mod single_flight;

pub use refresh::{RefreshFailure, RefreshOutcome};
pub use single_flight::SingleFlight;

use crate::cache::FreshnessCache;
use crate::config::Config;
use crate::entry::LeaderboardEntry;
use crate::limiter::{RateDecision, RateLimiter};
use crate::scrape::{EntryParser, HttpSource, MarkupRules, MarkupSource};
use futures_util::FutureExt;
use refresh::RefreshContext;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors visible to callers of the leaderboard endpoint
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LeaderboardError {
    #[error("Too many requests")]
    RateLimitExceeded { retry_after: Duration },
}

/// Where the served entries came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// Fresh cache hit
    Hit,
    /// Fetched for this request (possibly empty)
    Miss,
    /// Refresh failed; previous entries served
    Stale,
}

impl CacheStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hit => "HIT",
            Self::Miss => "MISS",
            Self::Stale => "STALE",
        }
    }
}

/// Entries ready to be returned to a caller
#[derive(Debug, Clone)]
pub struct Served {
    pub entries: Arc<Vec<LeaderboardEntry>>,
    pub status: CacheStatus,
}

/// Shared service state: limiter, cache, and the refresh pipeline
///
/// Built once at startup and handed to request handlers behind an `Arc`.
pub struct LeaderboardService {
    limiter: RateLimiter,
    cache: Arc<FreshnessCache>,
    refresh: Arc<RefreshContext>,
    flight: SingleFlight<RefreshOutcome>,
}

impl LeaderboardService {
    pub fn new(
        source: Arc<dyn MarkupSource>,
        parser: EntryParser,
        cache: FreshnessCache,
        limiter: RateLimiter,
    ) -> Self {
        let cache = Arc::new(cache);
        Self {
            limiter,
            refresh: Arc::new(RefreshContext {
                source,
                parser: Arc::new(parser),
                cache: Arc::clone(&cache),
            }),
            cache,
            flight: SingleFlight::new(),
        }
    }

    /// Builds the service against the configured upstream
    pub fn from_config(config: &Config) -> crate::Result<Self> {
        let rules = MarkupRules::from_config(&config.markup, &config.upstream)?;
        let source = HttpSource::new(&config.upstream)?;

        Ok(Self::new(
            Arc::new(source),
            EntryParser::new(rules),
            FreshnessCache::new(config.cache.freshness()),
            RateLimiter::from_config(&config.rate_limit),
        ))
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    pub fn cache(&self) -> &FreshnessCache {
        &self.cache
    }

    /// Handles one leaderboard request from `client_key`
    ///
    /// # Returns
    ///
    /// * `Ok(Served)` - Entries to return; never fails because of upstream problems
    /// * `Err(LeaderboardError::RateLimitExceeded)` - Client exceeded its window
    pub async fn leaderboard(&self, client_key: &str) -> Result<Served, LeaderboardError> {
        if let RateDecision::Deny { retry_after } = self.limiter.check(client_key) {
            tracing::warn!("Rate limit exceeded for client {}", client_key);
            return Err(LeaderboardError::RateLimitExceeded { retry_after });
        }

        Ok(self.current().await)
    }

    /// Returns the current entries, refreshing if the cache is not fresh
    pub async fn current(&self) -> Served {
        if let Some(entries) = self.cache.fresh().await {
            tracing::debug!("Serving {} cached entries", entries.len());
            return Served {
                entries,
                status: CacheStatus::Hit,
            };
        }

        match self.refresh().await {
            RefreshOutcome::Fresh(entries) => Served {
                entries,
                status: CacheStatus::Miss,
            },
            RefreshOutcome::Failed(failure) => match self.cache.get().await {
                Some(slot) => {
                    tracing::warn!(
                        "Serving stale entries (age {}s) after refresh failure: {}",
                        slot.age().num_seconds(),
                        failure
                    );
                    Served {
                        entries: slot.entries,
                        status: CacheStatus::Stale,
                    }
                }
                None => Served {
                    entries: Arc::new(Vec::new()),
                    status: CacheStatus::Miss,
                },
            },
        }
    }

    /// Runs a fetch + parse cycle, joining one already in flight
    pub async fn refresh(&self) -> RefreshOutcome {
        let context = Arc::clone(&self.refresh);
        self.flight.run(move || context.run().boxed()).await
    }
}
