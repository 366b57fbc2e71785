use crate::cache::FreshnessCache;
use crate::entry::LeaderboardEntry;
use crate::scrape::{EntryParser, MarkupSource};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

/// Why a refresh produced nothing cacheable
///
/// Neither case is reported to HTTP callers; both fall back to stale data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefreshFailure {
    #[error("Upstream unavailable: {reason}")]
    UpstreamUnavailable { reason: String },

    #[error("No leaderboard entries parsed from upstream markup")]
    NoEntriesParsed,
}

/// Result of one fetch + parse cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Non-empty entries, already written to the cache
    Fresh(Arc<Vec<LeaderboardEntry>>),
    Failed(RefreshFailure),
}

/// Everything a refresh needs, shareable across the in-flight future
pub(crate) struct RefreshContext {
    pub source: Arc<dyn MarkupSource>,
    pub parser: Arc<EntryParser>,
    pub cache: Arc<FreshnessCache>,
}

impl RefreshContext {
    /// Fetches, parses, and caches the leaderboard
    pub async fn run(self: Arc<Self>) -> RefreshOutcome {
        let started = Instant::now();

        let markup = match self.source.fetch().await {
            Ok(markup) => markup,
            Err(e) => {
                tracing::warn!("Leaderboard fetch failed: {}", e);
                return RefreshOutcome::Failed(RefreshFailure::UpstreamUnavailable {
                    reason: e.to_string(),
                });
            }
        };

        // Markup traversal is CPU-bound; keep it off the async workers
        let parser = Arc::clone(&self.parser);
        let entries = match tokio::task::spawn_blocking(move || parser.parse(&markup)).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::error!("Leaderboard parse task failed: {}", e);
                return RefreshOutcome::Failed(RefreshFailure::NoEntriesParsed);
            }
        };

        if entries.is_empty() {
            tracing::warn!(
                "No leaderboard entries matched in markup from {}",
                self.source.describe()
            );
            return RefreshOutcome::Failed(RefreshFailure::NoEntriesParsed);
        }

        let entries = Arc::new(entries);
        self.cache.put(Arc::clone(&entries)).await;

        tracing::info!(
            "Refreshed {} leaderboard entries from {} in {:?}",
            entries.len(),
            self.source.describe(),
            started.elapsed()
        );

        RefreshOutcome::Fresh(entries)
    }
}
