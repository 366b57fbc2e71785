//! Per-client request limiter
//!
//! Each client key gets a fixed window: the first request opens it, further
//! requests count against it, and once the window length has passed the next
//! request opens a fresh one. Expired records are swept periodically so the
//! key map does not grow without bound.

mod record;

pub use record::RateLimitRecord;

use crate::config::RateLimitConfig;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Outcome of a rate limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allow,
    /// Rejected; the client may retry once `retry_after` has passed
    Deny { retry_after: Duration },
}

impl RateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Fixed-window rate limiter keyed by client identifier
#[derive(Debug, Clone)]
pub struct RateLimiter {
    records: Arc<Mutex<HashMap<String, RateLimitRecord>>>,
    max_requests: u32,
    window: Duration,
    sweep_interval: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            records: Arc::new(Mutex::new(HashMap::new())),
            max_requests,
            window,
            sweep_interval: Duration::from_secs(300),
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self {
            sweep_interval: config.sweep_interval(),
            ..Self::new(config.max_requests, config.window())
        }
    }

    /// Checks and records a request for `key`
    pub fn check(&self, key: &str) -> RateDecision {
        self.check_at(key, Instant::now())
    }

    /// Checks and records a request for `key` at a given instant
    ///
    /// The lookup, window reset and increment happen under one lock, so
    /// concurrent requests from the same key cannot both take the last slot.
    pub fn check_at(&self, key: &str, now: Instant) -> RateDecision {
        let mut records = self.lock();

        let Some(record) = records.get_mut(key) else {
            records.insert(key.to_string(), RateLimitRecord::new(now));
            return RateDecision::Allow;
        };

        if record.try_record(self.max_requests, self.window, now) {
            RateDecision::Allow
        } else {
            RateDecision::Deny {
                retry_after: record.time_until_reset(self.window, now),
            }
        }
    }

    /// Removes records whose window has elapsed; returns how many were removed
    pub fn sweep_expired(&self) -> usize {
        self.sweep_expired_at(Instant::now())
    }

    pub fn sweep_expired_at(&self, now: Instant) -> usize {
        let mut records = self.lock();
        let before = records.len();
        records.retain(|_, record| !record.is_expired(self.window, now));
        before - records.len()
    }

    /// Spawns a background task that sweeps expired records periodically
    pub fn start_sweep_task(&self) -> tokio::task::JoinHandle<()> {
        let limiter = self.clone();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(limiter.sweep_interval);
            // The first tick completes immediately
            interval.tick().await;

            loop {
                interval.tick().await;
                let removed = limiter.sweep_expired();
                if removed > 0 {
                    tracing::debug!("Swept {} expired rate limit records", removed);
                }
            }
        })
    }

    /// Number of tracked client keys
    pub fn tracked_clients(&self) -> usize {
        self.lock().len()
    }

    pub fn record(&self, key: &str) -> Option<RateLimitRecord> {
        self.lock().get(key).copied()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, RateLimitRecord>> {
        // Records stay consistent even if a holder panicked mid-update
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
