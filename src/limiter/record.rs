use std::time::{Duration, Instant};

/// Request counter for one client within a fixed window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitRecord {
    /// Requests allowed so far in the current window
    pub count: u32,

    /// When the current window started
    pub window_start: Instant,
}

impl RateLimitRecord {
    /// Starts a new window with the current request counted
    pub fn new(now: Instant) -> Self {
        Self {
            count: 1,
            window_start: now,
        }
    }

    /// Checks whether the window has fully elapsed
    pub fn is_expired(&self, window: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.window_start) >= window
    }

    /// Counts a request against this record
    ///
    /// # Returns
    ///
    /// * `true` - The request fits; the counter was incremented or the window reset
    /// * `false` - The limit is reached; the record is unchanged
    pub fn try_record(&mut self, limit: u32, window: Duration, now: Instant) -> bool {
        if self.is_expired(window, now) {
            *self = Self::new(now);
            return true;
        }

        if self.count >= limit {
            return false;
        }

        self.count += 1;
        true
    }

    /// Returns the time until this window resets
    pub fn time_until_reset(&self, window: Duration, now: Instant) -> Duration {
        window.saturating_sub(now.saturating_duration_since(self.window_start))
    }
}
