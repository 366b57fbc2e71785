use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for kol-board
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub cache: CacheConfig,
    #[serde(rename = "rate-limit")]
    pub rate_limit: RateLimitConfig,
    pub markup: MarkupConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Upstream leaderboard page configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Full URL of the leaderboard page; its origin is used to absolutize image paths
    pub url: String,

    /// User agent sent with every fetch
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Total request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Connection establishment timeout (seconds)
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: "https://kolscan.io/leaderboard".to_string(),
            user_agent: "Mozilla/5.0".to_string(),
            timeout_secs: 10,
            connect_timeout_secs: 5,
        }
    }
}

/// Freshness cache configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum age (seconds) at which cached entries are served without refetching
    #[serde(rename = "freshness-secs")]
    pub freshness_secs: u64,
}

impl CacheConfig {
    pub fn freshness(&self) -> Duration {
        Duration::from_secs(self.freshness_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { freshness_secs: 300 }
    }
}

/// Per-client rate limit configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Requests allowed per client within one window
    #[serde(rename = "max-requests")]
    pub max_requests: u32,

    /// Window length (seconds)
    #[serde(rename = "window-secs")]
    pub window_secs: u64,

    /// How often expired client records are swept (seconds)
    #[serde(rename = "sweep-interval-secs")]
    pub sweep_interval_secs: u64,
}

impl RateLimitConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 10,
            window_secs: 60,
            sweep_interval_secs: 300,
        }
    }
}

/// Markup matching rules for the leaderboard page
///
/// Class names on the upstream page carry generated suffixes, so every
/// class rule here is a prefix matched as a substring.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MarkupConfig {
    #[serde(rename = "container-class-prefix")]
    pub container_class_prefix: String,

    #[serde(rename = "profit-class-prefix")]
    pub profit_class_prefix: String,

    /// Unit suffix stripped from the realized PnL value
    #[serde(rename = "pnl-unit-suffix")]
    pub pnl_unit_suffix: String,

    /// Hosts identifying a social profile link
    #[serde(rename = "social-domains")]
    pub social_domains: Vec<String>,

    /// Image alt text identifying a social icon link
    #[serde(rename = "social-icon-label")]
    pub social_icon_label: String,
}

impl Default for MarkupConfig {
    fn default() -> Self {
        Self {
            container_class_prefix: "leaderboard_leaderboardUser__".to_string(),
            profit_class_prefix: "leaderboard_totalProfitNum__".to_string(),
            pnl_unit_suffix: "Sol".to_string(),
            social_domains: vec!["twitter.com".to_string(), "x.com".to_string()],
            social_icon_label: "twitter logo".to_string(),
        }
    }
}
